//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                     |
//! |---------------|--------------------|---------------------------------|
//! | `hardware`    | LinePort           | any `embedded-hal` output pins  |
//! | `sysfs`       | OutputPin          | Linux `/sys/class/gpio`         |
//! | `sim`         | LinePort           | in-memory levels                |
//! | `log_sink`    | EventSink          | `log` facade                    |
//! | `config_file` | ConfigPort         | JSON file on disk               |
//! | `system`      | SystemPort         | host restart command            |
//! | `thermal`     | (none)             | thermal zone in sysfs           |
//! | `time`        | DelayNs            | `std::thread::sleep`            |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod sysfs;
pub mod system;
pub mod thermal;
pub mod time;
