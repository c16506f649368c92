//! GPIO line assignments for the reference valve rack.
//!
//! Single source of truth for the default configuration: the valve table in
//! [`SystemConfig::default`](crate::config::SystemConfig) references these
//! rather than hard-coding BCM numbers.  Installations override them through
//! the JSON config file.

/// Physical output line identifier (BCM GPIO number on the Raspberry Pi).
pub type LineId = u32;

/// Every output line driven by the valve relays, in relay-board order.
///
/// The last entry (BCM 20) is wired to a spare relay with no valve attached;
/// it is still owned by the controller and driven low by a bulk close.
pub const VALVE_LINES: [LineId; 13] = [23, 17, 13, 19, 18, 27, 9, 24, 22, 11, 21, 26, 20];

/// Ready indicator.  Held low during bring-up, raised once the controller is
/// initialised so external monitoring can see process health in hardware.
pub const READY_LINE: LineId = 12;

/// Default sysfs GPIO root.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Default SoC temperature source (millidegrees Celsius).
pub const CPU_TEMPERATURE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";
