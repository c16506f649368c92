//! Transport-agnostic request front end.
//!
//! JSON-lines requests in, JSON-lines replies out.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Request Stack                       │
//! │                                                          │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────┐  │
//! │  │ io_task  │──▶│  codec   │──▶│  engine              │  │
//! │  │ (lines)  │   │ (serde)  │   │  → Dispatcher        │  │
//! │  └──────────┘   └──────────┘   │  → status snapshots  │  │
//! │       ▲                        └──────────────────────┘  │
//! │       └──────────── encoded reply ◀──────────┘           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod engine;
pub mod io_task;
