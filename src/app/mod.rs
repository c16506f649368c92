//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the valve rack: the
//! interlocked controller, instruction parsing and dispatch, and status
//! reporting.  All interaction with hardware and the host happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real relays.

pub mod commands;
pub mod dispatch;
pub mod events;
pub mod ports;
pub mod service;
pub mod status;
