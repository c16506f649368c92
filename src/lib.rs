//! Laboratory gas valve controller library.
//!
//! Exposes the controller core, its adapters, and the request front end
//! for the `valvecontrol` binary and for integration testing.  Hardware is
//! reached only through the [`app::ports`] traits, so everything here runs
//! on a workstation against simulated lines.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod registry;
pub mod rpc;
pub mod safety;
pub mod scheduler;
pub mod sequencer;

/// Crate version, reported in the ready event and the display view.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
