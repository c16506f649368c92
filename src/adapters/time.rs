//! Host time adapter.
//!
//! [`StdDelay`] implements the `embedded-hal` blocking delay trait on top of
//! `std::thread::sleep`.  The pipette sequencer uses it for the settle
//! interval; tests swap in a delay that records or samples instead.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Blocking delay that parks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
