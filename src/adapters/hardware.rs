//! Hardware adapter — bridges `embedded-hal` output pins to the [`LinePort`].
//!
//! [`PinBank`] owns one [`StatefulOutputPin`] per line and exposes them
//! through the domain's line-addressed port.  Any HAL that implements the
//! `embedded-hal` 1.0 digital traits plugs in here: the sysfs pins in
//! [`super::sysfs`] in production, plain in-memory pins in tests.

use std::collections::BTreeMap;

use embedded_hal::digital::{PinState, StatefulOutputPin};
use log::error;

use crate::app::ports::{Level, LinePort};
use crate::error::LineError;
use crate::pins::LineId;

/// Line-addressed collection of output pins.
pub struct PinBank<P> {
    pins: BTreeMap<LineId, P>,
}

impl<P: StatefulOutputPin> PinBank<P> {
    pub fn new() -> Self {
        Self {
            pins: BTreeMap::new(),
        }
    }

    /// Attach `pin` as `line`, replacing any previous pin for that line.
    pub fn insert(&mut self, line: LineId, pin: P) {
        self.pins.insert(line, pin);
    }

    /// Build a bank by opening every line with `open`.  Stops at the first
    /// line that cannot be opened.
    pub fn open_all<E>(
        lines: impl IntoIterator<Item = LineId>,
        mut open: impl FnMut(LineId) -> Result<P, E>,
    ) -> Result<Self, E> {
        let mut bank = Self::new();
        for line in lines {
            bank.insert(line, open(line)?);
        }
        Ok(bank)
    }

    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.pins.keys().copied()
    }

    fn pin(&mut self, line: LineId) -> Result<&mut P, LineError> {
        self.pins.get_mut(&line).ok_or(LineError::Unavailable(line))
    }
}

impl<P: StatefulOutputPin> Default for PinBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StatefulOutputPin + Send> LinePort for PinBank<P> {
    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), LineError> {
        let state = match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        };
        self.pin(line)?.set_state(state).map_err(|e| {
            error!("hardware: write to line {} failed: {:?}", line, e);
            LineError::Io(line)
        })
    }

    fn level(&mut self, line: LineId) -> Result<Level, LineError> {
        match self.pin(line)?.is_set_high() {
            Ok(true) => Ok(Level::High),
            Ok(false) => Ok(Level::Low),
            Err(e) => {
                error!("hardware: read of line {} failed: {:?}", line, e);
                Err(LineError::Io(line))
            }
        }
    }
}
