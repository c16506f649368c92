//! Simulated output lines.
//!
//! [`SimulatedLines`] keeps line levels in memory so the service can run on
//! a workstation without GPIO.  Only lines declared at construction exist;
//! anything else reports [`LineError::Unavailable`], like a pin that failed
//! to export.

use std::collections::BTreeMap;

use log::trace;

use crate::app::ports::{Level, LinePort};
use crate::error::LineError;
use crate::pins::LineId;

/// In-memory [`LinePort`].  Every line starts low.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLines {
    levels: BTreeMap<LineId, Level>,
}

impl SimulatedLines {
    pub fn new(lines: impl IntoIterator<Item = LineId>) -> Self {
        Self {
            levels: lines.into_iter().map(|l| (l, Level::Low)).collect(),
        }
    }

    /// Lines currently driven high, ascending.
    pub fn high_lines(&self) -> Vec<LineId> {
        self.levels
            .iter()
            .filter(|(_, level)| level.is_high())
            .map(|(&line, _)| line)
            .collect()
    }
}

impl LinePort for SimulatedLines {
    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), LineError> {
        let slot = self
            .levels
            .get_mut(&line)
            .ok_or(LineError::Unavailable(line))?;
        trace!("sim: line {} -> {:?}", line, level);
        *slot = level;
        Ok(())
    }

    fn level(&mut self, line: LineId) -> Result<Level, LineError> {
        self.levels
            .get(&line)
            .copied()
            .ok_or(LineError::Unavailable(line))
    }
}
