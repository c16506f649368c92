//! Outbound application events.
//!
//! The [`ValveController`](super::service::ValveController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log them, record them in tests.

use crate::pins::LineId;
use crate::registry::ValveId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// All lines driven low during bring-up.
    Started { lines: usize },

    /// Ready line raised; the controller accepts instructions.
    Ready { version: &'static str },

    ValveOpened { valve: ValveId, line: LineId },

    ValveClosed { valve: ValveId, line: LineId },

    /// Bulk close of every managed line.
    AllClosed,

    /// An open was skipped because the excluded partner is open.
    InterlockRefused { valve: ValveId, excluded: ValveId },

    /// A pipette sequence started.
    PipetteSequence {
        pipette: String,
        operation: PipetteOperation,
    },
}

/// Pipette choreography selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipetteOperation {
    Load,
    Unload,
    Close,
}

impl core::fmt::Display for PipetteOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Unload => write!(f, "unload"),
            Self::Close => write!(f, "close"),
        }
    }
}
