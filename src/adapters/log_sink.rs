//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { lines } => {
                info!("START | {} lines driven low", lines);
            }
            AppEvent::Ready { version } => {
                info!("READY | version={}", version);
            }
            AppEvent::ValveOpened { valve, line } => {
                info!("VALVE | {} open (line {})", valve, line);
            }
            AppEvent::ValveClosed { valve, line } => {
                info!("VALVE | {} closed (line {})", valve, line);
            }
            AppEvent::AllClosed => {
                info!("VALVE | all closed");
            }
            AppEvent::InterlockRefused { valve, excluded } => {
                warn!(
                    "INTERLOCK | cannot open valve {} as the excluded valve {} is open",
                    valve, excluded
                );
            }
            AppEvent::PipetteSequence { pipette, operation } => {
                info!("PIPETTE | {} {}", pipette, operation);
            }
        }
    }
}
