//! One-shot output line bring-up.
//!
//! Drives every managed line and the ready indicator low before the
//! controller accepts instructions, then raises the ready indicator once
//! the rest of startup has succeeded.  Called once from
//! [`ValveController::start`](crate::app::service::ValveController::start).

use log::info;

use crate::app::ports::{Level, LinePort};
use crate::error::LineError;
use crate::pins::LineId;

/// Drive all `lines` and the optional ready line low.
pub fn init_outputs(
    port: &mut impl LinePort,
    lines: &[LineId],
    ready_line: Option<LineId>,
) -> Result<(), LineError> {
    port.set_levels(lines, Level::Low)?;
    if let Some(ready) = ready_line {
        port.set_level(ready, Level::Low)?;
    }
    info!("hw_init: {} output lines driven low", lines.len());
    Ok(())
}

/// Raise the ready indicator, if one is configured.
pub fn signal_ready(port: &mut impl LinePort, ready_line: Option<LineId>) -> Result<(), LineError> {
    match ready_line {
        Some(ready) => {
            port.set_level(ready, Level::High)?;
            info!("hw_init: ready line {} raised", ready);
        }
        None => info!("hw_init: no ready line configured"),
    }
    Ok(())
}
