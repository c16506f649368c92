//! Pipette sequencer.
//!
//! A pipette is a one-way gas transfer between two valves.  Its ends must
//! never be open together, not even transiently while a relay is still
//! seating, so every transfer follows the same ordering:
//!
//! ```text
//!   close(opposite end) ──▶ settle ──▶ open(new end)
//! ```
//!
//! Closing first means a crash or a failed step leaves one side closed.
//! Each step goes through [`ValveController`], so the interlock is checked
//! on the open as usual.  The settle wait blocks the calling thread only and
//! is not cancellable; the controller's bus lock is not held while waiting.

use embedded_hal::delay::DelayNs;

use crate::app::events::{AppEvent, PipetteOperation};
use crate::app::ports::{EventSink, LinePort};
use crate::app::service::ValveController;
use crate::error::ValveError;
use crate::registry::{Pipette, ValveId};

/// Runs pipette load/unload/close sequences against a controller.
#[derive(Debug, Clone)]
pub struct PipetteSequencer<D> {
    settle_ms: u32,
    delay: D,
}

impl<D: DelayNs + Clone> PipetteSequencer<D> {
    pub fn new(settle_ms: u32, delay: D) -> Self {
        Self { settle_ms, delay }
    }

    /// Run `operation` on the pipette with 1-based `index`.
    pub fn run<P: LinePort, S: EventSink>(
        &self,
        ctl: &ValveController<P, S>,
        index: usize,
        operation: PipetteOperation,
    ) -> Result<(), ValveError> {
        let pipette = ctl.registry().pipette(index)?;
        match operation {
            PipetteOperation::Load => self.load(ctl, pipette),
            PipetteOperation::Unload => self.unload(ctl, pipette),
            PipetteOperation::Close => self.close_both(ctl, pipette),
        }
    }

    /// Close the output, settle, open the input.
    pub fn load<P: LinePort, S: EventSink>(
        &self,
        ctl: &ValveController<P, S>,
        pipette: &Pipette,
    ) -> Result<(), ValveError> {
        announce(ctl, pipette, PipetteOperation::Load);
        self.transfer(ctl, pipette.output, pipette.input)
    }

    /// Close the input, settle, open the output.
    pub fn unload<P: LinePort, S: EventSink>(
        &self,
        ctl: &ValveController<P, S>,
        pipette: &Pipette,
    ) -> Result<(), ValveError> {
        announce(ctl, pipette, PipetteOperation::Unload);
        self.transfer(ctl, pipette.input, pipette.output)
    }

    /// Close both ends.  Both closes are attempted even if the first fails.
    pub fn close_both<P: LinePort, S: EventSink>(
        &self,
        ctl: &ValveController<P, S>,
        pipette: &Pipette,
    ) -> Result<(), ValveError> {
        announce(ctl, pipette, PipetteOperation::Close);
        let input = ctl.close(pipette.input);
        let output = ctl.close(pipette.output);
        input.and(output)
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    fn transfer<P: LinePort, S: EventSink>(
        &self,
        ctl: &ValveController<P, S>,
        close_first: ValveId,
        open_after: ValveId,
    ) -> Result<(), ValveError> {
        ctl.close(close_first)?;
        self.delay.clone().delay_ms(self.settle_ms);
        ctl.open(open_after)
    }
}

fn announce<P: LinePort, S: EventSink>(
    ctl: &ValveController<P, S>,
    pipette: &Pipette,
    operation: PipetteOperation,
) {
    ctl.emit(&AppEvent::PipetteSequence {
        pipette: pipette.name.clone(),
        operation,
    });
}
