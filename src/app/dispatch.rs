//! Command dispatcher — the best-effort control plane.
//!
//! [`Dispatcher::dispatch`] is fire-and-forget: it parses an
//! `(item, command)` pair, runs it against the controller, and never
//! returns an error.  Bad input and refused operations are logged as
//! warnings; the caller observes the outcome through the next status read.

use std::sync::Arc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, error, warn};

use crate::config::SystemConfig;
use crate::error::ValveError;
use crate::sequencer::PipetteSequencer;

use super::commands::{self, AppCommand, InstructionGrammar};
use super::ports::{DeferredRunner, EventSink, LinePort, SystemPort};
use super::service::ValveController;

/// Routes parsed instructions to the controller, sequencer, and restart timer.
pub struct Dispatcher<P, S, D> {
    controller: Arc<ValveController<P, S>>,
    sequencer: PipetteSequencer<D>,
    grammar: InstructionGrammar,
    restart_delay: Duration,
    runner: Arc<dyn DeferredRunner>,
    system: Arc<dyn SystemPort>,
}

impl<P: LinePort, S: EventSink, D: DelayNs + Clone> Dispatcher<P, S, D> {
    pub fn new(
        config: &SystemConfig,
        controller: Arc<ValveController<P, S>>,
        delay: D,
        runner: Arc<dyn DeferredRunner>,
        system: Arc<dyn SystemPort>,
    ) -> Self {
        let registry = controller.registry();
        let grammar = InstructionGrammar {
            valve_ids: registry.id_range(),
            pipette_count: registry.pipettes().len(),
            pipette_commands: config.pipette_commands,
            restart_target: config.restart_target.clone(),
        };
        Self {
            sequencer: PipetteSequencer::new(config.settle_interval_ms, delay),
            grammar,
            restart_delay: Duration::from_secs(u64::from(config.restart_delay_secs)),
            runner,
            system,
            controller,
        }
    }

    /// Parse and execute one instruction.  Never fails; problems are logged.
    pub fn dispatch(&self, item: &str, command: &str) {
        match commands::parse(item, command, &self.grammar) {
            Ok(Some(cmd)) => self.execute(cmd),
            Ok(None) => debug!("Ignoring instruction '{}' / '{}'", item, command),
            Err(e) => warn!("{} (item '{}', command '{}')", e, item, command),
        }
    }

    /// Execute an already-parsed command.
    pub fn execute(&self, cmd: AppCommand) {
        let result = match cmd {
            AppCommand::OpenValve(id) => self.controller.open(id),
            AppCommand::CloseValve(id) => self.controller.close(id),
            AppCommand::CloseAll => self.controller.close_all(),
            AppCommand::Pipette { index, operation } => {
                self.sequencer.run(&*self.controller, index, operation)
            }
            AppCommand::Restart => {
                self.schedule_restart();
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            // Already reported by the controller when it refused.
            Err(ValveError::InterlockViolation { valve, .. }) => {
                debug!("{:?}: valve {} left unchanged", cmd, valve);
            }
            Err(e) => warn!("{:?} failed: {}", cmd, e),
        }
    }

    pub fn controller(&self) -> &Arc<ValveController<P, S>> {
        &self.controller
    }

    pub fn grammar(&self) -> &InstructionGrammar {
        &self.grammar
    }

    /// Hand the restart to the deferred runner and return immediately.
    fn schedule_restart(&self) {
        warn!(
            "Restart command received: system will restart in {} seconds",
            self.restart_delay.as_secs()
        );
        let system = Arc::clone(&self.system);
        let scheduled = self.runner.schedule_once(
            "restart",
            self.restart_delay,
            Box::new(move || system.restart()),
        );
        if let Err(e) = scheduled {
            error!("Restart not scheduled: {}", e);
        }
    }
}
