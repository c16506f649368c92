//! Valve controller — the hexagonal core.
//!
//! [`ValveController`] owns the valve registry and, behind one lock, the
//! line port and event sink.  It enforces the interlock on every open and
//! produces live status snapshots.
//!
//! ```text
//!                 ┌────────────────────────┐
//!  Dispatcher ──▶ │    ValveController     │ ──▶ EventSink
//!  Sequencer  ──▶ │ Registry · Interlock   │
//!                 │   Mutex<LinePort>      │ ◀─▶ LinePort
//!                 └────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! Every operation holds the bus lock for its whole read-modify-write, so
//! the interlock check in [`open`](ValveController::open) and the line write
//! that follows cannot interleave with another open.  Callers that need a
//! delay between operations (the pipette sequencer) release the lock while
//! they wait, so status reads are never stalled by a settle interval.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::error::{self, ConfigError, Error, LineError, ValveError};
use crate::pins::LineId;
use crate::registry::{ValveId, ValveRegistry};
use crate::safety::{self, InterlockDecision};

use super::events::AppEvent;
use super::ports::{EventSink, Level, LinePort};
use super::status::{DisplayReport, LineState, ValveDisplayStatus, ValveStatus};

/// Port and sink guarded together so events are emitted in line-write order.
struct Bus<P, S> {
    port: P,
    sink: S,
}

/// The valve control engine.
pub struct ValveController<P, S> {
    registry: ValveRegistry,
    /// Every output line the controller owns, valve or not.
    lines: Vec<LineId>,
    ready_line: Option<LineId>,
    bus: Mutex<Bus<P, S>>,
}

impl<P: LinePort, S: EventSink> ValveController<P, S> {
    /// Construct the controller from configuration.
    ///
    /// Does **not** touch the hardware; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, port: P, sink: S) -> Result<Self, ConfigError> {
        let registry = ValveRegistry::from_config(config)?;
        Ok(Self {
            registry,
            lines: config.lines.clone(),
            ready_line: config.ready_line,
            bus: Mutex::new(Bus { port, sink }),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every line low, then raise the ready line.
    ///
    /// A line failure here is fatal: the ready line stays low and the
    /// caller is expected to exit.
    pub fn start(&self) -> error::Result<()> {
        let mut bus = self.bus();
        let Bus { port, sink } = &mut *bus;

        hw_init::init_outputs(port, &self.lines, self.ready_line).map_err(Error::Init)?;
        sink.emit(&AppEvent::Started {
            lines: self.lines.len(),
        });
        safety::log_topology(&self.registry);

        hw_init::signal_ready(port, self.ready_line).map_err(Error::Init)?;
        sink.emit(&AppEvent::Ready {
            version: crate::VERSION,
        });
        Ok(())
    }

    // ── Valve operations ──────────────────────────────────────

    /// Open a valve unless its excluded partner is open.
    ///
    /// A refusal leaves the valve's line untouched and returns
    /// [`ValveError::InterlockViolation`].
    pub fn open(&self, id: ValveId) -> Result<(), ValveError> {
        let valve = self.registry.get(id)?;
        let partner = self.registry.get(valve.excluded)?;

        let mut bus = self.bus();
        let Bus { port, sink } = &mut *bus;

        match safety::evaluate_open(valve, port.level(partner.line)?) {
            InterlockDecision::Refuse { excluded } => {
                sink.emit(&AppEvent::InterlockRefused {
                    valve: id,
                    excluded,
                });
                Err(ValveError::InterlockViolation {
                    valve: id,
                    excluded,
                })
            }
            InterlockDecision::Permit => {
                port.set_level(valve.line, Level::High)?;
                sink.emit(&AppEvent::ValveOpened {
                    valve: id,
                    line: valve.line,
                });
                Ok(())
            }
        }
    }

    /// Close a valve.  Never interlock-checked.
    pub fn close(&self, id: ValveId) -> Result<(), ValveError> {
        let valve = self.registry.get(id)?;

        let mut bus = self.bus();
        let Bus { port, sink } = &mut *bus;

        port.set_level(valve.line, Level::Low)?;
        sink.emit(&AppEvent::ValveClosed {
            valve: id,
            line: valve.line,
        });
        Ok(())
    }

    /// Drive every managed line low, including lines with no valve.
    pub fn close_all(&self) -> Result<(), ValveError> {
        let mut bus = self.bus();
        let Bus { port, sink } = &mut *bus;

        port.set_levels(&self.lines, Level::Low)?;
        sink.emit(&AppEvent::AllClosed);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Live state of one valve.
    pub fn state(&self, id: ValveId) -> Result<LineState, ValveError> {
        let valve = self.registry.get(id)?;
        let level = self.bus().port.level(valve.line)?;
        Ok(level.into())
    }

    /// `{valve, status}` for every public valve, in registry order.
    pub fn status_list(&self) -> Result<Vec<ValveStatus>, LineError> {
        Ok(self
            .read_public()?
            .into_iter()
            .map(|(id, _, status)| ValveStatus { valve: id, status })
            .collect())
    }

    /// Like [`status_list`](Self::status_list) with each valve's description.
    pub fn http_status_list(&self) -> Result<Vec<ValveDisplayStatus>, LineError> {
        Ok(self
            .read_public()?
            .into_iter()
            .map(|(id, description, status)| ValveDisplayStatus {
                id,
                description: description.to_string(),
                status,
            })
            .collect())
    }

    /// Data for a status page.
    pub fn display_report(&self, cpu_temperature_c: Option<f32>) -> Result<DisplayReport, LineError> {
        Ok(DisplayReport {
            version: crate::VERSION.to_string(),
            cpu_temperature_c,
            valves: self.http_status_list()?,
        })
    }

    /// Emit an event from outside a line operation (e.g. a sequence start).
    pub fn emit(&self, event: &AppEvent) {
        self.bus().sink.emit(event);
    }

    pub fn registry(&self) -> &ValveRegistry {
        &self.registry
    }

    // ── Internal ──────────────────────────────────────────────

    /// One locked pass over the public valves.
    fn read_public(&self) -> Result<Vec<(ValveId, &str, LineState)>, LineError> {
        let mut bus = self.bus();
        self.registry
            .all()
            .iter()
            .filter(|v| v.is_public())
            .map(|v| -> Result<_, LineError> {
                let level = bus.port.level(v.line)?;
                Ok((v.id, v.description.as_str(), LineState::from(level)))
            })
            .collect()
    }

    /// Line state lives in hardware, not in the guarded value, so a panic
    /// while the lock was held leaves nothing to repair.
    fn bus(&self) -> MutexGuard<'_, Bus<P, S>> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
