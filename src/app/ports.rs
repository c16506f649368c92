//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ValveController / Dispatcher (domain)
//! ```
//!
//! Driven adapters (GPIO lines, event sinks, timers, config storage, the
//! host OS) implement these traits.  The domain consumes them via generics
//! or trait objects, so the controller never touches hardware directly and
//! runs unchanged against the mocks in `tests/integration/mock_hw.rs`.

use core::time::Duration;

use crate::config::SystemConfig;
use crate::error::{ConfigError, LineError, ScheduleError};
use crate::pins::LineId;

// ───────────────────────────────────────────────────────────────
// Line port (driven adapter: domain ↔ digital outputs)
// ───────────────────────────────────────────────────────────────

/// Logical level of a digital output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

/// Read/write access to the controller's output lines.
///
/// The true state of every valve is the live level of its line.  Nothing
/// above this trait caches levels.
pub trait LinePort: Send {
    /// Drive one line.
    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), LineError>;

    /// Read back the level a line is currently driven at.
    fn level(&mut self, line: LineId) -> Result<Level, LineError>;

    /// Drive every line in `lines`, in order.  Stops at the first failure.
    fn set_levels(&mut self, lines: &[LineId], level: Level) -> Result<(), LineError> {
        for &line in lines {
            self.set_level(line, level)?;
        }
        Ok(())
    }

    /// Read every line in `lines`, in order.
    fn levels(&mut self, lines: &[LineId]) -> Result<Vec<Level>, LineError> {
        lines.iter().map(|&line| self.level(line)).collect()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, test recorder).
pub trait EventSink: Send {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Deferred runner (decouples one-shot timers from the dispatcher)
// ───────────────────────────────────────────────────────────────

/// Work handed to a [`DeferredRunner`].
pub type DeferredAction = Box<dyn FnOnce() + Send + 'static>;

/// Runs an action once, later, on its own execution context.
///
/// Submissions are fire-and-forget: there is no cancellation, and no
/// ordering is promised relative to work the caller does afterwards.
pub trait DeferredRunner: Send + Sync {
    /// Register `action` to run exactly once after `delay`.  Must return
    /// without waiting for the delay.
    ///
    /// * `label`: human-readable tag used in logs.
    fn schedule_once(
        &self,
        label: &'static str,
        delay: Duration,
        action: DeferredAction,
    ) -> Result<(), ScheduleError>;
}

// ───────────────────────────────────────────────────────────────
// System port (driven adapter: domain → host OS)
// ───────────────────────────────────────────────────────────────

/// Privileged host operations.
pub trait SystemPort: Send + Sync {
    /// Restart the host.  Failures are logged by the adapter; there is
    /// nobody left to report them to.
    fn restart(&self);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// # Safety of stored values
///
/// Implementations MUST validate before persisting.  Invalid tables are
/// rejected with [`ConfigError::ValidationFailed`], never repaired, so a bad
/// edit cannot weaken an interlock.
pub trait ConfigPort {
    /// Load configuration.  Returns [`ConfigError::NotFound`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}
