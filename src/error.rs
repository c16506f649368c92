//! Unified error types for the valve controller.
//!
//! Per-subsystem enums (`LineError`, `ValveError`, `ConfigError`, ...) are
//! returned by the operations that raise them.  The top-level `Error` only
//! covers what stops the process from reaching ready.  Every type is `Copy`
//! so it can be logged and passed through the dispatcher without allocation.

use core::fmt;

use crate::pins::LineId;
use crate::registry::ValveId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Failure to bring the controller up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// Startup line bring-up failed; the process cannot reach ready.
    Init(LineError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Line errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`LinePort`](crate::app::ports::LinePort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// The line is not wired to this port.
    Unavailable(LineId),
    /// The underlying driver failed to read or write the line.
    Io(LineId),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(line) => write!(f, "line {line} unavailable"),
            Self::Io(line) => write!(f, "I/O failure on line {line}"),
        }
    }
}

impl std::error::Error for LineError {}

// ---------------------------------------------------------------------------
// Valve errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveError {
    /// No valve with this id exists in the registry.
    UnknownValve(ValveId),
    /// No pipette with this 1-based index is configured.
    UnknownPipette(usize),
    /// Open refused because the excluded partner is currently open.
    InterlockViolation { valve: ValveId, excluded: ValveId },
    /// The line write or read behind the operation failed.
    Line(LineError),
}

impl fmt::Display for ValveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValve(id) => write!(f, "unknown valve {id}"),
            Self::UnknownPipette(n) => write!(f, "unknown pipette {n}"),
            Self::InterlockViolation { valve, excluded } => write!(
                f,
                "cannot open valve {valve} while excluded valve {excluded} is open"
            ),
            Self::Line(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ValveError {}

impl From<LineError> for ValveError {
    fn from(e: LineError) -> Self {
        Self::Line(e)
    }
}

// ---------------------------------------------------------------------------
// Instruction errors
// ---------------------------------------------------------------------------

/// Reasons an `(item, command)` pair was rejected by the parser.
///
/// These never reach the caller of `dispatch`; they are logged as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionError {
    /// Text after the `valve` prefix is not a number.
    MalformedValveNumber,
    /// Valve number is outside the configured id range.
    BadValveNumber(i64),
    /// Valve command is neither `open` nor `close`.
    BadValveCommand,
    /// Text after the `pipette` prefix is not a number.
    MalformedPipetteNumber,
    /// No pipette with this index.
    BadPipetteNumber(i64),
    /// Pipette command is not `load`, `unload` or `close`.
    BadPipetteCommand,
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedValveNumber => write!(f, "malformed valve number"),
            Self::BadValveNumber(n) => write!(f, "bad valve number {n}"),
            Self::BadValveCommand => write!(f, "bad valve command"),
            Self::MalformedPipetteNumber => write!(f, "malformed pipette number"),
            Self::BadPipetteNumber(n) => write!(f, "bad pipette number {n}"),
            Self::BadPipetteCommand => write!(f, "bad pipette command"),
        }
    }
}

impl std::error::Error for InstructionError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations and
/// config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file found (first boot).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Scheduling errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The timer context could not be created.
    SpawnFailed,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed => write!(f, "failed to spawn timer thread"),
        }
    }
}

impl std::error::Error for ScheduleError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
