//! Inbound commands to the application core.
//!
//! External callers speak in `(item, command)` text pairs, e.g.
//! `("valve3", "open")`.  [`parse`] turns a pair into an [`AppCommand`] that
//! the [`Dispatcher`](super::dispatch::Dispatcher) executes.
//!
//! Grammar, in priority order:
//!
//! | item              | command                       | result                  |
//! |-------------------|-------------------------------|-------------------------|
//! | `valve<N>`        | `open` / `close`              | open / close valve N    |
//! | `pipette<N>`      | `load` / `unload` / `close`   | pipette sequence        |
//! | `closeallvalves`  | (ignored)                     | close every line        |
//! | `restart`         | restart target (e.g. `pi`)    | deferred host restart   |
//! | anything else     |                               | ignored                 |
//!
//! `pipette<N>` is only recognised when pipette routing is enabled.

use core::ops::RangeInclusive;

use crate::error::InstructionError;
use crate::registry::ValveId;

use super::events::PipetteOperation;

/// Commands that external callers can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    OpenValve(ValveId),
    CloseValve(ValveId),
    /// Drive every managed line low.
    CloseAll,
    /// Run a pipette sequence; `index` is 1-based.
    Pipette {
        index: usize,
        operation: PipetteOperation,
    },
    /// Restart the host after the configured delay.
    Restart,
}

/// What the parser accepts for one installation.
#[derive(Debug, Clone)]
pub struct InstructionGrammar {
    /// Valid valve numbers (`None` if the registry has no public valves).
    pub valve_ids: Option<RangeInclusive<ValveId>>,
    pub pipette_count: usize,
    pub pipette_commands: bool,
    pub restart_target: String,
}

/// Parse an `(item, command)` pair.
///
/// * `Ok(Some(cmd))`: a command to execute.
/// * `Ok(None)`: not an instruction this controller handles; ignore it.
/// * `Err(e)`: a recognised item with bad arguments; log and ignore.
pub fn parse(
    item: &str,
    command: &str,
    grammar: &InstructionGrammar,
) -> Result<Option<AppCommand>, InstructionError> {
    if let Some(suffix) = item.strip_prefix("valve") {
        let n = parse_index(suffix).ok_or(InstructionError::MalformedValveNumber)?;
        let id = ValveId::try_from(n)
            .ok()
            .filter(|id| grammar.valve_ids.as_ref().is_some_and(|r| r.contains(id)))
            .ok_or(InstructionError::BadValveNumber(n))?;
        return match command {
            "open" => Ok(Some(AppCommand::OpenValve(id))),
            "close" => Ok(Some(AppCommand::CloseValve(id))),
            _ => Err(InstructionError::BadValveCommand),
        };
    }

    if grammar.pipette_commands {
        if let Some(suffix) = item.strip_prefix("pipette") {
            let n = parse_index(suffix).ok_or(InstructionError::MalformedPipetteNumber)?;
            let index = usize::try_from(n)
                .ok()
                .filter(|i| (1..=grammar.pipette_count).contains(i))
                .ok_or(InstructionError::BadPipetteNumber(n))?;
            let operation = match command {
                "load" => PipetteOperation::Load,
                "unload" => PipetteOperation::Unload,
                "close" => PipetteOperation::Close,
                _ => return Err(InstructionError::BadPipetteCommand),
            };
            return Ok(Some(AppCommand::Pipette { index, operation }));
        }
    }

    match item {
        "closeallvalves" => Ok(Some(AppCommand::CloseAll)),
        "restart" if command == grammar.restart_target => Ok(Some(AppCommand::Restart)),
        _ => Ok(None),
    }
}

/// Digits only; no sign, no whitespace.
fn parse_index(suffix: &str) -> Option<i64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
