//! Valve registry.
//!
//! The static table of valve definitions, built once from
//! [`SystemConfig`] and never mutated afterwards.  The registry holds no
//! valve *state*: the open/closed level of a valve is always read live from
//! its line through the [`LinePort`](crate::app::ports::LinePort).

use core::ops::RangeInclusive;

use heapless::Vec;

use crate::config::SystemConfig;
use crate::error::{ConfigError, ValveError};
use crate::pins::LineId;

/// Valve identifier.  Positive ids are public; zero and negative ids are
/// reserved for internal entries and hidden from status reports.
pub type ValveId = i32;

/// Maximum number of valves in one registry (stack-allocated).
pub const MAX_VALVES: usize = 32;

/// Maximum number of pipettes.
pub const MAX_PIPETTES: usize = 8;

/// Immutable valve definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valve {
    pub id: ValveId,
    pub line: LineId,
    pub description: String,
    /// Valve that must be closed before this one may open.
    pub excluded: ValveId,
}

impl Valve {
    /// Whether this valve appears in status reports.
    pub fn is_public(&self) -> bool {
        self.id > 0
    }
}

/// A pair of valves choreographed by the
/// [`PipetteSequencer`](crate::sequencer::PipetteSequencer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipette {
    pub name: String,
    pub input: ValveId,
    pub output: ValveId,
}

/// Ordered, fixed-capacity valve table.
#[derive(Debug, Clone)]
pub struct ValveRegistry {
    valves: Vec<Valve, MAX_VALVES>,
    pipettes: Vec<Pipette, MAX_PIPETTES>,
}

impl ValveRegistry {
    /// Build the registry from a validated configuration.
    pub fn from_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut valves = Vec::new();
        for v in &config.valves {
            valves
                .push(Valve {
                    id: v.id,
                    line: v.line,
                    description: v.description.clone(),
                    excluded: v.excluded,
                })
                .map_err(|_| ConfigError::ValidationFailed("too many valves"))?;
        }

        let mut pipettes = Vec::new();
        for p in &config.pipettes {
            pipettes
                .push(Pipette {
                    name: p.name.clone(),
                    input: p.input,
                    output: p.output,
                })
                .map_err(|_| ConfigError::ValidationFailed("too many pipettes"))?;
        }

        Ok(Self { valves, pipettes })
    }

    /// Look up a valve by id.
    pub fn find(&self, id: ValveId) -> Option<&Valve> {
        self.valves.iter().find(|v| v.id == id)
    }

    /// Look up a valve by id, failing with [`ValveError::UnknownValve`].
    pub fn get(&self, id: ValveId) -> Result<&Valve, ValveError> {
        self.find(id).ok_or(ValveError::UnknownValve(id))
    }

    /// All valves, in configuration order.
    pub fn all(&self) -> &[Valve] {
        &self.valves
    }

    /// Span of public valve ids (`min..=max`).  Ids inside the span may still
    /// be absent from the table.
    pub fn id_range(&self) -> Option<RangeInclusive<ValveId>> {
        let mut ids = self.valves.iter().filter(|v| v.is_public()).map(|v| v.id);
        let first = ids.next()?;
        let (lo, hi) = ids.fold((first, first), |(lo, hi), id| (lo.min(id), hi.max(id)));
        Some(lo..=hi)
    }

    /// Pipette by 1-based index, as used in `pipetteN` instructions.
    pub fn pipette(&self, index: usize) -> Result<&Pipette, ValveError> {
        index
            .checked_sub(1)
            .and_then(|i| self.pipettes.get(i))
            .ok_or(ValveError::UnknownPipette(index))
    }

    pub fn pipettes(&self) -> &[Pipette] {
        &self.pipettes
    }
}
