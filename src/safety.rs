//! Valve interlock rule.
//!
//! Every valve names one *excluded* partner.  A valve may only be opened
//! while its partner reads closed; closing is never restricted.
//!
//! ## Directionality
//!
//! The relation is evaluated per valve, exactly as configured:
//!
//! 1. **Mutual**: `a` excludes `b` and `b` excludes `a`.  The check runs
//!    from both sides, so the pair can never be open together.
//! 2. **One-way**: `a` excludes `hub` but `hub` excludes something else.
//!    `a` cannot open while `hub` is open, but `hub` may open while `a` is
//!    open.  Shared analyser ports are wired this way.
//!
//! The rule is evaluated under the controller's bus lock with a live read
//! of the partner's line, so the check and the write are one step.

use log::info;

use crate::app::ports::Level;
use crate::registry::{Valve, ValveId, ValveRegistry};

/// Outcome of evaluating an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterlockDecision {
    Permit,
    /// The excluded partner is open.
    Refuse { excluded: ValveId },
}

/// Decide whether `valve` may open given the live level of its partner.
pub fn evaluate_open(valve: &Valve, excluded_level: Level) -> InterlockDecision {
    if excluded_level.is_high() {
        InterlockDecision::Refuse {
            excluded: valve.excluded,
        }
    } else {
        InterlockDecision::Permit
    }
}

/// How two valves relate through the interlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterlockLink {
    /// Neither may open while the other is open.
    Mutual(ValveId, ValveId),
    /// `dependent` may not open while `hub` is open; not the reverse.
    OneWay { dependent: ValveId, hub: ValveId },
}

/// Classify every configured exclusion.  Mutual pairs are reported once,
/// lower id first.
pub fn links(registry: &ValveRegistry) -> Vec<InterlockLink> {
    let mut out = Vec::new();
    for v in registry.all() {
        let reverse = registry
            .find(v.excluded)
            .is_some_and(|partner| partner.excluded == v.id);
        if reverse {
            if v.id < v.excluded {
                out.push(InterlockLink::Mutual(v.id, v.excluded));
            }
        } else {
            out.push(InterlockLink::OneWay {
                dependent: v.id,
                hub: v.excluded,
            });
        }
    }
    out
}

/// Pairs of valves that must never be open together.
pub fn mutual_pairs(registry: &ValveRegistry) -> Vec<(ValveId, ValveId)> {
    links(registry)
        .into_iter()
        .filter_map(|link| match link {
            InterlockLink::Mutual(a, b) => Some((a, b)),
            InterlockLink::OneWay { .. } => None,
        })
        .collect()
}

/// Log the interlock topology once at startup.
pub fn log_topology(registry: &ValveRegistry) {
    for link in links(registry) {
        match link {
            InterlockLink::Mutual(a, b) => info!("Interlock: valves {a} <-> {b} (mutual)"),
            InterlockLink::OneWay { dependent, hub } => {
                info!("Interlock: valve {dependent} blocked while {hub} open");
            }
        }
    }
}
