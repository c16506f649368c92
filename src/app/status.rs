//! Read-only valve status snapshots.
//!
//! Two shapes of the same live read: [`ValveStatus`] for machine consumers
//! and [`ValveDisplayStatus`] (with the human description) for displays.

use serde::{Deserialize, Serialize};

use super::ports::Level;
use crate::registry::ValveId;

/// Textual valve state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineState {
    Open,
    Closed,
}

impl From<Level> for LineState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => Self::Closed,
            Level::High => Self::Open,
        }
    }
}

impl core::fmt::Display for LineState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Machine-oriented entry: `{"valve": 1, "status": "open"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveStatus {
    pub valve: ValveId,
    pub status: LineState,
}

/// Display-oriented entry with the valve's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveDisplayStatus {
    pub id: ValveId,
    pub description: String,
    pub status: LineState,
}

/// Everything a status page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayReport {
    pub version: String,
    /// SoC temperature in °C, one decimal; `None` when the sensor is unreadable.
    pub cpu_temperature_c: Option<f32>,
    pub valves: Vec<ValveDisplayStatus>,
}
