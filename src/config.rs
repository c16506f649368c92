//! System configuration parameters
//!
//! The valve table, line assignments, and timing for one installation.
//! [`SystemConfig::default`] is the reference rack; a JSON file loaded
//! through [`ConfigPort`](crate::app::ports::ConfigPort) overrides it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins::{self, LineId};
use crate::registry::{MAX_PIPETTES, MAX_VALVES, ValveId};

/// Which [`LinePort`](crate::app::ports::LinePort) backend the binary builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareBackend {
    /// Linux `/sys/class/gpio` output pins.
    Sysfs,
    /// In-memory lines, for bench testing without relays.
    Simulated,
}

/// One valve entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveConfig {
    pub id: ValveId,
    pub line: LineId,
    pub description: String,
    /// Valve that must be closed before this one may open.
    pub excluded: ValveId,
}

/// A pipette: two valves choreographed as a one-way gas transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipetteConfig {
    pub name: String,
    pub input: ValveId,
    pub output: ValveId,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Lines ---
    /// Every output line owned by the controller (bulk close drives all of them).
    pub lines: Vec<LineId>,
    /// Health indicator raised once startup completes.
    pub ready_line: Option<LineId>,
    pub hardware: HardwareBackend,
    pub gpio_root: String,

    // --- Valves ---
    pub valves: Vec<ValveConfig>,
    pub pipettes: Vec<PipetteConfig>,
    /// Route `pipetteN` instructions to the sequencer.
    pub pipette_commands: bool,

    // --- Timing ---
    /// Settle interval between the close and open steps of a pipette sequence.
    pub settle_interval_ms: u32,
    /// Delay between a restart instruction and the restart itself.
    pub restart_delay_secs: u32,

    // --- System ---
    /// Command value that must accompany the `restart` item.
    pub restart_target: String,
    /// Program and arguments executed to restart the host.
    pub restart_command: Vec<String>,
    pub cpu_temperature_path: String,
}

fn valve(id: ValveId, line_index: usize, description: &str, excluded: ValveId) -> ValveConfig {
    ValveConfig {
        id,
        line: pins::VALVE_LINES[line_index],
        description: description.to_string(),
        excluded,
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Lines
            lines: pins::VALVE_LINES.to_vec(),
            ready_line: Some(pins::READY_LINE),
            hardware: HardwareBackend::Sysfs,
            gpio_root: pins::SYSFS_GPIO_ROOT.to_string(),

            // Valves: the two pipettes exclude each other's far end, every
            // downstream valve excludes port 1, and port 1 excludes gallery A.
            valves: vec![
                valve(1, 0, "4He pipette input", 2),
                valve(2, 1, "4He pipette output", 1),
                valve(3, 2, "3He pipette output", 4),
                valve(4, 3, "3He pipette input", 3),
                valve(5, 4, "port 1", 8),
                valve(6, 5, "ion pump", 5),
                valve(7, 6, "gas analyser", 5),
                valve(8, 7, "gallery A", 5),
                valve(10, 8, "laser cell", 5),
                valve(11, 9, "getter", 5),
                valve(12, 10, "buffer tank", 5),
                valve(13, 11, "turbo pump", 5),
            ],
            pipettes: vec![
                PipetteConfig {
                    name: "4He".to_string(),
                    input: 1,
                    output: 2,
                },
                PipetteConfig {
                    name: "3He".to_string(),
                    input: 4,
                    output: 3,
                },
            ],
            pipette_commands: true,

            // Timing
            settle_interval_ms: 1000,
            restart_delay_secs: 15,

            // System
            restart_target: "pi".to_string(),
            restart_command: vec!["sudo".to_string(), "reboot".to_string()],
            cpu_temperature_path: pins::CPU_TEMPERATURE_PATH.to_string(),
        }
    }
}

impl SystemConfig {
    /// Reject configurations the controller cannot run safely.
    ///
    /// Values are rejected, never clamped: a bad exclusion or line mapping
    /// would silently weaken the interlock.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.valves.is_empty() {
            return Err(ConfigError::ValidationFailed("valve table is empty"));
        }
        if self.valves.len() > MAX_VALVES {
            return Err(ConfigError::ValidationFailed("too many valves"));
        }
        if self.pipettes.len() > MAX_PIPETTES {
            return Err(ConfigError::ValidationFailed("too many pipettes"));
        }

        for (i, line) in self.lines.iter().enumerate() {
            if self.lines[..i].contains(line) {
                return Err(ConfigError::ValidationFailed("duplicate managed line"));
            }
        }
        if let Some(ready) = self.ready_line {
            if self.lines.contains(&ready) {
                return Err(ConfigError::ValidationFailed(
                    "ready line must not be a managed valve line",
                ));
            }
        }

        let known = |id: ValveId| self.valves.iter().any(|v| v.id == id);
        for (i, v) in self.valves.iter().enumerate() {
            if self.valves[..i].iter().any(|other| other.id == v.id) {
                return Err(ConfigError::ValidationFailed("duplicate valve id"));
            }
            if self.valves[..i].iter().any(|other| other.line == v.line) {
                return Err(ConfigError::ValidationFailed("two valves share a line"));
            }
            if !self.lines.contains(&v.line) {
                return Err(ConfigError::ValidationFailed(
                    "valve line is not in the managed line set",
                ));
            }
            if !known(v.excluded) {
                return Err(ConfigError::ValidationFailed(
                    "excluded valve is not in the valve table",
                ));
            }
        }

        for p in &self.pipettes {
            if !known(p.input) || !known(p.output) {
                return Err(ConfigError::ValidationFailed(
                    "pipette references an unknown valve",
                ));
            }
            if p.input == p.output {
                return Err(ConfigError::ValidationFailed(
                    "pipette input and output must differ",
                ));
            }
        }

        if self.settle_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "settle interval must be non-zero",
            ));
        }
        if self.restart_command.is_empty() {
            return Err(ConfigError::ValidationFailed("restart command is empty"));
        }
        Ok(())
    }
}
