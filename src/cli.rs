//! Command-line interface of the `valvecontrol` binary.
//!
//! The only input is the config file.  A path named on the command line or
//! in `VALVECONTROL_CONFIG` must exist.  Only the built-in default path may
//! be missing, in which case the reference valve table is used.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::warn;

use crate::adapters::config_file::JsonConfigStore;
use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::{self, ConfigError};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/valvecontrol.json";

#[derive(Debug, Parser)]
#[command(name = "valvecontrol", version)]
#[command(about = "Interlocked gas valve controller, served as JSON lines on stdin/stdout", long_about = None)]
pub struct Cli {
    /// Path to the JSON valve configuration [default: /etc/valvecontrol.json]
    #[arg(env = "VALVECONTROL_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The file the configuration is read from.
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_config(&self) -> error::Result<SystemConfig> {
        load_config(self.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
    }
}

/// Load `explicit` if given, else `fallback`.  A missing `fallback` yields
/// the reference table; a missing `explicit` is an error.
pub fn load_config(explicit: Option<&Path>, fallback: &Path) -> error::Result<SystemConfig> {
    let store = JsonConfigStore::new(explicit.unwrap_or(fallback));
    match store.load() {
        Err(ConfigError::NotFound) if explicit.is_none() => {
            warn!(
                "No config at {}, using the reference valve table",
                store.path().display()
            );
            Ok(SystemConfig::default())
        }
        result => Ok(result?),
    }
}
