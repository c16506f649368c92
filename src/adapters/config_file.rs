//! JSON file configuration store.
//!
//! Implements [`ConfigPort`] over a single JSON document on disk.
//!
//! - Validation: every table is checked with [`SystemConfig::validate`]
//!   both after loading and before saving.
//! - Atomic writes: the document is written to a sibling `.tmp` file and
//!   renamed over the target, so a crash mid-save leaves the old file intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => {
                warn!("Config: cannot read {}: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let config: SystemConfig = serde_json::from_slice(&raw).map_err(|e| {
            warn!("Config: {} is not valid: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;

        info!("Config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let json = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("Config: cannot write {}: {}", self.path.display(), e);
                ConfigError::IoError
            })?;

        info!("Config: saved {}", self.path.display());
        Ok(())
    }
}
