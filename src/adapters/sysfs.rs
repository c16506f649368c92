//! Linux sysfs GPIO output pins.
//!
//! Implements the `embedded-hal` 1.0 digital output traits over
//! `/sys/class/gpio`:
//!
//! - **open**: export the line (if not already exported), then set its
//!   direction to `out`.
//! - **write**: `0` / `1` to `gpioN/value`.
//! - **read back**: re-read `gpioN/value` on every call; nothing is cached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use log::debug;

use crate::pins::LineId;

/// udev applies permissions to a freshly exported line asynchronously.
const DIRECTION_RETRIES: u32 = 10;
const DIRECTION_RETRY_DELAY: Duration = Duration::from_millis(10);

/// I/O failure on a sysfs attribute.
#[derive(Debug)]
pub struct SysfsError {
    pub line: LineId,
    pub source: io::Error,
}

impl digital::Error for SysfsError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl core::fmt::Display for SysfsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "gpio{}: {}", self.line, self.source)
    }
}

impl std::error::Error for SysfsError {}

/// One exported output line.
#[derive(Debug)]
pub struct SysfsPin {
    line: LineId,
    value: PathBuf,
}

impl SysfsPin {
    /// Export `line` under `root` and configure it as an output.
    pub fn open(root: &Path, line: LineId) -> Result<Self, SysfsError> {
        let err = |source| SysfsError { line, source };
        let dir = root.join(format!("gpio{line}"));

        if !dir.exists() {
            debug!("sysfs: exporting gpio{}", line);
            fs::write(root.join("export"), line.to_string()).map_err(err)?;
        }

        let mut attempt = 0;
        loop {
            match fs::write(dir.join("direction"), "out") {
                Ok(()) => break,
                Err(e) if attempt < DIRECTION_RETRIES => {
                    debug!("sysfs: gpio{} direction not writable yet ({})", line, e);
                    attempt += 1;
                    thread::sleep(DIRECTION_RETRY_DELAY);
                }
                Err(e) => return Err(err(e)),
            }
        }

        Ok(Self {
            line,
            value: dir.join("value"),
        })
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    fn write(&self, high: bool) -> Result<(), SysfsError> {
        fs::write(&self.value, if high { "1" } else { "0" }).map_err(|source| SysfsError {
            line: self.line,
            source,
        })
    }

    fn read(&self) -> Result<bool, SysfsError> {
        let raw = fs::read_to_string(&self.value).map_err(|source| SysfsError {
            line: self.line,
            source,
        })?;
        Ok(raw.trim() != "0")
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), SysfsError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), SysfsError> {
        self.write(true)
    }
}

impl StatefulOutputPin for SysfsPin {
    fn is_set_high(&mut self) -> Result<bool, SysfsError> {
        self.read()
    }

    fn is_set_low(&mut self) -> Result<bool, SysfsError> {
        self.read().map(|high| !high)
    }
}
