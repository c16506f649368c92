//! Host OS adapter.
//!
//! [`ShellRestart`] implements [`SystemPort`] by running a configured
//! command (`sudo reboot` on the reference installation).

use std::process::Command;

use log::{error, warn};

use crate::app::ports::SystemPort;

#[derive(Debug, Clone)]
pub struct ShellRestart {
    command: Vec<String>,
}

impl ShellRestart {
    /// `command[0]` is the program, the rest are its arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl SystemPort for ShellRestart {
    fn restart(&self) {
        let Some((program, args)) = self.command.split_first() else {
            error!("System: no restart command configured");
            return;
        };

        warn!("System is restarting now");
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {}
            Ok(status) => error!("System: '{}' exited with {}", self.command.join(" "), status),
            Err(e) => error!("System: cannot run '{}': {}", program, e),
        }
    }
}
