//! Package Manager Bootstrap
//!
//! Installs micromamba itself by running the official install script.
//! Nothing here runs unless the user accepted the install gate.

use std::process::Command;

use log::{error, info};

use crate::error::{EnvError, Result};

/// Something able to install the package manager.
pub trait Installer {
    /// Short description used in the confirmation question.
    fn describe(&self) -> String;

    fn install(&mut self) -> Result<()>;
}

/// Downloads the install script with curl and runs it with bash.
///
/// The script is interactive, so stdin and stdout stay attached to the
/// terminal.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    url: String,
}

impl ScriptInstaller {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("bash");
        cmd.arg("-c").arg(format!("bash <(curl -fsSL '{}')", self.url));
        cmd
    }
}

impl Installer for ScriptInstaller {
    fn describe(&self) -> String {
        format!("micromamba from {}", self.url)
    }

    fn install(&mut self) -> Result<()> {
        info!("Running micromamba installer from {}", self.url);

        let status = self
            .command()
            .status()
            .map_err(|e| EnvError::adapter("install micromamba", e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            error!("Installer exited with code {:?}", status.code());
            Err(EnvError::adapter(
                "install micromamba",
                format!("installer exited with code {:?}", status.code()),
            ))
        }
    }
}
