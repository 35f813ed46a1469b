//! Micromamba Adapter
//!
//! Drives the micromamba binary as the [`PackageManager`] backing real runs.
//!
//! # Binary Resolution Priority
//!
//! The micromamba binary is resolved in the following order:
//! 1. Configured path: `micromamba` in the settings file
//! 2. Bundled path: next to the envkeeper executable
//! 3. System PATH: falls back to a system-installed micromamba

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, error, info, warn};

use super::adapter::{CommandOutput, PackageManager};
use crate::config::Settings;
use crate::error::{EnvError, Result};

/// Name of the micromamba executable.
pub const MICROMAMBA_BIN: &str = "micromamba";

/// Finds the micromamba binary.
///
/// When nothing is found the bare binary name is returned, so the first
/// call fails with a spawn error naming the missing tool.
///
/// # Arguments
///
/// * `configured` - Path from the settings file, if any
/// * `exe_dir` - Directory of the running envkeeper executable
///
/// # Example
///
/// ```rust,no_run
/// use envkeeper::config::executable_dir;
/// use envkeeper::environment::resolve_binary;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let binary = resolve_binary(None, executable_dir().as_deref());
///     println!("micromamba: {}", binary.display());
///     Ok(())
/// }
/// ```
pub fn resolve_binary(configured: Option<&Path>, exe_dir: Option<&Path>) -> PathBuf {
    // Priority 1: explicit configuration
    if let Some(path) = configured {
        if path.exists() {
            info!("Using configured micromamba: {}", path.display());
            return path.to_path_buf();
        }
        warn!("Configured micromamba not found: {}", path.display());
    }

    // Priority 2: bundled next to the executable
    if let Some(dir) = exe_dir {
        let bundled = dir.join(MICROMAMBA_BIN);
        if bundled.exists() {
            info!("Using bundled micromamba: {}", bundled.display());
            return bundled;
        }
    }

    // Priority 3: system PATH
    if let Ok(system_path) = which::which(MICROMAMBA_BIN) {
        info!("Using system micromamba: {}", system_path.display());
        return system_path;
    }

    warn!("Micromamba binary not found");
    warn!("  Searched: settings, executable directory, system PATH");
    warn!("  Install it with: envkeeper install-manager");

    PathBuf::from(MICROMAMBA_BIN)
}

/// Extracts environment names from `micromamba env list` output.
///
/// Only the first column is considered, so a name matches exactly or not
/// at all. Header rows, separators, comments and prefix-only environments
/// (listed by path without a name) are skipped.
pub fn parse_env_list(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?;

            if name == "Name" && tokens.any(|token| token == "Path") {
                return None;
            }
            if name.starts_with('/') || name.contains('\\') || name.contains(':') {
                return None;
            }
            if name.chars().all(|c| matches!(c, '─' | '-' | '=' | '━')) {
                return None;
            }

            Some(name.to_string())
        })
        .collect()
}

/// Micromamba-backed package manager.
#[derive(Debug, Clone)]
pub struct Micromamba {
    binary: PathBuf,
    root_prefix: Option<PathBuf>,
    channels: Vec<String>,
}

impl Micromamba {
    pub fn new(
        binary: impl Into<PathBuf>,
        root_prefix: Option<PathBuf>,
        channels: Vec<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            root_prefix,
            channels,
        }
    }

    /// Builds an adapter from settings, resolving the binary once.
    pub fn from_settings(settings: &Settings, exe_dir: Option<&Path>) -> Self {
        let binary = resolve_binary(settings.micromamba.as_deref(), exe_dir);
        Self::new(binary, settings.root_prefix.clone(), settings.channels.clone())
    }

    /// Path of the micromamba binary this adapter runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Creates a Command with `MAMBA_ROOT_PREFIX` applied when configured.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(prefix) = &self.root_prefix {
            cmd.env("MAMBA_ROOT_PREFIX", prefix);
        }
        cmd
    }

    fn channel_args(&self) -> Vec<String> {
        self.channels
            .iter()
            .flat_map(|channel| ["-c".to_string(), channel.clone()])
            .collect()
    }

    fn list_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("env").arg("list");
        cmd
    }

    fn create_command(&self, name: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("create").arg("-y").arg("-n").arg(name).args(self.channel_args());
        cmd
    }

    fn remove_command(&self, name: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("env").arg("remove").arg("-y").arg("-n").arg(name);
        cmd
    }

    fn run_command(&self, name: &str, command: &str, args: &[String]) -> Command {
        let mut cmd = self.command();
        cmd.arg("run").arg("-n").arg(name).arg(command).args(args);
        cmd
    }

    /// Runs a command to completion, turning spawn errors and non-success
    /// statuses into adapter failures.
    fn execute(&self, mut cmd: Command, operation: &str) -> Result<Output> {
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            error!("Failed to start {}: {}", self.binary.display(), e);
            EnvError::adapter(operation, e.to_string())
        })?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            "Failed to {} (exit code: {:?})",
            operation,
            output.status.code()
        );
        if !stderr.trim().is_empty() {
            error!("stderr:\n{}", stderr);
        }

        Err(EnvError::adapter(
            operation,
            format!("exit code {:?}: {}", output.status.code(), stderr.trim()),
        ))
    }
}

impl PackageManager for Micromamba {
    fn list_environments(&mut self) -> Result<BTreeSet<String>> {
        let output = self.execute(self.list_command(), "list environments")?;
        let names = parse_env_list(&String::from_utf8_lossy(&output.stdout));
        debug!("Registered environments: {:?}", names);
        Ok(names)
    }

    fn create_environment(&mut self, name: &str) -> Result<()> {
        info!("Creating environment '{}'", name);
        self.execute(
            self.create_command(name),
            &format!("create environment '{}'", name),
        )?;
        Ok(())
    }

    fn remove_environment(&mut self, name: &str) -> Result<()> {
        info!("Removing environment '{}'", name);
        self.execute(
            self.remove_command(name),
            &format!("remove environment '{}'", name),
        )?;
        Ok(())
    }

    fn run_in_environment(
        &mut self,
        name: &str,
        command: &str,
        args: &[String],
    ) -> Result<CommandOutput> {
        let output = self.execute(
            self.run_command(name, command, args),
            &format!("run '{}' in environment '{}'", command, name),
        )?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
