//! Configuration
//!
//! Settings are read from an optional YAML file. Lookup order:
//! 1. Explicit path given on the command line
//! 2. `envkeeper.yaml` next to the envkeeper executable
//! 3. `envkeeper.yaml` in the current working directory
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name searched for when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "envkeeper.yaml";

/// Interpreter version pinned into every new environment.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

/// Dependency spec looked up in the base directory.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Official micromamba install script.
pub const DEFAULT_INSTALLER_URL: &str = "https://micro.mamba.pm/install.sh";

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Explicit micromamba binary; resolved automatically when unset
    pub micromamba: Option<PathBuf>,

    /// Exported as `MAMBA_ROOT_PREFIX` for every micromamba call
    pub root_prefix: Option<PathBuf>,

    pub python_version: String,

    /// Relative to the base directory unless absolute
    pub requirements_file: String,

    /// Channels used when creating environments and pinning the interpreter
    pub channels: Vec<String>,

    pub installer_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            micromamba: None,
            root_prefix: None,
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            requirements_file: DEFAULT_REQUIREMENTS_FILE.to_string(),
            channels: vec!["conda-forge".to_string()],
            installer_url: DEFAULT_INSTALLER_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Finds and loads settings following the documented lookup order.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn discover(explicit: Option<&Path>, exe_dir: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = exe_dir
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .into_iter()
            .chain(std::iter::once(cwd.join(CONFIG_FILE_NAME)));

        for candidate in candidates {
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            debug!("No settings at {}", candidate.display());
        }

        debug!("Using built-in settings");
        Ok(Self::default())
    }
}

/// Directory holding the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
