//! Action Requests and Terminal Outcomes

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Exit code for a successful action.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when the user declined a confirmation gate.
pub const EXIT_CANCELLED: u8 = 3;
/// Exit code when the target environment does not exist.
pub const EXIT_NOT_FOUND: u8 = 4;
/// Exit code when the dependency spec file does not exist.
pub const EXIT_SPEC_NOT_FOUND: u8 = 5;

/// A single requested action, consumed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    InstallManager,
    Create { name: String },
    Delete { name: String },
    InstallDeps { name: String, spec: PathBuf },
}

impl Action {
    /// Environment targeted by the action, if any.
    pub fn environment(&self) -> Option<&str> {
        match self {
            Self::InstallManager => None,
            Self::Create { name } | Self::Delete { name } | Self::InstallDeps { name, .. } => {
                Some(name)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallManager => write!(f, "install package manager"),
            Self::Create { name } => write!(f, "create '{}'", name),
            Self::Delete { name } => write!(f, "delete '{}'", name),
            Self::InstallDeps { name, spec } => {
                write!(f, "install '{}' into '{}'", spec.display(), name)
            }
        }
    }
}

/// Non-failing end state of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The environment exists and was verified by a fresh registry read.
    ///
    /// `warnings` carries interpreter pin problems, which never undo the
    /// creation.
    Created {
        name: String,
        python_version: Option<String>,
        warnings: Vec<String>,
    },
    Deleted {
        name: String,
    },
    DepsInstalled {
        name: String,
        spec: PathBuf,
    },
    ManagerInstalled,
    Cancelled,
    NotFound {
        name: String,
    },
    SpecNotFound {
        path: PathBuf,
    },
}

impl Outcome {
    /// Whether the requested change happened.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::Deleted { .. } | Self::DepsInstalled { .. } | Self::ManagerInstalled
        )
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Created { warnings, .. } => warnings,
            _ => &[],
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Cancelled => EXIT_CANCELLED,
            Self::NotFound { .. } => EXIT_NOT_FOUND,
            Self::SpecNotFound { .. } => EXIT_SPEC_NOT_FOUND,
            _ => EXIT_SUCCESS,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created {
                name,
                python_version: Some(version),
                ..
            } => write!(f, "Environment '{}' created (Python {})", name, version),
            Self::Created { name, .. } => write!(f, "Environment '{}' created", name),
            Self::Deleted { name } => write!(f, "Environment '{}' deleted", name),
            Self::DepsInstalled { name, spec } => write!(
                f,
                "Dependencies from '{}' installed into '{}'",
                spec.display(),
                name
            ),
            Self::ManagerInstalled => write!(f, "Package manager installed"),
            Self::Cancelled => write!(f, "Cancelled, nothing was changed"),
            Self::NotFound { name } => write!(f, "Environment '{}' not found", name),
            Self::SpecNotFound { path } => {
                write!(f, "Dependency file not found: {}", path.display())
            }
        }
    }
}
