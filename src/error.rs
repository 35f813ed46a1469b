//! Error Types
//!
//! Failures that stop an environment operation. Normal terminal outcomes
//! such as a declined confirmation or a missing environment are not errors;
//! see [`crate::lifecycle::Outcome`].

use thiserror::Error;

/// Exit code for configuration, I/O and prompt failures.
pub const EXIT_GENERIC_FAILURE: u8 = 1;
/// Exit code for a rejected environment name.
pub const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code for a non-success status from the package manager.
pub const EXIT_ADAPTER_FAILURE: u8 = 6;
/// Exit code for an environment missing after a reported creation.
pub const EXIT_VERIFICATION_FAILED: u8 = 7;

/// Errors raised while driving the package manager.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid environment name '{name}': {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("package manager failed to {operation}: {message}")]
    Adapter { operation: String, message: String },

    #[error("environment '{0}' was not found after creation")]
    CreationVerificationFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl EnvError {
    /// Builds an adapter failure for the named operation.
    pub fn adapter(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Process exit code distinguishing each failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } => EXIT_INVALID_INPUT,
            Self::Adapter { .. } => EXIT_ADAPTER_FAILURE,
            Self::CreationVerificationFailed(_) => EXIT_VERIFICATION_FAILED,
            Self::Io(_) | Self::Config(_) | Self::Prompt(_) => EXIT_GENERIC_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnvError>;
