//! Run Reports
//!
//! Summarises how an action ended, for the terminal or as JSON.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::error::EnvError;
use crate::lifecycle::{Action, Outcome};

/// Final state of one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub action: Action,
    pub outcome: Option<Outcome>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub exit_code: u8,
    pub finished_at: DateTime<Utc>,
}

impl Report {
    pub fn new(action: Action, result: &Result<Outcome, EnvError>) -> Self {
        let (outcome, error, exit_code) = match result {
            Ok(outcome) => (Some(outcome.clone()), None, outcome.exit_code()),
            Err(e) => (None, Some(e.to_string()), e.exit_code()),
        };
        let warnings = outcome
            .as_ref()
            .map(|o| o.warnings().to_vec())
            .unwrap_or_default();

        Self {
            action,
            outcome,
            error,
            warnings,
            exit_code,
            finished_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One colored line describing the result.
    pub fn summary(&self) -> String {
        match (&self.outcome, &self.error) {
            (Some(outcome), _) if outcome.is_success() => {
                format!("{} {}", "✓".green().bold(), outcome)
            }
            (Some(outcome), _) => format!("{} {}", "•".yellow().bold(), outcome),
            (None, Some(error)) => format!("{} {}", "✗".red().bold(), error),
            (None, None) => format!("{} {}", "?".dimmed(), self.action),
        }
    }
}
