//! Package Manager Adapter
//!
//! The boundary between the lifecycle controller and the tool that actually
//! owns the environment registry.

use std::collections::BTreeSet;

use crate::error::Result;

/// Captured result of a command run inside an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Returns the first non-empty line across stdout and stderr.
    ///
    /// Older interpreters print `--version` to stderr, so both streams are
    /// consulted.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Operations the controller needs from a package manager.
///
/// Every call blocks until the underlying tool finishes. Implementations
/// must report a non-success status as [`crate::EnvError::Adapter`].
pub trait PackageManager {
    /// Names of all environments currently registered.
    fn list_environments(&mut self) -> Result<BTreeSet<String>>;

    /// Creates an empty environment.
    fn create_environment(&mut self, name: &str) -> Result<()>;

    /// Removes an environment and everything installed in it.
    fn remove_environment(&mut self, name: &str) -> Result<()>;

    /// Runs `command` with `args` with the environment activated.
    ///
    /// Activation lasts for the duration of the call only.
    fn run_in_environment(
        &mut self,
        name: &str,
        command: &str,
        args: &[String],
    ) -> Result<CommandOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_prefers_stdout() {
        let output = CommandOutput {
            stdout: "\nPython 3.12.1\n".to_string(),
            stderr: "warning".to_string(),
        };
        assert_eq!(output.first_line(), Some("Python 3.12.1"));
    }

    #[test]
    fn test_first_line_falls_back_to_stderr() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "Python 2.7.18\n".to_string(),
        };
        assert_eq!(output.first_line(), Some("Python 2.7.18"));
    }

    #[test]
    fn test_first_line_empty() {
        assert_eq!(CommandOutput::default().first_line(), None);
    }
}
