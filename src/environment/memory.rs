//! In-Memory Package Manager
//!
//! A registry held in memory, used to exercise the lifecycle controller
//! without a real package manager installed. Every call is recorded so
//! tests can assert which operations were issued.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::adapter::{CommandOutput, PackageManager};
use crate::error::{EnvError, Result};

/// Operation kinds, used for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Remove,
    Run,
}

impl Operation {
    /// Whether the operation changes the registry or an environment.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::List)
    }
}

/// A recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub environment: Option<String>,
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// Fake registry mapping environment names to installed packages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPackageManager {
    environments: BTreeMap<String, BTreeSet<String>>,
    python_versions: BTreeMap<String, String>,
    failing: HashSet<Operation>,
    drop_created: bool,
    calls: Vec<Call>,
}

impl InMemoryPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an environment with packages already installed.
    pub fn with_environment<I, S>(mut self, name: &str, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments
            .insert(name.to_string(), packages.into_iter().map(Into::into).collect());
        self
    }

    /// Makes every call of `operation` fail.
    pub fn failing_on(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Reports creation success without registering the environment.
    pub fn dropping_created(mut self) -> Self {
        self.drop_created = true;
        self
    }

    /// Snapshot of registered names, taken without recording a call.
    pub fn names(&self) -> BTreeSet<String> {
        self.environments.keys().cloned().collect()
    }

    pub fn packages(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.environments.get(name)
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of recorded calls that change state.
    pub fn mutating_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| call.operation.is_mutating())
            .count()
    }

    fn record(
        &mut self,
        operation: Operation,
        environment: Option<&str>,
        command: Option<&str>,
        args: &[String],
    ) -> Result<()> {
        self.calls.push(Call {
            operation,
            environment: environment.map(str::to_string),
            command: command.map(str::to_string),
            args: args.to_vec(),
        });

        if self.failing.contains(&operation) {
            return Err(EnvError::adapter(
                format!("{:?}", operation).to_lowercase(),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn require(&self, name: &str, operation: &str) -> Result<()> {
        if self.environments.contains_key(name) {
            Ok(())
        } else {
            Err(EnvError::adapter(
                operation,
                format!("environment '{}' does not exist", name),
            ))
        }
    }

    /// Interprets the small command vocabulary the controller issues.
    fn interpret(&mut self, name: &str, command: &str, args: &[String]) -> CommandOutput {
        let mut output = CommandOutput::default();

        if args.first().map(String::as_str) == Some("install") {
            for spec in args.iter().filter(|arg| arg.contains('=')) {
                if let Some(version) = spec.strip_prefix("python=") {
                    self.python_versions.insert(name.to_string(), version.to_string());
                }
                if let Some(packages) = self.environments.get_mut(name) {
                    packages.insert(spec.clone());
                }
            }
            return output;
        }

        if command == "python" && args.first().map(String::as_str) == Some("--version") {
            if let Some(version) = self.python_versions.get(name) {
                output.stdout = format!("Python {}.0\n", version);
            }
            return output;
        }

        if command == "python" && args.iter().any(|arg| arg == "-r") {
            if let (Some(packages), Some(file)) = (
                self.environments.get_mut(name),
                args.iter().skip_while(|arg| *arg != "-r").nth(1),
            ) {
                packages.insert(format!("-r {}", file));
            }
        }

        output
    }
}

impl PackageManager for InMemoryPackageManager {
    fn list_environments(&mut self) -> Result<BTreeSet<String>> {
        self.record(Operation::List, None, None, &[])?;
        Ok(self.names())
    }

    fn create_environment(&mut self, name: &str) -> Result<()> {
        self.record(Operation::Create, Some(name), None, &[])?;
        if self.environments.contains_key(name) {
            return Err(EnvError::adapter(
                format!("create environment '{}'", name),
                "prefix already exists",
            ));
        }
        if !self.drop_created {
            self.environments.insert(name.to_string(), BTreeSet::new());
        }
        Ok(())
    }

    fn remove_environment(&mut self, name: &str) -> Result<()> {
        self.record(Operation::Remove, Some(name), None, &[])?;
        self.require(name, &format!("remove environment '{}'", name))?;
        self.environments.remove(name);
        self.python_versions.remove(name);
        Ok(())
    }

    fn run_in_environment(
        &mut self,
        name: &str,
        command: &str,
        args: &[String],
    ) -> Result<CommandOutput> {
        self.record(Operation::Run, Some(name), Some(command), args)?;
        self.require(name, &format!("run '{}' in environment '{}'", command, name))?;
        Ok(self.interpret(name, command, args))
    }
}
