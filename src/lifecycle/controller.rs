//! Environment Lifecycle Controller
//!
//! Decides, for one named environment, which transition is being asked
//! for and issues the matching package manager calls:
//!
//! - `create`: confirm before replacing an existing environment (default
//!   no), create, verify with a fresh registry read, then pin the
//!   interpreter
//! - `delete`: confirm (default yes), then remove
//! - `install-deps`: install a dependency spec into an existing environment
//!
//! The registry is read again at every decision point and nothing is kept
//! between invocations.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::bootstrap::Installer;
use super::confirm::Confirmer;
use super::outcome::{Action, Outcome};
use crate::config::{Settings, DEFAULT_PYTHON_VERSION};
use crate::environment::conda::MICROMAMBA_BIN;
use crate::environment::PackageManager;
use crate::error::{EnvError, Result};

/// Checks that `name` can identify an environment.
///
/// Every accepted name is one [`parse_env_list`] reports back when it is
/// listed, and none can be mistaken for a micromamba option.
///
/// [`parse_env_list`]: crate::environment::conda::parse_env_list
///
/// # Arguments
///
/// * `name` - Environment name as typed by the user
///
/// # Returns
///
/// * `Ok(())` - The name is usable
/// * `Err(EnvError::InvalidInput)` - The name is empty or malformed
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "name must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else if name.contains('/') || name.contains('\\') {
        "name must not contain path separators"
    } else if name.contains(':') {
        "name must not contain ':'"
    } else if name.starts_with('-') {
        "name must not start with '-'"
    } else if name.starts_with('#') {
        "name must not start with '#'"
    } else if name.chars().all(|c| matches!(c, '─' | '-' | '=' | '━')) {
        "name must contain more than separator characters"
    } else {
        return Ok(());
    };

    Err(EnvError::InvalidInput {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Extracts `3.12.1` from `Python 3.12.1`.
pub fn parse_python_version(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(program), Some(version)) if program.eq_ignore_ascii_case("python") => {
            Some(version.to_string())
        }
        _ => None,
    }
}

/// Whether an observed version satisfies a pin such as `3.12`.
pub fn version_matches(observed: &str, pinned: &str) -> bool {
    observed == pinned || observed.starts_with(&format!("{}.", pinned))
}

/// Drives one action against a package manager.
pub struct Controller<P, C> {
    manager: P,
    confirmer: C,
    base_dir: PathBuf,
    python_version: String,
    channels: Vec<String>,
    manager_program: String,
}

impl<P: PackageManager, C: Confirmer> Controller<P, C> {
    /// Creates a controller resolving dependency specs under `base_dir`.
    pub fn new(manager: P, confirmer: C, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            confirmer,
            base_dir: base_dir.into(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            channels: vec!["conda-forge".to_string()],
            manager_program: MICROMAMBA_BIN.to_string(),
        }
    }

    /// Applies the interpreter pin and channels from settings.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.python_version = settings.python_version.clone();
        self.channels = settings.channels.clone();
        self
    }

    /// Program invoked inside the environment to install the interpreter.
    pub fn with_manager_program(mut self, program: impl Into<String>) -> Self {
        self.manager_program = program.into();
        self
    }

    /// The package manager this controller drives.
    pub fn manager(&self) -> &P {
        &self.manager
    }

    /// The confirmer answering the gates.
    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    /// Directory dependency specs are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Runs one action request.
    ///
    /// `installer` is only used by [`Action::InstallManager`].
    pub fn execute<I: Installer>(&mut self, action: &Action, installer: &mut I) -> Result<Outcome> {
        info!("Requested: {}", action);
        match action {
            Action::Create { name } => self.create(name),
            Action::Delete { name } => self.delete(name),
            Action::InstallDeps { name, spec } => self.install_deps(name, spec),
            Action::InstallManager => self.install_manager(installer),
        }
    }

    /// Names currently registered with the package manager.
    pub fn list(&mut self) -> Result<BTreeSet<String>> {
        self.manager.list_environments()
    }

    /// Fresh registry read for one name.
    fn exists(&mut self, name: &str) -> Result<bool> {
        let exists = self.manager.list_environments()?.contains(name);
        debug!("Environment '{}' exists: {}", name, exists);
        Ok(exists)
    }

    /// Creates `name`, replacing an existing environment only after an
    /// explicit yes.
    ///
    /// A verified environment comes back as `Outcome::Created`; problems
    /// pinning the interpreter are carried on it as warnings.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the environment to create (e.g., "analysis")
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use envkeeper::environment::Micromamba;
    /// use envkeeper::lifecycle::{Controller, TerminalConfirmer};
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let manager = Micromamba::new("micromamba", None, vec!["conda-forge".to_string()]);
    ///     let mut controller = Controller::new(manager, TerminalConfirmer, "/opt/project");
    ///     let outcome = controller.create("analysis")?;
    ///     println!("{}", outcome);
    ///     Ok(())
    /// }
    /// ```
    pub fn create(&mut self, name: &str) -> Result<Outcome> {
        validate_name(name)?;

        if self.exists(name)? {
            let question = format!(
                "Environment '{}' already exists. Delete it and create it from scratch?",
                name
            );
            if !self.confirmer.ask(&question, false)? {
                info!("Keeping existing environment '{}'", name);
                return Ok(Outcome::Cancelled);
            }

            info!("Removing existing environment '{}'", name);
            self.manager.remove_environment(name)?;
        }

        self.manager.create_environment(name)?;

        if !self.exists(name)? {
            return Err(EnvError::CreationVerificationFailed(name.to_string()));
        }
        info!("Environment '{}' created", name);

        let (python_version, warnings) = self.pin_interpreter(name);
        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(Outcome::Created {
            name: name.to_string(),
            python_version,
            warnings,
        })
    }

    /// Installs the pinned interpreter and reads back its version.
    ///
    /// Failures become warnings: the environment is already verified.
    fn pin_interpreter(&mut self, name: &str) -> (Option<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let pinned = self.python_version.clone();

        let mut install_args: Vec<String> = ["install", "-y", "-n", name]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        for channel in &self.channels {
            install_args.push("-c".to_string());
            install_args.push(channel.clone());
        }
        install_args.push(format!("python={}", pinned));

        info!("Installing Python {} into '{}'", pinned, name);
        let program = self.manager_program.clone();
        if let Err(e) = self.manager.run_in_environment(name, &program, &install_args) {
            warnings.push(format!("could not install Python {}: {}", pinned, e));
        }

        let observed = match self
            .manager
            .run_in_environment(name, "python", &["--version".to_string()])
        {
            Ok(output) => output.first_line().and_then(parse_python_version),
            Err(e) => {
                warnings.push(format!("could not query the Python version: {}", e));
                return (None, warnings);
            }
        };

        match &observed {
            Some(version) if version_matches(version, &pinned) => {
                info!("Python {} available in '{}'", version, name);
            }
            Some(version) => warnings.push(format!(
                "expected Python {} but found {}",
                pinned, version
            )),
            None => warnings.push("could not determine the Python version".to_string()),
        }

        // Activation only lasted for the individual run calls.
        debug!("Environment '{}' deactivated", name);

        (observed, warnings)
    }

    /// Deletes `name` after confirmation; empty input counts as yes.
    pub fn delete(&mut self, name: &str) -> Result<Outcome> {
        validate_name(name)?;

        if !self.exists(name)? {
            info!("Environment '{}' not found", name);
            return Ok(Outcome::NotFound {
                name: name.to_string(),
            });
        }

        let question = format!("Delete environment '{}'?", name);
        if !self.confirmer.ask(&question, true)? {
            info!("Keeping environment '{}'", name);
            return Ok(Outcome::Cancelled);
        }

        self.manager.remove_environment(name)?;
        info!("Environment '{}' deleted", name);

        Ok(Outcome::Deleted {
            name: name.to_string(),
        })
    }

    /// Installs the dependency spec at `spec` (relative to the base
    /// directory) into `name`.
    ///
    /// A missing spec file is detected before the registry is touched.
    pub fn install_deps(&mut self, name: &str, spec: &Path) -> Result<Outcome> {
        validate_name(name)?;

        let path = self.base_dir.join(spec);
        if !path.is_file() {
            info!("Dependency file not found: {}", path.display());
            return Ok(Outcome::SpecNotFound { path });
        }

        if !self.exists(name)? {
            info!("Environment '{}' not found", name);
            return Ok(Outcome::NotFound {
                name: name.to_string(),
            });
        }

        info!("Installing {} into '{}'", path.display(), name);
        let args: Vec<String> = ["-m", "pip", "install", "-r"]
            .iter()
            .map(|arg| arg.to_string())
            .chain(std::iter::once(path.to_string_lossy().into_owned()))
            .collect();
        self.manager.run_in_environment(name, "python", &args)?;

        Ok(Outcome::DepsInstalled {
            name: name.to_string(),
            spec: path,
        })
    }

    /// Installs the package manager after confirmation (default no).
    ///
    /// Declining returns before the installer is touched.
    pub fn install_manager<I: Installer>(&mut self, installer: &mut I) -> Result<Outcome> {
        let question = format!("Install {}?", installer.describe());
        if !self.confirmer.ask(&question, false)? {
            info!("Skipping package manager installation");
            return Ok(Outcome::Cancelled);
        }

        installer.install()?;
        Ok(Outcome::ManagerInstalled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::conda::parse_env_list;
    use crate::environment::memory::{InMemoryPackageManager, Operation};
    use crate::lifecycle::confirm::ScriptedConfirmer;
    use std::fs;
    use tempfile::tempdir;

    fn controller(
        manager: InMemoryPackageManager,
        answers: &[&str],
    ) -> Controller<InMemoryPackageManager, ScriptedConfirmer> {
        Controller::new(
            manager,
            ScriptedConfirmer::new(answers.iter().copied()),
            std::env::temp_dir(),
        )
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Default)]
    struct RecordingInstaller {
        installs: usize,
    }

    impl Installer for RecordingInstaller {
        fn describe(&self) -> String {
            "micromamba".to_string()
        }

        fn install(&mut self) -> Result<()> {
            self.installs += 1;
            Ok(())
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("ml-gpu_3.12").is_ok());
        assert!(matches!(validate_name(""), Err(EnvError::InvalidInput { .. })));
        assert!(validate_name("   ").is_err());
        assert!(validate_name("my env").is_err());
        assert!(validate_name("envs/ml").is_err());
    }

    #[test]
    fn test_parse_python_version() {
        assert_eq!(parse_python_version("Python 3.12.1"), Some("3.12.1".to_string()));
        assert_eq!(parse_python_version("python: command not found"), None);
        assert_eq!(parse_python_version(""), None);
    }

    #[test]
    fn test_version_matches() {
        assert!(version_matches("3.12.1", "3.12"));
        assert!(version_matches("3.12", "3.12"));
        assert!(!version_matches("3.120.0", "3.12"));
        assert!(!version_matches("3.11.9", "3.12"));
    }

    #[test]
    fn test_create_absent_environment() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[]);

        let outcome = ctl.create("ml").unwrap();

        match outcome {
            Outcome::Created {
                name,
                python_version,
                warnings,
            } => {
                assert_eq!(name, "ml");
                let version = python_version.unwrap();
                assert!(version_matches(&version, "3.12"), "{}", version);
                assert!(warnings.is_empty(), "{:?}", warnings);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(ctl.manager().names().contains("ml"));
        assert!(ctl.confirmer().asked().is_empty());
    }

    #[test]
    fn test_create_verifies_with_second_list() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[]);
        ctl.create("ml").unwrap();

        let ops: Vec<Operation> = ctl.manager().calls().iter().map(|c| c.operation).collect();
        assert_eq!(
            &ops[..3],
            &[Operation::List, Operation::Create, Operation::List]
        );
    }

    #[test]
    fn test_create_empty_name_is_invalid() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[]);

        let err = ctl.create("").unwrap_err();
        assert!(matches!(err, EnvError::InvalidInput { .. }));
        assert!(ctl.manager().calls().is_empty());
    }

    #[test]
    fn test_create_existing_declined_leaves_registry() {
        let manager = InMemoryPackageManager::new()
            .with_environment("ml", ["numpy"])
            .with_environment("web", ["flask"]);
        let before = manager.names();
        let mut ctl = controller(manager, &["n"]);

        let outcome = ctl.create("ml").unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(ctl.manager().names(), before);
        assert!(ctl.manager().packages("ml").unwrap().contains("numpy"));
        assert_eq!(ctl.manager().mutating_calls(), 0);
    }

    #[test]
    fn test_create_existing_empty_answer_declines() {
        let mut ctl = controller(InMemoryPackageManager::new().with_environment("ml", ["numpy"]), &[""]);

        assert_eq!(ctl.create("ml").unwrap(), Outcome::Cancelled);
        assert!(!ctl.confirmer().asked()[0].1);
        assert_eq!(ctl.manager().mutating_calls(), 0);
    }

    #[test]
    fn test_create_existing_accepted_rebuilds_empty() {
        let manager = InMemoryPackageManager::new().with_environment("ml", ["numpy", "pandas"]);
        let mut ctl = controller(manager, &["YES"]);

        let outcome = ctl.create("ml").unwrap();

        assert!(matches!(outcome, Outcome::Created { .. }));
        let packages = ctl.manager().packages("ml").unwrap();
        assert!(!packages.contains("numpy"));
        assert!(!packages.contains("pandas"));
        assert!(packages.iter().all(|p| p.starts_with("python=")), "{:?}", packages);

        let ops: Vec<Operation> = ctl.manager().calls().iter().map(|c| c.operation).collect();
        assert_eq!(
            &ops[..4],
            &[Operation::List, Operation::Remove, Operation::Create, Operation::List]
        );
        let remove = &ctl.manager().calls()[1];
        assert_eq!(remove.environment.as_deref(), Some("ml"));
    }

    #[test]
    fn test_create_remove_failure_aborts_before_create() {
        let manager = InMemoryPackageManager::new()
            .with_environment("ml", ["numpy"])
            .failing_on(Operation::Remove);
        let mut ctl = controller(manager, &["y"]);

        let err = ctl.create("ml").unwrap_err();

        assert!(matches!(err, EnvError::Adapter { .. }));
        assert!(!ctl
            .manager()
            .calls()
            .iter()
            .any(|c| c.operation == Operation::Create));
    }

    #[test]
    fn test_create_failure_propagates() {
        let manager = InMemoryPackageManager::new().failing_on(Operation::Create);
        let mut ctl = controller(manager, &[]);

        let err = ctl.create("ml").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_ADAPTER_FAILURE);
    }

    #[test]
    fn test_create_verification_failure() {
        let manager = InMemoryPackageManager::new().dropping_created();
        let mut ctl = controller(manager, &[]);

        let err = ctl.create("ml").unwrap_err();

        assert!(matches!(err, EnvError::CreationVerificationFailed(ref name) if name == "ml"));
        assert!(!ctl
            .manager()
            .calls()
            .iter()
            .any(|c| c.operation == Operation::Run));
    }

    #[test]
    fn test_create_pin_failure_is_warning() {
        let manager = InMemoryPackageManager::new().failing_on(Operation::Run);
        let mut ctl = controller(manager, &[]);

        let outcome = ctl.create("ml").unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.warnings().len(), 2);
        assert!(ctl.manager().names().contains("ml"));
    }

    #[test]
    fn test_create_uses_configured_python_version() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[]);
        let settings = Settings {
            python_version: "3.11".to_string(),
            ..Settings::default()
        };
        ctl = ctl.with_settings(&settings);

        let outcome = ctl.create("legacy").unwrap();

        assert!(outcome.warnings().is_empty());
        match outcome {
            Outcome::Created { python_version, .. } => {
                assert_eq!(python_version.as_deref(), Some("3.11.0"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_create_pin_uses_manager_program_and_channels() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[])
            .with_manager_program("/opt/bin/micromamba");
        ctl.create("ml").unwrap();

        let run = ctl
            .manager()
            .calls()
            .iter()
            .find(|c| c.operation == Operation::Run)
            .unwrap();
        assert_eq!(run.environment.as_deref(), Some("ml"));
        assert_eq!(run.command.as_deref(), Some("/opt/bin/micromamba"));
        assert_eq!(
            run.args,
            vec!["install", "-y", "-n", "ml", "-c", "conda-forge", "python=3.12"]
        );
    }

    #[test]
    fn test_delete_absent_is_not_found() {
        let mut ctl = controller(InMemoryPackageManager::new().with_environment("foobar", ["x"]), &["y"]);

        let outcome = ctl.delete("foo").unwrap();

        assert_eq!(outcome, Outcome::NotFound { name: "foo".to_string() });
        assert_eq!(ctl.manager().mutating_calls(), 0);
        assert!(ctl.confirmer().asked().is_empty());
    }

    #[test]
    fn test_delete_empty_answer_accepts() {
        let mut ctl = controller(InMemoryPackageManager::new().with_environment("ml", ["numpy"]), &[""]);

        let outcome = ctl.delete("ml").unwrap();

        assert_eq!(outcome, Outcome::Deleted { name: "ml".to_string() });
        assert!(ctl.manager().names().is_empty());
        assert!(ctl.confirmer().asked()[0].1);
    }

    #[test]
    fn test_delete_declined() {
        let mut ctl = controller(InMemoryPackageManager::new().with_environment("ml", ["numpy"]), &["no"]);

        assert_eq!(ctl.delete("ml").unwrap(), Outcome::Cancelled);
        assert_eq!(ctl.manager().names(), names(&["ml"]));
        assert_eq!(ctl.manager().mutating_calls(), 0);
    }

    #[test]
    fn test_delete_remove_failure() {
        let manager = InMemoryPackageManager::new()
            .with_environment("ml", ["numpy"])
            .failing_on(Operation::Remove);
        let mut ctl = controller(manager, &["y"]);

        assert!(matches!(ctl.delete("ml"), Err(EnvError::Adapter { .. })));
    }

    #[test]
    fn test_asymmetric_defaults_hold_together() {
        let manager = InMemoryPackageManager::new()
            .with_environment("a", ["x"])
            .with_environment("b", ["y"]);
        let mut ctl = controller(manager, &["", ""]);

        assert_eq!(ctl.create("a").unwrap(), Outcome::Cancelled);
        assert_eq!(ctl.delete("b").unwrap(), Outcome::Deleted { name: "b".to_string() });
        assert_eq!(ctl.manager().names(), names(&["a"]));
    }

    #[test]
    fn test_exact_name_matching() {
        let mut ctl = controller(InMemoryPackageManager::new().with_environment("foo", ["x"]), &[]);

        assert_eq!(ctl.delete("foobar").unwrap(), Outcome::NotFound { name: "foobar".to_string() });
        assert_eq!(ctl.delete("fo").unwrap(), Outcome::NotFound { name: "fo".to_string() });
        assert_eq!(ctl.manager().names(), names(&["foo"]));
    }

    #[test]
    fn test_exact_name_matching_install_deps() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        let manager = InMemoryPackageManager::new().with_environment("foobar", ["x"]);
        let mut ctl = Controller::new(manager, ScriptedConfirmer::default(), dir.path());

        for name in ["foo", "fo", "foobarbaz"] {
            let outcome = ctl.install_deps(name, Path::new("requirements.txt")).unwrap();
            assert_eq!(outcome, Outcome::NotFound { name: name.to_string() });
        }
        assert_eq!(ctl.manager().mutating_calls(), 0);
    }

    #[test]
    fn test_exact_name_matching_create() {
        let manager = InMemoryPackageManager::new()
            .with_environment("foo", ["numpy"])
            .with_environment("foobar", ["pandas"]);
        let mut ctl = controller(manager, &[]);

        let outcome = ctl.create("fo").unwrap();

        assert!(matches!(outcome, Outcome::Created { ref name, .. } if name == "fo"));
        assert!(ctl.confirmer().asked().is_empty());
        assert_eq!(ctl.manager().names(), names(&["fo", "foo", "foobar"]));
        assert!(ctl.manager().packages("foo").unwrap().contains("numpy"));
        assert!(ctl.manager().packages("foobar").unwrap().contains("pandas"));
    }

    #[test]
    fn test_validate_name_rejects_unlistable_names() {
        for name in ["a:b", "#nb", "---", "-n", "===", "──", "─-=", "━-"] {
            assert!(
                matches!(validate_name(name), Err(EnvError::InvalidInput { .. })),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn test_accepted_names_are_observable_in_env_list() {
        let candidates = [
            "ml", "ml-gpu", "py3.12", "a_b", "Name", "x-", "a#b", "a=b", "a:b", "#nb", "---",
            "-n", "===", "──", "─-", "━=", "C:env", "é-env",
        ];

        for name in candidates {
            if validate_name(name).is_err() {
                continue;
            }
            let listing = format!("  {}  /e/{}\n", name, name);
            assert!(
                parse_env_list(&listing).contains(name),
                "accepted but not listed: {:?}",
                name
            );
        }
    }

    #[test]
    fn test_install_deps_missing_spec() {
        let dir = tempdir().unwrap();
        let manager = InMemoryPackageManager::new().with_environment("ml", Vec::<String>::new());
        let mut ctl = Controller::new(manager, ScriptedConfirmer::default(), dir.path());

        let outcome = ctl.install_deps("ml", Path::new("requirements.txt")).unwrap();

        assert_eq!(
            outcome,
            Outcome::SpecNotFound {
                path: dir.path().join("requirements.txt")
            }
        );
        assert!(ctl.manager().calls().is_empty());
    }

    #[test]
    fn test_install_deps_missing_environment() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        let mut ctl = Controller::new(InMemoryPackageManager::new(), ScriptedConfirmer::default(), dir.path());

        let outcome = ctl.install_deps("ml", Path::new("requirements.txt")).unwrap();

        assert_eq!(outcome, Outcome::NotFound { name: "ml".to_string() });
        assert_eq!(ctl.manager().mutating_calls(), 0);
    }

    #[test]
    fn test_install_deps_runs_pip_with_resolved_path() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("requirements.txt");
        fs::write(&spec, "numpy\n").unwrap();
        let manager = InMemoryPackageManager::new().with_environment("ml", Vec::<String>::new());
        let mut ctl = Controller::new(manager, ScriptedConfirmer::default(), dir.path());

        let outcome = ctl.install_deps("ml", Path::new("requirements.txt")).unwrap();

        assert_eq!(
            outcome,
            Outcome::DepsInstalled {
                name: "ml".to_string(),
                spec: spec.clone()
            }
        );
        let run = ctl.manager().calls().last().unwrap();
        assert_eq!(run.command.as_deref(), Some("python"));
        assert_eq!(
            run.args,
            vec![
                "-m".to_string(),
                "pip".to_string(),
                "install".to_string(),
                "-r".to_string(),
                spec.to_string_lossy().into_owned()
            ]
        );
        assert!(ctl.confirmer().asked().is_empty());
    }

    #[test]
    fn test_install_deps_failure_propagates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        let manager = InMemoryPackageManager::new()
            .with_environment("ml", Vec::<String>::new())
            .failing_on(Operation::Run);
        let mut ctl = Controller::new(manager, ScriptedConfirmer::default(), dir.path());

        let err = ctl.install_deps("ml", Path::new("requirements.txt")).unwrap_err();
        assert!(matches!(err, EnvError::Adapter { .. }));
    }

    #[test]
    fn test_execute_dispatches() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[]);

        let mut installer = RecordingInstaller::default();

        let outcome = ctl
            .execute(
                &Action::Create {
                    name: "ml".to_string(),
                },
                &mut installer,
            )
            .unwrap();
        assert!(outcome.is_success());

        let outcome = ctl
            .execute(
                &Action::Delete {
                    name: "ml".to_string(),
                },
                &mut installer,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Deleted { name: "ml".to_string() });
        assert_eq!(installer.installs, 0);
    }

    #[test]
    fn test_execute_install_manager_uses_installer() {
        let mut ctl = controller(InMemoryPackageManager::new(), &["yes"]);
        let mut installer = RecordingInstaller::default();

        let outcome = ctl.execute(&Action::InstallManager, &mut installer).unwrap();

        assert_eq!(outcome, Outcome::ManagerInstalled);
        assert_eq!(installer.installs, 1);
        assert!(ctl.manager().calls().is_empty());
        assert!(!ctl.confirmer().asked()[0].1);
    }

    #[test]
    fn test_install_manager_declined_skips_installer() {
        let mut ctl = controller(InMemoryPackageManager::new(), &[""]);
        let mut installer = RecordingInstaller::default();

        let outcome = ctl.install_manager(&mut installer).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(installer.installs, 0);
        assert!(ctl.manager().calls().is_empty());
    }

    #[test]
    fn test_install_manager_accepted() {
        let mut ctl = controller(InMemoryPackageManager::new(), &["y"]);
        let mut installer = RecordingInstaller::default();

        assert_eq!(ctl.install_manager(&mut installer).unwrap(), Outcome::ManagerInstalled);
        assert_eq!(installer.installs, 1);
    }

    #[test]
    fn test_list() {
        let mut ctl = controller(
            InMemoryPackageManager::new()
                .with_environment("a", ["x"])
                .with_environment("b", ["y"]),
            &[],
        );
        assert_eq!(ctl.list().unwrap(), names(&["a", "b"]));
    }
}
