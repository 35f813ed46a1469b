//! EnvKeeper CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu
//! envkeeper
//!
//! # Create an environment without the name prompt
//! envkeeper create --name analysis
//!
//! # Delete without confirmation
//! envkeeper --yes delete --name analysis
//!
//! # Install requirements.txt from the tool directory
//! envkeeper install-deps --name analysis
//!
//! # Machine-readable result
//! envkeeper --json create --name analysis
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use log::{debug, error};

use envkeeper::config::{executable_dir, Settings};
use envkeeper::environment::{Micromamba, PackageManager};
use envkeeper::error::EnvError;
use envkeeper::lifecycle::{
    Action, AssumeYes, Confirmer, Controller, Outcome, ScriptInstaller, TerminalConfirmer,
};
use envkeeper::report::Report;
use envkeeper::{APP_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = "envkeeper", version, about = "Manage isolated micromamba environments")]
struct Cli {
    /// Settings file (default: envkeeper.yaml next to the executable or in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the dependency file is resolved against (default: executable directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Install micromamba itself
    InstallManager,
    /// Create an environment, replacing an existing one after confirmation
    Create {
        /// Environment name (prompted for when omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete an environment
    Delete {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Install a dependency file into an existing environment
    InstallDeps {
        #[arg(short, long)]
        name: Option<String>,
        /// Dependency file relative to the base directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List registered environments
    List,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME, VERSION);
    println!("Micromamba Environment Manager");
    println!();
}

/// Shows the action menu when no subcommand was given.
fn select_command() -> Result<Commands, EnvError> {
    let items = [
        "Install micromamba",
        "Create an environment",
        "Delete an environment",
        "Install dependencies into an environment",
    ];

    let choice = Select::new()
        .with_prompt("What would you like to do?")
        .items(&items)
        .default(1)
        .interact()?;

    Ok(match choice {
        0 => Commands::InstallManager,
        1 => Commands::Create { name: None },
        2 => Commands::Delete { name: None },
        _ => Commands::InstallDeps {
            name: None,
            file: None,
        },
    })
}

/// Uses the flag value or asks for a name. Empty answers are passed on
/// so the controller can reject them.
fn resolve_name(name: Option<String>) -> Result<String, EnvError> {
    match name {
        Some(name) => Ok(name),
        None => Ok(Input::<String>::new()
            .with_prompt("Environment name")
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Turns a subcommand into an action request.
fn build_action(command: Commands, settings: &Settings) -> Result<Option<Action>, EnvError> {
    let action = match command {
        Commands::InstallManager => Action::InstallManager,
        Commands::Create { name } => Action::Create {
            name: resolve_name(name)?,
        },
        Commands::Delete { name } => Action::Delete {
            name: resolve_name(name)?,
        },
        Commands::InstallDeps { name, file } => Action::InstallDeps {
            name: resolve_name(name)?,
            spec: file.unwrap_or_else(|| PathBuf::from(&settings.requirements_file)),
        },
        Commands::List => return Ok(None),
    };
    Ok(Some(action))
}

fn dispatch<C: Confirmer>(
    mut controller: Controller<Micromamba, C>,
    action: &Action,
    settings: &Settings,
) -> Result<Outcome, EnvError> {
    let mut installer = ScriptInstaller::new(&settings.installer_url);
    controller.execute(action, &mut installer)
}

fn print_environments(manager: &mut Micromamba, json: bool) -> Result<u8, EnvError> {
    let names = manager.list_environments()?;

    if json {
        let names: Vec<&String> = names.iter().collect();
        match serde_json::to_string_pretty(&names) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode environment list: {}", e),
        }
    } else if names.is_empty() {
        println!("No environments found");
    } else {
        for name in &names {
            println!("  {}", name);
        }
    }
    Ok(0)
}

fn print_report(report: &Report, json: bool) {
    if json {
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode report: {}", e),
        }
        return;
    }

    println!();
    println!("{}", report.summary());
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}

/// Main application entry point, returning the process exit code.
fn run(cli: Cli) -> Result<u8, EnvError> {
    let cwd = env::current_dir()?;
    let exe_dir = executable_dir();

    let settings = Settings::discover(cli.config.as_deref(), exe_dir.as_deref(), &cwd)?;
    let base_dir = cli
        .base_dir
        .clone()
        .or_else(|| exe_dir.clone())
        .unwrap_or_else(|| cwd.clone());
    debug!("Base directory: {}", base_dir.display());

    let command = match cli.command.clone() {
        Some(command) => command,
        None => {
            print_banner();
            select_command()?
        }
    };

    let mut manager = Micromamba::from_settings(&settings, exe_dir.as_deref());

    let Some(action) = build_action(command, &settings)? else {
        return print_environments(&mut manager, cli.json);
    };

    let result = run_action(manager, &action, &settings, &base_dir, cli.yes);
    if let Err(e) = &result {
        error!("{}", e);
    }

    let report = Report::new(action, &result);
    print_report(&report, cli.json);
    Ok(report.exit_code)
}

fn run_action(
    manager: Micromamba,
    action: &Action,
    settings: &Settings,
    base_dir: &Path,
    assume_yes: bool,
) -> Result<Outcome, EnvError> {
    let program = manager.binary().display().to_string();

    if assume_yes {
        let controller = Controller::new(manager, AssumeYes, base_dir)
            .with_settings(settings)
            .with_manager_program(program);
        dispatch(controller, action, settings)
    } else {
        let controller = Controller::new(manager, TerminalConfirmer, base_dir)
            .with_settings(settings)
            .with_manager_program(program);
        dispatch(controller, action, settings)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
