//! EnvKeeper - Micromamba Environment Manager
//!
//! Creates, deletes and populates named, isolated environments through
//! micromamba, with confirmation gates guarding every destructive step.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`lifecycle`]: Controller deciding and sequencing environment transitions
//! - [`environment`]: Package manager adapter trait, micromamba and in-memory backends
//! - [`config`]: Settings file discovery and defaults
//! - [`report`]: Outcome summaries for the terminal and JSON
//! - [`error`]: Failure taxonomy and exit codes
//!
//! # Example
//!
//! ```rust,no_run
//! use envkeeper::environment::Micromamba;
//! use envkeeper::lifecycle::{Controller, TerminalConfirmer};
//! use envkeeper::Settings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::default();
//!     let manager = Micromamba::from_settings(&settings, None);
//!
//!     let mut controller = Controller::new(manager, TerminalConfirmer, "/opt/project")
//!         .with_settings(&settings);
//!
//!     let outcome = controller.create("analysis")?;
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod report;

// Re-export commonly used types
pub use config::Settings;
pub use error::EnvError;
pub use lifecycle::{Action, Controller, Outcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "EnvKeeper";
