//! Environment Lifecycle Module
//!
//! Decision logic for creating, deleting and populating environments.
//!
//! - [`controller`]: Transition policy and call sequencing
//! - [`confirm`]: Yes/no gates with explicit defaults
//! - [`outcome`]: Action requests and terminal outcomes
//! - [`bootstrap`]: Installing the package manager itself

pub mod bootstrap;
pub mod confirm;
pub mod controller;
pub mod outcome;

pub use bootstrap::{Installer, ScriptInstaller};
pub use confirm::{AssumeYes, Confirmer, ScriptedConfirmer, TerminalConfirmer};
pub use controller::{validate_name, Controller};
pub use outcome::{Action, Outcome};
