//! Environment Management Module
//!
//! The package manager abstraction and its implementations.
//!
//! - [`adapter`]: The [`PackageManager`] trait the controller depends on
//! - [`conda`]: Micromamba-backed implementation for real runs
//! - [`memory`]: In-memory registry for exercising the controller

pub mod adapter;
pub mod conda;
pub mod memory;

pub use adapter::{CommandOutput, PackageManager};
pub use conda::{parse_env_list, resolve_binary, Micromamba};
pub use memory::{InMemoryPackageManager, Operation};
