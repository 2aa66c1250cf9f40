//! LineageForge CLI library.
//!
//! Configuration loading, logging setup, command execution and output formatting
//! for the `lineage` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod snapshot;

pub use cli::{Cli, Command};
pub use config::LineageConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use snapshot::Snapshot;
