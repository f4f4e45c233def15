//! CLI module for costreport
//!
//! Provides the command-line interface:
//! - serve: load the dataset and enter the HTTP serving loop
//! - check: verify the CSV's structural and cell-level consistency

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, load_config, run, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
