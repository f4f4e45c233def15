//! CLI argument definitions using clap
//!
//! Commands:
//! - costreport serve --config <path>
//! - costreport check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// costreport - usage and cost report query service
#[derive(Parser, Debug)]
#[command(name = "costreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the dataset and start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./costreport.json")]
        config: PathBuf,
    },

    /// Check the CSV dataset for structural and cell-level problems
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./costreport.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
