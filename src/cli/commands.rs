//! CLI command implementations
//!
//! Commands load configuration explicitly and delegate to the
//! subsystems; nothing here keeps state beyond the call.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset;
use crate::http_server::{HttpServer, HttpServerConfig, ReportState};
use crate::observability::Logger;
use crate::query::{QueryConfig, QueryEngine};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the usage-and-cost CSV export
    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Validator and query engine settings
    #[serde(default)]
    pub query: QueryConfig,
}

fn default_csv_file() -> String {
    "cost_report.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_file: default_csv_file(),
            http: HttpServerConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

/// Load configuration from a JSON file; a missing file yields the
/// defaults.
pub fn load_config(path: &Path) -> CliResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("failed to read {}: {e}", path.display())))?;
    let config = serde_json::from_str(&contents)?;
    Ok(config)
}

/// Parse arguments and dispatch to the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { config } => serve(&config),
        Command::Check { config } => check(&config),
    }
}

/// Load the dataset and enter the HTTP serving loop
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let csv_path = PathBuf::from(&config.csv_file);

    let loaded =
        dataset::load_path(&csv_path).map_err(|e| CliError::dataset_error(e.to_string()))?;
    Logger::info(
        "DATASET_LOADED",
        &[
            ("file", &config.csv_file),
            ("rows", &loaded.len().to_string()),
            ("tag_columns", &loaded.tag_columns.len().to_string()),
        ],
    );

    let state = Arc::new(ReportState::new(
        loaded,
        QueryEngine::new(config.query.clone()),
        csv_path,
    ));
    let server = HttpServer::with_config(config.http.clone(), state);

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| CliError::boot_failed(e.to_string()))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(e.to_string()))
}

/// Check the CSV dataset: structural field counts first, then a full
/// typed load.
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    let file = fs::File::open(&config.csv_file)
        .map_err(|e| CliError::io_error(format!("failed to open {}: {e}", config.csv_file)))?;
    let report =
        dataset::check_consistency(file).map_err(|e| CliError::dataset_error(e.to_string()))?;

    if !report.is_consistent() {
        println!(
            "Found {} inconsistent row(s) (header has {} fields):",
            report.inconsistent.len(),
            report.expected_fields
        );
        for (line, fields) in &report.inconsistent {
            println!("  line {line}: {fields} field(s)");
        }
        return Err(CliError::dataset_error(
            "CSV rows are inconsistent with the header",
        ));
    }
    println!(
        "All rows are consistent with the header ({} fields).",
        report.expected_fields
    );

    let loaded = dataset::load_path(Path::new(&config.csv_file))
        .map_err(|e| CliError::dataset_error(e.to_string()))?;
    println!(
        "Loaded {} row(s), {} tag column(s).",
        loaded.len(),
        loaded.tag_columns.len()
    );
    Ok(())
}
