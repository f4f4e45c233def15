//! Report endpoint routes
//!
//! `GET /usage-cost-report` runs the validator and query engine
//! against the current dataset snapshot. `POST /admin/reload`
//! re-reads the CSV and swaps the snapshot atomically: in-flight
//! requests keep the `Arc` they cloned, so every request observes one
//! consistent snapshot end-to-end.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::dataset::{self, Dataset, DatasetError};
use crate::observability::Logger;
use crate::query::{QueryEngine, QueryError, ReportQuery, UsageReportResponse};

/// Shared state behind the report routes
pub struct ReportState {
    /// Current dataset snapshot; swapped whole on reload
    dataset: RwLock<Arc<Dataset>>,
    engine: QueryEngine,
    csv_file: PathBuf,
}

impl ReportState {
    pub fn new(dataset: Dataset, engine: QueryEngine, csv_file: PathBuf) -> Self {
        Self {
            dataset: RwLock::new(Arc::new(dataset)),
            engine,
            csv_file,
        }
    }

    /// Clone the current snapshot handle
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.dataset.read().expect("dataset lock poisoned").clone()
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Re-read the CSV and swap the snapshot; returns the new row count
    pub fn reload(&self) -> Result<usize, DatasetError> {
        let fresh = dataset::load_path(&self.csv_file)?;
        let rows = fresh.len();
        *self.dataset.write().expect("dataset lock poisoned") = Arc::new(fresh);
        Ok(rows)
    }
}

/// Build the report router
pub fn report_routes(state: Arc<ReportState>) -> Router {
    Router::new()
        .route("/usage-cost-report", get(usage_cost_report_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(state)
}

/// The single client-facing read endpoint
async fn usage_cost_report_handler(
    State(state): State<Arc<ReportState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<UsageReportResponse>, QueryError> {
    let snapshot = state.snapshot();

    let query = ReportQuery::parse(&params, state.engine().config()).map_err(|e| {
        Logger::warn("QUERY_REJECTED", &[("error", &e.to_string())]);
        e
    })?;

    match state.engine().run(&snapshot, &query) {
        Ok(response) => {
            Logger::info(
                "QUERY_COMPLETE",
                &[
                    ("account_id", &query.account_id),
                    ("rows", &response.total_rows.to_string()),
                    ("groups", &response.data.len().to_string()),
                ],
            );
            Ok(Json(response))
        }
        Err(e) => {
            Logger::warn(
                "QUERY_REJECTED",
                &[("account_id", &query.account_id), ("error", &e.to_string())],
            );
            Err(e)
        }
    }
}

/// Reload success body
#[derive(Debug, Serialize)]
struct ReloadResponse {
    rows: usize,
}

/// Reload failure body
#[derive(Debug, Serialize)]
struct ReloadError {
    error: String,
}

/// Admin endpoint: re-read the CSV and swap the snapshot
async fn reload_handler(
    State(state): State<Arc<ReportState>>,
) -> Result<Json<ReloadResponse>, (StatusCode, Json<ReloadError>)> {
    match state.reload() {
        Ok(rows) => {
            Logger::info("DATASET_RELOADED", &[("rows", &rows.to_string())]);
            Ok(Json(ReloadResponse { rows }))
        }
        Err(e) => {
            Logger::error("DATASET_RELOAD_FAILED", &[("error", &e.to_string())]);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReloadError {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
