//! Query engine
//!
//! Selects the rows matching a validated query, enforces the
//! row-limit gate, and groups the survivors into the nested
//! subscription → charges response.

use std::collections::HashMap;

use crate::dataset::{ChargeRow, Dataset};

use super::config::QueryConfig;
use super::errors::{QueryError, QueryResult};
use super::params::ReportQuery;
use super::response::{Charge, UsageReport, UsageReportResponse};

/// Stateless per-request query executor over a dataset snapshot
#[derive(Debug, Clone)]
pub struct QueryEngine {
    config: QueryConfig,
}

impl QueryEngine {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Run a validated query against a dataset snapshot.
    ///
    /// Zero matches is a success (`data: []`); exceeding the active
    /// limit is an error with diagnostic counts, never a truncated
    /// result.
    pub fn run(&self, dataset: &Dataset, query: &ReportQuery) -> QueryResult<UsageReportResponse> {
        let matched: Vec<&ChargeRow> = dataset
            .rows
            .iter()
            .filter(|row| query.matches(row, self.config.tag_match))
            .collect();

        if matched.is_empty() {
            return Ok(UsageReportResponse::empty());
        }

        if matched.len() > query.limit {
            return Err(QueryError::RowLimitExceeded {
                matched: matched.len(),
                limit: query.limit,
                absolute_max: self
                    .config
                    .allow_client_limit
                    .then_some(self.config.max_rows_limit),
            });
        }

        Ok(shape(&matched))
    }
}

/// Group rows by subscription_id, keeping dataset row order within
/// each group and first-encounter order across groups.
fn shape(rows: &[&ChargeRow]) -> UsageReportResponse {
    let mut data: Vec<UsageReport> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let idx = *group_index
            .entry(row.subscription_id.clone())
            .or_insert_with(|| {
                data.push(UsageReport::from_first_row(row));
                data.len() - 1
            });
        data[idx].charges.push(Charge::from(*row));
    }

    UsageReportResponse {
        total_rows: rows.len(),
        data,
    }
}
