//! Query core: validation, filtering, row-limit gate, shaping
//!
//! Pure, synchronous computation over one dataset snapshot. The
//! transport layer hands in a raw string parameter bag; this module
//! validates it into a `ReportQuery`, selects matching rows, enforces
//! the row-limit gate, and shapes the result into the nested
//! subscription → charges response.

mod config;
mod engine;
mod errors;
mod filter;
mod params;
mod response;

pub use config::{QueryConfig, TagMatchMode, DEFAULT_ROW_LIMIT, MAX_ROWS_LIMIT};
pub use engine::QueryEngine;
pub use errors::{QueryError, QueryResult};
pub use params::ReportQuery;
pub use response::{Charge, UsageReport, UsageReportResponse};
