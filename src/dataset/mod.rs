//! Dataset loading and row model
//!
//! Loads the usage-and-cost CSV into an immutable in-memory table.
//! Schema introspection happens once at load time: required columns
//! are located by header name and tag columns (`keyN:value`) are
//! discovered by pattern and recorded as a lookup table, so the query
//! engine never re-scans row shape per request.

mod errors;
mod loader;
mod row;
mod schema;

pub use errors::{DatasetError, DatasetResult};
pub use loader::{check_consistency, load_path, load_reader, ConsistencyReport};
pub use row::ChargeRow;
pub use schema::{is_tag_column, TableSchema};

/// An immutable snapshot of the loaded dataset.
///
/// Shared across requests as `Arc<Dataset>`; never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Rows in source file order.
    pub rows: Vec<ChargeRow>,

    /// Tag column names discovered at load, in header order.
    pub tag_columns: Vec<String>,
}

impl Dataset {
    /// Number of charge rows in the snapshot
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
