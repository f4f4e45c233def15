//! Query configuration
//!
//! Explicit configuration passed into the validator and engine, so
//! both stay pure and independently testable. Loaded from the config
//! file with serde defaults.

use serde::{Deserialize, Serialize};

/// Row limit applied when the client supplies none
pub const DEFAULT_ROW_LIMIT: usize = 10;

/// Absolute ceiling a client-supplied limit may request
pub const MAX_ROWS_LIMIT: usize = 100;

/// How tag filter values are compared against stored tag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatchMode {
    /// Filter must equal the tag-value component exactly
    Exact,

    /// Filter may appear anywhere within the tag-value component
    Substring,
}

/// Query-core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Row limit used when the request carries no `limit` parameter
    #[serde(default = "default_row_limit")]
    pub default_row_limit: usize,

    /// Absolute maximum a client may request via `limit`
    #[serde(default = "default_max_rows_limit")]
    pub max_rows_limit: usize,

    /// Whether the client-facing `limit` parameter is honored.
    /// When false (production mode) the parameter is ignored and
    /// `default_row_limit` always applies.
    #[serde(default = "default_allow_client_limit")]
    pub allow_client_limit: bool,

    /// Tag value comparison mode
    #[serde(default = "default_tag_match")]
    pub tag_match: TagMatchMode,
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

fn default_max_rows_limit() -> usize {
    MAX_ROWS_LIMIT
}

fn default_allow_client_limit() -> bool {
    true
}

fn default_tag_match() -> TagMatchMode {
    TagMatchMode::Substring
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_row_limit: default_row_limit(),
            max_rows_limit: default_max_rows_limit(),
            allow_client_limit: default_allow_client_limit(),
            tag_match: default_tag_match(),
        }
    }
}
