//! Query errors
//!
//! Error types for request validation and query execution, with their
//! HTTP mapping. Every variant carries enough detail to render the
//! field-specific user-facing message directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Request validation and engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A mandatory parameter is absent or empty
    #[error("{0} parameter is mandatory")]
    MissingRequiredParameter(&'static str),

    /// A numeric parameter contains non-digit characters
    #[error("{0} must be numeric only")]
    InvalidNumericFormat(&'static str),

    /// A date parameter is not a valid YYYY-MM-DD calendar date
    #[error("{0} must be in YYYY-MM-DD format")]
    InvalidDateFormat(&'static str),

    /// `limit` is not an integer in [1, max]
    #[error("limit must be an integer between 1 and {max}")]
    InvalidLimitValue { max: usize },

    /// More rows matched than the active limit allows; the result is
    /// rejected rather than truncated.
    #[error("RowLimitExceeded")]
    RowLimitExceeded {
        matched: usize,
        limit: usize,
        /// Absolute ceiling, present when client limits are enabled
        absolute_max: Option<usize>,
    },
}

impl QueryError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::MissingRequiredParameter(_)
            | QueryError::InvalidNumericFormat(_)
            | QueryError::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            QueryError::InvalidLimitValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            QueryError::RowLimitExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Human-readable detail for the row-limit gate, None otherwise
    pub fn detail(&self) -> Option<String> {
        match self {
            QueryError::RowLimitExceeded {
                matched,
                limit,
                absolute_max,
            } => {
                let mut msg = format!(
                    "The number of rows matching your request is {matched}, which exceeds \
the allowed maximum of {limit}. Please adjust your filters."
                );
                if let Some(max) = absolute_max {
                    msg.push_str(&format!(" A larger limit may be requested, up to {max}."));
                }
                Some(msg)
            }
            _ => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&QueryError> for ErrorResponse {
    fn from(err: &QueryError) -> Self {
        Self {
            error: err.to_string(),
            message: err.detail(),
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
