//! Observability for costreport
//!
//! Structured single-line JSON logging. Logging is synchronous, has
//! no side effects on request processing, and produces deterministic
//! field ordering.

mod logger;

pub use logger::{Logger, Severity};
