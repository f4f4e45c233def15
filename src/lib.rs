//! costreport - a usage and cost report query service
//!
//! Serves filtered usage-and-cost queries over a static CSV dataset.

pub mod cli;
pub mod dataset;
pub mod http_server;
pub mod observability;
pub mod query;
