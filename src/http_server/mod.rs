//! HTTP server for costreport
//!
//! Axum-based transport layer: the client-facing report endpoint, a
//! health probe, and the admin reload endpoint.

mod config;
mod report_routes;
mod server;

pub use config::HttpServerConfig;
pub use report_routes::{report_routes, ReportState};
pub use server::HttpServer;
