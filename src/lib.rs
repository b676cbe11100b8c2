//! Gridcast - plain-text weather summaries for coordinates.
//!
//! The service answers `GET /weather?lat=..&lon=..` by chaining two
//! National Weather Service lookups (a points lookup, then the gridpoint
//! forecast it refers to) under a single per-request deadline, and reduces
//! the first forecast period to a one-line summary.

pub mod config;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod models;
pub mod server;
pub mod web;

// Re-export core types for public API
pub use config::GridcastConfig;
pub use error::UpstreamError;
pub use forecast::ForecastClient;
pub use models::{Comfort, ForecastSummary};
pub use server::Lifecycle;
pub use web::{AppState, router};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
