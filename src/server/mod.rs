//! HTTP API server for skore.
//!
//! Serves the top teams as a JSON array of aggregate entries. Degraded input
//! (a bad count, empty collections, unusable players) yields `[]`; only an upstream
//! failure or a non-integer count produces an error body.

mod config;
mod cors;
mod error;
mod routes;
mod state;

pub use config::{Config, ConfigError, CorsConfig, RankingConfig, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, StateError};

pub use crate::fetch::UpstreamConfig;
pub use crate::subscriber::{LogFormat, LoggingConfig, init as init_logging};
