//! Application state management.

use std::sync::Arc;

use thiserror::Error;

use crate::fetch::OpenDota;
use crate::source::{DataSource, FetchError};

use super::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn DataSource>,
    default_count: i64,
}

impl AppState {
    /// Create state backed by the configured OpenDota endpoint.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let client = OpenDota::new(config.upstream.clone()).map_err(StateError::Client)?;
        Ok(Self::with_source(client, config.ranking.default_count))
    }

    /// Create state backed by any data source.
    pub fn with_source(source: impl DataSource + 'static, default_count: i64) -> Self {
        Self {
            source: Arc::new(source),
            default_count,
        }
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Team count used when the request does not specify one.
    pub fn default_count(&self) -> i64 {
        self.default_count
    }
}

/// Errors that can occur when setting up application state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to build upstream client: {0}")]
    Client(#[source] FetchError),
}
