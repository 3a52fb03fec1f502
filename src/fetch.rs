//! OpenDota API client.
//!
//! Fetches the `proPlayers` and `teams` collections from a base URL, retrying
//! transient failures with a linear backoff.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::logging::{debug, error, info, warn};
use crate::source::{DataSource, FetchError, decode_collection};
use crate::types::{Player, Team};

/// Default OpenDota API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";

/// Upstream API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API base URL, without the endpoint.
    pub base_url: String,
    pub players_endpoint: String,
    pub teams_endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Delay before the first retry; multiplied by the attempt number afterwards.
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            players_endpoint: "proPlayers".to_string(),
            teams_endpoint: "teams".to_string(),
            timeout_secs: 30,
            retries: 2,
            retry_backoff_ms: 250,
        }
    }
}

impl UpstreamConfig {
    /// Default settings against another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL for an endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// HTTP client for the OpenDota API.
#[derive(Debug, Clone)]
pub struct OpenDota {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl OpenDota {
    /// Build a client with the configured timeout.
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| FetchError::Request {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    async fn fetch_collection<T>(
        &self,
        collection: &'static str,
        endpoint: &str,
    ) -> Result<Vec<T>, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.config.endpoint_url(endpoint);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.get_json(collection, &url).await {
                Ok(document) => {
                    let records = decode_collection(collection, &url, &document)?;
                    debug!(collection, url = %url, count = records.len(), "fetched collection");
                    return Ok(records);
                }
                Err(err) if err.is_transient() && attempt <= self.config.retries => {
                    warn!(collection, url = %url, attempt, error = %err, "retrying request");
                    let backoff = self.config.retry_backoff_ms.saturating_mul(u64::from(attempt));
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(err) => {
                    error!(collection, url = %url, error = %err, "giving up on request");
                    return Err(err);
                }
            }
        }
    }

    async fn get_json(&self, collection: &'static str, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::malformed(collection, url, e))
    }
}

#[async_trait]
impl DataSource for OpenDota {
    async fn players(&self) -> Result<Vec<Player>, FetchError> {
        self.fetch_collection("players", &self.config.players_endpoint)
            .await
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        self.fetch_collection("teams", &self.config.teams_endpoint)
            .await
    }

    fn describe(&self) -> String {
        self.config.base_url.clone()
    }

    /// Both endpoints are independent, so they are requested concurrently.
    async fn collections(&self) -> Result<(Vec<Player>, Vec<Team>), FetchError> {
        let (players, teams) = tokio::try_join!(self.players(), self.teams())?;
        info!(
            players = players.len(),
            teams = teams.len(),
            "fetched collections"
        );
        Ok((players, teams))
    }
}
