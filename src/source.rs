//! Where player and team collections come from.
//!
//! The ranking engine only ever sees fully materialized collections. Implementors of
//! [`DataSource`] own everything that can go wrong before that point: connectivity,
//! timeouts, retries, and malformed payloads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::logging::info;
use crate::rank::{self, Ranking};
use crate::types::{Player, Team};

/// Upstream data was unavailable or unusable.
#[derive(Error, Debug)]
pub enum FetchError {
    #[cfg(feature = "fetch")]
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed {collection} data from {origin}: {reason}")]
    Malformed {
        collection: &'static str,
        origin: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            FetchError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub(crate) fn malformed(
        collection: &'static str,
        origin: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        FetchError::Malformed {
            collection,
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

/// Decode a JSON document into a collection of records.
pub(crate) fn decode_collection<T>(
    collection: &'static str,
    origin: &str,
    document: &Value,
) -> Result<Vec<T>, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    rank::records(collection, document).map_err(|e| FetchError::malformed(collection, origin, e))
}

/// A provider of the two input collections.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the professional players collection.
    async fn players(&self) -> Result<Vec<Player>, FetchError>;

    /// Fetch the teams collection.
    async fn teams(&self) -> Result<Vec<Team>, FetchError>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;

    /// Fetch both collections.
    async fn collections(&self) -> Result<(Vec<Player>, Vec<Team>), FetchError> {
        let players = self.players().await?;
        let teams = self.teams().await?;
        Ok((players, teams))
    }
}

/// Fetch both collections from `source` and rank them.
pub async fn rank_from(source: &dyn DataSource, top_n: i64) -> Result<Ranking, FetchError> {
    info!(source = %source.describe(), top_n, "finding top teams");
    let (players, teams) = source.collections().await?;
    Ok(rank::rank(&players, &teams, top_n))
}

/// Collections held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
}

impl StaticSource {
    pub fn new(players: Vec<Player>, teams: Vec<Team>) -> Self {
        Self { players, teams }
    }

    /// Build from two JSON documents.
    pub fn from_json(players: &Value, teams: &Value) -> Result<Self, FetchError> {
        Ok(Self {
            players: decode_collection("players", "memory", players)?,
            teams: decode_collection("teams", "memory", teams)?,
        })
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn players(&self) -> Result<Vec<Player>, FetchError> {
        Ok(self.players.clone())
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        Ok(self.teams.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Collections read from two local JSON files.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub players_path: PathBuf,
    pub teams_path: PathBuf,
}

impl FileSource {
    pub fn new(players_path: impl Into<PathBuf>, teams_path: impl Into<PathBuf>) -> Self {
        Self {
            players_path: players_path.into(),
            teams_path: teams_path.into(),
        }
    }

    async fn read<T>(collection: &'static str, path: &Path) -> Result<Vec<T>, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let origin = path.display().to_string();
        let content = read_to_string(path).await.map_err(|source| FetchError::Io {
            path: origin.clone(),
            source,
        })?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| FetchError::malformed(collection, origin.as_str(), e))?;
        decode_collection(collection, &origin, &document)
    }
}

#[cfg(feature = "fetch")]
async fn read_to_string(path: &Path) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
}

#[cfg(not(feature = "fetch"))]
async fn read_to_string(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

#[async_trait]
impl DataSource for FileSource {
    async fn players(&self) -> Result<Vec<Player>, FetchError> {
        Self::read("players", &self.players_path).await
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        Self::read("teams", &self.teams_path).await
    }

    fn describe(&self) -> String {
        format!(
            "files {} and {}",
            self.players_path.display(),
            self.teams_path.display()
        )
    }
}
