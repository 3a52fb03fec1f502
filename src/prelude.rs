//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use skore::prelude::*;
//!
//! let ranking = rank_from(&OpenDota::new(UpstreamConfig::default())?, 5).await?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Records and aggregates
pub use crate::types::{Player, PlayerScore, Team, TeamId, TeamScore};

// Scoring and ranking
pub use crate::rank::{Diagnostic, Ranking, TeamScores, rank, rank_json};
pub use crate::score::{ScoreError, score};

// Data sources
pub use crate::source::{DataSource, FetchError, FileSource, StaticSource, rank_from};

// Upstream client (requires "fetch" feature)
#[cfg(feature = "fetch")]
pub use crate::fetch::{OpenDota, UpstreamConfig};
