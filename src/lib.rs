//! Rank DOTA 2 teams by the combined history length of their professional players.
//!
//! A player's score is the number of whole seconds since their recorded history
//! started. A team's score is the sum over its players. The top N teams are chosen
//! with a linear scan, a full sort, or a heap, depending on how N compares to the
//! number of teams.
//!
//! # Quick Start
//!
//! ```ignore
//! use skore::prelude::*;
//!
//! let players: Vec<Player> = serde_json::from_str(players_json)?;
//! let teams: Vec<Team> = serde_json::from_str(teams_json)?;
//!
//! let ranking = rank(&players, &teams, 5);
//! for team in &ranking.teams {
//!     println!("{} {} ({} players)", team.team_id, team.xp, team.players.len());
//! }
//! ```
//!
//! # Modules
//!
//! - [`score`] - Player score from a history timestamp
//! - [`rank`] - Team aggregation and the ranking entry points
//! - [`select`] - Top-N selection strategies
//! - [`source`] - The [`DataSource`] abstraction, plus in-memory and file sources
//! - [`fetch`] - OpenDota HTTP client (requires `fetch` feature)
//! - [`server`] - HTTP API (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `fetch` - Enable the OpenDota client (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `server` - Enable the HTTP API server
//! - `full` - Enable all features

mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
mod logging;
pub mod prelude;
pub mod rank;
pub mod score;
pub mod select;
#[cfg(feature = "server")]
pub mod server;
pub mod source;
#[cfg(any(feature = "cli", feature = "server"))]
pub mod subscriber;
pub mod types;

pub use error::{Error, Result};

pub use rank::{Diagnostic, Ranking, TeamScores, rank, rank_at, rank_json};
pub use score::{ScoreError, score, score_at};
pub use select::{Strategy, select_top};
pub use source::{DataSource, FetchError, FileSource, StaticSource, rank_from};
pub use types::{AccountId, Player, PlayerScore, Team, TeamId, TeamScore};

#[cfg(feature = "fetch")]
pub use fetch::{OpenDota, UpstreamConfig};
