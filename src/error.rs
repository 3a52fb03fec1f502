//! Unified error type for the skore library.
//!
//! Bad player or team records never surface here; they are reported as
//! [`Diagnostic`](crate::rank::Diagnostic)s on the ranking instead. This type covers
//! the failures a caller has to act on.

use thiserror::Error;

use crate::source::FetchError;

/// Unified error type for all skore operations.
///
/// # Example
///
/// ```ignore
/// use skore::{rank_json, Result};
///
/// fn top_three(players: &serde_json::Value, teams: &serde_json::Value) -> Result<Vec<i64>> {
///     Ok(rank_json(players, teams, 3)?.team_ids())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A collection handed to the engine was not a JSON array of records.
    #[error("Invalid {collection} collection: {reason}")]
    InvalidShape {
        collection: &'static str,
        reason: String,
    },

    /// The player or team collection could not be obtained.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if the input collections had the wrong shape.
    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, Self::InvalidShape { .. })
    }
}
