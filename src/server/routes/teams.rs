//! Top team handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::source::rank_from;
use crate::types::TeamScore;

use super::super::{error::ApiError, state::AppState};

/// Top teams using the configured default count.
pub async fn top_default(State(state): State<AppState>) -> Result<Json<Vec<TeamScore>>, ApiError> {
    let count = state.default_count();
    top_teams(&state, count).await
}

/// Top `count` teams. A count below one yields an empty list.
pub async fn top_count(
    State(state): State<AppState>,
    Path(count): Path<String>,
) -> Result<Json<Vec<TeamScore>>, ApiError> {
    let count: i64 = count
        .trim()
        .parse()
        .map_err(|_| ApiError::invalid_count(&count))?;
    top_teams(&state, count).await
}

async fn top_teams(state: &AppState, count: i64) -> Result<Json<Vec<TeamScore>>, ApiError> {
    let ranking = rank_from(state.source(), count).await.map_err(|err| {
        tracing::error!(error = %err, "upstream fetch failed");
        ApiError::from(err)
    })?;

    for diagnostic in &ranking.diagnostics {
        tracing::debug!(?diagnostic, "ranking diagnostic");
    }
    tracing::info!(
        count,
        returned = ranking.teams.len(),
        skipped = ranking.diagnostics.len(),
        "served top teams"
    );

    Ok(Json(ranking.teams))
}
