//! Common test utilities and fixtures.
//!
//! Shared player/team payloads, a test application wrapping the router, and a
//! throwaway upstream server that imitates the OpenDota endpoints.

#![cfg(feature = "server")]
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use axum_test::TestServer;
use serde_json::{Value, json};
use skore::server::{AppState, router};
use skore::{DataSource, FetchError, Player, StaticSource, Team};

// =============================================================================
// Payloads
// =============================================================================

/// Four players across three teams. Team 102 has the longest combined history,
/// then 101, then 103.
pub fn players_json() -> Value {
    json!([
        { "account_id": 1, "personaname": "test1", "full_history_time": "2010-01-27T19:29:34.335Z",
          "country_code": "cn", "team_id": 101 },
        { "account_id": 2, "personaname": "test2", "full_history_time": "2010-01-27T19:29:34.335Z",
          "country_code": "cn", "team_id": 102 },
        { "account_id": 3, "personaname": "test3", "full_history_time": "2015-01-27T19:29:34.335Z",
          "country_code": "cn", "team_id": 102 },
        { "account_id": 4, "personaname": "test4", "full_history_time": "2020-01-27T19:29:34.335Z",
          "country_code": "cn", "team_id": 103 }
    ])
}

pub fn teams_json() -> Value {
    json!([
        { "team_id": 101, "rating": 1.1, "wins": 1, "losses": 3, "name": "test101" },
        { "team_id": 102, "rating": 1.2, "wins": 2, "losses": 2, "name": "test102" },
        { "team_id": 103, "rating": 1.3, "wins": 3, "losses": 1, "name": "test103" }
    ])
}

pub fn sample_source() -> anyhow::Result<StaticSource> {
    Ok(StaticSource::from_json(&players_json(), &teams_json())?)
}

/// Team ids of a JSON array of aggregate entries.
pub fn team_ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|teams| teams.iter().filter_map(|t| t["team_id"].as_i64()).collect())
        .unwrap_or_default()
}

// =============================================================================
// Test Application
// =============================================================================

/// A source that is always unreachable.
pub struct DownSource;

#[async_trait]
impl DataSource for DownSource {
    async fn players(&self) -> Result<Vec<Player>, FetchError> {
        Err(FetchError::Status {
            url: "http://upstream/proPlayers".into(),
            status: 503,
        })
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        "down".into()
    }
}

/// Test application wrapping the API router.
pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    /// Application serving the sample payloads with the default count of 5.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_source(sample_source()?, 5)
    }

    pub fn with_source(source: impl DataSource + 'static, default_count: i64) -> anyhow::Result<Self> {
        let state = AppState::with_source(source, default_count);
        let server = TestServer::new(router(state))?;
        Ok(Self { server })
    }
}

// =============================================================================
// Fake Upstream
// =============================================================================

/// A local HTTP server standing in for the OpenDota API.
pub struct FakeUpstream {
    pub base_url: String,
    pub player_hits: Arc<AtomicUsize>,
    pub team_hits: Arc<AtomicUsize>,
    _task: tokio::task::JoinHandle<()>,
}

/// What the fake `proPlayers` endpoint answers.
#[derive(Clone)]
pub enum PlayersReply {
    /// Always the sample payload.
    Ok,
    /// Fail with the status this many times, then answer like `Ok`.
    FailThenOk(StatusCode, usize),
    /// Always fail with the status.
    Status(StatusCode),
    /// A body that is not JSON.
    Garbage,
    /// Valid JSON, but not an array.
    Object,
}

impl FakeUpstream {
    pub async fn start(reply: PlayersReply) -> anyhow::Result<Self> {
        let player_hits = Arc::new(AtomicUsize::new(0));
        let team_hits = Arc::new(AtomicUsize::new(0));

        let players_counter = player_hits.clone();
        let teams_counter = team_hits.clone();
        let app = Router::new()
            .route(
                "/api/proPlayers",
                get(move || {
                    let hit = players_counter.fetch_add(1, Ordering::SeqCst) + 1;
                    let reply = reply.clone();
                    async move {
                        match reply {
                            PlayersReply::Ok => Json(players_json()).into_response(),
                            PlayersReply::FailThenOk(status, failures) if hit <= failures => {
                                status.into_response()
                            }
                            PlayersReply::FailThenOk(..) => Json(players_json()).into_response(),
                            PlayersReply::Status(status) => status.into_response(),
                            PlayersReply::Garbage => "<html>busy</html>".into_response(),
                            PlayersReply::Object => Json(json!({ "error": "nope" })).into_response(),
                        }
                    }
                }),
            )
            .route(
                "/api/teams",
                get(move || {
                    teams_counter.fetch_add(1, Ordering::SeqCst);
                    async { Json(teams_json()) }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}/api", addr),
            player_hits,
            team_hits,
            _task: task,
        })
    }

    pub fn player_hits(&self) -> usize {
        self.player_hits.load(Ordering::SeqCst)
    }

    pub fn team_hits(&self) -> usize {
        self.team_hits.load(Ordering::SeqCst)
    }
}
