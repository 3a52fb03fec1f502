//! Aggregation of player scores into team totals and top-N ranking.
//!
//! A ranking run never fails on bad data: unusable players are skipped and every
//! skip is reported as a [`Diagnostic`] on the returned [`Ranking`]. The only error
//! is [`Error::InvalidShape`], raised by [`rank_json`] when a collection is not a
//! JSON array of records at all.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::logging::{debug, info, warn};
use crate::score::{self, ScoreError};
use crate::select::select_top;
use crate::types::{AccountId, Player, Team, TeamId, TeamScore};

/// A recoverable problem noticed while ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The requested team count was below one.
    InvalidTopN { requested: i64 },
    /// One of the input collections was empty.
    MissingInput { players: usize, teams: usize },
    /// A player without a positive account or team id.
    InvalidPlayer {
        account_id: Option<AccountId>,
        team_id: Option<TeamId>,
    },
    /// A player whose history time could not be scored.
    InvalidHistoryTime {
        account_id: AccountId,
        error: ScoreError,
    },
}

/// Result of a ranking run.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Selected teams, highest score first.
    pub teams: Vec<TeamScore>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Ranking {
    /// Team ids in ranked order.
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.team_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Per-team aggregate for a single ranking run, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TeamScores {
    entries: HashMap<TeamId, TeamScore>,
    order: Vec<TeamId>,
    diagnostics: Vec<Diagnostic>,
}

impl TeamScores {
    /// Aggregate players, scoring each against the clock at the moment it is read.
    pub fn from_players(players: &[Player]) -> Self {
        Self::build(players, score::score)
    }

    /// Aggregate players against a fixed reference instant.
    pub fn from_players_at(players: &[Player], now: NaiveDateTime) -> Self {
        Self::build(players, |t| score::score_at(t, now))
    }

    fn build<F>(players: &[Player], score_fn: F) -> Self
    where
        F: Fn(Option<&str>) -> std::result::Result<i64, ScoreError>,
    {
        let mut scores = Self::default();
        for player in players {
            let (account_id, team_id) = match (player.account_id, player.team_id) {
                (Some(a), Some(t)) if a > 0 && t > 0 => (a, t),
                (account_id, team_id) => {
                    debug!(?account_id, ?team_id, "excluding invalid player");
                    scores
                        .diagnostics
                        .push(Diagnostic::InvalidPlayer { account_id, team_id });
                    continue;
                }
            };

            let xp = match score_fn(player.full_history_time.as_deref()) {
                Ok(xp) => xp,
                Err(error) => {
                    debug!(account_id, %error, "excluding player with invalid history time");
                    scores
                        .diagnostics
                        .push(Diagnostic::InvalidHistoryTime { account_id, error });
                    continue;
                }
            };

            scores.entry(team_id).add_player(player, xp);
        }
        scores
    }

    fn entry(&mut self, team_id: TeamId) -> &mut TeamScore {
        let order = &mut self.order;
        self.entries.entry(team_id).or_insert_with(|| {
            order.push(team_id);
            TeamScore::new(team_id)
        })
    }

    /// Copy metadata from team records onto teams that already have players.
    pub fn merge_teams(&mut self, teams: &[Team]) {
        for team in teams {
            let Some(team_id) = team.team_id.filter(|id| *id > 0) else {
                continue;
            };
            if let Some(entry) = self.entries.get_mut(&team_id) {
                entry.apply_team(team);
            }
        }
    }

    pub fn get(&self, team_id: TeamId) -> Option<&TeamScore> {
        self.entries.get(&team_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in the order their first valid player was seen.
    pub fn iter(&self) -> impl Iterator<Item = &TeamScore> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Diagnostics raised while aggregating players.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Ids of the `n` highest scoring teams.
    pub fn top_ids(&self, n: usize) -> Vec<TeamId> {
        let pairs: Vec<(TeamId, i64)> = self.iter().map(|t| (t.team_id, t.xp)).collect();
        select_top(&pairs, n)
    }

    /// Consume the aggregate, keeping only the `n` highest scoring teams.
    pub fn into_ranking(mut self, n: usize) -> Ranking {
        let teams = self
            .top_ids(n)
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect();
        Ranking {
            teams,
            diagnostics: self.diagnostics,
        }
    }
}

/// Rank teams by the combined score of their players.
pub fn rank(players: &[Player], teams: &[Team], top_n: i64) -> Ranking {
    rank_with(players, teams, top_n, TeamScores::from_players)
}

/// [`rank`] with every player scored against `now`.
pub fn rank_at(players: &[Player], teams: &[Team], top_n: i64, now: NaiveDateTime) -> Ranking {
    rank_with(players, teams, top_n, |p| TeamScores::from_players_at(p, now))
}

fn rank_with<F>(players: &[Player], teams: &[Team], top_n: i64, aggregate: F) -> Ranking
where
    F: FnOnce(&[Player]) -> TeamScores,
{
    info!(top_n, players = players.len(), teams = teams.len(), "ranking teams");

    let n = match usize::try_from(top_n) {
        Ok(n) if n >= 1 => n,
        _ => {
            warn!(top_n, "requested team count must be at least 1");
            return Ranking {
                teams: Vec::new(),
                diagnostics: vec![Diagnostic::InvalidTopN { requested: top_n }],
            };
        }
    };

    if players.is_empty() || teams.is_empty() {
        warn!(
            players = players.len(),
            teams = teams.len(),
            "players or teams collection is empty"
        );
        return Ranking {
            teams: Vec::new(),
            diagnostics: vec![Diagnostic::MissingInput {
                players: players.len(),
                teams: teams.len(),
            }],
        };
    }

    let mut scores = aggregate(players);
    scores.merge_teams(teams);
    scores.into_ranking(n)
}

/// Rank from raw JSON documents.
///
/// Both documents must be JSON arrays of objects; anything else is a caller error.
pub fn rank_json(players: &Value, teams: &Value, top_n: i64) -> Result<Ranking> {
    let players: Vec<Player> = records("players", players)?;
    let teams: Vec<Team> = records("teams", teams)?;
    Ok(rank(&players, &teams, top_n))
}

pub(crate) fn records<T>(collection: &'static str, value: &Value) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let items = value.as_array().ok_or_else(|| Error::InvalidShape {
        collection,
        reason: "expected a JSON array".to_string(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(Error::InvalidShape {
                    collection,
                    reason: format!("element {} is not an object", index),
                });
            }
            T::deserialize(item).map_err(|e| Error::InvalidShape {
                collection,
                reason: format!("element {}: {}", index, e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn player(account_id: i64, team_id: i64, time: &str) -> Player {
        Player {
            account_id: Some(account_id),
            team_id: Some(team_id),
            full_history_time: Some(time.to_string()),
            personaname: Some(format!("test{}", account_id)),
            country_code: Some("cn".to_string()),
        }
    }

    fn team(team_id: i64, name: &str, wins: i64, losses: i64, rating: f64) -> Team {
        Team {
            team_id: Some(team_id),
            name: Some(name.to_string()),
            rating: Some(rating),
            wins: Some(wins),
            losses: Some(losses),
        }
    }

    fn sample_players() -> Vec<Player> {
        vec![
            player(1, 101, "2010-01-27T19:29:34.335Z"),
            player(2, 102, "2010-01-27T19:29:34.335Z"),
            player(3, 102, "2015-01-27T19:29:34.335Z"),
            player(4, 103, "2020-01-27T19:29:34.335Z"),
        ]
    }

    fn sample_teams() -> Vec<Team> {
        vec![
            team(101, "test101", 1, 3, 1.1),
            team(102, "test102", 2, 2, 1.2),
            team(103, "test103", 3, 1, 1.3),
        ]
    }

    fn reference_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_top_teams() {
        let players = sample_players();
        let teams = sample_teams();
        assert!(rank(&players, &teams, 0).team_ids().is_empty());
        assert_eq!(rank(&players, &teams, 1).team_ids(), vec![102]);
        assert_eq!(rank(&players, &teams, 2).team_ids(), vec![102, 101]);
        assert_eq!(rank(&players, &teams, 3).team_ids(), vec![102, 101, 103]);
        assert_eq!(rank(&players, &teams, 10).team_ids(), vec![102, 101, 103]);
    }

    #[test]
    fn test_ranked_entries_carry_players_and_metadata() {
        let now = reference_now();
        let ranking = rank_at(&sample_players(), &sample_teams(), 1, now);
        let top = ranking.teams.first().unwrap();

        let xp2 = score::score_at(Some("2010-01-27T19:29:34.335Z"), now).unwrap();
        let xp3 = score::score_at(Some("2015-01-27T19:29:34.335Z"), now).unwrap();
        assert_eq!(top.team_id, 102);
        assert_eq!(top.name, "test102");
        assert_eq!((top.wins, top.losses), (2, 2));
        assert_eq!(top.rating, 1.2);
        assert_eq!(top.xp, xp2 + xp3);
        assert_eq!(top.players.len(), 2);
        assert_eq!(top.players.first().unwrap().personaname.as_deref(), Some("test2"));
        assert!(ranking.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_top_n_returns_empty() {
        for n in [0, -1, -100] {
            let ranking = rank(&sample_players(), &sample_teams(), n);
            assert!(ranking.is_empty());
            assert_eq!(
                ranking.diagnostics,
                vec![Diagnostic::InvalidTopN { requested: n }]
            );
        }
    }

    #[test]
    fn test_empty_collections_return_empty() {
        assert!(rank(&[], &sample_teams(), 3).is_empty());
        assert!(rank(&sample_players(), &[], 3).is_empty());
        let ranking = rank(&[], &[], 1);
        assert_eq!(
            ranking.diagnostics,
            vec![Diagnostic::MissingInput { players: 0, teams: 0 }]
        );
    }

    #[test]
    fn test_non_positive_ids_are_excluded() {
        let players = vec![
            player(0, 101, "2010-01-27T19:29:34.335Z"),
            player(-5, 102, "2010-01-27T19:29:34.335Z"),
            player(3, 0, "2010-01-27T19:29:34.335Z"),
            player(4, -7, "2010-01-27T19:29:34.335Z"),
            Player {
                account_id: None,
                ..player(5, 104, "2010-01-27T19:29:34.335Z")
            },
            player(6, 105, "2019-01-27T19:29:34.335Z"),
        ];
        let scores = TeamScores::from_players_at(&players, reference_now());
        assert_eq!(scores.len(), 1);
        assert!(scores.get(105).is_some());
        assert_eq!(scores.diagnostics().len(), 5);
        assert!(scores
            .diagnostics()
            .iter()
            .all(|d| matches!(d, Diagnostic::InvalidPlayer { .. })));
    }

    #[test]
    fn test_invalid_history_time_excludes_only_that_player() {
        let mut players = sample_players();
        players.push(player(9, 101, "not a time"));
        players.push(Player {
            full_history_time: None,
            ..player(10, 106, "")
        });
        let scores = TeamScores::from_players_at(&players, reference_now());

        assert_eq!(scores.get(101).unwrap().players.len(), 1);
        assert!(scores.get(106).is_none());
        assert_eq!(scores.diagnostics().len(), 2);
        assert!(matches!(
            scores.diagnostics().first(),
            Some(Diagnostic::InvalidHistoryTime { account_id: 9, .. })
        ));
    }

    #[test]
    fn test_team_metadata_only_attaches_to_scored_teams() {
        let mut teams = sample_teams();
        teams.push(team(999, "ghost", 50, 0, 9.9));
        teams.push(team(-101, "negative", 50, 0, 9.9));

        let mut scores = TeamScores::from_players_at(&sample_players(), reference_now());
        scores.merge_teams(&teams);

        assert_eq!(scores.len(), 3);
        assert!(scores.get(999).is_none());
        assert_eq!(scores.get(101).unwrap().name, "test101");
    }

    #[test]
    fn test_unmatched_team_keeps_defaults() {
        let mut scores = TeamScores::from_players_at(&sample_players(), reference_now());
        scores.merge_teams(&[team(101, "only", 1, 1, 1.0)]);
        let untouched = scores.get(103).unwrap();
        assert_eq!(untouched.name, "");
        assert_eq!((untouched.wins, untouched.losses), (0, 0));
        assert_eq!(untouched.rating, 0.0);
    }

    #[test]
    fn test_iteration_follows_first_seen_player() {
        let players = vec![
            player(1, 30, "2010-01-27T19:29:34.335Z"),
            player(2, 10, "2010-01-27T19:29:34.335Z"),
            player(3, 30, "2010-01-27T19:29:34.335Z"),
            player(4, 20, "2010-01-27T19:29:34.335Z"),
        ];
        let scores = TeamScores::from_players_at(&players, reference_now());
        let order: Vec<TeamId> = scores.iter().map(|t| t.team_id).collect();
        assert_eq!(order, vec![30, 10, 20]);
    }

    #[test]
    fn test_all_players_invalid_yields_no_teams() {
        let players = vec![player(1, 101, "bad"), player(0, 102, "2010-01-27T19:29:34.335Z")];
        for n in [1, 2, 5] {
            assert!(rank(&players, &sample_teams(), n).is_empty());
        }
    }

    #[test]
    fn test_future_only_teams_still_rank() {
        let now = reference_now();
        let players = vec![
            player(1, 1, "2030-01-01T00:00:00.000Z"),
            player(2, 2, "2025-01-01T00:00:00.000Z"),
        ];
        let teams = vec![team(1, "a", 0, 0, 0.0), team(2, "b", 0, 0, 0.0)];
        assert_eq!(rank_at(&players, &teams, 1, now).team_ids(), vec![2]);
        assert_eq!(rank_at(&players, &teams, 2, now).team_ids(), vec![2, 1]);
    }

    #[test]
    fn test_rank_json_reads_opendota_payloads() {
        let players = json!([
            { "account_id": 1, "personaname": "test1", "full_history_time": "2010-01-27T19:29:34.335Z",
              "country_code": "cn", "team_id": 101 },
            { "account_id": 2, "personaname": null, "full_history_time": 0,
              "country_code": "cn", "team_id": 102 },
            { "account_id": 3, "team_id": null }
        ]);
        let teams = json!([{ "team_id": 101, "rating": 1.1, "wins": 1, "losses": 3, "name": "test101" }]);

        let ranking = rank_json(&players, &teams, 5).unwrap();
        assert_eq!(ranking.team_ids(), vec![101]);
        assert_eq!(ranking.diagnostics.len(), 2);
    }

    #[test]
    fn test_rank_json_rejects_wrong_shapes() {
        let teams = json!([]);
        for players in [json!({"account_id": 1}), json!("players"), json!([1, 2, 3]), json!(null)] {
            let err = rank_json(&players, &teams, 1).unwrap_err();
            assert!(matches!(err, Error::InvalidShape { collection: "players", .. }));
        }
        let err = rank_json(&json!([]), &json!(42), 1).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { collection: "teams", .. }));
    }

    #[test]
    fn test_rank_json_with_empty_arrays_is_not_an_error() {
        let ranking = rank_json(&json!([]), &json!([]), 3).unwrap();
        assert!(ranking.is_empty());
    }
}
