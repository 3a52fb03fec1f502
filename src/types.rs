//! Input records and the per-team aggregate.
//!
//! Upstream data is loosely typed: ids can be `null`, names can be missing, and a
//! history time can arrive as a number. Every field therefore deserializes leniently,
//! turning anything it cannot read into `None` instead of failing the whole
//! collection. Whether a record is usable is decided later by the ranking engine.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Team identifier as reported upstream.
pub type TeamId = i64;

/// Player identifier as reported upstream.
pub type AccountId = i64;

/// A professional player record (one element of the `proPlayers` collection).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Player {
    #[serde(default, deserialize_with = "lenient_int")]
    pub account_id: Option<AccountId>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub team_id: Option<TeamId>,

    /// Start of the player's recorded history, `YYYY-MM-DDTHH:MM:SS.fffZ`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_history_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub personaname: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub country_code: Option<String>,
}

/// A team record (one element of the `teams` collection).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Team {
    #[serde(default, deserialize_with = "lenient_int")]
    pub team_id: Option<TeamId>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_float")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub wins: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub losses: Option<i64>,
}

/// One player's contribution to a team total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personaname: Option<String>,
    pub xp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Aggregated score and metadata for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team_id: TeamId,
    pub name: String,
    pub wins: i64,
    pub losses: i64,
    pub rating: f64,
    /// Sum of the `xp` of every player in `players`.
    pub xp: i64,
    pub players: Vec<PlayerScore>,
}

impl TeamScore {
    /// An empty aggregate with neutral metadata.
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            name: String::new(),
            wins: 0,
            losses: 0,
            rating: 0.0,
            xp: 0,
            players: Vec::new(),
        }
    }

    /// Record a scored player and add its score to the total.
    pub fn add_player(&mut self, player: &Player, xp: i64) {
        self.players.push(PlayerScore {
            personaname: player.personaname.clone(),
            xp,
            country_code: player.country_code.clone(),
        });
        self.xp = self.xp.saturating_add(xp);
    }

    /// Overwrite the metadata fields from a team record.
    ///
    /// Attributes missing from the record reset to their neutral value.
    pub fn apply_team(&mut self, team: &Team) {
        self.name = team.name.clone().unwrap_or_default();
        self.wins = team.wins.unwrap_or_default();
        self.losses = team.losses.unwrap_or_default();
        self.rating = team.rating.unwrap_or_default();
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }))
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Like `lenient_string`, but numbers keep their decimal text so they can still
/// be rejected by the timestamp parser rather than silently vanishing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
