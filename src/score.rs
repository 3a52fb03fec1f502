//! Player score: whole seconds elapsed since the start of a player's history.

use chrono::{NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;

/// Date and time part of a history timestamp; the fraction and `Z` are checked by hand.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Byte layout of `YYYY-MM-DDTHH:MM:SS`. `0` marks an ASCII digit.
const DATE_TIME_SHAPE: &[u8; 19] = b"0000-00-00T00:00:00";

/// Most fractional digits accepted after the seconds.
const MAX_FRACTION_DIGITS: usize = 6;

/// Errors produced while scoring a single timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScoreError {
    #[error("Invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp { input: Option<String>, reason: String },
}

impl ScoreError {
    fn invalid(input: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            input: input.map(str::to_string),
            reason: reason.into(),
        }
    }
}

/// Score a history start time against the current UTC time.
///
/// The result is negative when `timestamp` lies in the future.
pub fn score(timestamp: Option<&str>) -> Result<i64, ScoreError> {
    score_at(timestamp, Utc::now().naive_utc())
}

/// Score a history start time against an explicit reference instant.
pub fn score_at(timestamp: Option<&str>, now: NaiveDateTime) -> Result<i64, ScoreError> {
    let start = parse_history_time(timestamp)?;
    Ok((now - start).num_seconds())
}

/// Parse `YYYY-MM-DDTHH:MM:SS.fffZ` (1 to 6 fractional digits) as a UTC instant.
pub fn parse_history_time(timestamp: Option<&str>) -> Result<NaiveDateTime, ScoreError> {
    let text = match timestamp {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ScoreError::invalid(timestamp, "timestamp is empty")),
    };

    // chrono tolerates short or signed years and leading spaces, so the layout is
    // checked byte by byte first.
    let split = DATE_TIME_SHAPE.len();
    let (date_time, rest) = match (text.get(..split), text.get(split..)) {
        (Some(head), Some(rest)) if has_date_time_shape(head) => (head, rest),
        _ => {
            return Err(ScoreError::invalid(
                timestamp,
                "expected `YYYY-MM-DDTHH:MM:SS` date and time",
            ));
        }
    };

    let date_time = NaiveDateTime::parse_from_str(date_time, DATE_TIME_FORMAT)
        .map_err(|e| ScoreError::invalid(timestamp, e.to_string()))?;

    let digits = rest
        .strip_prefix('.')
        .and_then(|r| r.strip_suffix('Z'))
        .ok_or_else(|| ScoreError::invalid(timestamp, "expected `.<fraction>Z` suffix"))?;

    if digits.is_empty()
        || digits.len() > MAX_FRACTION_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ScoreError::invalid(timestamp, "malformed fractional seconds"));
    }

    let nanos = format!("{digits:0<9}")
        .parse::<u32>()
        .map_err(|e| ScoreError::invalid(timestamp, e.to_string()))?;

    date_time
        .with_nanosecond(nanos)
        .ok_or_else(|| ScoreError::invalid(timestamp, "fractional seconds out of range"))
}

fn has_date_time_shape(head: &str) -> bool {
    head.len() == DATE_TIME_SHAPE.len()
        && head
            .bytes()
            .zip(DATE_TIME_SHAPE.iter())
            .all(|(byte, &expected)| match expected {
                b'0' => byte.is_ascii_digit(),
                _ => byte == expected,
            })
}
