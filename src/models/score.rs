//! Group match scores and the fixed round-robin schedule.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of matches in a four-team round robin.
pub const GROUP_MATCH_COUNT: u8 = 6;

/// Schedule positions (1-based) playing each group match number 1..=6.
pub const GROUP_SCHEDULE: [(usize, usize); 6] = [(1, 2), (3, 4), (1, 3), (2, 4), (4, 1), (2, 3)];

/// Scores keyed by group match number.
pub type GroupScores = BTreeMap<u8, MatchScore>;

/// Positions playing the given match number, or None outside 1..=6.
pub fn schedule_pair(match_number: u8) -> Option<(usize, usize)> {
    match match_number {
        1..=GROUP_MATCH_COUNT => Some(GROUP_SCHEDULE[(match_number - 1) as usize]),
        _ => None,
    }
}

/// A predicted group match score. Either side may be unset while the
/// user is still entering results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    #[serde(default, deserialize_with = "lenient_goals")]
    pub goals_a: Option<u32>,

    #[serde(default, deserialize_with = "lenient_goals")]
    pub goals_b: Option<u32>,
}

impl MatchScore {
    pub fn new(goals_a: u32, goals_b: u32) -> Self {
        Self {
            goals_a: Some(goals_a),
            goals_b: Some(goals_b),
        }
    }

    /// Build a score from raw form input. Empty or non-numeric text counts as unset.
    pub fn from_raw(goals_a: &str, goals_b: &str) -> Self {
        Self {
            goals_a: parse_goals(goals_a),
            goals_b: parse_goals(goals_b),
        }
    }

    /// Both goal values, if the match has been fully predicted.
    pub fn goals(&self) -> Option<(u32, u32)> {
        Some((self.goals_a?, self.goals_b?))
    }

    pub fn is_complete(&self) -> bool {
        self.goals().is_some()
    }
}

fn parse_goals(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}

/// Goals arrive as numbers, numeric strings, empty strings or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGoals {
    Number(u32),
    Text(String),
}

fn lenient_goals<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawGoals> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawGoals::Number(n)) => Ok(Some(n)),
        Some(RawGoals::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawGoals::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid goal value '{}'", s))),
    }
}
