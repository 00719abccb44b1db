//! Knockout bracket topology: matches and where their team slots come from.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GroupLetter, MatchId, ReferenceError};

/// Which group finisher feeds a slot directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRank {
    Winner,
    RunnerUp,
}

impl GroupRank {
    /// Zero-based index into the ordered standings.
    pub fn index(self) -> usize {
        match self {
            GroupRank::Winner => 0,
            GroupRank::RunnerUp => 1,
        }
    }
}

/// Which team of an earlier match moves on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
    #[default]
    Winner,
    Loser,
}

/// Where one of a match's two team slots is sourced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotSource {
    /// Winner or runner-up of a group
    Group { group: GroupLetter, rank: GroupRank },

    /// A best-third-place team; the combination table decides which group
    /// from `pool` fills `slot`
    ThirdPlace { slot: String, pool: Vec<GroupLetter> },

    /// Winner (default) or loser of an earlier knockout match
    Match {
        from: MatchId,
        #[serde(default)]
        position: Advance,
    },
}

impl SlotSource {
    /// The upstream match this slot depends on, if any.
    pub fn upstream_match(&self) -> Option<MatchId> {
        match self {
            SlotSource::Match { from, .. } => Some(*from),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    RoundOf32,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    ThirdPlace,
    Final,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Round::RoundOf32 => "Round of 32",
            Round::RoundOf16 => "Round of 16",
            Round::QuarterFinal => "Quarter-final",
            Round::SemiFinal => "Semi-final",
            Round::ThirdPlace => "Third place",
            Round::Final => "Final",
        };
        write!(f, "{}", label)
    }
}

/// One of the two team slots of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Static description of one knockout match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub id: MatchId,
    pub round: Round,
    pub team_a: SlotSource,
    pub team_b: SlotSource,
}

impl KnockoutMatch {
    pub fn source(&self, side: Side) -> &SlotSource {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }
}

/// The bracket as an arena of matches plus a precomputed dependents index.
///
/// Matches are kept in definition order, and every `Match` source must point
/// at a match defined earlier, so definition order is a topological order.
#[derive(Debug, Clone)]
pub struct BracketTopology {
    matches: Vec<KnockoutMatch>,
    index: HashMap<MatchId, usize>,
    dependents: HashMap<MatchId, Vec<MatchId>>,
}

impl BracketTopology {
    pub fn new(matches: Vec<KnockoutMatch>) -> Result<Self, ReferenceError> {
        let mut index = HashMap::with_capacity(matches.len());
        let mut dependents: HashMap<MatchId, Vec<MatchId>> = HashMap::new();

        for (i, m) in matches.iter().enumerate() {
            for source in [&m.team_a, &m.team_b] {
                if let Some(from) = source.upstream_match() {
                    if !index.contains_key(&from) {
                        return Err(ReferenceError::InvalidBracket {
                            match_id: m.id,
                            reason: format!("sources {} which is not defined before it", from),
                        });
                    }
                    let entry = dependents.entry(from).or_default();
                    if !entry.contains(&m.id) {
                        entry.push(m.id);
                    }
                }
                if let SlotSource::ThirdPlace { pool, .. } = source {
                    if pool.is_empty() {
                        return Err(ReferenceError::InvalidBracket {
                            match_id: m.id,
                            reason: "third-place slot with an empty pool".to_string(),
                        });
                    }
                }
            }
            if index.insert(m.id, i).is_some() {
                return Err(ReferenceError::InvalidBracket {
                    match_id: m.id,
                    reason: "duplicate match id".to_string(),
                });
            }
        }

        Ok(Self {
            matches,
            index,
            dependents,
        })
    }

    /// All matches in topological order.
    pub fn matches(&self) -> &[KnockoutMatch] {
        &self.matches
    }

    pub fn get(&self, id: MatchId) -> Option<&KnockoutMatch> {
        self.index.get(&id).map(|&i| &self.matches[i])
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches with a slot sourced directly from `id`.
    pub fn dependents(&self, id: MatchId) -> &[MatchId] {
        self.dependents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every match downstream of `id`, excluding `id` itself.
    pub fn descendants(&self, id: MatchId) -> Vec<MatchId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<MatchId> = self.dependents(id).to_vec();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            stack.extend(self.dependents(current).iter().copied());
        }
        order
    }

    /// Third-place slot identifiers used anywhere in the bracket.
    pub fn third_place_slots(&self) -> impl Iterator<Item = &str> {
        self.matches
            .iter()
            .flat_map(|m| [&m.team_a, &m.team_b])
            .filter_map(|source| match source {
                SlotSource::ThirdPlace { slot, .. } => Some(slot.as_str()),
                _ => None,
            })
    }
}
