//! A user's prediction: the mutable state owned by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{GroupLetter, GroupScores, MatchId, PlayoffId, TeamId, TiebreakerDecision};

/// Per-group input: scores, or a manual finishing order, plus tie decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPrediction {
    /// Scores keyed by group match number 1..=6
    #[serde(default)]
    pub scores: GroupScores,

    /// Manual finishing order, best first; overrides scores when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_order: Option<Vec<TeamId>>,

    /// Decisions for ties the automatic criteria could not break
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiebreakers: Vec<TiebreakerDecision>,
}

/// Chosen winner per knockout match. Entries are removed, never marked stale,
/// when an upstream change invalidates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnockoutPrediction(BTreeMap<MatchId, TeamId>);

impl KnockoutPrediction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winner(&self, id: MatchId) -> Option<TeamId> {
        self.0.get(&id).copied()
    }

    /// Record a winner, returning the previous one.
    pub fn record(&mut self, id: MatchId, team: TeamId) -> Option<TeamId> {
        self.0.insert(id, team)
    }

    pub fn remove(&mut self, id: MatchId) -> Option<TeamId> {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full prediction snapshot the engine evaluates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionState {
    #[serde(default)]
    pub groups: BTreeMap<GroupLetter, GroupPrediction>,

    #[serde(default)]
    pub playoff_winners: BTreeMap<PlayoffId, TeamId>,

    /// Explicitly chosen qualifying third-place letters (order-independent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_place: Option<String>,

    #[serde(default)]
    pub knockout: KnockoutPrediction,
}

impl PredictionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, letter: GroupLetter) -> Option<&GroupPrediction> {
        self.groups.get(&letter)
    }

    pub fn group_mut(&mut self, letter: GroupLetter) -> &mut GroupPrediction {
        self.groups.entry(letter).or_default()
    }
}
