//! Ties the automatic cascade cannot break, and the manual decisions that break them.

use serde::{Deserialize, Serialize};

use super::{TeamId, TeamStats, TieSignature};

/// Teams still level after every automatic criterion.
///
/// Not an error: the caller is expected to ask the user for an order and
/// pass it back as a [`TiebreakerDecision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvableTie {
    pub teams: Vec<TeamStats>,
    pub reason: String,
}

impl UnresolvableTie {
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|s| s.team_id).collect()
    }
}

/// A user-chosen order over exactly the teams of one tied set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakerDecision {
    /// Signature of the tied set this decision was made for
    pub signature: TieSignature,

    /// Best team first
    pub order: Vec<TeamId>,
}

impl TiebreakerDecision {
    pub fn new(order: Vec<TeamId>) -> Self {
        Self {
            signature: TieSignature::generate(&order),
            order,
        }
    }

    /// True when this decision was made for exactly this set of teams.
    pub fn covers(&self, team_ids: &[TeamId]) -> bool {
        self.signature == TieSignature::generate(team_ids)
            && team_ids.len() == self.order.len()
            && team_ids.iter().all(|id| self.order.contains(id))
    }

    /// Rank of a team within the decision, best first.
    pub fn rank_of(&self, team: TeamId) -> Option<usize> {
        self.order.iter().position(|&t| t == team)
    }

    pub fn has_duplicates(&self) -> bool {
        let mut ids = self.order.clone();
        ids.sort();
        ids.dedup();
        ids.len() != self.order.len()
    }
}
