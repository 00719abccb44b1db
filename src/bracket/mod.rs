//! Knockout bracket resolution.
//!
//! Slots resolve lazily from group results, the chosen third-place
//! combination and recorded match winners. Recording a different winner, or
//! any upstream change, removes every downstream prediction that depended on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{
    Advance, BracketTopology, GroupLetter, KnockoutPrediction, MatchId, Round, Side, SlotSource,
    TeamId,
};

/// Misuse of the bracket by the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("Unknown match {0}")]
    UnknownMatch(MatchId),

    #[error("Match {0} does not have both teams yet")]
    MatchNotReady(MatchId),

    #[error("Team {team} does not play in match {match_id}")]
    TeamNotInMatch { match_id: MatchId, team: TeamId },
}

/// Group-stage lookups the bracket needs; implemented by the resolution facade.
pub trait GroupSlots {
    /// Team finishing at zero-based `index` of `group`, with playoff
    /// placeholders already replaced by their chosen winner.
    fn group_team(&self, group: GroupLetter, index: usize) -> Option<TeamId>;

    /// Third-placed team of `group` as a best-third qualifier. Stricter than
    /// position 3 when the group still has an open tie elsewhere.
    fn third_place_team(&self, group: GroupLetter) -> Option<TeamId> {
        self.group_team(group, 2)
    }

    /// Group whose third-placed team the chosen combination puts in `slot`.
    fn third_place_group(&self, slot: &str) -> Option<GroupLetter>;
}

/// Lifecycle of a single knockout match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot is not known yet
    Unavailable,
    /// Both teams known, no winner chosen
    Ready,
    /// Winner chosen
    Decided,
}

/// Resolved view of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: Round,
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
    pub winner: Option<TeamId>,
    pub state: MatchState,
}

/// Resolved slot pairs of every match, taken before an upstream change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSnapshot(BTreeMap<MatchId, (Option<TeamId>, Option<TeamId>)>);

/// The bracket evaluated against one group-stage outcome.
pub struct BracketGraph<'a, G: GroupSlots + ?Sized> {
    topology: &'a BracketTopology,
    groups: &'a G,
}

impl<'a, G: GroupSlots + ?Sized> BracketGraph<'a, G> {
    pub fn new(topology: &'a BracketTopology, groups: &'a G) -> Self {
        Self { topology, groups }
    }

    /// Team currently occupying one slot of a match.
    pub fn resolve_slot(
        &self,
        prediction: &KnockoutPrediction,
        id: MatchId,
        side: Side,
    ) -> Option<TeamId> {
        let m = self.topology.get(id)?;
        self.resolve_source(prediction, m.source(side))
    }

    fn resolve_source(&self, prediction: &KnockoutPrediction, source: &SlotSource) -> Option<TeamId> {
        match source {
            SlotSource::Group { group, rank } => self.groups.group_team(*group, rank.index()),
            SlotSource::ThirdPlace { slot, pool } => {
                let group = self.groups.third_place_group(slot)?;
                if !pool.contains(&group) {
                    return None;
                }
                self.groups.third_place_team(group)
            }
            SlotSource::Match {
                from,
                position: Advance::Winner,
            } => prediction.winner(*from),
            SlotSource::Match {
                from,
                position: Advance::Loser,
            } => self.loser(prediction, *from),
        }
    }

    fn pair(&self, prediction: &KnockoutPrediction, id: MatchId) -> (Option<TeamId>, Option<TeamId>) {
        (
            self.resolve_slot(prediction, id, Side::A),
            self.resolve_slot(prediction, id, Side::B),
        )
    }

    /// Recorded winner of a match.
    pub fn winner(&self, prediction: &KnockoutPrediction, id: MatchId) -> Option<TeamId> {
        prediction.winner(id)
    }

    /// The team that did not win; needs both slots and the winner.
    pub fn loser(&self, prediction: &KnockoutPrediction, id: MatchId) -> Option<TeamId> {
        let (Some(a), Some(b)) = self.pair(prediction, id) else {
            return None;
        };
        match prediction.winner(id)? {
            w if w == a => Some(b),
            w if w == b => Some(a),
            _ => None,
        }
    }

    pub fn state(&self, prediction: &KnockoutPrediction, id: MatchId) -> MatchState {
        match self.pair(prediction, id) {
            (Some(a), Some(b)) => match prediction.winner(id) {
                Some(w) if w == a || w == b => MatchState::Decided,
                _ => MatchState::Ready,
            },
            _ => MatchState::Unavailable,
        }
    }

    /// Every match in topological order, resolved.
    pub fn views(&self, prediction: &KnockoutPrediction) -> Vec<MatchView> {
        self.topology
            .matches()
            .iter()
            .map(|m| {
                let (team_a, team_b) = self.pair(prediction, m.id);
                MatchView {
                    id: m.id,
                    round: m.round,
                    team_a,
                    team_b,
                    winner: prediction.winner(m.id),
                    state: self.state(prediction, m.id),
                }
            })
            .collect()
    }

    pub fn decided_count(&self, prediction: &KnockoutPrediction) -> usize {
        self.topology
            .matches()
            .iter()
            .filter(|m| self.state(prediction, m.id) == MatchState::Decided)
            .count()
    }

    /// Record `team` as the winner of `id`.
    ///
    /// Returns the downstream matches whose predictions were removed. Picking
    /// the winner already on record changes nothing.
    pub fn select_winner(
        &self,
        prediction: &mut KnockoutPrediction,
        id: MatchId,
        team: TeamId,
    ) -> Result<Vec<MatchId>, BracketError> {
        if self.topology.get(id).is_none() {
            return Err(BracketError::UnknownMatch(id));
        }
        let (Some(a), Some(b)) = self.pair(prediction, id) else {
            return Err(BracketError::MatchNotReady(id));
        };
        if team != a && team != b {
            return Err(BracketError::TeamNotInMatch { match_id: id, team });
        }

        let previous = prediction.record(id, team);
        if previous == Some(team) {
            debug!("{}: winner {} unchanged", id, team);
            return Ok(Vec::new());
        }

        let cleared = self.clear_descendants(prediction, id);
        info!(
            "{}: winner {} recorded, {} downstream predictions cleared",
            id,
            team,
            cleared.len()
        );
        Ok(cleared)
    }

    /// Remove the winner of `id` and everything downstream of it.
    pub fn clear_winner(
        &self,
        prediction: &mut KnockoutPrediction,
        id: MatchId,
    ) -> Result<Vec<MatchId>, BracketError> {
        if self.topology.get(id).is_none() {
            return Err(BracketError::UnknownMatch(id));
        }
        let mut cleared = Vec::new();
        if prediction.remove(id).is_some() {
            cleared.push(id);
        }
        cleared.extend(self.clear_descendants(prediction, id));
        cleared.sort();
        Ok(cleared)
    }

    /// Delete predictions of every transitive dependent of `id`.
    fn clear_descendants(&self, prediction: &mut KnockoutPrediction, id: MatchId) -> Vec<MatchId> {
        let mut cleared: Vec<MatchId> = self
            .topology
            .descendants(id)
            .into_iter()
            .filter(|&d| prediction.remove(d).is_some())
            .collect();
        cleared.sort();
        for d in &cleared {
            debug!("{}: prediction cleared after change in {}", d, id);
        }
        cleared
    }

    pub fn snapshot(&self, prediction: &KnockoutPrediction) -> SlotSnapshot {
        SlotSnapshot(
            self.topology
                .matches()
                .iter()
                .map(|m| (m.id, self.pair(prediction, m.id)))
                .collect(),
        )
    }

    /// Drop predictions invalidated by an upstream change.
    ///
    /// `before` must be taken from the same predictions under the previous
    /// group-stage outcome. A prediction is dropped, with its descendants, when
    /// its match's slot pair differs from `before` or no longer holds the winner.
    pub fn reconcile(&self, prediction: &mut KnockoutPrediction, before: &SlotSnapshot) -> Vec<MatchId> {
        let mut cleared = Vec::new();

        for m in self.topology.matches() {
            let Some(winner) = prediction.winner(m.id) else {
                continue;
            };
            let now = self.pair(prediction, m.id);
            let unchanged = before.0.get(&m.id) == Some(&now);
            let winner_present = now.0 == Some(winner) || now.1 == Some(winner);
            if unchanged && winner_present {
                continue;
            }

            prediction.remove(m.id);
            cleared.push(m.id);
            cleared.extend(self.clear_descendants(prediction, m.id));
        }

        cleared.sort();
        cleared.dedup();
        if !cleared.is_empty() {
            info!("Upstream change cleared {} knockout predictions", cleared.len());
        }
        cleared
    }
}
