//! Read side of the facade: everything derivable from one prediction snapshot.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bracket::{BracketGraph, GroupSlots, MatchView, SlotSnapshot};
use crate::calculate::{GroupStandings, ThirdPlaceStatus};
use crate::models::{
    GroupLetter, KnockoutPrediction, MatchId, Side, TeamId, TeamStats, ThirdPlaceCombination,
};

use super::Predictor;

/// Any addressable team position in the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    /// 1-based finishing position in a group
    GroupPosition { group: GroupLetter, position: usize },
    MatchSlot { id: MatchId, side: Side },
    MatchWinner(MatchId),
    MatchLoser(MatchId),
}

/// How one group finished under the prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub group: GroupLetter,

    /// Best first, playoff placeholders replaced by their chosen winner
    pub order: Vec<TeamId>,

    /// None when the group is predicted by a manual order
    pub standings: Option<GroupStandings>,

    /// Final order is known: a manual order, or complete scores with no open tie
    pub settled: bool,
}

impl GroupOutcome {
    pub fn is_manual(&self) -> bool {
        self.standings.is_none()
    }

    /// Team at zero-based `index` once that place is final. In a complete
    /// group with an open tie, places outside the tied teams are final.
    pub fn decided_team(&self, index: usize) -> Option<TeamId> {
        if self.settled {
            return self.order.get(index).copied();
        }
        self.standings.as_ref()?.decided_at(index + 1)
    }

    /// Stat line of the third-placed team, once the group is settled by scores.
    pub fn third_place_stats(&self) -> Option<TeamStats> {
        if !self.settled {
            return None;
        }
        self.standings.as_ref()?.at_position(3).cloned()
    }
}

/// `done` out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub groups: Progress,
    pub playoffs: Progress,
    pub third_place: Progress,
    pub knockout: Progress,
}

impl Completeness {
    pub fn is_complete(&self) -> bool {
        self.groups.is_complete()
            && self.playoffs.is_complete()
            && self.third_place.is_complete()
            && self.knockout.is_complete()
    }
}

/// A prediction evaluated against the reference data.
///
/// Holds its own copy of the knockout picks, so the prediction it came from
/// can be mutated while the evaluation is alive.
pub struct Evaluation<'p> {
    pub(super) predictor: &'p Predictor,
    pub(super) groups: BTreeMap<GroupLetter, GroupOutcome>,
    pub(super) third_place: ThirdPlaceStatus,
    pub(super) combination: Option<ThirdPlaceCombination>,
    pub(super) knockout: KnockoutPrediction,
    pub(super) playoffs_selected: usize,
    pub(super) pending_placeholders: HashSet<TeamId>,
}

impl<'p> Evaluation<'p> {
    pub fn group(&self, letter: GroupLetter) -> Option<&GroupOutcome> {
        self.groups.get(&letter)
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups.values()
    }

    pub fn third_place(&self) -> &ThirdPlaceStatus {
        &self.third_place
    }

    /// The combination driving third-place bracket slots, if any.
    pub fn combination(&self) -> Option<&ThirdPlaceCombination> {
        self.combination.as_ref()
    }

    pub fn graph(&self) -> BracketGraph<'_, Self> {
        BracketGraph::new(self.predictor.reference().topology(), self)
    }

    pub fn matches(&self) -> Vec<MatchView> {
        self.graph().views(&self.knockout)
    }

    pub(super) fn snapshot(&self) -> SlotSnapshot {
        self.graph().snapshot(&self.knockout)
    }

    /// Team at any slot, or None while it cannot be determined yet.
    pub fn team_at(&self, slot: SlotRef) -> Option<TeamId> {
        match slot {
            SlotRef::GroupPosition { group, position } => position
                .checked_sub(1)
                .and_then(|index| self.group_team(group, index)),
            SlotRef::MatchSlot { id, side } => self.graph().resolve_slot(&self.knockout, id, side),
            SlotRef::MatchWinner(id) => self.graph().winner(&self.knockout, id),
            SlotRef::MatchLoser(id) => self.graph().loser(&self.knockout, id),
        }
    }

    pub fn completeness(&self) -> Completeness {
        let reference = self.predictor.reference();
        Completeness {
            groups: Progress {
                done: self.groups.values().filter(|g| g.settled).count(),
                total: reference.group_count(),
            },
            playoffs: Progress {
                done: self.playoffs_selected,
                total: reference.playoffs().count(),
            },
            third_place: Progress {
                done: usize::from(self.combination.is_some()),
                total: 1,
            },
            knockout: Progress {
                done: self.graph().decided_count(&self.knockout),
                total: reference.topology().len(),
            },
        }
    }
}

impl GroupSlots for Evaluation<'_> {
    fn group_team(&self, group: GroupLetter, index: usize) -> Option<TeamId> {
        let team = self.groups.get(&group)?.decided_team(index)?;
        (!self.pending_placeholders.contains(&team)).then_some(team)
    }

    fn third_place_team(&self, group: GroupLetter) -> Option<TeamId> {
        let outcome = self.groups.get(&group)?;
        if !outcome.settled {
            return None;
        }
        let team = *outcome.order.get(2)?;
        (!self.pending_placeholders.contains(&team)).then_some(team)
    }

    fn third_place_group(&self, slot: &str) -> Option<GroupLetter> {
        self.combination.as_ref()?.letter_for(slot)
    }
}
