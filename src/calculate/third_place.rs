//! Cross-group ranking of third-placed teams and combination validation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{CombinationTable, GroupLetter, TeamStats, ThirdPlaceCombination};

/// One group's third-placed team, or None while that group is not settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPlaceCandidate {
    pub group: GroupLetter,
    pub stats: Option<TeamStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPlaceEntry {
    pub group: GroupLetter,
    pub stats: TeamStats,
}

/// The ranked third-placed teams and the combination their top finishers form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPlaceSelection {
    /// Every group's third-placed team, best first
    pub ranking: Vec<ThirdPlaceEntry>,

    /// How many of `ranking` qualify
    pub qualifiers: usize,

    /// Sorted letters of the qualifying groups
    pub qualifying_letters: String,

    /// The matching table row; None when the letters form no legal combination
    pub combination: Option<ThirdPlaceCombination>,
}

impl ThirdPlaceSelection {
    /// The qualifying entries, best first.
    pub fn best(&self) -> &[ThirdPlaceEntry] {
        &self.ranking[..self.qualifiers.min(self.ranking.len())]
    }

    pub fn is_valid(&self) -> bool {
        self.combination.is_some()
    }

    /// Explanation for callers to show when the combination is not legal.
    pub fn invalid_reason(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        Some(format!(
            "Qualifying groups {} do not form a valid third-place combination; adjust some scores",
            self.qualifying_letters
        ))
    }
}

/// Whether a third-place ranking could be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThirdPlaceStatus {
    /// Some groups are not complete or have an undecided tie
    NotReady { missing: Vec<GroupLetter> },
    Ranked(ThirdPlaceSelection),
}

/// Rank third-placed teams and look up the resulting combination.
///
/// Order: points, goal difference, goals scored (all descending), then group
/// letter ascending. The letter rule is a fixed convention that makes the
/// order total without manual input; it is not a competition criterion.
pub fn select_best_third(
    candidates: &[ThirdPlaceCandidate],
    table: &CombinationTable,
) -> ThirdPlaceStatus {
    let missing: Vec<GroupLetter> = candidates
        .iter()
        .filter(|c| c.stats.is_none())
        .map(|c| c.group)
        .collect();
    if !missing.is_empty() || candidates.len() < table.width() {
        debug!("Third-place ranking not ready: {} groups pending", missing.len());
        return ThirdPlaceStatus::NotReady { missing };
    }

    let mut ranking: Vec<ThirdPlaceEntry> = candidates
        .iter()
        .filter_map(|c| {
            c.stats.clone().map(|stats| ThirdPlaceEntry {
                group: c.group,
                stats,
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then(b.stats.goal_difference.cmp(&a.stats.goal_difference))
            .then(b.stats.goals_for.cmp(&a.stats.goals_for))
            .then(a.group.cmp(&b.group))
    });

    let qualifiers = table.width();
    let mut letters: Vec<char> = ranking[..qualifiers]
        .iter()
        .map(|e| e.group.as_char())
        .collect();
    letters.sort_unstable();
    let qualifying_letters: String = letters.into_iter().collect();

    let combination = table.lookup(&qualifying_letters).cloned();
    if combination.is_none() {
        warn!(
            "Qualifying third-place groups {} match no legal combination",
            qualifying_letters
        );
    }

    ThirdPlaceStatus::Ranked(ThirdPlaceSelection {
        ranking,
        qualifiers,
        qualifying_letters,
        combination,
    })
}
