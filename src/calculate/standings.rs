//! Group standings from predicted scores.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::tiebreaker::{self, TiebreakContext};
use crate::config::EngineConfig;
use crate::models::{
    schedule_pair, GroupLetter, GroupScores, Team, TeamId, TeamStats, TieSignature,
    TiebreakerDecision, UnresolvableTie, GROUP_MATCH_COUNT,
};

/// Ranked standings of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group: GroupLetter,

    /// Best team first; `position` is set 1..=4
    pub standings: Vec<TeamStats>,

    /// First tie the automatic criteria could not break, if any
    pub unresolvable_tie: Option<UnresolvableTie>,

    /// Teams whose place still depends on an undecided tie
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undecided: Vec<TeamId>,

    /// All six matches carry both goal values
    pub is_complete: bool,

    /// Signatures of the manual decisions that were actually used
    #[serde(default)]
    pub applied_decisions: Vec<TieSignature>,
}

impl GroupStandings {
    /// Complete and free of undecided ties.
    pub fn is_settled(&self) -> bool {
        self.is_complete && self.unresolvable_tie.is_none()
    }

    /// Stats of the team at a 1-based finishing position.
    pub fn at_position(&self, position: usize) -> Option<&TeamStats> {
        position.checked_sub(1).and_then(|i| self.standings.get(i))
    }

    /// Team at a 1-based position once the group is complete and that
    /// position lies outside every undecided tie.
    pub fn decided_at(&self, position: usize) -> Option<TeamId> {
        if !self.is_complete {
            return None;
        }
        let team = self.at_position(position)?.team_id;
        (!self.undecided.contains(&team)).then_some(team)
    }
}

/// True when every scheduled match has both goal values.
pub fn is_group_complete(scores: &GroupScores) -> bool {
    (1..=GROUP_MATCH_COUNT).all(|n| scores.get(&n).is_some_and(|s| s.is_complete()))
}

/// Compute ranked standings for one group.
///
/// `teams` are the roster in schedule-position order. Matches are attributed by
/// position, so the stat lines are built per position and carry the team id of
/// whoever sits there.
pub fn compute_standings(
    group: GroupLetter,
    teams: &[&Team],
    scores: &GroupScores,
    decisions: &[TiebreakerDecision],
    config: &EngineConfig,
) -> GroupStandings {
    let is_complete = is_group_complete(scores);

    let mut stats: Vec<TeamStats> = teams.iter().map(|t| TeamStats::new(t.id)).collect();
    for (&match_number, score) in scores {
        let Some((pos_a, pos_b)) = schedule_pair(match_number) else {
            warn!("Group {}: ignoring unknown match number {}", group, match_number);
            continue;
        };
        let Some((goals_a, goals_b)) = score.goals() else {
            continue;
        };
        if pos_a > stats.len() || pos_b > stats.len() {
            continue;
        }
        stats[pos_a - 1].record(goals_a, goals_b, config.points_for_win, config.points_for_draw);
        stats[pos_b - 1].record(goals_b, goals_a, config.points_for_win, config.points_for_draw);
    }

    stats.sort_by(|a, b| b.points.cmp(&a.points));

    let ctx = TiebreakContext {
        teams,
        scores,
        decisions,
        config,
    };

    let mut standings = Vec::with_capacity(stats.len());
    let mut unresolvable_tie = None;
    let mut undecided = Vec::new();
    let mut applied_decisions = Vec::new();

    for cluster in split_by_points(stats) {
        if cluster.len() == 1 {
            standings.extend(cluster);
            continue;
        }

        debug!(
            "Group {}: {} teams level on {} points",
            group,
            cluster.len(),
            cluster[0].points
        );
        let resolution = tiebreaker::resolve(cluster, &ctx, 0);
        standings.extend(resolution.resolved);
        applied_decisions.extend(resolution.applied_decisions);
        undecided.extend(resolution.undecided);
        if unresolvable_tie.is_none() {
            unresolvable_tie = resolution.unresolvable_tie;
        }
    }

    for (i, s) in standings.iter_mut().enumerate() {
        s.position = (i + 1) as u8;
    }

    GroupStandings {
        group,
        standings,
        unresolvable_tie,
        undecided,
        is_complete,
        applied_decisions,
    }
}

/// Split a points-sorted list into runs of equal points.
fn split_by_points(sorted: Vec<TeamStats>) -> Vec<Vec<TeamStats>> {
    let mut clusters: Vec<Vec<TeamStats>> = Vec::new();
    for s in sorted {
        match clusters.last_mut() {
            Some(last) if last[0].points == s.points => last.push(s),
            _ => clusters.push(vec![s]),
        }
    }
    clusters
}
