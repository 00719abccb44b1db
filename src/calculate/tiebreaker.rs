//! Tiebreak cascade for teams level on points.
//!
//! Criteria, each applied only among teams still level after the previous one:
//! - head-to-head points, goal difference, goals scored
//! - the same three again, restricted to a strictly smaller still-level subset
//! - overall goal difference, overall goals scored
//! - a manual decision, or an [`UnresolvableTie`]
//!
//! Splitting never reorders across runs: a team peeled off by one criterion
//! keeps the place that criterion gave it relative to the still-level teams.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::models::{
    schedule_pair, GroupScores, HeadToHead, Team, TeamId, TeamStats, TieSignature,
    TiebreakerDecision, UnresolvableTie,
};

/// Everything the cascade may consult besides the tied stat lines.
pub struct TiebreakContext<'a> {
    /// Full roster in schedule-position order
    pub teams: &'a [&'a Team],
    pub scores: &'a GroupScores,
    pub decisions: &'a [TiebreakerDecision],
    pub config: &'a EngineConfig,
}

impl TiebreakContext<'_> {
    fn team_id_at(&self, position: usize) -> Option<TeamId> {
        position
            .checked_sub(1)
            .and_then(|i| self.teams.get(i))
            .map(|t| t.id)
    }

    fn name_of(&self, id: TeamId) -> String {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("team {}", id))
    }

    fn names(&self, stats: &[TeamStats]) -> String {
        let names: Vec<String> = stats.iter().map(|s| self.name_of(s.team_id)).collect();
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            _ => names.join(""),
        }
    }
}

/// Outcome of resolving one tied cluster.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The cluster in final order
    pub resolved: Vec<TeamStats>,

    /// First subset no automatic criterion or decision could order
    pub unresolvable_tie: Option<UnresolvableTie>,

    /// Every team of every subset left unordered, including deferred ones
    pub undecided: Vec<TeamId>,

    pub applied_decisions: Vec<TieSignature>,
}

impl Resolution {
    fn absorb(&mut self, other: Resolution) {
        self.resolved.extend(other.resolved);
        self.applied_decisions.extend(other.applied_decisions);
        self.undecided.extend(other.undecided);
        if self.unresolvable_tie.is_none() {
            self.unresolvable_tie = other.unresolvable_tie;
        } else if let Some(extra) = other.unresolvable_tie {
            debug!("Further unresolved tie among {} teams deferred", extra.teams.len());
        }
    }
}

/// Order a cluster of teams level on points.
pub fn resolve(tied: Vec<TeamStats>, ctx: &TiebreakContext<'_>, depth: u32) -> Resolution {
    if tied.len() < 2 {
        return Resolution {
            resolved: tied,
            ..Resolution::default()
        };
    }

    if depth > ctx.config.max_tiebreak_depth {
        warn!(
            "Tiebreak recursion limit {} reached with {} teams",
            ctx.config.max_tiebreak_depth,
            tied.len()
        );
        let reason = format!(
            "{} are still level after {} rounds of head-to-head comparison",
            ctx.names(&tied),
            ctx.config.max_tiebreak_depth
        );
        return manual_or_unresolved(tied, ctx, reason);
    }

    let total = tied.len();
    let with_h2h = head_to_head(tied, ctx);
    let runs = split_runs(with_h2h, |s| {
        let h2h = s.h2h.unwrap_or_default();
        (h2h.points as i64, h2h.goal_diff as i64, h2h.goals_for as i64)
    });

    let mut out = Resolution::default();
    for run in runs {
        if run.len() == 1 {
            out.resolved.extend(run);
        } else if run.len() < total {
            debug!("Reapplying head-to-head among {} of {} teams", run.len(), total);
            out.absorb(resolve(run, ctx, depth + 1));
        } else {
            out.absorb(resolve_overall(run, ctx));
        }
    }
    out
}

/// Overall goal difference, then overall goals scored, then manual fallback.
fn resolve_overall(tied: Vec<TeamStats>, ctx: &TiebreakContext<'_>) -> Resolution {
    let runs = split_runs(tied, |s| (s.goal_difference as i64, s.goals_for as i64, 0));

    let mut out = Resolution::default();
    for run in runs {
        if run.len() == 1 {
            out.resolved.extend(run);
        } else {
            let reason = format!(
                "{} cannot be separated by head-to-head results, goal difference or goals scored",
                ctx.names(&run)
            );
            out.absorb(manual_or_unresolved(run, ctx, reason));
        }
    }
    out
}

fn manual_or_unresolved(
    mut tied: Vec<TeamStats>,
    ctx: &TiebreakContext<'_>,
    reason: String,
) -> Resolution {
    let ids: Vec<TeamId> = tied.iter().map(|s| s.team_id).collect();

    match ctx.decisions.iter().find(|d| d.covers(&ids)) {
        Some(decision) => {
            debug!("Applying manual tiebreak {}", decision.signature);
            tied.sort_by_key(|s| decision.rank_of(s.team_id).unwrap_or(usize::MAX));
            Resolution {
                resolved: tied,
                unresolvable_tie: None,
                undecided: Vec::new(),
                applied_decisions: vec![decision.signature.clone()],
            }
        }
        None => {
            debug!("Unresolvable tie: {}", reason);
            Resolution {
                resolved: tied.clone(),
                unresolvable_tie: Some(UnresolvableTie {
                    teams: tied,
                    reason,
                }),
                undecided: ids,
                applied_decisions: Vec::new(),
            }
        }
    }
}

/// Attach head-to-head records computed only from matches among `tied`.
fn head_to_head(mut tied: Vec<TeamStats>, ctx: &TiebreakContext<'_>) -> Vec<TeamStats> {
    for s in tied.iter_mut() {
        s.h2h = Some(HeadToHead::default());
    }

    for (&match_number, score) in ctx.scores {
        let (Some((pos_a, pos_b)), Some((goals_a, goals_b))) =
            (schedule_pair(match_number), score.goals())
        else {
            continue;
        };
        let (Some(team_a), Some(team_b)) = (ctx.team_id_at(pos_a), ctx.team_id_at(pos_b)) else {
            continue;
        };
        let idx_a = tied.iter().position(|s| s.team_id == team_a);
        let idx_b = tied.iter().position(|s| s.team_id == team_b);
        if let (Some(a), Some(b)) = (idx_a, idx_b) {
            credit(&mut tied[a], goals_a, goals_b, ctx.config);
            credit(&mut tied[b], goals_b, goals_a, ctx.config);
        }
    }

    tied
}

fn credit(stats: &mut TeamStats, scored: u32, conceded: u32, config: &EngineConfig) {
    let h2h = stats.h2h.get_or_insert_with(HeadToHead::default);
    h2h.goals_for += scored;
    h2h.goals_against += conceded;
    h2h.goal_diff = h2h.goals_for as i32 - h2h.goals_against as i32;
    h2h.points += match scored.cmp(&conceded) {
        std::cmp::Ordering::Greater => config.points_for_win,
        std::cmp::Ordering::Equal => config.points_for_draw,
        std::cmp::Ordering::Less => 0,
    };
}

/// Stable sort descending by `key`, then split into maximal runs of equal key.
fn split_runs<F>(mut stats: Vec<TeamStats>, key: F) -> Vec<Vec<TeamStats>>
where
    F: Fn(&TeamStats) -> (i64, i64, i64),
{
    stats.sort_by(|a, b| key(b).cmp(&key(a)));

    let mut runs: Vec<Vec<TeamStats>> = Vec::new();
    for s in stats {
        match runs.last_mut() {
            Some(run) if key(&run[0]) == key(&s) => run.push(s),
            _ => runs.push(vec![s]),
        }
    }
    runs
}
