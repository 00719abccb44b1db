//! Write side of the facade: prediction mutations that keep every pick consistent.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::{info, warn};

use super::{Evaluation, GroupOutcome};
use crate::bracket::BracketError;
use crate::calculate::{compute_standings, select_best_third, ThirdPlaceCandidate, ThirdPlaceStatus};
use crate::config::EngineConfig;
use crate::models::{
    normalize_letters, schedule_pair, GroupDefinition, GroupLetter, GroupPrediction, GroupScores,
    MatchId, MatchScore, PlayoffId, PredictionState, Team, TeamId, ThirdPlaceCombination,
    TiebreakerDecision, TournamentReference,
};

/// A caller asked for something the tournament does not allow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictionError {
    #[error(transparent)]
    Bracket(#[from] BracketError),

    #[error("Unknown group {0}")]
    UnknownGroup(GroupLetter),

    #[error("Group {group} has no match {match_number}")]
    UnknownGroupMatch { group: GroupLetter, match_number: u8 },

    #[error("Unknown playoff {0}")]
    UnknownPlayoff(PlayoffId),

    #[error("Team {team} is not a candidate of playoff {playoff}")]
    NotACandidate { playoff: PlayoffId, team: TeamId },

    #[error("Manual order for group {0} must list each of its four teams exactly once")]
    InvalidGroupOrder(GroupLetter),

    #[error("Tiebreaker decision for group {0} lists a team more than once")]
    DuplicateDecision(GroupLetter),

    #[error("Tiebreaker decision for group {0} does not match its current tie")]
    NoMatchingTie(GroupLetter),

    #[error("'{letters}' is not a set of {expected} distinct group letters")]
    InvalidThirdPlaceLetters { letters: String, expected: usize },

    #[error("{0} is not a legal third-place combination")]
    UnknownCombination(String),

    #[error("Third-place choice {chosen} conflicts with the computed qualifiers {computed}")]
    CombinationConflict { chosen: String, computed: String },
}

/// The resolution engine bound to one tournament.
///
/// Every mutation returns the knockout matches whose picks it removed; callers
/// persist the state as it is after the call.
#[derive(Debug, Clone)]
pub struct Predictor {
    reference: TournamentReference,
    config: EngineConfig,
}

impl Predictor {
    pub fn new(reference: TournamentReference, config: EngineConfig) -> Self {
        Self { reference, config }
    }

    pub fn reference(&self) -> &TournamentReference {
        &self.reference
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, state: &PredictionState) -> Evaluation<'_> {
        let mut groups = BTreeMap::new();
        let mut pending_placeholders = HashSet::new();

        for def in self.reference.groups() {
            let roster = self.effective_roster(def, state);
            pending_placeholders.extend(roster.iter().filter(|t| t.is_placeholder()).map(|t| t.id));
            groups.insert(def.letter, self.group_outcome(def, &roster, state.group(def.letter)));
        }

        let candidates: Vec<ThirdPlaceCandidate> = groups
            .values()
            .map(|o| ThirdPlaceCandidate {
                group: o.group,
                stats: o.third_place_stats(),
            })
            .collect();
        let third_place = select_best_third(&candidates, self.reference.combinations());
        let combination = self.effective_combination(state.third_place.as_deref(), &third_place);

        let playoffs_selected = self
            .reference
            .playoffs()
            .filter(|p| {
                state
                    .playoff_winners
                    .get(&p.id)
                    .is_some_and(|&w| p.has_candidate(w))
            })
            .count();

        Evaluation {
            predictor: self,
            groups,
            third_place,
            combination,
            knockout: state.knockout.clone(),
            playoffs_selected,
            pending_placeholders,
        }
    }

    /// Roster in schedule order, with placeholders swapped for their playoff winner.
    fn effective_roster(&self, def: &GroupDefinition, state: &PredictionState) -> Vec<Team> {
        self.reference
            .roster(def.letter)
            .unwrap_or_default()
            .into_iter()
            .map(|team| {
                let Some(playoff) = &team.playoff else {
                    return team.clone();
                };
                state
                    .playoff_winners
                    .get(playoff)
                    .filter(|&&w| {
                        self.reference
                            .playoff(playoff)
                            .is_some_and(|p| p.has_candidate(w))
                    })
                    .and_then(|w| self.reference.team(*w))
                    .cloned()
                    .unwrap_or_else(|| team.clone())
            })
            .collect()
    }

    fn group_outcome(
        &self,
        def: &GroupDefinition,
        roster: &[Team],
        prediction: Option<&GroupPrediction>,
    ) -> GroupOutcome {
        let empty = GroupPrediction::default();
        let prediction = prediction.unwrap_or(&empty);

        if let Some(order) = &prediction.manual_order {
            if is_roster_permutation(order, def) {
                let order = order
                    .iter()
                    .filter_map(|&id| def.position_of(id))
                    .filter_map(|position| roster.get(position - 1))
                    .map(|t| t.id)
                    .collect();
                return GroupOutcome {
                    group: def.letter,
                    order,
                    standings: None,
                    settled: true,
                };
            }
            warn!(
                "Group {}: manual order is not a permutation of the roster, using scores",
                def.letter
            );
        }

        let teams: Vec<&Team> = roster.iter().collect();
        let standings = compute_standings(
            def.letter,
            &teams,
            &prediction.scores,
            &prediction.tiebreakers,
            &self.config,
        );
        GroupOutcome {
            group: def.letter,
            order: standings.standings.iter().map(|s| s.team_id).collect(),
            settled: standings.is_settled(),
            standings: Some(standings),
        }
    }

    /// An explicit choice wins when it is a table row and agrees with the
    /// computed ranking (if there is one); otherwise the computed row, if legal.
    fn effective_combination(
        &self,
        explicit: Option<&str>,
        status: &ThirdPlaceStatus,
    ) -> Option<ThirdPlaceCombination> {
        let table = self.reference.combinations();
        if let Some(raw) = explicit {
            match normalize_letters(raw, table.width()).and_then(|l| table.lookup(&l)) {
                Some(row) => match status {
                    ThirdPlaceStatus::Ranked(selection)
                        if selection.qualifying_letters != row.letters =>
                    {
                        warn!(
                            "Ignoring third-place choice {}: computed qualifiers are {}",
                            row.letters, selection.qualifying_letters
                        );
                    }
                    _ => return Some(row.clone()),
                },
                None => warn!("Ignoring third-place choice '{}': not a legal combination", raw),
            }
        }

        match status {
            ThirdPlaceStatus::Ranked(selection) => selection.combination.clone(),
            ThirdPlaceStatus::NotReady { .. } => None,
        }
    }

    /// Record a knockout winner; downstream picks are removed when it changes.
    pub fn select_winner(
        &self,
        state: &mut PredictionState,
        id: MatchId,
        team: TeamId,
    ) -> Result<Vec<MatchId>, PredictionError> {
        let evaluation = self.evaluate(state);
        let cleared = evaluation
            .graph()
            .select_winner(&mut state.knockout, id, team)?;
        Ok(cleared)
    }

    pub fn clear_winner(
        &self,
        state: &mut PredictionState,
        id: MatchId,
    ) -> Result<Vec<MatchId>, PredictionError> {
        let evaluation = self.evaluate(state);
        let cleared = evaluation.graph().clear_winner(&mut state.knockout, id)?;
        Ok(cleared)
    }

    pub fn set_match_score(
        &self,
        state: &mut PredictionState,
        group: GroupLetter,
        match_number: u8,
        score: MatchScore,
    ) -> Result<Vec<MatchId>, PredictionError> {
        self.check_group(group)?;
        if schedule_pair(match_number).is_none() {
            return Err(PredictionError::UnknownGroupMatch {
                group,
                match_number,
            });
        }
        Ok(self.apply_upstream(state, |s| {
            s.group_mut(group).scores.insert(match_number, score);
        }))
    }

    /// Replace all scores of a group.
    pub fn set_group_scores(
        &self,
        state: &mut PredictionState,
        group: GroupLetter,
        scores: GroupScores,
    ) -> Result<Vec<MatchId>, PredictionError> {
        self.check_group(group)?;
        if let Some(&match_number) = scores.keys().find(|&&n| schedule_pair(n).is_none()) {
            return Err(PredictionError::UnknownGroupMatch {
                group,
                match_number,
            });
        }
        Ok(self.apply_upstream(state, |s| {
            s.group_mut(group).scores = scores;
        }))
    }

    /// Set or clear a manual finishing order, given as roster team ids.
    pub fn set_group_order(
        &self,
        state: &mut PredictionState,
        group: GroupLetter,
        order: Option<Vec<TeamId>>,
    ) -> Result<Vec<MatchId>, PredictionError> {
        let def = self.check_group(group)?;
        if let Some(order) = &order {
            if !is_roster_permutation(order, def) {
                return Err(PredictionError::InvalidGroupOrder(group));
            }
        }
        Ok(self.apply_upstream(state, |s| {
            s.group_mut(group).manual_order = order;
        }))
    }

    /// Order the teams of the group's current unresolvable tie, best first.
    pub fn set_tiebreaker_decision(
        &self,
        state: &mut PredictionState,
        group: GroupLetter,
        order: Vec<TeamId>,
    ) -> Result<Vec<MatchId>, PredictionError> {
        self.check_group(group)?;
        let decision = TiebreakerDecision::new(order);
        if decision.has_duplicates() {
            return Err(PredictionError::DuplicateDecision(group));
        }

        let matches_tie = self
            .evaluate(state)
            .group(group)
            .and_then(|o| o.standings.as_ref())
            .and_then(|s| s.unresolvable_tie.as_ref())
            .is_some_and(|tie| decision.covers(&tie.team_ids()));
        if !matches_tie {
            return Err(PredictionError::NoMatchingTie(group));
        }

        info!("Group {}: tie decided as {:?}", group, decision.order);
        Ok(self.apply_upstream(state, |s| {
            let decisions = &mut s.group_mut(group).tiebreakers;
            decisions.retain(|d| d.signature != decision.signature);
            decisions.push(decision);
        }))
    }

    pub fn select_playoff_winner(
        &self,
        state: &mut PredictionState,
        playoff: &PlayoffId,
        team: TeamId,
    ) -> Result<Vec<MatchId>, PredictionError> {
        let known = self
            .reference
            .playoff(playoff)
            .ok_or_else(|| PredictionError::UnknownPlayoff(playoff.clone()))?;
        if !known.has_candidate(team) {
            return Err(PredictionError::NotACandidate {
                playoff: playoff.clone(),
                team,
            });
        }

        info!("Playoff {}: winner {}", playoff, team);
        Ok(self.apply_upstream(state, |s| {
            s.playoff_winners.insert(playoff.clone(), team);
        }))
    }

    /// Choose the qualifying third-place groups explicitly, or clear the choice.
    pub fn set_third_place(
        &self,
        state: &mut PredictionState,
        letters: Option<&str>,
    ) -> Result<Vec<MatchId>, PredictionError> {
        let chosen = match letters {
            Some(raw) => {
                let table = self.reference.combinations();
                let normalized = normalize_letters(raw, table.width()).ok_or_else(|| {
                    PredictionError::InvalidThirdPlaceLetters {
                        letters: raw.to_string(),
                        expected: table.width(),
                    }
                })?;
                if table.lookup(&normalized).is_none() {
                    return Err(PredictionError::UnknownCombination(normalized));
                }
                if let ThirdPlaceStatus::Ranked(selection) = self.evaluate(state).third_place() {
                    if selection.qualifying_letters != normalized {
                        return Err(PredictionError::CombinationConflict {
                            chosen: normalized,
                            computed: selection.qualifying_letters.clone(),
                        });
                    }
                }
                Some(normalized)
            }
            None => None,
        };

        Ok(self.apply_upstream(state, |s| {
            s.third_place = chosen;
        }))
    }

    /// Apply a change that may move teams around the bracket, then drop
    /// whatever it invalidated.
    fn apply_upstream(
        &self,
        state: &mut PredictionState,
        change: impl FnOnce(&mut PredictionState),
    ) -> Vec<MatchId> {
        let before = self.evaluate(state).snapshot();
        change(state);
        self.prune_stale(state);

        let evaluation = self.evaluate(state);
        evaluation.graph().reconcile(&mut state.knockout, &before)
    }

    /// Drop tiebreaker decisions whose tied set no longer occurs, and an
    /// explicit third-place choice the computed ranking now contradicts.
    fn prune_stale(&self, state: &mut PredictionState) {
        let evaluation = self.evaluate(state);

        for (letter, prediction) in state.groups.iter_mut() {
            let Some(standings) = evaluation.group(*letter).and_then(|o| o.standings.as_ref())
            else {
                continue;
            };
            let before = prediction.tiebreakers.len();
            prediction
                .tiebreakers
                .retain(|d| standings.applied_decisions.contains(&d.signature));
            let removed = before - prediction.tiebreakers.len();
            if removed > 0 {
                warn!("Group {}: dropped {} stale tiebreaker decisions", letter, removed);
            }
        }

        let width = self.reference.combinations().width();
        let contradicted = match (&state.third_place, evaluation.third_place()) {
            (Some(raw), ThirdPlaceStatus::Ranked(selection)) => {
                normalize_letters(raw, width).as_deref() != Some(selection.qualifying_letters.as_str())
            }
            _ => false,
        };
        if contradicted {
            warn!("Dropping third-place choice contradicted by the computed ranking");
            state.third_place = None;
        }
    }

    fn check_group(&self, group: GroupLetter) -> Result<&GroupDefinition, PredictionError> {
        self.reference
            .group(group)
            .ok_or(PredictionError::UnknownGroup(group))
    }
}

fn is_roster_permutation(order: &[TeamId], def: &GroupDefinition) -> bool {
    let mut given = order.to_vec();
    given.sort();
    let mut roster = def.teams.to_vec();
    roster.sort();
    given == roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use crate::resolve::SlotRef;
    use crate::test_support::{self, letter, roster_ids, PLAYOFF_CANDIDATES};
    use pretty_assertions::assert_eq;

    fn predictor() -> Predictor {
        Predictor::new(test_support::reference(), EngineConfig::default())
    }

    fn scores(results: &[(u8, u32, u32)]) -> GroupScores {
        results
            .iter()
            .map(|&(n, a, b)| (n, MatchScore::new(a, b)))
            .collect()
    }

    /// 1 beats 2, 2 beats 3, 3 beats 1, all draw 0-0 with 4.
    fn cyclic() -> GroupScores {
        scores(&[(1, 1, 0), (2, 0, 0), (3, 0, 1), (4, 0, 0), (5, 0, 0), (6, 1, 0)])
    }

    /// Roster position 2 wins the group, position 1 finishes second.
    fn second_seed_wins() -> GroupScores {
        scores(&[(1, 0, 2), (2, 1, 0), (3, 3, 1), (4, 2, 0), (5, 0, 1), (6, 1, 0)])
    }

    fn pick_side_a_everywhere(predictor: &Predictor, state: &mut PredictionState) {
        let ids: Vec<MatchId> = predictor
            .reference()
            .topology()
            .matches()
            .iter()
            .map(|m| m.id)
            .collect();
        for id in ids {
            let team = predictor
                .evaluate(state)
                .team_at(SlotRef::MatchSlot { id, side: Side::A })
                .unwrap();
            predictor.select_winner(state, id, team).unwrap();
        }
    }

    fn group_leader(predictor: &Predictor, state: &PredictionState, group: char) -> Option<TeamId> {
        predictor.evaluate(state).team_at(SlotRef::GroupPosition {
            group: letter(group),
            position: 1,
        })
    }

    #[test]
    fn test_complete_prediction() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        predictor
            .select_playoff_winner(&mut state, &PlayoffId::from("path-d"), PLAYOFF_CANDIDATES[0])
            .unwrap();
        pick_side_a_everywhere(&predictor, &mut state);

        let evaluation = predictor.evaluate(&state);
        let completeness = evaluation.completeness();
        assert_eq!(completeness.knockout.to_string(), "32/32");
        assert_eq!(completeness.playoffs.to_string(), "1/1");
        assert!(completeness.is_complete());
        assert_eq!(
            evaluation.team_at(SlotRef::MatchWinner(MatchId(104))),
            Some(TeamId(1))
        );
    }

    #[test]
    fn test_group_change_clears_dependent_knockout_picks() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        pick_side_a_everywhere(&predictor, &mut state);

        let cleared = predictor
            .set_group_scores(&mut state, letter('A'), second_seed_wins())
            .unwrap();

        // 73 holds the winner of A, 81 the runner-up of A
        for id in [73, 89, 97, 101, 81, 93, 99, 102, 103, 104] {
            assert!(cleared.contains(&MatchId(id)), "M{} should be cleared", id);
            assert_eq!(state.knockout.winner(MatchId(id)), None);
        }
        for id in [74, 75, 82, 85, 90, 98] {
            assert!(state.knockout.winner(MatchId(id)).is_some(), "M{} should stay", id);
        }
        assert_eq!(group_leader(&predictor, &state, 'A'), Some(TeamId(2)));
    }

    #[test]
    fn test_score_change_without_effect_keeps_picks() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        pick_side_a_everywhere(&predictor, &mut state);

        // Bigger margin, same finishing order and same third-place stats
        let cleared = predictor
            .set_match_score(&mut state, letter('B'), 1, MatchScore::new(5, 0))
            .unwrap();
        assert!(cleared.is_empty());
        assert_eq!(state.knockout.len(), 32);
    }

    #[test]
    fn test_select_winner_contract_violations() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();

        assert_eq!(
            predictor.select_winner(&mut state, MatchId(89), TeamId(1)),
            Err(PredictionError::Bracket(BracketError::MatchNotReady(MatchId(89))))
        );
        assert_eq!(
            predictor.select_winner(&mut state, MatchId(73), TeamId(2)),
            Err(PredictionError::Bracket(BracketError::TeamNotInMatch {
                match_id: MatchId(73),
                team: TeamId(2)
            }))
        );
        assert!(state.knockout.is_empty());
    }

    #[test]
    fn test_clear_winner_through_facade() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        pick_side_a_everywhere(&predictor, &mut state);

        let cleared = predictor.clear_winner(&mut state, MatchId(101)).unwrap();
        assert_eq!(cleared, vec![MatchId(101), MatchId(103), MatchId(104)]);
    }

    #[test]
    fn test_tiebreaker_decision_flow() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        predictor
            .set_group_scores(&mut state, letter('A'), cyclic())
            .unwrap();

        assert_eq!(group_leader(&predictor, &state, 'A'), None);
        assert_eq!(predictor.evaluate(&state).completeness().groups.done, 11);

        assert_eq!(
            predictor.set_tiebreaker_decision(&mut state, letter('A'), vec![TeamId(1), TeamId(2)]),
            Err(PredictionError::NoMatchingTie(letter('A')))
        );
        assert_eq!(
            predictor.set_tiebreaker_decision(
                &mut state,
                letter('A'),
                vec![TeamId(1), TeamId(1), TeamId(2)]
            ),
            Err(PredictionError::DuplicateDecision(letter('A')))
        );

        predictor
            .set_tiebreaker_decision(
                &mut state,
                letter('A'),
                vec![TeamId(3), TeamId(1), TeamId(2)],
            )
            .unwrap();
        assert_eq!(group_leader(&predictor, &state, 'A'), Some(TeamId(3)));
        assert_eq!(state.group(letter('A')).unwrap().tiebreakers.len(), 1);

        // The tie disappears, so does the decision
        predictor
            .set_group_scores(&mut state, letter('A'), test_support::complete_scores(false))
            .unwrap();
        assert!(state.group(letter('A')).unwrap().tiebreakers.is_empty());
        assert_eq!(group_leader(&predictor, &state, 'A'), Some(TeamId(1)));
    }

    #[test]
    fn test_two_ties_in_one_group_decided_in_turn() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        // 1 and 2 draw and beat 3 and 4 by 1-0; 3 and 4 draw
        let two_pairs = scores(&[(1, 0, 0), (2, 0, 0), (3, 1, 0), (4, 1, 0), (5, 0, 1), (6, 1, 0)]);
        predictor
            .set_group_scores(&mut state, letter('A'), two_pairs)
            .unwrap();
        assert_eq!(group_leader(&predictor, &state, 'A'), None);

        // Only the first tie is open for a decision
        assert_eq!(
            predictor.set_tiebreaker_decision(&mut state, letter('A'), vec![TeamId(4), TeamId(3)]),
            Err(PredictionError::NoMatchingTie(letter('A')))
        );

        predictor
            .set_tiebreaker_decision(&mut state, letter('A'), vec![TeamId(2), TeamId(1)])
            .unwrap();
        assert_eq!(group_leader(&predictor, &state, 'A'), Some(TeamId(2)));
        let evaluation = predictor.evaluate(&state);
        let outcome = evaluation.group(letter('A')).unwrap();
        assert!(!outcome.settled);
        assert_eq!(
            outcome
                .standings
                .as_ref()
                .and_then(|s| s.unresolvable_tie.as_ref())
                .map(|t| t.team_ids()),
            Some(vec![TeamId(3), TeamId(4)])
        );

        predictor
            .set_tiebreaker_decision(&mut state, letter('A'), vec![TeamId(4), TeamId(3)])
            .unwrap();
        assert_eq!(state.group(letter('A')).unwrap().tiebreakers.len(), 2);

        let evaluation = predictor.evaluate(&state);
        let outcome = evaluation.group(letter('A')).unwrap();
        assert!(outcome.settled);
        assert_eq!(outcome.order, vec![TeamId(2), TeamId(1), TeamId(4), TeamId(3)]);
        assert_eq!(outcome.standings.as_ref().unwrap().applied_decisions.len(), 2);
        assert_eq!(evaluation.completeness().groups.done, 12);
    }

    #[test]
    fn test_manual_order_needs_explicit_third_place() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        let order = vec![TeamId(4), TeamId(3), TeamId(2), TeamId(1)];
        predictor
            .set_group_order(&mut state, letter('A'), Some(order))
            .unwrap();

        let evaluation = predictor.evaluate(&state);
        assert_eq!(
            evaluation.team_at(SlotRef::GroupPosition {
                group: letter('A'),
                position: 1
            }),
            Some(TeamId(4))
        );
        assert_eq!(
            evaluation.third_place(),
            &ThirdPlaceStatus::NotReady {
                missing: vec![letter('A')]
            }
        );
        assert!(evaluation.combination().is_none());

        predictor
            .set_third_place(&mut state, Some("lkjihgfe"))
            .unwrap();
        assert_eq!(state.third_place.as_deref(), Some("EFGHIJKL"));
        assert_eq!(
            predictor.evaluate(&state).team_at(SlotRef::MatchSlot {
                id: MatchId(73),
                side: Side::B
            }),
            Some(roster_ids(letter('E'))[2])
        );
    }

    #[test]
    fn test_invalid_manual_order_rejected() {
        let predictor = predictor();
        let mut state = PredictionState::new();
        assert_eq!(
            predictor.set_group_order(
                &mut state,
                letter('A'),
                Some(vec![TeamId(1), TeamId(1), TeamId(2), TeamId(3)])
            ),
            Err(PredictionError::InvalidGroupOrder(letter('A')))
        );
        assert_eq!(
            predictor.set_group_order(
                &mut state,
                letter('A'),
                Some(vec![TeamId(1), TeamId(2), TeamId(3), TeamId(5)])
            ),
            Err(PredictionError::InvalidGroupOrder(letter('A')))
        );
    }

    #[test]
    fn test_third_place_choice_validation() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();

        assert!(matches!(
            predictor.set_third_place(&mut state, Some("XYZ")),
            Err(PredictionError::InvalidThirdPlaceLetters { expected: 8, .. })
        ));
        assert_eq!(
            predictor.set_third_place(&mut state, Some("ABCDEFGI")),
            Err(PredictionError::CombinationConflict {
                chosen: "ABCDEFGI".to_string(),
                computed: "EFGHIJKL".to_string()
            })
        );
        assert!(predictor.set_third_place(&mut state, Some("EFGHIJKL")).is_ok());

        predictor
            .set_group_order(
                &mut state,
                letter('A'),
                Some(vec![TeamId(1), TeamId(2), TeamId(3), TeamId(4)]),
            )
            .unwrap();
        assert_eq!(
            predictor.set_third_place(&mut state, Some("ABCDEFGH")),
            Err(PredictionError::UnknownCombination("ABCDEFGH".to_string()))
        );
    }

    #[test]
    fn test_contradicted_third_place_choice_dropped() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        predictor
            .set_group_order(
                &mut state,
                letter('A'),
                Some(vec![TeamId(1), TeamId(2), TeamId(3), TeamId(4)]),
            )
            .unwrap();
        predictor
            .set_third_place(&mut state, Some("ABCDEFGI"))
            .unwrap();
        assert_eq!(
            predictor.evaluate(&state).combination().unwrap().letters,
            "ABCDEFGI"
        );

        // Scores take over again and rank E-L best
        predictor
            .set_group_order(&mut state, letter('A'), None)
            .unwrap();
        assert_eq!(state.third_place, None);
        assert_eq!(
            predictor.evaluate(&state).combination().unwrap().letters,
            "EFGHIJKL"
        );
    }

    #[test]
    fn test_playoff_winner_fills_placeholder() {
        let predictor = predictor();
        let mut state = test_support::full_prediction();
        let path = PlayoffId::from("path-d");

        predictor
            .set_group_order(
                &mut state,
                letter('D'),
                Some(vec![test_support::PLACEHOLDER, TeamId(13), TeamId(14), TeamId(15)]),
            )
            .unwrap();
        predictor
            .set_third_place(&mut state, Some("EFGHIJKL"))
            .unwrap();
        assert_eq!(group_leader(&predictor, &state, 'D'), None);

        predictor
            .select_playoff_winner(&mut state, &path, PLAYOFF_CANDIDATES[0])
            .unwrap();
        assert_eq!(group_leader(&predictor, &state, 'D'), Some(PLAYOFF_CANDIDATES[0]));

        // Winner of D plays in 76
        predictor
            .select_winner(&mut state, MatchId(76), PLAYOFF_CANDIDATES[0])
            .unwrap();
        let cleared = predictor
            .select_playoff_winner(&mut state, &path, PLAYOFF_CANDIDATES[1])
            .unwrap();
        assert_eq!(cleared, vec![MatchId(76)]);
        assert_eq!(group_leader(&predictor, &state, 'D'), Some(PLAYOFF_CANDIDATES[1]));
    }

    #[test]
    fn test_playoff_contract_violations() {
        let predictor = predictor();
        let mut state = PredictionState::new();

        assert_eq!(
            predictor.select_playoff_winner(&mut state, &PlayoffId::from("path-d"), TeamId(7)),
            Err(PredictionError::NotACandidate {
                playoff: PlayoffId::from("path-d"),
                team: TeamId(7)
            })
        );
        assert_eq!(
            predictor.select_playoff_winner(&mut state, &PlayoffId::from("nowhere"), TeamId(49)),
            Err(PredictionError::UnknownPlayoff(PlayoffId::from("nowhere")))
        );
    }

    #[test]
    fn test_unknown_group_match_rejected() {
        let predictor = predictor();
        let mut state = PredictionState::new();
        assert_eq!(
            predictor.set_match_score(&mut state, letter('A'), 7, MatchScore::new(1, 0)),
            Err(PredictionError::UnknownGroupMatch {
                group: letter('A'),
                match_number: 7
            })
        );
    }
}
