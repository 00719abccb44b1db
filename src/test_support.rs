//! Synthetic 12-group, 32-match tournament used across unit tests.

use std::collections::BTreeMap;

use crate::bracket::GroupSlots;
use crate::models::{
    Advance, BracketTopology, CombinationTable, GroupDefinition, GroupLetter, GroupPrediction,
    GroupRank, GroupScores, KnockoutMatch, MatchId, MatchScore, Playoff, PlayoffId,
    PredictionState, Round, SlotSource, Team, TeamId, ThirdPlaceCombination, TournamentReference,
};

pub(crate) const GROUP_LETTERS: &str = "ABCDEFGHIJKL";

/// Team id of the group D entry decided by the "path-d" playoff.
pub(crate) const PLACEHOLDER: TeamId = TeamId(16);
pub(crate) const PLAYOFF_CANDIDATES: [TeamId; 2] = [TeamId(49), TeamId(50)];

pub(crate) fn letter(c: char) -> GroupLetter {
    GroupLetter::new(c).unwrap()
}

/// Four teams with consecutive ids, named "Team {id}".
pub(crate) fn group_teams(first_id: u32) -> Vec<Team> {
    (first_id..first_id + 4)
        .map(|id| Team::new(TeamId(id), format!("Team {}", id), format!("T{:02}", id)))
        .collect()
}

/// Group at index `i` (A = 0) holds team ids `4i+1 ..= 4i+4` in roster order.
pub(crate) fn roster_ids(group: GroupLetter) -> [TeamId; 4] {
    let i = GROUP_LETTERS.find(group.as_char()).unwrap() as u32;
    [
        TeamId(4 * i + 1),
        TeamId(4 * i + 2),
        TeamId(4 * i + 3),
        TeamId(4 * i + 4),
    ]
}

fn slot_name(winner_group: char) -> String {
    format!("1{}", winner_group)
}

fn group_source(c: char, rank: GroupRank) -> SlotSource {
    SlotSource::Group {
        group: letter(c),
        rank,
    }
}

fn from_match(id: u32, position: Advance) -> SlotSource {
    SlotSource::Match {
        from: MatchId(id),
        position,
    }
}

fn knockout(id: u32, round: Round, team_a: SlotSource, team_b: SlotSource) -> KnockoutMatch {
    KnockoutMatch {
        id: MatchId(id),
        round,
        team_a,
        team_b,
    }
}

/// 73-80: winners A-H against a best third; 81-84: winners I-L against
/// runners-up A-D; 85-88: runners-up E-L paired up; then 89-104 as a
/// plain single-elimination tree with a third-place match.
pub(crate) fn bracket() -> Vec<KnockoutMatch> {
    let mut matches = Vec::with_capacity(32);
    let mut id = 73;

    for w in "ABCDEFGH".chars() {
        let pool = GROUP_LETTERS
            .chars()
            .filter(|&c| c != w)
            .map(letter)
            .collect();
        matches.push(knockout(
            id,
            Round::RoundOf32,
            group_source(w, GroupRank::Winner),
            SlotSource::ThirdPlace {
                slot: slot_name(w),
                pool,
            },
        ));
        id += 1;
    }
    for (w, r) in "IJKL".chars().zip("ABCD".chars()) {
        matches.push(knockout(
            id,
            Round::RoundOf32,
            group_source(w, GroupRank::Winner),
            group_source(r, GroupRank::RunnerUp),
        ));
        id += 1;
    }
    let runners: Vec<char> = "EFGHIJKL".chars().collect();
    for pair in runners.chunks(2) {
        matches.push(knockout(
            id,
            Round::RoundOf32,
            group_source(pair[0], GroupRank::RunnerUp),
            group_source(pair[1], GroupRank::RunnerUp),
        ));
        id += 1;
    }

    for (round, first, count) in [
        (Round::RoundOf16, 73, 8),
        (Round::QuarterFinal, 89, 4),
        (Round::SemiFinal, 97, 2),
    ] {
        for k in 0..count {
            matches.push(knockout(
                id,
                round,
                from_match(first + 2 * k, Advance::Winner),
                from_match(first + 2 * k + 1, Advance::Winner),
            ));
            id += 1;
        }
    }

    matches.push(knockout(
        103,
        Round::ThirdPlace,
        from_match(101, Advance::Loser),
        from_match(102, Advance::Loser),
    ));
    matches.push(knockout(
        104,
        Round::Final,
        from_match(101, Advance::Winner),
        from_match(102, Advance::Winner),
    ));
    matches
}

/// A row assigning each qualifying group to a slot whose winner is from a
/// different group, by rotating the letters over the slots.
pub(crate) fn combination(letters: &str) -> ThirdPlaceCombination {
    let slots: Vec<char> = "ABCDEFGH".chars().collect();
    let groups: Vec<char> = letters.chars().collect();
    let offset = (0..slots.len())
        .find(|&k| {
            (0..slots.len()).all(|i| groups[(i + k) % groups.len()] != slots[i])
        })
        .unwrap();
    ThirdPlaceCombination {
        letters: letters.to_string(),
        assignments: slots
            .iter()
            .enumerate()
            .map(|(i, &s)| (slot_name(s), letter(groups[(i + offset) % groups.len()])))
            .collect(),
    }
}

/// Deliberately lacks "ABCDEFGH".
pub(crate) fn combinations() -> Vec<ThirdPlaceCombination> {
    ["ABCDEFGI", "ABCDEFGJ", "ABCDEFHI", "CDEFGHIJ", "DEFGHIJK", "EFGHIJKL"]
        .iter()
        .map(|l| combination(l))
        .collect()
}

pub(crate) fn combination_table() -> CombinationTable {
    CombinationTable::new(combinations()).unwrap()
}

pub(crate) fn reference_parts() -> (
    Vec<Team>,
    Vec<GroupDefinition>,
    Vec<Playoff>,
    Vec<KnockoutMatch>,
    Vec<ThirdPlaceCombination>,
) {
    let mut teams = Vec::new();
    let mut groups = Vec::new();
    for c in GROUP_LETTERS.chars() {
        let ids = roster_ids(letter(c));
        for team in group_teams(ids[0].0) {
            let team = team.in_group(letter(c));
            if team.id == PLACEHOLDER {
                teams.push(team.as_placeholder(PlayoffId::from("path-d")));
            } else {
                teams.push(team);
            }
        }
        groups.push(GroupDefinition {
            letter: letter(c),
            teams: ids,
        });
    }
    for id in PLAYOFF_CANDIDATES {
        teams.push(Team::new(id, format!("Team {}", id), format!("T{:02}", id.0)));
    }

    let playoffs = vec![Playoff {
        id: PlayoffId::from("path-d"),
        name: "Playoff path D".to_string(),
        candidates: PLAYOFF_CANDIDATES.to_vec(),
    }];

    (teams, groups, playoffs, bracket(), combinations())
}

pub(crate) fn reference() -> TournamentReference {
    let (teams, groups, playoffs, bracket, combos) = reference_parts();
    TournamentReference::new(teams, groups, playoffs, bracket, combos).unwrap()
}

/// Complete scores finishing in roster order on 9/6/3/0 points.
///
/// With `strong_third` the third-placed team ends on goal difference 0
/// instead of -2, so it outranks the third of a regular group.
pub(crate) fn complete_scores(strong_third: bool) -> GroupScores {
    let third_beats_fourth = if strong_third { 3 } else { 1 };
    [
        (1, 2, 0),
        (2, third_beats_fourth, 0),
        (3, 3, 1),
        (4, 2, 0),
        (5, 0, 1),
        (6, 1, 0),
    ]
    .iter()
    .map(|&(n, a, b)| (n, MatchScore::new(a, b)))
    .collect()
}

/// Every group complete, with groups E-L supplying the best thirds.
pub(crate) fn full_prediction() -> PredictionState {
    let mut state = PredictionState::new();
    for c in GROUP_LETTERS.chars() {
        state.groups.insert(
            letter(c),
            GroupPrediction {
                scores: complete_scores(c >= 'E'),
                ..Default::default()
            },
        );
    }
    state
}

/// Group results fixed in advance, for exercising the bracket on its own.
#[derive(Debug, Clone)]
pub(crate) struct FixedGroups {
    pub order: BTreeMap<GroupLetter, Vec<TeamId>>,
    pub combination: Option<ThirdPlaceCombination>,
}

impl FixedGroups {
    /// Every group finishes in roster order; thirds from E-L qualify.
    pub fn seeded() -> Self {
        Self {
            order: GROUP_LETTERS
                .chars()
                .map(|c| (letter(c), roster_ids(letter(c)).to_vec()))
                .collect(),
            combination: Some(combination("EFGHIJKL")),
        }
    }

    pub fn swap_top_two(&mut self, group: GroupLetter) {
        if let Some(order) = self.order.get_mut(&group) {
            order.swap(0, 1);
        }
    }

    pub fn override_slot(&mut self, slot: &str, group: GroupLetter) {
        if let Some(combination) = self.combination.as_mut() {
            combination.assignments.insert(slot.to_string(), group);
        }
    }
}

impl GroupSlots for FixedGroups {
    fn group_team(&self, group: GroupLetter, index: usize) -> Option<TeamId> {
        self.order.get(&group)?.get(index).copied()
    }

    fn third_place_group(&self, slot: &str) -> Option<GroupLetter> {
        self.combination.as_ref()?.letter_for(slot)
    }
}

pub(crate) fn first_third_place_match(topology: &BracketTopology) -> MatchId {
    topology
        .matches()
        .iter()
        .find(|m| matches!(m.team_b, SlotSource::ThirdPlace { .. }))
        .map(|m| m.id)
        .unwrap()
}

pub(crate) fn third_place_slot_of(topology: &BracketTopology, id: MatchId) -> String {
    match &topology.get(id).unwrap().team_b {
        SlotSource::ThirdPlace { slot, .. } => slot.clone(),
        other => panic!("{} has no third-place slot: {:?}", id, other),
    }
}

pub(crate) fn third_place_pool_of(topology: &BracketTopology, id: MatchId) -> Vec<GroupLetter> {
    match &topology.get(id).unwrap().team_b {
        SlotSource::ThirdPlace { pool, .. } => pool.clone(),
        other => panic!("{} has no third-place slot: {:?}", id, other),
    }
}
