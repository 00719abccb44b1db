//! Read-only tournament reference data, validated once and shared by every call.

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use super::{
    BracketTopology, CombinationTable, GroupDefinition, GroupLetter, KnockoutMatch, MatchId,
    Playoff, PlayoffId, SlotSource, Team, TeamId, ThirdPlaceCombination,
};

/// Malformed static reference data.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Duplicate team id {0}")]
    DuplicateTeam(TeamId),

    #[error("Unknown team {team} referenced by {context}")]
    UnknownTeam { team: TeamId, context: String },

    #[error("Group {0} defined more than once")]
    DuplicateGroup(GroupLetter),

    #[error("Team {team} appears in groups {first} and {second}")]
    TeamInTwoGroups {
        team: TeamId,
        first: GroupLetter,
        second: GroupLetter,
    },

    #[error("Unknown group {group} referenced by {context}")]
    UnknownGroup { group: GroupLetter, context: String },

    #[error("Playoff {0} defined more than once")]
    DuplicatePlayoff(PlayoffId),

    #[error("Unknown playoff {playoff} referenced by team {team}")]
    UnknownPlayoff { playoff: PlayoffId, team: TeamId },

    #[error("Invalid bracket at {match_id}: {reason}")]
    InvalidBracket { match_id: MatchId, reason: String },

    #[error("Third-place combination table is empty")]
    EmptyCombinationTable,

    #[error("Invalid third-place combination {letters}: {reason}")]
    InvalidCombination { letters: String, reason: String },
}

/// Teams, groups, playoffs, bracket topology and the combination table.
#[derive(Debug, Clone)]
pub struct TournamentReference {
    teams: HashMap<TeamId, Team>,
    groups: BTreeMap<GroupLetter, GroupDefinition>,
    playoffs: BTreeMap<PlayoffId, Playoff>,
    topology: BracketTopology,
    combinations: CombinationTable,
}

impl TournamentReference {
    pub fn new(
        teams: Vec<Team>,
        groups: Vec<GroupDefinition>,
        playoffs: Vec<Playoff>,
        bracket: Vec<KnockoutMatch>,
        combinations: Vec<ThirdPlaceCombination>,
    ) -> Result<Self, ReferenceError> {
        let mut team_map = HashMap::with_capacity(teams.len());
        for team in teams {
            let id = team.id;
            if team_map.insert(id, team).is_some() {
                return Err(ReferenceError::DuplicateTeam(id));
            }
        }

        let mut group_map = BTreeMap::new();
        let mut membership: HashMap<TeamId, GroupLetter> = HashMap::new();
        for group in groups {
            for &team in &group.teams {
                if !team_map.contains_key(&team) {
                    return Err(ReferenceError::UnknownTeam {
                        team,
                        context: format!("group {}", group.letter),
                    });
                }
                if let Some(&first) = membership.get(&team) {
                    return Err(ReferenceError::TeamInTwoGroups {
                        team,
                        first,
                        second: group.letter,
                    });
                }
                membership.insert(team, group.letter);
            }
            let letter = group.letter;
            if group_map.insert(letter, group).is_some() {
                return Err(ReferenceError::DuplicateGroup(letter));
            }
        }

        let mut playoff_map = BTreeMap::new();
        for playoff in playoffs {
            for &candidate in &playoff.candidates {
                if !team_map.contains_key(&candidate) {
                    return Err(ReferenceError::UnknownTeam {
                        team: candidate,
                        context: format!("playoff {}", playoff.id),
                    });
                }
            }
            let id = playoff.id.clone();
            if playoff_map.insert(id.clone(), playoff).is_some() {
                return Err(ReferenceError::DuplicatePlayoff(id));
            }
        }
        for team in team_map.values() {
            if let Some(playoff) = &team.playoff {
                if !playoff_map.contains_key(playoff) {
                    return Err(ReferenceError::UnknownPlayoff {
                        playoff: playoff.clone(),
                        team: team.id,
                    });
                }
            }
        }

        let topology = BracketTopology::new(bracket)?;
        let combinations = CombinationTable::new(combinations)?;

        for row in combinations.rows() {
            for c in row.letters.chars() {
                let known = GroupLetter::new(c).is_some_and(|g| group_map.contains_key(&g));
                if !known {
                    return Err(ReferenceError::InvalidCombination {
                        letters: row.letters.clone(),
                        reason: format!("group {} does not exist", c),
                    });
                }
            }
        }
        if combinations.width() > group_map.len() {
            return Err(ReferenceError::InvalidCombination {
                letters: combinations.rows()[0].letters.clone(),
                reason: "more qualifiers than groups".to_string(),
            });
        }

        for m in topology.matches() {
            for source in [&m.team_a, &m.team_b] {
                match source {
                    SlotSource::Group { group, .. } => {
                        if !group_map.contains_key(group) {
                            return Err(ReferenceError::UnknownGroup {
                                group: *group,
                                context: m.id.to_string(),
                            });
                        }
                    }
                    SlotSource::ThirdPlace { slot, pool } => {
                        if let Some(group) = pool.iter().find(|g| !group_map.contains_key(g)) {
                            return Err(ReferenceError::UnknownGroup {
                                group: *group,
                                context: m.id.to_string(),
                            });
                        }
                        if !combinations.has_slot(slot) {
                            return Err(ReferenceError::InvalidBracket {
                                match_id: m.id,
                                reason: format!(
                                    "third-place slot '{}' missing from combination table",
                                    slot
                                ),
                            });
                        }
                    }
                    SlotSource::Match { .. } => {}
                }
            }
        }

        let used: HashSet<&str> = topology.third_place_slots().collect();
        if used.len() != combinations.width() {
            return Err(ReferenceError::InvalidCombination {
                letters: combinations.rows()[0].letters.clone(),
                reason: format!(
                    "bracket uses {} third-place slots but rows assign {}",
                    used.len(),
                    combinations.width()
                ),
            });
        }

        Ok(Self {
            teams: team_map,
            groups: group_map,
            playoffs: playoff_map,
            topology,
            combinations,
        })
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn group(&self, letter: GroupLetter) -> Option<&GroupDefinition> {
        self.groups.get(&letter)
    }

    /// Groups in letter order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupDefinition> {
        self.groups.values()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The four roster teams of a group, in schedule-position order.
    pub fn roster(&self, letter: GroupLetter) -> Option<Vec<&Team>> {
        let group = self.groups.get(&letter)?;
        group.teams.iter().map(|id| self.teams.get(id)).collect()
    }

    pub fn playoff(&self, id: &PlayoffId) -> Option<&Playoff> {
        self.playoffs.get(id)
    }

    pub fn playoffs(&self) -> impl Iterator<Item = &Playoff> {
        self.playoffs.values()
    }

    pub fn topology(&self) -> &BracketTopology {
        &self.topology
    }

    pub fn combinations(&self) -> &CombinationTable {
        &self.combinations
    }

    /// Display name for a team id, falling back to the id itself.
    pub fn team_name(&self, id: TeamId) -> String {
        self.teams
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("team {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_fixture_reference_is_valid() {
        let reference = test_support::reference();
        assert_eq!(reference.group_count(), 12);
        assert_eq!(reference.topology().len(), 32);
        assert_eq!(reference.combinations().width(), 8);
        assert_eq!(reference.roster(test_support::letter('A')).unwrap().len(), 4);
    }

    #[test]
    fn test_team_in_two_groups_rejected() {
        let (teams, mut groups, playoffs, bracket, combos) = test_support::reference_parts();
        groups[1].teams[0] = groups[0].teams[0];
        let result = TournamentReference::new(teams, groups, playoffs, bracket, combos);
        assert!(matches!(result, Err(ReferenceError::TeamInTwoGroups { .. })));
    }

    #[test]
    fn test_unknown_playoff_rejected() {
        let (mut teams, groups, playoffs, bracket, combos) = test_support::reference_parts();
        teams[0].playoff = Some(PlayoffId::from("nowhere"));
        let result = TournamentReference::new(teams, groups, playoffs, bracket, combos);
        assert!(matches!(result, Err(ReferenceError::UnknownPlayoff { .. })));
    }

    #[test]
    fn test_bracket_slot_missing_from_table_rejected() {
        let (teams, groups, playoffs, mut bracket, combos) = test_support::reference_parts();
        for m in bracket.iter_mut() {
            if let SlotSource::ThirdPlace { slot, .. } = &mut m.team_b {
                *slot = "nope".to_string();
                break;
            }
        }
        let result = TournamentReference::new(teams, groups, playoffs, bracket, combos);
        assert!(matches!(result, Err(ReferenceError::InvalidBracket { .. })));
    }
}
