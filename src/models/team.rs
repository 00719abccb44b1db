//! Team, group and playoff reference records.

use serde::{Deserialize, Serialize};

use super::{GroupLetter, PlayoffId, TeamId};

/// A team in the reference roster. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: TeamId,

    /// Display name (e.g., "Argentina")
    pub name: String,

    /// Short code (e.g., "ARG")
    pub code: String,

    /// Flag asset reference
    #[serde(default)]
    pub flag: Option<String>,

    /// Group this team plays in (None for playoff candidates not yet placed)
    #[serde(default)]
    pub group: Option<GroupLetter>,

    /// Set when this roster entry stands in for an undecided playoff winner
    #[serde(default)]
    pub playoff: Option<PlayoffId>,
}

impl Team {
    /// Create a regular (non-placeholder) team.
    pub fn new(id: TeamId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            flag: None,
            group: None,
            playoff: None,
        }
    }

    pub fn in_group(mut self, group: GroupLetter) -> Self {
        self.group = Some(group);
        self
    }

    /// Mark this roster entry as the placeholder for a playoff winner.
    pub fn as_placeholder(mut self, playoff: PlayoffId) -> Self {
        self.playoff = Some(playoff);
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.playoff.is_some()
    }
}

/// Four teams drawn into one group, in schedule-position order (1..=4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub letter: GroupLetter,
    pub teams: [TeamId; 4],
}

impl GroupDefinition {
    /// 1-based schedule position of a team within the group.
    pub fn position_of(&self, team: TeamId) -> Option<usize> {
        self.teams.iter().position(|&t| t == team).map(|i| i + 1)
    }
}

/// A playoff feeding one placeholder roster slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playoff {
    pub id: PlayoffId,

    /// Display name (e.g., "UEFA Path A")
    pub name: String,

    /// Teams that may be chosen as the playoff winner
    pub candidates: Vec<TeamId>,
}

impl Playoff {
    pub fn has_candidate(&self, team: TeamId) -> bool {
        self.candidates.contains(&team)
    }
}
