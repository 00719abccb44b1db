//! Identifiers for teams, groups, matches and playoffs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Integer identity of a team in the reference roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a knockout match (e.g. 73..=104 for a 32-match bracket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Identifier of an intercontinental / continental playoff whose winner
/// fills a placeholder roster slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayoffId(String);

impl PlayoffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayoffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayoffId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A group letter, always an ASCII uppercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct GroupLetter(char);

impl GroupLetter {
    /// Build a letter, accepting lowercase input.
    pub fn new(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        upper.is_ascii_uppercase().then_some(Self(upper))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for GroupLetter {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c).ok_or_else(|| format!("invalid group letter '{}'", c))
    }
}

impl From<GroupLetter> for char {
    fn from(letter: GroupLetter) -> Self {
        letter.0
    }
}

impl fmt::Display for GroupLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic signature of a set of tied teams.
///
/// Order-independent: the ids are sorted before hashing, so the same tied
/// set always yields the same signature.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieSignature(String);

impl TieSignature {
    /// Generate a signature from team ids.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(team_ids: &[TeamId]) -> Self {
        let mut ids: Vec<TeamId> = team_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut hasher = Sha256::new();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(id.0.to_string().as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TieSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TieSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TieSignature({})", self.0)
    }
}
