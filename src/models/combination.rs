//! The closed table of legal third-place qualifier combinations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{GroupLetter, ReferenceError};

/// One legal set of qualifying third-place groups, and which bracket slot
/// each of those groups' third-placed team plugs into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPlaceCombination {
    /// Qualifying group letters, sorted (e.g. "ABCDEFGI")
    pub letters: String,

    /// Bracket slot identifier -> group supplying that slot's third-placed team
    pub assignments: BTreeMap<String, GroupLetter>,
}

impl ThirdPlaceCombination {
    pub fn letter_for(&self, slot: &str) -> Option<GroupLetter> {
        self.assignments.get(slot).copied()
    }
}

/// Sort and validate a qualifying-letter string.
///
/// Returns None unless the string holds exactly `width` distinct group letters.
pub fn normalize_letters(raw: &str, width: usize) -> Option<String> {
    let mut letters = BTreeSet::new();
    let mut count = 0;
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        letters.insert(GroupLetter::new(c)?);
        count += 1;
    }
    if count != width || letters.len() != width {
        return None;
    }
    Some(letters.into_iter().map(char::from).collect())
}

/// Indexed, validated combination table.
#[derive(Debug, Clone)]
pub struct CombinationTable {
    rows: Vec<ThirdPlaceCombination>,
    by_letters: HashMap<String, usize>,
    width: usize,
    slots: BTreeSet<String>,
}

impl CombinationTable {
    /// Build the table, checking that every row has the same width and the
    /// same slot identifiers, and that each row assigns exactly its letters.
    pub fn new(rows: Vec<ThirdPlaceCombination>) -> Result<Self, ReferenceError> {
        let Some(first) = rows.first() else {
            return Err(ReferenceError::EmptyCombinationTable);
        };
        let width = first.letters.chars().count();
        let slots: BTreeSet<String> = first.assignments.keys().cloned().collect();

        let mut by_letters = HashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let normalized = normalize_letters(&row.letters, width).ok_or_else(|| {
                ReferenceError::InvalidCombination {
                    letters: row.letters.clone(),
                    reason: format!("expected {} distinct group letters", width),
                }
            })?;
            if normalized != row.letters {
                return Err(ReferenceError::InvalidCombination {
                    letters: row.letters.clone(),
                    reason: "letters must be sorted".to_string(),
                });
            }

            let row_slots: BTreeSet<String> = row.assignments.keys().cloned().collect();
            if row_slots != slots {
                return Err(ReferenceError::InvalidCombination {
                    letters: row.letters.clone(),
                    reason: "slot identifiers differ from the rest of the table".to_string(),
                });
            }

            let assigned: String = row
                .assignments
                .values()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(char::from)
                .collect();
            if assigned != row.letters || row.assignments.len() != width {
                return Err(ReferenceError::InvalidCombination {
                    letters: row.letters.clone(),
                    reason: "assignments must use each qualifying letter exactly once".to_string(),
                });
            }

            if by_letters.insert(row.letters.clone(), index).is_some() {
                return Err(ReferenceError::InvalidCombination {
                    letters: row.letters.clone(),
                    reason: "duplicate row".to_string(),
                });
            }
        }

        Ok(Self {
            rows,
            by_letters,
            width,
            slots,
        })
    }

    /// Exact lookup of a sorted letter string. Never falls back to a nearby row.
    pub fn lookup(&self, letters: &str) -> Option<&ThirdPlaceCombination> {
        self.by_letters.get(letters).map(|&i| &self.rows[i])
    }

    /// Number of qualifying letters per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.contains(slot)
    }

    pub fn rows(&self) -> &[ThirdPlaceCombination] {
        &self.rows
    }
}
