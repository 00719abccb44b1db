//! Standings calculation engine.
//!
//! Pure computations over a snapshot of predicted scores:
//! - Group standings with the tiebreak cascade
//! - Cross-group ranking of third-placed teams
//! - Validation of the qualifying third-place combination

mod standings;
mod third_place;
pub mod tiebreaker;

pub use standings::{compute_standings, is_group_complete, GroupStandings};
pub use third_place::{
    select_best_third, ThirdPlaceCandidate, ThirdPlaceEntry, ThirdPlaceSelection,
    ThirdPlaceStatus,
};
