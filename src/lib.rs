//! # Bracket Predictor
//!
//! Resolution engine for predicting a 48-team, 12-group tournament through a
//! 32-match knockout bracket.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, scores, stats, bracket topology, predictions)
//! - **calculate**: Group standings, tiebreakers and the best-third-place ranking
//! - **bracket**: Knockout slot resolution and cascading invalidation
//! - **resolve**: The facade tying a prediction state to the engine
//! - **storage**: JSON reference data and saved predictions
//! - **config**: Configuration loading and validation

pub mod bracket;
pub mod calculate;
pub mod config;
pub mod models;
pub mod resolve;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use models::*;
