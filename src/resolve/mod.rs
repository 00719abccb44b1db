//! Resolution facade.
//!
//! Composes the calculators and the bracket graph over one prediction state:
//! - `Predictor::evaluate` answers "who is at slot S" and progress counters
//! - The `Predictor` mutations validate input and return the picks they removed

mod evaluation;
mod predictor;

pub use evaluation::{Completeness, Evaluation, GroupOutcome, Progress, SlotRef};
pub use predictor::{PredictionError, Predictor};
