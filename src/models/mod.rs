//! Core data models for the resolution engine.

mod bracket;
mod combination;
mod ids;
mod prediction;
mod reference;
mod score;
mod stats;
mod team;
mod tie;

pub use bracket::*;
pub use combination::*;
pub use ids::*;
pub use prediction::*;
pub use reference::*;
pub use score::*;
pub use stats::*;
pub use team::*;
pub use tie::*;
