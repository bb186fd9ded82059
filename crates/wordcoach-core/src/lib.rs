//! wordcoach-core — answer scoring, lessons, and the practice engine.
//!
//! This crate holds the deterministic speaking scorer (normalization, edit
//! distance, sound-alike rewriting, letter overlap, tier ladder) together
//! with the lesson model, the grading provider seam for writing exercises,
//! and the reports the rest of wordcoach builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod phonetic;
pub mod report;
pub mod results;
pub mod scorer;
pub mod similarity;
pub mod statistics;
pub mod traits;

pub use config::ScoringConfig;
pub use error::ProviderError;
pub use scorer::{classify, Scorer, Tier, Verdict};
