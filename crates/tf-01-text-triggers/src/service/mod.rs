//! Service Layer
//!
//! Builds trigger generations and serves queries against the active one.

pub mod generation;
pub mod match_engine;

pub use generation::{GenerationBuilder, GenerationStats, TriggerGeneration};
pub use match_engine::MatchEngine;
