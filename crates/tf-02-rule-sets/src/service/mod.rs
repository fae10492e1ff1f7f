//! Service Layer

pub mod loader;

pub use loader::{load_rule_set, LoadSummary, LoadedRuleSet};
