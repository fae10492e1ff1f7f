//! # TF-02 Rule Sets
//!
//! Turns a rule-set (a directory or zip of plain-text lists) into a loaded
//! trigger generation for `tf-01-text-triggers`.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `CategoryRegistry`: list name to category id, case-insensitive
//!   - `ListManifest`: which lists exist and what kind each one is
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ListSource`: Driven port (read a list by relative path)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `load_rule_set`: manifest walk, id assignment, batch loading
//!
//! - **Adapters Layer** (`adapters/`): List sources
//!   - `DirectorySource`, `ZipSource`, `RuleSetSource`
//!
//! ## Usage Example
//!
//! ```ignore
//! use tf_01_text_triggers::{EngineConfig, InMemoryTriggerStore};
//! use tf_02_rule_sets::{load_rule_set, ListManifest, RuleSetSource};
//!
//! let mut source = RuleSetSource::open("rules.zip")?;
//! let loaded = load_rule_set(
//!     &mut source,
//!     &ListManifest::default(),
//!     InMemoryTriggerStore::new(),
//!     &EngineConfig::default(),
//! )?;
//! println!("{} categories", loaded.registry.len());
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{DirectorySource, RuleSetSource, ZipSource};
pub use domain::{category_name_for, CategoryRegistry, ListEntry, ListManifest};
pub use error::RuleSetError;
pub use ports::ListSource;
pub use service::{load_rule_set, LoadSummary, LoadedRuleSet};
