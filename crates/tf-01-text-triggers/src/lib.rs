//! # TF-01 Text Triggers
//!
//! Phrase ("trigger") detection inside page text for the content filter,
//! including phrases split by markup to evade naive substring search.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `Tokenizer`: single-pass, markup-aware token stream
//!   - `BloomFilter` / `BloomIndex`: first-word and whole-phrase pre-filters
//!   - `CategoryGate`: lock-free enablement bitmap
//!   - `MarkupState`, `FragmentSet`: scan state for split phrases
//!   - `EngineConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `TriggerMatcher`: Driving port (query API)
//!   - `TriggerStore`: Driven port (exact-match index)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `GenerationBuilder`: load, finalize, build blooms, enable categories
//!   - `MatchEngine`: implements `TriggerMatcher` over a swappable generation
//!
//! - **Adapters Layer** (`adapters/`): Store backends
//!   - `InMemoryTriggerStore`: sorted vectors, binary search
//!   - `RocksDbTriggerStore`: persistent, behind the `rocksdb` feature
//!
//! ## Invariants
//!
//! - Both bloom filters are supersets of the store contents they were built from
//! - The category gate is fixed-size and never resized
//! - Store, blooms and gate are swapped as one generation; queries never
//!   observe a partially loaded rule-set
//!
//! ## Usage Example
//!
//! ```ignore
//! use tf_01_text_triggers::{
//!     EngineConfig, GenerationBuilder, InMemoryTriggerStore, MatchEngine, TriggerMatcher,
//! };
//!
//! let config = EngineConfig::default();
//! let mut builder = GenerationBuilder::new(InMemoryTriggerStore::new(), &config);
//! builder.load_batch(1, ["badword", "kill the president"])?;
//! let engine = MatchEngine::new(config, builder.finish()?)?;
//!
//! let found = engine.contains_trigger("kill <b>the</b> president", &|_| true, true, 5)?;
//! assert_eq!(found.unwrap().category, 1);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryTriggerStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbStoreConfig, RocksDbTriggerStore};
pub use domain::{
    BloomFilter, BloomIndex, CategoryGate, EngineConfig, EngineConfigBuilder, LoadReport,
    QueryErrorPolicy,
};
pub use error::{FilterError, StoreError};
pub use metrics::{EngineMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{TriggerMatcher, TriggerStore};
pub use service::{GenerationBuilder, GenerationStats, MatchEngine, TriggerGeneration};
