//! Domain Layer - Pure matching logic
//!
//! This layer contains:
//! - Markup-aware tokenizer
//! - Bloom filter, hash functions and parameter calculations
//! - The two-filter bloom index
//! - Category enablement gate
//! - Phrase normalisation for loads
//! - Markup state (which words are page text)
//! - Fragment tracking for split phrases
//! - Engine configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bloom_filter;
pub mod bloom_index;
pub mod category_gate;
pub mod config;
pub mod fragments;
pub mod hash_functions;
pub mod markup;
pub mod parameters;
pub mod phrase;
pub mod tokenizer;

pub use bloom_filter::BloomFilter;
pub use bloom_index::BloomIndex;
pub use category_gate::CategoryGate;
pub use config::{EngineConfig, EngineConfigBuilder, QueryErrorPolicy};
pub use fragments::{AdvanceOutcome, Fragment, FragmentSet};
pub use markup::MarkupState;
pub use parameters::{calculate_optimal_parameters, BloomFilterParams, DEFAULT_FILTER_CAPACITY};
pub use phrase::{
    normalize_phrase, prepare_batch, prepare_phrase, LoadReport, PhraseRejection, PreparedPhrase,
    TriggerBatch,
};
pub use tokenizer::{tokenize, words, Token, Tokenizer};
