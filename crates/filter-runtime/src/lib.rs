//! # Filter Runtime
//!
//! Wires configuration, rule-set loading and the trigger engine into one
//! long-lived service object.
//!
//! ## Modular Structure
//!
//! - `config` - TOML file plus environment overrides
//! - `store` - store backend chosen by configuration
//! - `runtime` - live engine, registry, reload
//! - `classifier` - response body to block verdict
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from file/env)
//! 2. Initialise logging
//! 3. Load the rule-set into generation 0 on the blocking pool
//! 4. Serve queries; reloads build the next generation off to the side

pub mod classifier;
pub mod config;
pub mod runtime;
pub mod store;

pub use classifier::{BlockVerdict, ContentClassifier};
pub use config::{ConfigError, RuntimeConfig, StorageBackendKind};
pub use runtime::{FilterRuntime, RuntimeError};
pub use store::StoreBackend;
