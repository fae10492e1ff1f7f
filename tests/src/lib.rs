//! # Trigger-Filter Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Rule-set directories and zips on disk
//! └── integration/      # Cross-crate flows
//!     ├── matching.rs   # Engine properties over loaded rule-sets
//!     └── reload.rs     # Generation swap under load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tf-tests
//! cargo test -p tf-tests integration::reload
//!
//! # Benchmarks
//! cargo bench -p tf-tests
//! ```

pub mod fixtures;
pub mod integration;
