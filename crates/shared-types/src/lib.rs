//! # Shared Types Crate
//!
//! This crate contains the value types exchanged between the trigger engine
//! (`tf-01-text-triggers`), the rule-set loader (`tf-02-rule-sets`) and the
//! runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: category ids, trigger rows and match results
//!   are defined once, here.
//! - **Fixed Category Space**: ids live in `[0, MAX_CATEGORIES)`. Anything
//!   outside that range is rejected at the assignment layer.

pub mod entities;

pub use entities::*;
