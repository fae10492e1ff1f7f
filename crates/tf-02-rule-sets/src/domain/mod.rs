//! Domain Layer - category ids and list manifests
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod manifest;
pub mod registry;

pub use manifest::{category_name_for, normalize_list_path, ListEntry, ListManifest};
pub use registry::{CategoryRegistry, BYPASS_WHITELIST_SUFFIX};
