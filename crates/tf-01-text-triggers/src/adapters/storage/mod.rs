//! # Trigger Store Adapters
//!
//! - `InMemoryTriggerStore`: sorted vectors with binary search, the default
//! - `RocksDbTriggerStore`: persistent store, behind the `rocksdb` feature
//!
//! ```toml
//! tf-01-text-triggers = { path = "...", features = ["rocksdb"] }
//! ```

pub mod memory;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

pub use memory::InMemoryTriggerStore;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbStoreConfig, RocksDbTriggerStore};
