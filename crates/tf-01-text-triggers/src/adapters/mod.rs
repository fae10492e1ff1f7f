//! Adapters Layer
//!
//! Concrete implementations of the driven ports.

pub mod storage;

pub use storage::InMemoryTriggerStore;

#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbStoreConfig, RocksDbTriggerStore};
