//! Trigger store backend selection
//!
//! Every generation gets a fresh store. RocksDB stores live in numbered
//! `gen-<n>` directories under the configured path so a new generation can
//! be written while the previous one still serves queries. A generation
//! directory is deleted when the last reference to its store is dropped.

use shared_types::{CategoryId, FirstWordHit};
use tf_01_text_triggers::domain::TriggerBatch;
use tf_01_text_triggers::{InMemoryTriggerStore, StoreError, TriggerStore};
#[cfg(feature = "rocksdb")]
use tf_01_text_triggers::{RocksDbStoreConfig, RocksDbTriggerStore};

use crate::config::{StorageBackendKind, StorageConfig};

/// The store implementation picked by configuration.
pub enum StoreBackend {
    Memory(InMemoryTriggerStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbTriggerStore),
}

impl StoreBackend {
    /// Empty store for generation number `generation`.
    pub fn create(config: &StorageConfig, generation: u64) -> Result<Self, StoreError> {
        match config.backend {
            StorageBackendKind::Memory => Ok(StoreBackend::Memory(InMemoryTriggerStore::new())),
            #[cfg(feature = "rocksdb")]
            StorageBackendKind::Rocksdb => {
                let path = config.path.join(format!("gen-{generation}"));
                Ok(StoreBackend::RocksDb(RocksDbTriggerStore::create(
                    RocksDbStoreConfig::new(path).remove_on_drop(true),
                )?))
            }
            #[cfg(not(feature = "rocksdb"))]
            StorageBackendKind::Rocksdb => {
                let _ = generation;
                Err(StoreError::Io(
                    "rocksdb backend requested but not compiled in".to_string(),
                ))
            }
        }
    }

    /// On-disk location, for backends that have one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StoreBackend::Memory(_) => None,
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb(store) => Some(store.path()),
        }
    }
}

macro_rules! delegate {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            StoreBackend::Memory($store) => $call,
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb($store) => $call,
        }
    };
}

impl TriggerStore for StoreBackend {
    fn write_batch(&mut self, batch: TriggerBatch) -> Result<(), StoreError> {
        delegate!(self, store => store.write_batch(batch))
    }

    fn finalize_for_read(&mut self) -> Result<(), StoreError> {
        delegate!(self, store => store.finalize_for_read())
    }

    fn lookup_all(&self, phrase: &str) -> Result<Vec<CategoryId>, StoreError> {
        delegate!(self, store => store.lookup_all(phrase))
    }

    fn lookup_first_word(&self, word: &str) -> Result<Vec<FirstWordHit>, StoreError> {
        delegate!(self, store => store.lookup_first_word(word))
    }

    fn trigger_count(&self) -> usize {
        delegate!(self, store => store.trigger_count())
    }

    fn first_word_count(&self) -> usize {
        delegate!(self, store => store.first_word_count())
    }

    fn for_each_phrase(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        delegate!(self, store => store.for_each_phrase(visit))
    }

    fn for_each_first_word(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        delegate!(self, store => store.for_each_first_word(visit))
    }
}
