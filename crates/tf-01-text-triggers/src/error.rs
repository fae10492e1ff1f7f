//! Error types for the text trigger engine

use shared_types::CategoryId;
use thiserror::Error;

/// Errors surfaced by the engine and its generation builder
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Trigger store error: {0}")]
    Store(#[from] StoreError),

    #[error("Category id out of range: {id} >= {capacity}")]
    CategoryOutOfRange { id: CategoryId, capacity: usize },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from trigger store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupted store record: {0}")]
    Corruption(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

#[cfg(feature = "rocksdb")]
impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Io(err.into_string())
    }
}
