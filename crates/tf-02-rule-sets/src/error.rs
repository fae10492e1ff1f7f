//! Error types for rule-set ingestion

use std::path::PathBuf;

use tf_01_text_triggers::FilterError;
use thiserror::Error;

/// Errors that abort a rule-set load
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("Rule-set source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("List path escapes the rule-set: {0}")]
    InvalidPath(String),

    #[error("Category limit reached; cannot add {name}")]
    CategoryCapacity { name: String },

    #[error("Trigger engine error: {0}")]
    Filter(#[from] FilterError),
}

impl RuleSetError {
    pub(crate) fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        RuleSetError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
