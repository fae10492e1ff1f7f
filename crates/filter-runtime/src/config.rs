//! # Runtime Configuration
//!
//! Engine, rule-set, storage and logging settings, read from a TOML file and
//! then overridden from the environment.
//!
//! ## Config File Format
//!
//! ```toml
//! [engine]
//! bloom_fpr = 0.01
//! max_fragment_len = 5
//! query_error_policy = "fail_open"
//!
//! [rules]
//! source = "/etc/filter/rules.zip"
//!
//! [[rules.lists]]
//! path = "adult/triggers.txt"
//! kind = "triggers"
//!
//! [storage]
//! backend = "memory"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## Environment Overrides
//!
//! `TF_RULES_SOURCE`, `TF_MAX_FRAGMENT_LEN`, `TF_QUERY_ERROR_POLICY`,
//! `TF_LOG_LEVEL`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tf_01_text_triggers::{EngineConfig, QueryErrorPolicy};
use tf_02_rule_sets::{ListEntry, ListManifest};
use tracing::info;

pub const ENV_RULES_SOURCE: &str = "TF_RULES_SOURCE";
pub const ENV_MAX_FRAGMENT_LEN: &str = "TF_MAX_FRAGMENT_LEN";
pub const ENV_QUERY_ERROR_POLICY: &str = "TF_QUERY_ERROR_POLICY";
pub const ENV_LOG_LEVEL: &str = "TF_LOG_LEVEL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub rules: RulesConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Where the rule-set lives and which lists it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory or `.zip` archive.
    pub source: PathBuf,
    /// Lists to load; empty means every `.txt` file is a trigger list.
    pub lists: Vec<ListEntry>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("./rules"),
            lists: Vec::new(),
        }
    }
}

impl RulesConfig {
    pub fn manifest(&self) -> ListManifest {
        ListManifest::new(self.lists.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Memory,
    Rocksdb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    /// Parent directory of the per-generation RocksDB stores.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Memory,
            path: PathBuf::from("./data/triggers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load a TOML file, or the defaults when `path` is `None`, then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    error: e.to_string(),
                })?;
                Self::parse(&content)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override settings from `var`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = var(ENV_RULES_SOURCE) {
            info!(source = %source, "Rule-set source overridden from environment");
            self.rules.source = PathBuf::from(source);
        }

        if let Some(len) = var(ENV_MAX_FRAGMENT_LEN) {
            self.engine.max_fragment_len = len.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_MAX_FRAGMENT_LEN,
                message: format!("not a word count: {len}"),
            })?;
        }

        if let Some(policy) = var(ENV_QUERY_ERROR_POLICY) {
            self.engine.query_error_policy =
                policy.parse::<QueryErrorPolicy>().map_err(|e| ConfigError::Invalid {
                    key: ENV_QUERY_ERROR_POLICY,
                    message: e.to_string(),
                })?;
        }

        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(|e| ConfigError::Invalid {
            key: "engine",
            message: e.to_string(),
        })?;

        if self.storage.backend == StorageBackendKind::Rocksdb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::Invalid {
                key: "storage.backend",
                message: "built without the rocksdb feature".to_string(),
            });
        }
        Ok(())
    }
}
