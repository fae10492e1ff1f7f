//! Engine configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use tf_01_text_triggers::domain::EngineConfigBuilder;
//!
//! let config = EngineConfigBuilder::new()
//!     .bloom_fpr(0.01)
//!     .max_fragment_len(5)
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::error::FilterError;
use serde::{Deserialize, Serialize};

/// What a query does when the trigger store fails mid-scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorPolicy {
    /// Log the failure and treat that lookup as a miss.
    #[default]
    FailOpen,
    /// Return the store error to the caller, which should block.
    FailClosed,
}

impl std::str::FromStr for QueryErrorPolicy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_open" | "open" => Ok(QueryErrorPolicy::FailOpen),
            "fail_closed" | "closed" => Ok(QueryErrorPolicy::FailClosed),
            other => Err(FilterError::InvalidConfig(format!(
                "unknown query error policy: {other}"
            ))),
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target false positive rate of both bloom filters, in (0, 0.5]
    pub bloom_fpr: f64,
    /// Longest phrase, in words, that fragment rebuild can reassemble
    pub max_fragment_len: usize,
    /// Fragments tracked at once; the oldest is evicted when full
    pub max_in_flight_fragments: usize,
    pub query_error_policy: QueryErrorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bloom_fpr: 0.01,
            max_fragment_len: 5,
            max_in_flight_fragments: 64,
            query_error_policy: QueryErrorPolicy::FailOpen,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(self.bloom_fpr > 0.0 && self.bloom_fpr <= 0.5) {
            return Err(FilterError::InvalidConfig(format!(
                "bloom_fpr must be in (0, 0.5], got {}",
                self.bloom_fpr
            )));
        }

        if self.max_fragment_len == 0 {
            return Err(FilterError::InvalidConfig(
                "max_fragment_len cannot be 0".to_string(),
            ));
        }

        if self.max_in_flight_fragments == 0 {
            return Err(FilterError::InvalidConfig(
                "max_in_flight_fragments cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Fragment rebuild only makes sense for windows longer than one word.
    pub fn allows_fragment_rebuild(&self) -> bool {
        self.max_fragment_len > 1
    }
}

/// Builder for EngineConfig with validation
#[derive(Default)]
pub struct EngineConfigBuilder {
    bloom_fpr: Option<f64>,
    max_fragment_len: Option<usize>,
    max_in_flight_fragments: Option<usize>,
    query_error_policy: Option<QueryErrorPolicy>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bloom_fpr(mut self, fpr: f64) -> Self {
        self.bloom_fpr = Some(fpr);
        self
    }

    pub fn max_fragment_len(mut self, len: usize) -> Self {
        self.max_fragment_len = Some(len);
        self
    }

    pub fn max_in_flight_fragments(mut self, count: usize) -> Self {
        self.max_in_flight_fragments = Some(count);
        self
    }

    pub fn query_error_policy(mut self, policy: QueryErrorPolicy) -> Self {
        self.query_error_policy = Some(policy);
        self
    }

    /// Build the EngineConfig, validating all parameters
    pub fn build(self) -> Result<EngineConfig, FilterError> {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            bloom_fpr: self.bloom_fpr.unwrap_or(defaults.bloom_fpr),
            max_fragment_len: self.max_fragment_len.unwrap_or(defaults.max_fragment_len),
            max_in_flight_fragments: self
                .max_in_flight_fragments
                .unwrap_or(defaults.max_in_flight_fragments),
            query_error_policy: self.query_error_policy.unwrap_or(defaults.query_error_policy),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.allows_fragment_rebuild());
        assert_eq!(config.query_error_policy, QueryErrorPolicy::FailOpen);
    }

    #[test]
    fn test_config_validation_rejects_bad_fpr() {
        for fpr in [0.0, -0.1, 0.51, f64::NAN] {
            let config = EngineConfig {
                bloom_fpr: fpr,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(FilterError::InvalidConfig(_))),
                "fpr {} should be rejected",
                fpr
            );
        }
    }

    #[test]
    fn test_config_validation_rejects_zero_limits() {
        let config = EngineConfig {
            max_fragment_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_in_flight_fragments: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_word_window_disables_rebuild() {
        let config = EngineConfigBuilder::new().max_fragment_len(1).build().unwrap();
        assert!(!config.allows_fragment_rebuild());
    }

    #[test]
    fn test_builder_creates_valid_config() {
        let config = EngineConfigBuilder::new()
            .bloom_fpr(0.001)
            .max_fragment_len(8)
            .max_in_flight_fragments(16)
            .query_error_policy(QueryErrorPolicy::FailClosed)
            .build()
            .expect("Should create valid config");

        assert_eq!(config.bloom_fpr, 0.001);
        assert_eq!(config.max_fragment_len, 8);
        assert_eq!(config.max_in_flight_fragments, 16);
        assert_eq!(config.query_error_policy, QueryErrorPolicy::FailClosed);
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = EngineConfigBuilder::new()
            .max_fragment_len(3)
            .build()
            .expect("Should use defaults for other fields");

        let defaults = EngineConfig::default();
        assert_eq!(config.bloom_fpr, defaults.bloom_fpr);
        assert_eq!(config.max_in_flight_fragments, defaults.max_in_flight_fragments);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("fail_open".parse::<QueryErrorPolicy>().unwrap(), QueryErrorPolicy::FailOpen);
        assert_eq!("Fail-Closed".parse::<QueryErrorPolicy>().unwrap(), QueryErrorPolicy::FailClosed);
        assert!("maybe".parse::<QueryErrorPolicy>().is_err());
    }

    #[test]
    fn test_serde_partial_table_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"max_fragment_len": 2, "query_error_policy": "fail_closed"}"#)
                .unwrap();
        assert_eq!(config.max_fragment_len, 2);
        assert_eq!(config.query_error_policy, QueryErrorPolicy::FailClosed);
        assert_eq!(config.bloom_fpr, 0.01);
    }
}
