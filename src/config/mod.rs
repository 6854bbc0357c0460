//! Pipeline configuration
//!
//! Every policy value of the cleaning run lives in [`PipelineConfig`]. A
//! configuration can be built in code, read from a YAML or TOML file, and
//! overridden from `PANELCLEAN_*` environment variables.
//!
//! # Configuration
//!
//! ```rust
//! use panelclean::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .max_missing(12)
//!     .zero_policy(true)
//!     .activity_threshold(10.0)
//!     .excluded_entity("10905")
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! ```

pub mod loader;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Settings of the low-activity zero policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroPolicyConfig {
    /// Off unless the dataset's gaps plausibly mean "no activity"
    pub enabled: bool,
    /// Observed values must sum to less than this
    pub activity_threshold: f64,
    /// At most this many observed years
    pub low_count_threshold: usize,
    /// Inclusive range of missing counts the policy applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_band: Option<(usize, usize)>,
}

impl Default for ZeroPolicyConfig {
    fn default() -> Self {
        ZeroPolicyConfig {
            enabled: false,
            activity_threshold: 10.0,
            low_count_threshold: 2,
            missing_band: None,
        }
    }
}

/// Configuration of a cleaning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Furthest neighbor, in years, used to correct an outlier
    pub max_radius: usize,
    /// Most missing years an entity may have and still be kept
    pub max_missing: usize,
    /// IQR fence multiplier
    pub iqr_multiplier: f64,
    /// Entity keys removed before the quality gate
    pub excluded_entities: Vec<String>,
    /// Years removed from the axis before any stage
    pub excluded_years: Vec<i32>,
    /// Process entities on the rayon pool
    pub parallel: bool,
    pub zero_policy: ZeroPolicyConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_radius: 5,
            max_missing: 6,
            iqr_multiplier: 1.5,
            excluded_entities: Vec::new(),
            excluded_years: Vec::new(),
            parallel: false,
            zero_policy: ZeroPolicyConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a builder starting from the defaults
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Checks every value; see [`validation::validate_config`]
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Reads a YAML or TOML file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path.as_ref())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigParse(format!("Failed to serialize config to YAML: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| Error::ConfigParse(format!("Failed to serialize config to TOML: {}", e)))
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_radius(mut self, radius: usize) -> Self {
        self.config.max_radius = radius;
        self
    }

    pub fn max_missing(mut self, max: usize) -> Self {
        self.config.max_missing = max;
        self
    }

    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.config.iqr_multiplier = multiplier;
        self
    }

    /// Enables or disables the zero policy
    pub fn zero_policy(mut self, enabled: bool) -> Self {
        self.config.zero_policy.enabled = enabled;
        self
    }

    pub fn activity_threshold(mut self, threshold: f64) -> Self {
        self.config.zero_policy.activity_threshold = threshold;
        self
    }

    pub fn low_count_threshold(mut self, count: usize) -> Self {
        self.config.zero_policy.low_count_threshold = count;
        self
    }

    pub fn missing_band(mut self, low: usize, high: usize) -> Self {
        self.config.zero_policy.missing_band = Some((low, high));
        self
    }

    pub fn excluded_entity<K: Into<String>>(mut self, key: K) -> Self {
        self.config.excluded_entities.push(key.into());
        self
    }

    pub fn excluded_entities<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.config
            .excluded_entities
            .extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn excluded_year(mut self, year: i32) -> Self {
        self.config.excluded_years.push(year);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Builds without validating; the orchestrator validates on construction
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_radius, 5);
        assert_eq!(config.max_missing, 6);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert!(!config.zero_policy.enabled);
        assert_eq!(config.zero_policy.activity_threshold, 10.0);
        assert_eq!(config.zero_policy.low_count_threshold, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::builder()
            .max_radius(3)
            .max_missing(12)
            .zero_policy(true)
            .missing_band(11, 12)
            .excluded_entities(["10905", "18915"])
            .excluded_year(2020)
            .parallel(true)
            .build();

        assert_eq!(config.max_radius, 3);
        assert_eq!(config.max_missing, 12);
        assert!(config.zero_policy.enabled);
        assert_eq!(config.zero_policy.missing_band, Some((11, 12)));
        assert_eq!(config.excluded_entities, vec!["10905", "18915"]);
        assert_eq!(config.excluded_years, vec![2020]);
        assert!(config.parallel);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PipelineConfig::builder().max_missing(9).missing_band(1, 3).build();
        let yaml = config.to_yaml().unwrap();
        let back = loader::load_from_yaml(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::builder()
            .zero_policy(true)
            .excluded_entity("10905")
            .build();
        let text = config.to_toml().unwrap();
        let back = loader::load_from_toml(&text).unwrap();
        assert_eq!(back, config);
    }
}
