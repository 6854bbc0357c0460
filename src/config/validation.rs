//! Configuration validation
//!
//! Invalid values are fatal: the run aborts before any entity is touched.

use super::{PipelineConfig, ZeroPolicyConfig};
use crate::error::{Error, Result};

/// Validate the entire configuration
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    validate_outlier_settings(config)?;
    validate_zero_policy(&config.zero_policy)?;
    Ok(())
}

fn validate_outlier_settings(config: &PipelineConfig) -> Result<()> {
    if config.max_radius == 0 {
        return Err(Error::InvalidConfiguration(
            "max_radius must be at least 1".to_string(),
        ));
    }

    if !config.iqr_multiplier.is_finite() || config.iqr_multiplier <= 0.0 {
        return Err(Error::InvalidConfiguration(format!(
            "iqr_multiplier must be a positive number, got {}",
            config.iqr_multiplier
        )));
    }

    Ok(())
}

/// Thresholds are checked even when the policy is disabled, so that
/// enabling it later from the environment cannot surface a bad file value.
pub fn validate_zero_policy(config: &ZeroPolicyConfig) -> Result<()> {
    if !config.activity_threshold.is_finite() {
        return Err(Error::InvalidConfiguration(format!(
            "activity_threshold must be finite, got {}",
            config.activity_threshold
        )));
    }

    if let Some((low, high)) = config.missing_band {
        if low > high {
            return Err(Error::InvalidConfiguration(format!(
                "missing_band lower bound {} exceeds upper bound {}",
                low, high
            )));
        }
    }

    Ok(())
}
