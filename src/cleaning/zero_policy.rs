//! Zero imputation for entities with negligible activity
//!
//! For some datasets a gap means "nothing happened" rather than "not
//! observed": a village with one or two registered businesses in the few
//! years it appears at all most likely had none in the others. For
//! population-like datasets the same reasoning is wrong, so this policy is
//! only ever applied when enabled for the dataset.

use crate::cleaning::{SeriesTransform, StageEffect};
use crate::config::ZeroPolicyConfig;
use crate::panel::{CellFlag, EntitySeries};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityZeroPolicy {
    activity_threshold: f64,
    low_count_threshold: usize,
    missing_band: Option<(usize, usize)>,
}

impl Default for ActivityZeroPolicy {
    fn default() -> Self {
        ActivityZeroPolicy {
            activity_threshold: 10.0,
            low_count_threshold: 2,
            missing_band: None,
        }
    }
}

impl ActivityZeroPolicy {
    pub fn new(activity_threshold: f64, low_count_threshold: usize) -> Self {
        ActivityZeroPolicy {
            activity_threshold,
            low_count_threshold,
            missing_band: None,
        }
    }

    /// Restricts the policy to entities whose missing count lies in `low..=high`
    pub fn with_missing_band(mut self, low: usize, high: usize) -> Self {
        self.missing_band = Some((low, high));
        self
    }

    pub fn from_config(config: &ZeroPolicyConfig) -> Self {
        ActivityZeroPolicy {
            activity_threshold: config.activity_threshold,
            low_count_threshold: config.low_count_threshold,
            missing_band: config.missing_band,
        }
    }

    /// Whether the series qualifies for zero filling.
    ///
    /// Requires at least one gap and at least one observation: a series with
    /// no observation carries no evidence of low activity.
    pub fn applies_to(&self, series: &EntitySeries) -> bool {
        let missing = series.na_count();
        if missing == 0 {
            return false;
        }
        if let Some((low, high)) = self.missing_band {
            if missing < low || missing > high {
                return false;
            }
        }

        let observed = series.observed();
        if observed.is_empty() {
            return false;
        }

        let sum: f64 = observed.iter().sum();
        sum < self.activity_threshold && observed.len() <= self.low_count_threshold
    }
}

impl SeriesTransform for ActivityZeroPolicy {
    fn name(&self) -> &'static str {
        "zero_policy"
    }

    fn transform(&self, _years: &[i32], series: &mut EntitySeries) -> StageEffect {
        let mut effect = StageEffect::default();
        if !self.applies_to(series) {
            return effect;
        }

        for pos in series.na_positions() {
            series.set(pos, 0.0, CellFlag::ZeroPolicy);
            effect.changed.push((pos, CellFlag::ZeroPolicy));
        }
        effect
    }
}
