//! IQR outlier detection and nearest-neighbor correction

use log::{trace, warn};

use crate::cleaning::{SeriesTransform, StageEffect};
use crate::na::NA;
use crate::panel::{CellFlag, EntitySeries};
use crate::stats::IqrFence;

/// Minimum number of observed values before a series is judged
pub const MIN_OBSERVATIONS: usize = 4;

/// Flags values outside the interquartile-range fence of their own series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierDetector {
    multiplier: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        OutlierDetector { multiplier: 1.5 }
    }
}

impl OutlierDetector {
    /// Creates a detector with a custom fence multiplier
    pub fn new(multiplier: f64) -> Self {
        OutlierDetector { multiplier }
    }

    /// Fence multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Boolean mask over the series positions; missing cells are never flagged.
    ///
    /// Nothing is flagged when fewer than [`MIN_OBSERVATIONS`] values are
    /// observed or when the IQR is zero.
    pub fn detect(&self, series: &EntitySeries) -> Vec<bool> {
        let mut mask = vec![false; series.len()];
        let observed = series.observed();
        if observed.len() < MIN_OBSERVATIONS {
            return mask;
        }

        let fence = match IqrFence::from_values(&observed, self.multiplier) {
            Ok(fence) => fence,
            Err(_) => return mask,
        };
        if fence.iqr() == 0.0 {
            return mask;
        }

        for (pos, cell) in series.values().iter().enumerate() {
            if let NA::Value(v) = cell {
                mask[pos] = fence.is_outside(*v);
            }
        }
        mask
    }
}

/// Replaces flagged values with the mean of the closest valid neighbors
///
/// The search widens one year at a time on both sides and stops at the
/// first radius that yields any valid neighbor, even if only one side
/// has one. A neighbor is valid when it is observed and not flagged.
/// Radii are measured in years, so a year missing from the axis is never
/// stood in for by the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborCorrector {
    max_radius: usize,
}

impl Default for NeighborCorrector {
    fn default() -> Self {
        NeighborCorrector { max_radius: 5 }
    }
}

impl NeighborCorrector {
    /// Creates a corrector searching up to `max_radius` years away
    pub fn new(max_radius: usize) -> Self {
        NeighborCorrector { max_radius }
    }

    /// Maximum search radius
    pub fn max_radius(&self) -> usize {
        self.max_radius
    }

    /// Replacement value for a flagged position, if any neighbor qualifies.
    ///
    /// `years` is the year axis aligned with the series positions.
    pub fn replacement(
        &self,
        series: &EntitySeries,
        years: &[i32],
        mask: &[bool],
        pos: usize,
    ) -> Option<f64> {
        let year = *years.get(pos)?;
        let valid = |target: i32| -> Option<f64> {
            let idx = years.binary_search(&target).ok()?;
            if mask.get(idx).copied().unwrap_or(true) {
                return None;
            }
            series.get(idx).and_then(|cell| cell.to_option())
        };

        for r in 1..=self.max_radius as i32 {
            let neighbors: Vec<f64> = valid(year - r).into_iter().chain(valid(year + r)).collect();
            if !neighbors.is_empty() {
                return Some(neighbors.iter().sum::<f64>() / neighbors.len() as f64);
            }
        }
        None
    }

    /// Corrects every flagged position. Replacements are computed from the
    /// uncorrected series so the order of correction does not matter.
    pub fn correct(&self, series: &mut EntitySeries, years: &[i32], mask: &[bool]) -> StageEffect {
        let mut effect = StageEffect::default();
        let flagged: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag)
            .map(|(i, _)| i)
            .collect();
        if flagged.is_empty() {
            return effect;
        }

        let replacements: Vec<(usize, Option<f64>)> = flagged
            .iter()
            .map(|&pos| (pos, self.replacement(series, years, mask, pos)))
            .collect();

        for (pos, replacement) in replacements {
            match replacement {
                Some(value) => {
                    series.set(pos, value, CellFlag::OutlierCorrected);
                    effect.changed.push((pos, CellFlag::OutlierCorrected));
                }
                None => {
                    trace!("No valid neighbor within {} years of position {}", self.max_radius, pos);
                    effect.skipped.push(pos);
                }
            }
        }
        effect
    }
}

/// Detection followed by correction, as one stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutlierCorrection {
    pub detector: OutlierDetector,
    pub corrector: NeighborCorrector,
}

impl OutlierCorrection {
    pub fn new(multiplier: f64, max_radius: usize) -> Self {
        OutlierCorrection {
            detector: OutlierDetector::new(multiplier),
            corrector: NeighborCorrector::new(max_radius),
        }
    }
}

impl SeriesTransform for OutlierCorrection {
    fn name(&self) -> &'static str {
        "outlier_correction"
    }

    /// Leaves the series untouched when `years` is not aligned with it
    fn transform(&self, years: &[i32], series: &mut EntitySeries) -> StageEffect {
        if years.len() != series.len() {
            warn!(
                "outlier_correction: year axis has {} years, series has {} cells",
                years.len(),
                series.len()
            );
            return StageEffect::default();
        }
        let mask = self.detector.detect(series);
        self.corrector.correct(series, years, &mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[Option<f64>]) -> EntitySeries {
        EntitySeries::from_options(values.to_vec())
    }

    fn axis(len: usize) -> Vec<i32> {
        (2000..2000 + len as i32).collect()
    }

    #[test]
    fn test_detects_single_spike() {
        let s = EntitySeries::from_vec(vec![10.0, 11.0, 9.0, 1000.0, 10.0, 11.0]);
        let mask = OutlierDetector::default().detect(&s);
        assert_eq!(mask, vec![false, false, false, true, false, false]);
    }

    #[test]
    fn test_too_few_values_flags_nothing() {
        let s = series(&[Some(1.0), None, Some(1000.0), Some(2.0), None]);
        let mask = OutlierDetector::default().detect(&s);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn test_zero_iqr_flags_nothing() {
        let s = EntitySeries::from_vec(vec![5.0, 5.0, 5.0, 5.0, 5.0, 500.0]);
        // q1 = q3 = 5
        let mask = OutlierDetector::default().detect(&s);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn test_corrects_with_radius_one_mean() {
        let mut s = EntitySeries::from_vec(vec![10.0, 11.0, 9.0, 1000.0, 10.0, 11.0]);
        let effect = OutlierCorrection::default().transform(&axis(6), &mut s);

        assert_eq!(effect.changed, vec![(3, CellFlag::OutlierCorrected)]);
        assert_eq!(s.get(3), Some(NA::Value(9.5)));
        assert_eq!(s.flag(3), Some(CellFlag::OutlierCorrected));
        assert_eq!(s.flag(2), None);
    }

    #[test]
    fn test_one_sided_neighbor_at_edge() {
        let s = EntitySeries::from_vec(vec![1000.0, 10.0, 11.0, 9.0, 10.0, 11.0]);
        let mask = vec![true, false, false, false, false, false];
        let value = NeighborCorrector::default().replacement(&s, &axis(6), &mask, 0);
        assert_eq!(value, Some(10.0));
    }

    #[test]
    fn test_missing_neighbors_widen_search() {
        // radius 1 is missing on both sides, radius 2 has 8 and 12
        let s = series(&[Some(8.0), None, Some(500.0), None, Some(12.0)]);
        let mask = vec![false, false, true, false, false];
        let value = NeighborCorrector::default().replacement(&s, &axis(5), &mask, 2);
        assert_eq!(value, Some(10.0));
    }

    #[test]
    fn test_flagged_neighbors_are_skipped() {
        let s = EntitySeries::from_vec(vec![10.0, 900.0, 1000.0, 20.0]);
        let mask = vec![false, true, true, false];
        // position 2: radius 1 gives 20 on the right (left is flagged)
        assert_eq!(NeighborCorrector::default().replacement(&s, &axis(4), &mask, 2), Some(20.0));
        // position 1: radius 1 gives 10 on the left
        assert_eq!(NeighborCorrector::default().replacement(&s, &axis(4), &mask, 1), Some(10.0));
    }

    #[test]
    fn test_no_neighbor_keeps_value() {
        let mut s = series(&[None, None, Some(1000.0), None, None]);
        let mask = vec![false, false, true, false, false];
        let effect = NeighborCorrector::new(2).correct(&mut s, &axis(5), &mask);

        assert!(effect.changed.is_empty());
        assert_eq!(effect.skipped, vec![2]);
        assert_eq!(s.get(2), Some(NA::Value(1000.0)));
        assert_eq!(s.flag(2), None);
        assert_eq!(s.na_count(), 4);
    }

    #[test]
    fn test_radius_limit() {
        let s = EntitySeries::from_vec(vec![10.0, 0.0, 0.0, 0.0, 500.0]);
        let mask = vec![false, true, true, true, true];
        assert_eq!(NeighborCorrector::new(3).replacement(&s, &axis(5), &mask, 4), None);
        assert_eq!(NeighborCorrector::new(4).replacement(&s, &axis(5), &mask, 4), Some(10.0));
    }

    #[test]
    fn test_radius_counts_years_not_positions() {
        // 2020 is not on the axis: 2019 is two years from 2021
        let years = vec![2018, 2019, 2021, 2022, 2023, 2024];
        let s = EntitySeries::from_vec(vec![10.0, 100.0, 5000.0, 20.0, 12.0, 11.0]);
        let mask = vec![false, false, true, false, false, false];

        assert_eq!(NeighborCorrector::new(1).replacement(&s, &years, &mask, 2), Some(20.0));

        let right_masked = vec![false, false, true, true, false, false];
        assert_eq!(NeighborCorrector::new(1).replacement(&s, &years, &right_masked, 2), None);
        assert_eq!(
            NeighborCorrector::new(2).replacement(&s, &years, &right_masked, 2),
            Some(56.0)
        );
    }

    #[test]
    fn test_misaligned_axis_is_left_alone() {
        let mut s = EntitySeries::from_vec(vec![10.0, 11.0, 9.0, 1000.0, 10.0, 11.0]);
        let effect = OutlierCorrection::default().transform(&axis(4), &mut s);
        assert!(effect.is_empty());
        assert_eq!(s.get(3), Some(NA::Value(1000.0)));
    }
}
