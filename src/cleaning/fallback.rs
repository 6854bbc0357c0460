//! Last-resort imputation

use crate::cleaning::{SeriesTransform, StageEffect};
use crate::panel::{CellFlag, EntitySeries};
use crate::stats;

/// Fills whatever is still missing after gap filling
///
/// Remaining gaps take the mean of the entity's observed values. A series
/// with no observation at all becomes zero everywhere, flagged
/// [`CellFlag::Unresolved`]; consumers must read those cells as "no
/// information", not as a measured zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanFallbackImputer;

impl MeanFallbackImputer {
    pub fn new() -> Self {
        MeanFallbackImputer
    }
}

impl SeriesTransform for MeanFallbackImputer {
    fn name(&self) -> &'static str {
        "mean_fallback"
    }

    fn transform(&self, _years: &[i32], series: &mut EntitySeries) -> StageEffect {
        let mut effect = StageEffect::default();
        if !series.has_na() {
            return effect;
        }

        let (value, flag) = match stats::mean(series.observed()) {
            Ok(mean) => (mean, CellFlag::MeanFallback),
            Err(_) => (0.0, CellFlag::Unresolved),
        };

        for pos in series.na_positions() {
            series.set(pos, value, flag);
            effect.changed.push((pos, flag));
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_observed() {
        let mut s = EntitySeries::from_options(vec![Some(2.0), None, Some(4.0), None]);
        let effect = MeanFallbackImputer.transform(&[], &mut s);

        assert_eq!(s.to_options(), vec![Some(2.0), Some(3.0), Some(4.0), Some(3.0)]);
        assert_eq!(effect.count(CellFlag::MeanFallback), 2);
        assert_eq!(s.flag(0), None);
    }

    #[test]
    fn test_all_missing_is_unresolved() {
        let mut s = EntitySeries::from_options(vec![None, None, None]);
        let effect = MeanFallbackImputer.transform(&[], &mut s);

        assert_eq!(s.to_options(), vec![Some(0.0); 3]);
        assert_eq!(effect.count(CellFlag::Unresolved), 3);
        assert!(s.flags().iter().all(|f| *f == Some(CellFlag::Unresolved)));
    }

    #[test]
    fn test_complete_series_untouched() {
        let mut s = EntitySeries::from_vec(vec![1.0, 2.0]);
        assert!(MeanFallbackImputer.transform(&[], &mut s).is_empty());
    }
}
