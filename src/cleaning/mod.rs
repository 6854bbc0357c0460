//! Per-entity cleaning stages
//!
//! Each stage is a pure transformation of one [`EntitySeries`]; none of
//! them look at other entities. The orchestrator in [`crate::pipeline`]
//! runs them in a fixed order:
//!
//! 1. [`OutlierCorrection`] (IQR detection plus neighbor correction)
//! 2. [`QualityGate`] (drop entities with too many missing years)
//! 3. [`ActivityZeroPolicy`] (optional, per dataset)
//! 4. [`GapFiller`] (interpolation and boundary carry)
//! 5. [`MeanFallbackImputer`] (entity mean, or zero + unresolved)
//!
//! [`EntitySeries`]: crate::panel::EntitySeries

pub mod exclusion;
pub mod fallback;
pub mod gap_fill;
pub mod outlier;
pub mod quality;
pub mod zero_policy;

pub use exclusion::ExclusionList;
pub use fallback::MeanFallbackImputer;
pub use gap_fill::GapFiller;
pub use outlier::{NeighborCorrector, OutlierCorrection, OutlierDetector};
pub use quality::{GateDecision, QualityGate};
pub use zero_policy::ActivityZeroPolicy;

use crate::panel::{CellFlag, EntitySeries};

/// What a stage did to one series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageEffect {
    /// Positions the stage rewrote, with the flag it set
    pub changed: Vec<(usize, CellFlag)>,
    /// Positions the stage examined but deliberately left alone
    pub skipped: Vec<usize>,
}

impl StageEffect {
    /// Whether the stage changed nothing
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.skipped.is_empty()
    }

    /// Number of changed cells carrying a given flag
    pub fn count(&self, flag: CellFlag) -> usize {
        self.changed.iter().filter(|(_, f)| *f == flag).count()
    }
}

/// A cleaning step applied to one entity's series at a time
pub trait SeriesTransform: Send + Sync {
    /// Stage name used in logs
    fn name(&self) -> &'static str;

    /// Transforms the series in place. `years` is the panel's year axis,
    /// aligned with the series positions.
    fn transform(&self, years: &[i32], series: &mut EntitySeries) -> StageEffect;
}
