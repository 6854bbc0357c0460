use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Why a cell's value differs from the raw observation
///
/// A cell carries at most one flag. Each stage only touches cells that no
/// earlier stage has resolved, so the flags are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellFlag {
    /// Outlier replaced by the mean of its nearest valid neighbors
    OutlierCorrected,
    /// Interior gap filled by linear interpolation
    Interpolated,
    /// Leading or trailing gap filled by carrying the nearest value
    BoundaryFilled,
    /// Set to zero by the low-activity policy
    ZeroPolicy,
    /// Filled with the entity mean
    MeanFallback,
    /// No information at all; zero is a placeholder, not a measurement
    Unresolved,
}

impl CellFlag {
    /// True for flags that fill a missing cell (everything except outlier correction)
    pub fn is_imputation(&self) -> bool {
        !matches!(self, CellFlag::OutlierCorrected)
    }

    /// Stable upper-case label used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            CellFlag::OutlierCorrected => "OUTLIER_CORRECTED",
            CellFlag::Interpolated => "INTERPOLATED",
            CellFlag::BoundaryFilled => "BOUNDARY_FILLED",
            CellFlag::ZeroPolicy => "ZERO_POLICY",
            CellFlag::MeanFallback => "MEAN_FALLBACK",
            CellFlag::Unresolved => "UNRESOLVED",
        }
    }
}

impl Display for CellFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
