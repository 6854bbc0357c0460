// Summary statistics used by the cleaning stages
//
// Quantiles follow the linear-interpolation definition so that outlier
// fences match what the panel producers compute on their side.

pub mod descriptive;

use crate::error::Result;

/// Computes the `p` quantile (0.0..=1.0) of a data set
///
/// Uses the linear-interpolation method: with the data sorted and
/// `h = p * (n - 1)`, the result interpolates between the values at
/// `floor(h)` and `ceil(h)`.
///
/// # Example
/// ```rust
/// use panelclean::stats;
///
/// let q = stats::quantile(&[9.0, 10.0, 10.0, 11.0, 11.0, 1000.0], 0.25).unwrap();
/// assert!((q - 10.0).abs() < 1e-12);
/// ```
pub fn quantile<T: AsRef<[f64]>>(data: T, p: f64) -> Result<f64> {
    descriptive::quantile_impl(data.as_ref(), p)
}

/// Computes the arithmetic mean
pub fn mean<T: AsRef<[f64]>>(data: T) -> Result<f64> {
    descriptive::mean_impl(data.as_ref())
}

/// Interquartile-range fence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Values strictly below this are outliers
    pub lower: f64,
    /// Values strictly above this are outliers
    pub upper: f64,
}

impl IqrFence {
    /// Builds the fence `[q1 - k*IQR, q3 + k*IQR]`
    pub fn from_values<T: AsRef<[f64]>>(data: T, multiplier: f64) -> Result<Self> {
        descriptive::iqr_fence_impl(data.as_ref(), multiplier)
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value falls outside the fence
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}
