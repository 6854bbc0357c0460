// Descriptive statistics implementations

use crate::error::{Error, Result};
use crate::stats::IqrFence;

/// Quantile of unsorted data
pub(crate) fn quantile_impl(data: &[f64], p: f64) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "Quantile requires at least one value".into(),
        ));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidInput(format!(
            "Quantile probability must be within [0, 1], got {}",
            p
        )));
    }

    let sorted = sorted_copy(data);
    Ok(percentile(&sorted, p))
}

/// Arithmetic mean
pub(crate) fn mean_impl(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::InvalidInput("Mean requires at least one value".into()));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Quartiles and fence in one sort
pub(crate) fn iqr_fence_impl(data: &[f64], multiplier: f64) -> Result<IqrFence> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "IQR fence requires at least one value".into(),
        ));
    }

    let sorted = sorted_copy(data);
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;

    Ok(IqrFence {
        q1,
        q3,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Percentile of sorted data by linear interpolation
fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    let idx = p * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = idx.ceil() as usize;

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    let weight_floor = 1.0 - weight_ceil;

    sorted_data[idx_floor] * weight_floor + sorted_data[idx_ceil] * weight_ceil
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_linear_interpolation() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((quantile_impl(&data, 0.25).unwrap() - 2.0).abs() < 1e-10);
        assert!((quantile_impl(&data, 0.5).unwrap() - 3.0).abs() < 1e-10);
        assert!((quantile_impl(&data, 0.75).unwrap() - 4.0).abs() < 1e-10);

        // h = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        let data = vec![4.0, 1.0, 3.0, 2.0];
        assert!((quantile_impl(&data, 0.25).unwrap() - 1.75).abs() < 1e-10);
        assert!((quantile_impl(&data, 0.75).unwrap() - 3.25).abs() < 1e-10);
    }

    #[test]
    fn test_quantile_rejects_bad_input() {
        assert!(quantile_impl(&[], 0.5).is_err());
        assert!(quantile_impl(&[1.0], 1.5).is_err());
    }

    #[test]
    fn test_mean() {
        assert!((mean_impl(&[1.0, 2.0, 6.0]).unwrap() - 3.0).abs() < 1e-10);
        assert!(mean_impl(&[]).is_err());
    }

    #[test]
    fn test_iqr_fence() {
        let fence = iqr_fence_impl(&[10.0, 11.0, 9.0, 1000.0, 10.0, 11.0], 1.5).unwrap();
        assert!((fence.q1 - 10.0).abs() < 1e-10);
        assert!((fence.q3 - 11.0).abs() < 1e-10);
        assert!((fence.lower - 8.5).abs() < 1e-10);
        assert!((fence.upper - 12.5).abs() < 1e-10);
        assert!(fence.is_outside(1000.0));
        assert!(!fence.is_outside(9.0));
        assert!((fence.iqr() - 1.0).abs() < 1e-10);
    }
}
