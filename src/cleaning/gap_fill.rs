//! Interior interpolation and boundary carry

use log::warn;

use crate::cleaning::{SeriesTransform, StageEffect};
use crate::na::NA;
use crate::panel::{CellFlag, EntitySeries};

/// Fills gaps from the series' own observations
///
/// Runs of missing cells bounded on both sides are linearly interpolated
/// along the year axis. Leading gaps take the first observation and
/// trailing gaps the last one. Interpolation never extends past the first
/// or last observation. A series without observations is left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapFiller;

impl GapFiller {
    pub fn new() -> Self {
        GapFiller
    }
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`
fn interpolate(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

impl SeriesTransform for GapFiller {
    fn name(&self) -> &'static str {
        "gap_fill"
    }

    /// Leaves the series untouched when `years` is not aligned with it
    fn transform(&self, years: &[i32], series: &mut EntitySeries) -> StageEffect {
        let mut effect = StageEffect::default();
        if years.len() != series.len() {
            warn!(
                "gap_fill: year axis has {} years, series has {} cells",
                years.len(),
                series.len()
            );
            return effect;
        }
        let observed: Vec<(usize, f64)> = series
            .values()
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| match cell {
                NA::Value(v) => Some((i, *v)),
                NA::NA => None,
            })
            .collect();

        let (first_pos, first_val) = match observed.first() {
            Some(&first) => first,
            None => return effect,
        };
        let (last_pos, last_val) = match observed.last() {
            Some(&last) => last,
            None => return effect,
        };

        let axis = |pos: usize| -> f64 { years[pos] as f64 };

        let mut fills: Vec<(usize, f64, CellFlag)> = Vec::new();

        for pos in 0..first_pos {
            fills.push((pos, first_val, CellFlag::BoundaryFilled));
        }

        for pair in observed.windows(2) {
            let (left_pos, left_val) = pair[0];
            let (right_pos, right_val) = pair[1];
            if right_pos - left_pos < 2 {
                continue;
            }
            let (x0, x1) = (axis(left_pos), axis(right_pos));
            for pos in (left_pos + 1)..right_pos {
                let value = interpolate(x0, left_val, x1, right_val, axis(pos));
                fills.push((pos, value, CellFlag::Interpolated));
            }
        }

        for pos in (last_pos + 1)..series.len() {
            fills.push((pos, last_val, CellFlag::BoundaryFilled));
        }

        for (pos, value, flag) in fills {
            series.set(pos, value, flag);
            effect.changed.push((pos, flag));
        }
        effect
    }
}
