use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::na::NA;
use crate::panel::CellFlag;

/// One entity's yearly values, aligned with the owning panel's year axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct EntitySeries {
    /// Cell values (NA for missing observations)
    values: Vec<NA<f64>>,

    /// Per-cell flag recording why a value was altered
    flags: Vec<Option<CellFlag>>,
}

/// Serialized form of an [`EntitySeries`]; omitted flags mean an unaltered series
#[derive(Deserialize)]
struct RawSeries {
    values: Vec<NA<f64>>,
    #[serde(default)]
    flags: Vec<Option<CellFlag>>,
}

impl TryFrom<RawSeries> for EntitySeries {
    type Error = Error;

    fn try_from(raw: RawSeries) -> Result<Self, Error> {
        let mut series = EntitySeries::new(raw.values);
        if raw.flags.is_empty() {
            return Ok(series);
        }
        if raw.flags.len() != series.values.len() {
            return Err(Error::InvalidInput(format!(
                "Series has {} values but {} flags",
                series.values.len(),
                raw.flags.len()
            )));
        }
        series.flags = raw.flags;
        Ok(series)
    }
}

impl EntitySeries {
    /// Creates a series from NA cells; non-finite values are stored as NA
    pub fn new(values: Vec<NA<f64>>) -> Self {
        let values: Vec<NA<f64>> = values
            .into_iter()
            .map(|v| match v {
                NA::Value(x) => NA::from_f64(x),
                NA::NA => NA::NA,
            })
            .collect();
        let flags = vec![None; values.len()];
        EntitySeries { values, flags }
    }

    /// Creates a series from optional values
    pub fn from_options(values: Vec<Option<f64>>) -> Self {
        Self::new(values.into_iter().map(NA::from).collect())
    }

    /// Creates a series with no missing values
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self::new(values.into_iter().map(NA::Value).collect())
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell at a position
    pub fn get(&self, pos: usize) -> Option<NA<f64>> {
        self.values.get(pos).copied()
    }

    /// All cells
    pub fn values(&self) -> &[NA<f64>] {
        &self.values
    }

    /// Flag at a position
    pub fn flag(&self, pos: usize) -> Option<CellFlag> {
        self.flags.get(pos).copied().flatten()
    }

    /// All flags
    pub fn flags(&self) -> &[Option<CellFlag>] {
        &self.flags
    }

    /// Number of missing cells
    pub fn na_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    /// Number of non-missing cells
    pub fn value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_value()).count()
    }

    /// Whether any cell is missing
    pub fn has_na(&self) -> bool {
        self.values.iter().any(|v| v.is_na())
    }

    /// Whether every cell is missing
    pub fn is_all_na(&self) -> bool {
        self.values.iter().all(|v| v.is_na())
    }

    /// Positions of missing cells
    pub fn na_positions(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_na())
            .map(|(i, _)| i)
            .collect()
    }

    /// The non-missing values in year order
    pub fn observed(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.to_option()).collect()
    }

    /// Values as `Option`s
    pub fn to_options(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|v| v.to_option()).collect()
    }

    /// Overwrites a cell and records the reason
    pub(crate) fn set(&mut self, pos: usize, value: f64, flag: CellFlag) {
        self.values[pos] = NA::Value(value);
        self.flags[pos] = Some(flag);
    }

    /// Keeps only the positions where `keep` is true
    pub(crate) fn retain_positions(&mut self, keep: &[bool]) {
        let mut i = 0;
        self.values.retain(|_| {
            let k = keep.get(i).copied().unwrap_or(true);
            i += 1;
            k
        });
        let mut j = 0;
        self.flags.retain(|_| {
            let k = keep.get(j).copied().unwrap_or(true);
            j += 1;
            k
        });
    }
}
