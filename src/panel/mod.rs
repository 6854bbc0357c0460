//! Entity-keyed yearly panels
//!
//! A [`Panel`] maps a normalized administrative code (municipality,
//! province or region) to an [`EntitySeries`] holding one nullable value
//! per panel year. Every series in a panel is aligned with the same,
//! strictly increasing year axis.
//!
//! ```rust
//! use panelclean::Panel;
//!
//! let mut panel = Panel::from_year_range(2020, 2023).unwrap();
//! panel.insert("28079", vec![Some(10.0), None, Some(12.0), Some(13.0)]).unwrap();
//!
//! assert_eq!(panel.len(), 1);
//! assert_eq!(panel.na_count(), 1);
//! ```

mod flag;
mod series;

pub use flag::CellFlag;
pub use series::EntitySeries;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::na::NA;

/// Multi-entity, multi-year dataset
///
/// Entities are kept in key order so every traversal, and therefore every
/// cleaning run, is reproducible. Deserialization goes through the same
/// checks as [`Panel::new`] and [`Panel::insert_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPanel")]
pub struct Panel {
    years: Vec<i32>,
    entities: BTreeMap<String, EntitySeries>,
}

/// Unchecked serialized form of a [`Panel`]
#[derive(Deserialize)]
struct RawPanel {
    years: Vec<i32>,
    entities: BTreeMap<String, EntitySeries>,
}

impl TryFrom<RawPanel> for Panel {
    type Error = Error;

    fn try_from(raw: RawPanel) -> Result<Self> {
        let mut panel = Panel::new(raw.years)?;
        for (key, series) in raw.entities {
            panel.insert_series(key, series)?;
        }
        Ok(panel)
    }
}

impl Panel {
    /// Creates an empty panel over the given years
    pub fn new(years: Vec<i32>) -> Result<Self> {
        if years.is_empty() {
            return Err(Error::InvalidInput(
                "A panel needs at least one year".to_string(),
            ));
        }
        if years.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidInput(
                "Panel years must be strictly increasing".to_string(),
            ));
        }

        Ok(Panel {
            years,
            entities: BTreeMap::new(),
        })
    }

    /// Creates an empty panel covering `first..=last`
    pub fn from_year_range(first: i32, last: i32) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidInput(format!(
                "Invalid year range {}..={}",
                first, last
            )));
        }
        Self::new((first..=last).collect())
    }

    /// Adds an entity from optional values, one per panel year
    pub fn insert<K: Into<String>>(&mut self, key: K, values: Vec<Option<f64>>) -> Result<()> {
        self.insert_series(key, EntitySeries::from_options(values))
    }

    /// Adds an entity series
    pub fn insert_series<K: Into<String>>(&mut self, key: K, series: EntitySeries) -> Result<()> {
        let key = key.into();
        if series.len() != self.years.len() {
            return Err(Error::LengthMismatch {
                entity: key,
                expected: self.years.len(),
                actual: series.len(),
            });
        }
        if self.entities.contains_key(&key) {
            return Err(Error::DuplicateEntity(key));
        }
        self.entities.insert(key, series);
        Ok(())
    }

    /// Year axis
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the panel has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether an entity is present
    pub fn contains(&self, key: &str) -> bool {
        self.entities.contains_key(key)
    }

    /// Series for an entity
    pub fn get(&self, key: &str) -> Option<&EntitySeries> {
        self.entities.get(key)
    }

    /// Entity keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entities.keys()
    }

    /// Iterates over `(key, series)` in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntitySeries)> {
        self.entities.iter()
    }

    /// Position of a year on the axis
    pub fn year_position(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    /// Cell value for an entity and year
    pub fn value(&self, key: &str, year: i32) -> Option<NA<f64>> {
        let pos = self.year_position(year)?;
        self.entities.get(key).and_then(|s| s.get(pos))
    }

    /// Cell flag for an entity and year
    pub fn flag(&self, key: &str, year: i32) -> Option<CellFlag> {
        let pos = self.year_position(year)?;
        self.entities.get(key).and_then(|s| s.flag(pos))
    }

    /// Total number of missing cells
    pub fn na_count(&self) -> usize {
        self.entities.values().map(|s| s.na_count()).sum()
    }

    /// Removes the given years from the axis and from every series.
    /// Returns the years actually removed.
    pub(crate) fn drop_years(&mut self, years: &[i32]) -> Vec<i32> {
        let keep: Vec<bool> = self.years.iter().map(|y| !years.contains(y)).collect();
        if keep.iter().all(|&k| k) {
            return Vec::new();
        }

        let mut kept = Vec::with_capacity(self.years.len());
        let mut removed = Vec::new();
        for (year, keep_year) in self.years.iter().zip(&keep) {
            if *keep_year {
                kept.push(*year);
            } else {
                removed.push(*year);
            }
        }
        self.years = kept;

        for series in self.entities.values_mut() {
            series.retain_positions(&keep);
        }

        removed
    }

    pub(crate) fn into_parts(self) -> (Vec<i32>, BTreeMap<String, EntitySeries>) {
        (self.years, self.entities)
    }

    pub(crate) fn from_parts(years: Vec<i32>, entities: BTreeMap<String, EntitySeries>) -> Self {
        Panel { years, entities }
    }
}
