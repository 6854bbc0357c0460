//! Entities removed for policy reasons before the quality gate
//!
//! Exclusions are unrelated to data quality: retired administrative codes,
//! non-representative territories, or entities whose reference population
//! shows they should not be in the dataset at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::panel::Panel;

/// Set of entity keys to remove
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionList {
    keys: BTreeSet<String>,
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from any collection of keys
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        ExclusionList {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Entities of `panel` with more than `min_missing` gaps whose value in
    /// the latest year of `reference` is missing or below
    /// `min_reference_value`.
    ///
    /// An entity absent from the reference panel counts as missing there.
    /// This mirrors cross-checking a sparse business-count panel against
    /// population: a municipality with many gaps and almost no inhabitants
    /// is removed rather than imputed.
    pub fn from_reference(
        panel: &Panel,
        reference: &Panel,
        min_missing: usize,
        min_reference_value: f64,
    ) -> Self {
        let latest = match reference.years().last() {
            Some(year) => *year,
            None => return Self::new(),
        };

        let keys = panel
            .iter()
            .filter(|(_, series)| series.na_count() > min_missing)
            .filter(|(key, _)| {
                match reference.value(key, latest).and_then(|cell| cell.to_option()) {
                    Some(v) => v < min_reference_value,
                    None => true,
                }
            })
            .map(|(key, _)| key.clone())
            .collect();

        ExclusionList { keys }
    }

    pub fn insert<K: Into<String>>(&mut self, key: K) -> bool {
        self.keys.insert(key.into())
    }

    /// Merges another list, e.g. a predefined code list
    pub fn extend(&mut self, other: &ExclusionList) {
        self.keys.extend(other.keys.iter().cloned());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }
}
