//! Keep-or-drop decision per entity based on missingness

use crate::panel::EntitySeries;

/// Outcome of the quality gate for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Series is salvageable; carries its missing count
    Keep { missing: usize },
    /// Series has too many gaps and is removed from the panel
    Drop { missing: usize },
}

impl GateDecision {
    pub fn is_drop(&self) -> bool {
        matches!(self, GateDecision::Drop { .. })
    }

    pub fn missing(&self) -> usize {
        match self {
            GateDecision::Keep { missing } | GateDecision::Drop { missing } => *missing,
        }
    }
}

/// Drops entities whose missing-year count exceeds `max_missing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    max_missing: usize,
}

impl Default for QualityGate {
    fn default() -> Self {
        QualityGate { max_missing: 6 }
    }
}

impl QualityGate {
    pub fn new(max_missing: usize) -> Self {
        QualityGate { max_missing }
    }

    pub fn max_missing(&self) -> usize {
        self.max_missing
    }

    /// Exactly `max_missing` gaps still passes
    pub fn evaluate(&self, series: &EntitySeries) -> GateDecision {
        let missing = series.na_count();
        if missing > self.max_missing {
            GateDecision::Drop { missing }
        } else {
            GateDecision::Keep { missing }
        }
    }
}
