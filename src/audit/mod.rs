//! Audit trail of a cleaning run
//!
//! Every change the pipeline makes to the panel is itemized here, so a
//! caller can decide after the fact whether a dropped or unresolved entity
//! is acceptable for their use case.
//!
//! # Quick Start
//!
//! ```rust
//! use panelclean::{clean_panel, Panel, PipelineConfig};
//! use panelclean::audit::EntityCondition;
//!
//! let mut panel = Panel::from_year_range(2000, 2005).unwrap();
//! panel.insert("28079", vec![Some(10.0), Some(11.0), Some(9.0), Some(1000.0), Some(10.0), Some(11.0)]).unwrap();
//! panel.insert("10905", vec![None; 6]).unwrap();
//!
//! let (_cleaned, report) = clean_panel(panel, &PipelineConfig::default()).unwrap();
//!
//! assert_eq!(report.entity("28079").unwrap().corrected_years, vec![2003]);
//! assert_eq!(report.entities_with(EntityCondition::Unresolved), vec!["10905"]);
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

use crate::error::Result;
use crate::panel::CellFlag;

/// Why an entity is absent from the cleaned panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropReason {
    /// Removed by the caller's exclusion list before any quality check
    Excluded,
    /// More missing years than the quality gate allows
    QualityGate,
}

impl Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Excluded => write!(f, "EXCLUDED"),
            DropReason::QualityGate => write!(f, "QUALITY_GATE"),
        }
    }
}

/// Soft per-entity condition; these are audit facts, never errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCondition {
    DroppedByQualityGate,
    Excluded,
    ZeroPolicyApplied,
    /// No observation at all; the entity is zero-filled as a placeholder
    Unresolved,
    /// Outliers were detected but no valid neighbor existed within the radius
    OutliersKept,
}

impl Display for EntityCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityCondition::DroppedByQualityGate => "DROPPED_BY_QUALITY_GATE",
            EntityCondition::Excluded => "EXCLUDED",
            EntityCondition::ZeroPolicyApplied => "ZERO_POLICY_APPLIED",
            EntityCondition::Unresolved => "UNRESOLVED",
            EntityCondition::OutliersKept => "OUTLIERS_KEPT",
        };
        write!(f, "{}", label)
    }
}

/// A filled cell and the rule that filled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputedCell {
    pub year: i32,
    pub reason: CellFlag,
}

/// Everything the pipeline did to one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAudit {
    /// Years whose outlier value was replaced
    pub corrected_years: Vec<i32>,
    /// Years flagged as outliers but left unchanged
    pub uncorrected_outlier_years: Vec<i32>,
    /// Filled cells in year order
    pub imputed: Vec<ImputedCell>,
    /// Whether the entity was removed from the panel
    pub dropped: bool,
    pub drop_reason: Option<DropReason>,
    /// Missing years counted at the quality gate (or at exclusion)
    pub missing_count: usize,
    pub conditions: Vec<EntityCondition>,
}

impl EntityAudit {
    /// Audit record of a removed entity
    pub fn dropped(reason: DropReason, missing_count: usize) -> Self {
        let condition = match reason {
            DropReason::Excluded => EntityCondition::Excluded,
            DropReason::QualityGate => EntityCondition::DroppedByQualityGate,
        };
        EntityAudit {
            dropped: true,
            drop_reason: Some(reason),
            missing_count,
            conditions: vec![condition],
            ..Default::default()
        }
    }

    pub fn has_condition(&self, condition: EntityCondition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Adds a condition once
    pub fn add_condition(&mut self, condition: EntityCondition) {
        if !self.has_condition(condition) {
            self.conditions.push(condition);
        }
    }

    /// Number of imputed cells carrying `flag`
    pub fn imputed_with(&self, flag: CellFlag) -> usize {
        self.imputed.iter().filter(|cell| cell.reason == flag).count()
    }

    /// True when the pipeline left the entity exactly as it came in
    pub fn is_untouched(&self) -> bool {
        !self.dropped
            && self.corrected_years.is_empty()
            && self.uncorrected_outlier_years.is_empty()
            && self.imputed.is_empty()
    }
}

/// Run-wide counters, one field per stage outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub entities_in: usize,
    pub excluded: usize,
    pub dropped_by_gate: usize,
    pub outliers_corrected: usize,
    pub outliers_kept: usize,
    pub zero_policy_entities: usize,
    pub zero_policy_cells: usize,
    pub interpolated: usize,
    pub boundary_filled: usize,
    pub mean_fallback: usize,
    pub unresolved_entities: usize,
    pub unresolved_cells: usize,
}

impl StageCounts {
    /// Adds one entity's record to the totals
    pub fn absorb(&mut self, audit: &EntityAudit) {
        self.entities_in += 1;
        match audit.drop_reason {
            Some(DropReason::Excluded) => self.excluded += 1,
            Some(DropReason::QualityGate) => self.dropped_by_gate += 1,
            None => {}
        }
        self.outliers_corrected += audit.corrected_years.len();
        self.outliers_kept += audit.uncorrected_outlier_years.len();

        if audit.has_condition(EntityCondition::ZeroPolicyApplied) {
            self.zero_policy_entities += 1;
        }
        if audit.has_condition(EntityCondition::Unresolved) {
            self.unresolved_entities += 1;
        }

        for cell in &audit.imputed {
            match cell.reason {
                CellFlag::ZeroPolicy => self.zero_policy_cells += 1,
                CellFlag::Interpolated => self.interpolated += 1,
                CellFlag::BoundaryFilled => self.boundary_filled += 1,
                CellFlag::MeanFallback => self.mean_fallback += 1,
                CellFlag::Unresolved => self.unresolved_cells += 1,
                CellFlag::OutlierCorrected => {}
            }
        }
    }

    /// Cells filled by any imputation rule
    pub fn imputed_cells(&self) -> usize {
        self.zero_policy_cells
            + self.interpolated
            + self.boundary_filled
            + self.mean_fallback
            + self.unresolved_cells
    }
}

/// One row of the dropped-entity list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEntity {
    pub entity: String,
    pub reason: DropReason,
    pub missing_count: usize,
}

/// Audit report of a cleaning run
///
/// Entities are kept in key order, so two runs over the same input
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    entities: BTreeMap<String, EntityAudit>,
    counts: StageCounts,
    excluded_years: Vec<i32>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entity and folds it into the counters. A second record for
    /// the same key replaces the first one in the map but is counted again,
    /// so callers record each entity once.
    pub(crate) fn record(&mut self, key: String, audit: EntityAudit) {
        self.counts.absorb(&audit);
        self.entities.insert(key, audit);
    }

    pub(crate) fn set_excluded_years(&mut self, years: Vec<i32>) {
        self.excluded_years = years;
    }

    pub fn entity(&self, key: &str) -> Option<&EntityAudit> {
        self.entities.get(key)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&String, &EntityAudit)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn counts(&self) -> &StageCounts {
        &self.counts
    }

    /// Years removed from the axis before the run
    pub fn excluded_years(&self) -> &[i32] {
        &self.excluded_years
    }

    /// Removed entities with their reason, in key order
    pub fn dropped(&self) -> Vec<DroppedEntity> {
        self.entities
            .iter()
            .filter_map(|(key, audit)| {
                audit.drop_reason.map(|reason| DroppedEntity {
                    entity: key.clone(),
                    reason,
                    missing_count: audit.missing_count,
                })
            })
            .collect()
    }

    /// Keys of entities carrying a condition
    pub fn entities_with(&self, condition: EntityCondition) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|(_, audit)| audit.has_condition(condition))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn total_corrections(&self) -> usize {
        self.counts.outliers_corrected
    }

    pub fn total_imputations(&self) -> usize {
        self.counts.imputed_cells()
    }

    /// No corrections, no imputations and no drops
    pub fn is_clean(&self) -> bool {
        self.entities.values().all(EntityAudit::is_untouched)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(f, "entities: {}", c.entities_in)?;
        writeln!(f, "excluded: {}", c.excluded)?;
        writeln!(f, "dropped by quality gate: {}", c.dropped_by_gate)?;
        writeln!(
            f,
            "outliers corrected: {} (kept: {})",
            c.outliers_corrected, c.outliers_kept
        )?;
        writeln!(
            f,
            "zero policy: {} cells in {} entities",
            c.zero_policy_cells, c.zero_policy_entities
        )?;
        writeln!(f, "interpolated: {}", c.interpolated)?;
        writeln!(f, "boundary filled: {}", c.boundary_filled)?;
        writeln!(f, "mean fallback: {}", c.mean_fallback)?;
        write!(
            f,
            "unresolved: {} cells in {} entities",
            c.unresolved_cells, c.unresolved_entities
        )
    }
}
