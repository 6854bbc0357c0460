//! Cleaning pipeline
//!
//! [`PipelineOrchestrator`] runs the stages of [`crate::cleaning`] in their
//! fixed order over a whole panel and returns the cleaned panel together
//! with its [`AuditReport`].
//!
//! ```rust
//! use panelclean::{Panel, PipelineConfig, PipelineOrchestrator};
//!
//! let mut panel = Panel::from_year_range(2000, 2003).unwrap();
//! panel.insert("28079", vec![Some(5.0), None, None, Some(11.0)]).unwrap();
//!
//! let pipeline = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
//! let (cleaned, report) = pipeline.run(panel).unwrap();
//!
//! assert_eq!(cleaned.value("28079", 2002).unwrap().to_option(), Some(9.0));
//! assert_eq!(report.total_imputations(), 2);
//! ```

use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

use crate::audit::{AuditReport, DropReason, EntityAudit, EntityCondition, ImputedCell};
use crate::cleaning::{
    ActivityZeroPolicy, ExclusionList, GapFiller, MeanFallbackImputer, OutlierCorrection,
    QualityGate, SeriesTransform,
};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::panel::{CellFlag, EntitySeries, Panel};

/// Result of processing one entity
struct EntityOutcome {
    key: String,
    series: Option<EntitySeries>,
    audit: EntityAudit,
}

/// Runs the cleaning stages over a panel
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    outliers: OutlierCorrection,
    gate: QualityGate,
    /// Stages run after the gate, in order
    imputers: Vec<Box<dyn SeriesTransform>>,
}

impl fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.imputers.iter().map(|s| s.name()).collect();
        f.debug_struct("PipelineOrchestrator")
            .field("config", &self.config)
            .field("imputers", &names)
            .finish()
    }
}

impl PipelineOrchestrator {
    /// Builds the stages from a configuration.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when a value is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut imputers: Vec<Box<dyn SeriesTransform>> = Vec::new();
        if config.zero_policy.enabled {
            imputers.push(Box::new(ActivityZeroPolicy::from_config(&config.zero_policy)));
        }
        imputers.push(Box::new(GapFiller::new()));
        imputers.push(Box::new(MeanFallbackImputer::new()));

        Ok(PipelineOrchestrator {
            outliers: OutlierCorrection::new(config.iqr_multiplier, config.max_radius),
            gate: QualityGate::new(config.max_missing),
            imputers,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Names of the stages in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.outliers.name(), "quality_gate"];
        names.extend(self.imputers.iter().map(|s| s.name()));
        names
    }

    /// Cleans a panel using the configured exclusions only
    pub fn run(&self, panel: Panel) -> Result<(Panel, AuditReport)> {
        self.run_with_exclusions(panel, &ExclusionList::new())
    }

    /// Cleans a panel, additionally removing the entities of `exclusions`
    /// before the quality gate
    pub fn run_with_exclusions(
        &self,
        mut panel: Panel,
        exclusions: &ExclusionList,
    ) -> Result<(Panel, AuditReport)> {
        if panel.is_empty() {
            return Err(Error::EmptyPanel);
        }

        let excluded_years = &self.config.excluded_years;
        if panel.years().iter().all(|y| excluded_years.contains(y)) {
            return Err(Error::InvalidConfiguration(
                "excluded_years removes every year of the panel".to_string(),
            ));
        }
        let dropped_years = panel.drop_years(excluded_years);
        if !dropped_years.is_empty() {
            info!("Excluded years {:?} from the panel", dropped_years);
        }

        let mut excluded = ExclusionList::from_keys(self.config.excluded_entities.iter().cloned());
        excluded.extend(exclusions);

        let (years, entities) = panel.into_parts();
        info!(
            "Cleaning {} entities over {} years ({}..={})",
            entities.len(),
            years.len(),
            years[0],
            years[years.len() - 1]
        );

        let work: Vec<(String, EntitySeries)> = entities.into_iter().collect();
        let outcomes: Vec<EntityOutcome> = if self.config.parallel {
            work.into_par_iter()
                .map(|(key, series)| self.process_entity(&years, &excluded, key, series))
                .collect()
        } else {
            work.into_iter()
                .map(|(key, series)| self.process_entity(&years, &excluded, key, series))
                .collect()
        };

        let mut report = AuditReport::new();
        report.set_excluded_years(dropped_years);
        let mut cleaned = BTreeMap::new();
        for outcome in outcomes {
            if let Some(series) = outcome.series {
                cleaned.insert(outcome.key.clone(), series);
            }
            report.record(outcome.key, outcome.audit);
        }

        let counts = report.counts();
        info!(
            "outlier_correction: {} corrected, {} kept",
            counts.outliers_corrected, counts.outliers_kept
        );
        info!(
            "quality_gate: {} dropped, {} excluded",
            counts.dropped_by_gate, counts.excluded
        );
        if self.config.zero_policy.enabled {
            info!(
                "zero_policy: {} cells in {} entities",
                counts.zero_policy_cells, counts.zero_policy_entities
            );
        }
        info!(
            "gap_fill: {} interpolated, {} boundary filled",
            counts.interpolated, counts.boundary_filled
        );
        info!(
            "mean_fallback: {} cells, {} unresolved entities",
            counts.mean_fallback, counts.unresolved_entities
        );

        Ok((Panel::from_parts(years, cleaned), report))
    }

    fn process_entity(
        &self,
        years: &[i32],
        excluded: &ExclusionList,
        key: String,
        mut series: EntitySeries,
    ) -> EntityOutcome {
        if excluded.contains(&key) {
            debug!("{}: excluded", key);
            let audit = EntityAudit::dropped(DropReason::Excluded, series.na_count());
            return EntityOutcome {
                key,
                series: None,
                audit,
            };
        }

        let mut audit = EntityAudit::default();

        let effect = self.outliers.transform(years, &mut series);
        audit.corrected_years = effect.changed.iter().map(|(pos, _)| years[*pos]).collect();
        audit.uncorrected_outlier_years = effect.skipped.iter().map(|pos| years[*pos]).collect();
        if !audit.uncorrected_outlier_years.is_empty() {
            debug!(
                "{}: outliers kept for lack of neighbors in {:?}",
                key, audit.uncorrected_outlier_years
            );
            audit.add_condition(EntityCondition::OutliersKept);
        }

        let decision = self.gate.evaluate(&series);
        audit.missing_count = decision.missing();
        if decision.is_drop() {
            debug!(
                "{}: dropped with {} missing years (max {})",
                key,
                decision.missing(),
                self.gate.max_missing()
            );
            audit.dropped = true;
            audit.drop_reason = Some(DropReason::QualityGate);
            audit.add_condition(EntityCondition::DroppedByQualityGate);
            return EntityOutcome {
                key,
                series: None,
                audit,
            };
        }

        for stage in &self.imputers {
            let effect = stage.transform(years, &mut series);
            if effect.count(CellFlag::ZeroPolicy) > 0 {
                debug!("{}: zero policy applied", key);
                audit.add_condition(EntityCondition::ZeroPolicyApplied);
            }
            if effect.count(CellFlag::Unresolved) > 0 {
                warn!("{}: no observation in any year, filled with zero", key);
                audit.add_condition(EntityCondition::Unresolved);
            }
            audit
                .imputed
                .extend(effect.changed.iter().map(|(pos, flag)| ImputedCell {
                    year: years[*pos],
                    reason: *flag,
                }));
        }
        audit.imputed.sort_by_key(|cell| cell.year);

        EntityOutcome {
            key,
            series: Some(series),
            audit,
        }
    }
}

/// Cleans `panel` with a one-off orchestrator
pub fn clean_panel(panel: Panel, config: &PipelineConfig) -> Result<(Panel, AuditReport)> {
    PipelineOrchestrator::new(config.clone())?.run(panel)
}
