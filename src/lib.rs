//! Data-quality and imputation engine for entity-keyed yearly panels
//!
//! A [`Panel`] holds one nullable value per entity (municipality, province
//! or region) and year. [`PipelineOrchestrator`] corrects outliers, drops
//! entities with too many gaps, imputes the rest and returns the cleaned
//! panel together with an [`AuditReport`] itemizing every change.
//!
//! ```rust
//! use panelclean::{clean_panel, CellFlag, Panel, PipelineConfig};
//!
//! let mut panel = Panel::from_year_range(2000, 2005).unwrap();
//! panel
//!     .insert("28079", vec![Some(10.0), Some(11.0), Some(9.0), Some(1000.0), Some(10.0), Some(11.0)])
//!     .unwrap();
//!
//! let (cleaned, report) = clean_panel(panel, &PipelineConfig::default()).unwrap();
//! assert_eq!(cleaned.value("28079", 2003).unwrap().to_option(), Some(9.5));
//! assert_eq!(cleaned.flag("28079", 2003), Some(CellFlag::OutlierCorrected));
//! assert_eq!(report.total_corrections(), 1);
//! ```

pub mod audit;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod io;
pub mod na;
pub mod panel;
pub mod pipeline;
pub mod stats;

// Re-export commonly used types
pub use audit::{AuditReport, DropReason, EntityAudit, EntityCondition, StageCounts};
pub use cleaning::{
    ActivityZeroPolicy, ExclusionList, GapFiller, MeanFallbackImputer, NeighborCorrector,
    OutlierDetector, QualityGate, SeriesTransform,
};
pub use config::{PipelineConfig, PipelineConfigBuilder, ZeroPolicyConfig};
pub use error::{Error, Result};
pub use na::NA;
pub use panel::{CellFlag, EntitySeries, Panel};
pub use pipeline::{clean_panel, PipelineOrchestrator};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
