//! Export of cleaning results
//!
//! Reading source tables is left to the caller; these writers only persist
//! what the pipeline produced.

pub mod csv;
pub mod json;

pub use self::csv::{write_dropped_csv, write_flags_csv, write_panel_csv, write_panel_csv_to};
pub use self::json::{write_audit_json, write_audit_json_to};
