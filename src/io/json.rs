use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::audit::AuditReport;
use crate::error::Result;

/// Writes the audit report as pretty-printed JSON
pub fn write_audit_json<P: AsRef<Path>>(report: &AuditReport, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_audit_json_to(report, BufWriter::new(file))
}

pub fn write_audit_json_to<W: Write>(report: &AuditReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
