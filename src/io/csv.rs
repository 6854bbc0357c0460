use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::audit::AuditReport;
use crate::error::Result;
use crate::panel::Panel;

/// Writes the panel in wide form: `entity,<year>,<year>,...`
///
/// Missing cells are written as empty fields.
pub fn write_panel_csv<P: AsRef<Path>>(panel: &Panel, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_panel_csv_to(panel, file)
}

/// Same as [`write_panel_csv`] for any writer
pub fn write_panel_csv_to<W: Write>(panel: &Panel, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    let mut header = Vec::with_capacity(panel.years().len() + 1);
    header.push("entity".to_string());
    header.extend(panel.years().iter().map(|y| y.to_string()));
    wtr.write_record(&header)?;

    for (key, series) in panel.iter() {
        let mut row = Vec::with_capacity(series.len() + 1);
        row.push(key.clone());
        row.extend(series.values().iter().map(|cell| match cell.to_option() {
            Some(v) => v.to_string(),
            None => String::new(),
        }));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes altered cells in long form: `entity,year,flag`
pub fn write_flags_csv<P: AsRef<Path>>(panel: &Panel, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(["entity", "year", "flag"])?;

    for (key, series) in panel.iter() {
        for (year, flag) in panel.years().iter().zip(series.flags()) {
            if let Some(flag) = flag {
                let year = year.to_string();
                wtr.write_record([key.as_str(), year.as_str(), flag.as_str()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the removed entities: `entity,reason,missing_count`
pub fn write_dropped_csv<P: AsRef<Path>>(report: &AuditReport, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(["entity", "reason", "missing_count"])?;

    for dropped in report.dropped() {
        let reason = dropped.reason.to_string();
        let missing = dropped.missing_count.to_string();
        wtr.write_record([dropped.entity.as_str(), reason.as_str(), missing.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_layout() {
        let mut panel = Panel::from_year_range(2020, 2022).unwrap();
        panel.insert("28079", vec![Some(1.5), None, Some(3.0)]).unwrap();
        panel.insert("08019", vec![Some(2.0), Some(2.0), Some(2.0)]).unwrap();

        let mut buf = Vec::new();
        write_panel_csv_to(&panel, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "entity,2020,2021,2022\n08019,2,2,2\n28079,1.5,,3\n"
        );
    }
}
