mod common;

use common::{municipal_panel, panel_from_rows, TempTestDir};
use panelclean::io::{write_audit_json, write_dropped_csv, write_flags_csv, write_panel_csv};
use panelclean::{clean_panel, AuditReport, PipelineConfig};

#[test]
fn test_panel_csv_export() {
    let dir = TempTestDir::new("panel_csv").unwrap();
    let panel = panel_from_rows(
        2020,
        &[("28079", vec![Some(5.0), None, None, Some(11.0)])],
    );
    let (cleaned, _) = clean_panel(panel, &PipelineConfig::default()).unwrap();

    write_panel_csv(&cleaned, dir.file("panel.csv")).unwrap();
    let text = dir.read("panel.csv").unwrap();
    assert_eq!(text, "entity,2020,2021,2022,2023\n28079,5,7,9,11\n");
}

#[test]
fn test_flags_csv_export() {
    let dir = TempTestDir::new("flags_csv").unwrap();
    let panel = panel_from_rows(
        2020,
        &[("28079", vec![None, Some(5.0), None, Some(11.0)])],
    );
    let (cleaned, _) = clean_panel(panel, &PipelineConfig::default()).unwrap();

    write_flags_csv(&cleaned, dir.file("flags.csv")).unwrap();
    let text = dir.read("flags.csv").unwrap();
    assert_eq!(
        text,
        "entity,year,flag\n28079,2020,BOUNDARY_FILLED\n28079,2022,INTERPOLATED\n"
    );
}

#[test]
fn test_dropped_csv_export() {
    let dir = TempTestDir::new("dropped_csv").unwrap();
    let config = PipelineConfig::builder().excluded_entity("28079").build();
    let (_, report) = clean_panel(municipal_panel(), &config).unwrap();

    write_dropped_csv(&report, dir.file("dropped.csv")).unwrap();

    let mut reader = csv::Reader::from_path(dir.file("dropped.csv")).unwrap();
    let rows: Vec<(String, String, usize)> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(
        rows,
        vec![
            ("18915".to_string(), "QUALITY_GATE".to_string(), 7),
            ("28079".to_string(), "EXCLUDED".to_string(), 0),
            ("49275".to_string(), "QUALITY_GATE".to_string(), 29),
        ]
    );
}

#[test]
fn test_audit_json_export() {
    let dir = TempTestDir::new("audit_json").unwrap();
    let (_, report) = clean_panel(municipal_panel(), &PipelineConfig::default()).unwrap();

    write_audit_json(&report, dir.file("audit.json")).unwrap();
    let text = dir.read("audit.json").unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value["entities"]["41091"]["corrected_years"],
        serde_json::json!([2005])
    );
    assert_eq!(value["entities"]["18915"]["drop_reason"], "QUALITY_GATE");
    assert_eq!(AuditReport::from_json(&text).unwrap(), report);
}
