//! Panel fixtures shared by the integration tests

use panelclean::Panel;

/// Builds a panel starting in `first_year` from `(key, values)` rows
pub fn panel_from_rows(first_year: i32, rows: &[(&str, Vec<Option<f64>>)]) -> Panel {
    let len = rows.first().map(|(_, v)| v.len()).unwrap_or(1) as i32;
    let mut panel = Panel::from_year_range(first_year, first_year + len - 1).unwrap();
    for (key, values) in rows {
        panel.insert(*key, values.clone()).unwrap();
    }
    panel
}

/// A 1996-2024 municipal panel with one entity per cleaning situation:
///
/// - `28079`: complete and smooth
/// - `41091`: one spike in 2005
/// - `46250`: interior gap 2010-2011 and a trailing gap 2023-2024
/// - `15030`: leading gap 1996-1998
/// - `10905`: exactly 6 missing years
/// - `18915`: 7 missing years
/// - `49275`: every year missing
pub fn municipal_panel() -> Panel {
    let years = 29;
    let smooth = |base: f64| -> Vec<Option<f64>> {
        (0..years).map(|i| Some(base + i as f64)).collect()
    };

    let mut spike = smooth(500.0);
    spike[9] = Some(50_000.0);

    let mut gaps = smooth(100.0);
    for i in [14, 15, 27, 28] {
        gaps[i] = None;
    }

    let mut leading = smooth(40.0);
    for value in leading.iter_mut().take(3) {
        *value = None;
    }

    let mut six = smooth(60.0);
    for i in [1, 3, 5, 7, 9, 11] {
        six[i] = None;
    }

    let mut seven = smooth(70.0);
    for i in [1, 3, 5, 7, 9, 11, 13] {
        seven[i] = None;
    }

    panel_from_rows(
        1996,
        &[
            ("28079", smooth(3000.0)),
            ("41091", spike),
            ("46250", gaps),
            ("15030", leading),
            ("10905", six),
            ("18915", seven),
            ("49275", vec![None; years]),
        ],
    )
}

/// A panel that needs no cleaning at all
pub fn clean_panel_fixture() -> Panel {
    panel_from_rows(
        2000,
        &[
            ("28079", vec![Some(10.0), Some(11.0), Some(12.0), Some(13.0), Some(14.0)]),
            ("08019", vec![Some(5.0), Some(5.0), Some(6.0), Some(6.0), Some(7.0)]),
        ],
    )
}
