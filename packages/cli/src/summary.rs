//! Plain-text rendering of the aggregations for the terminal.

use std::fmt::Write as _;

use accident_dashboard_analytics_models::{CategoryCount, DashboardOutputs, HierarchyCount};

/// Formats every aggregation as aligned text tables.
#[must_use]
pub fn format_summary(outputs: &DashboardOutputs) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rows: {} of {}",
        outputs.filtered_rows, outputs.total_rows
    );

    write_counts(&mut out, "Incidents by Barangay", &outputs.incidents_by_barangay);
    write_counts(&mut out, "Incident Types Distribution", &outputs.incident_types);

    let months: Vec<CategoryCount> = outputs
        .incidents_over_time
        .iter()
        .map(|p| CategoryCount {
            category: p.period.clone(),
            count: p.count,
        })
        .collect();
    write_counts(&mut out, "Incidents Over Time", &months);

    write_hierarchy(&mut out, &outputs.offense_treemap);
    out
}

fn write_counts(out: &mut String, heading: &str, counts: &[CategoryCount]) {
    let _ = writeln!(out, "\n{heading}");
    if counts.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let width = counts
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);
    for c in counts {
        let _ = writeln!(out, "  {:<width$}  {:>6}", c.category, c.count);
    }
}

fn write_hierarchy(out: &mut String, paths: &[HierarchyCount]) {
    let _ = writeln!(out, "\nOffenses by Barangay / Incident Type / Offense Type");
    if paths.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for p in paths {
        let _ = writeln!(
            out,
            "  {} / {} / {}  {}",
            p.barangay, p.incident_type, p.offense_type, p.count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_dashboard_analytics::render;
    use accident_dashboard_analytics_models::FilterState;
    use accident_dashboard_dataset::load_bytes;

    #[test]
    fn lists_every_section() {
        let ds = load_bytes(
            "dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType\n\
             2023-01-01,08:00:00,A,Collision,Speeding,Traffic\n\
             2023-02-01,09:00:00,B,Collision,Speeding,Traffic\n"
                .as_bytes(),
        )
        .unwrap();
        let rendered = render(&ds, &FilterState::default()).unwrap();
        let text = format_summary(&rendered.outputs);

        assert!(text.starts_with("Rows: 2 of 2"));
        assert!(text.contains("  A       1"));
        assert!(text.contains("2023-02"));
        assert!(text.contains("B / Collision / Traffic  1"));
    }

    #[test]
    fn empty_outputs_say_none() {
        let text = format_summary(&DashboardOutputs::default());
        assert!(text.starts_with("Rows: 0 of 0"));
        assert_eq!(text.matches("(none)").count(), 4);
    }

    #[test]
    fn non_ascii_names_stay_aligned() {
        let mut out = String::new();
        write_counts(
            &mut out,
            "Incidents by Barangay",
            &[
                CategoryCount {
                    category: "Bayan Luma Ñ".to_string(),
                    count: 3,
                },
                CategoryCount {
                    category: "Bayan Luma I".to_string(),
                    count: 12,
                },
            ],
        );
        let widths: Vec<usize> = out
            .lines()
            .skip(2)
            .map(|line| line.chars().count())
            .collect();
        assert_eq!(widths, [22, 22]);
    }
}
