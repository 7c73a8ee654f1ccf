//! Plain tabular rendering of a dataset for the preview view.

use accident_dashboard_accident_models::Dataset;
use accident_dashboard_analytics_models::{DataTable, TableCell};

/// Builds a table of every record in `view`, in source column order.
///
/// Cells of numeric columns carry their parsed value; missing numeric
/// cells and all other cells carry none.
#[must_use]
pub fn preview_table(view: &Dataset) -> DataTable {
    let headers = view.columns().iter().map(|c| c.name.clone()).collect();
    let rows = view
        .records()
        .iter()
        .map(|record| {
            view.columns()
                .iter()
                .map(|column| {
                    let text = record.cell(column.slot).into_owned();
                    let value = if column.kind.is_numeric() {
                        text.trim().parse::<f64>().ok()
                    } else {
                        None
                    };
                    TableCell { text, value }
                })
                .collect()
        })
        .collect();

    DataTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_dashboard_dataset::load_bytes;

    #[test]
    fn numeric_columns_carry_values() {
        let ds = load_bytes(
            "dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType,victims\n\
             2023-01-01,08:00:00,A,Collision,Speeding,Traffic,2\n\
             2023-01-02,09:00:00,B,Collision,Speeding,Traffic,\n"
                .as_bytes(),
        )
        .unwrap();
        let table = preview_table(&ds);

        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0].text, "2023-01-01");
        assert_eq!(table.rows[0][0].value, None);
        assert!(
            table.rows[0][6]
                .value
                .is_some_and(|v| (v - 2.0).abs() < f64::EPSILON)
        );
        assert_eq!(table.rows[1][6].text, "");
        assert_eq!(table.rows[1][6].value, None);
    }
}
