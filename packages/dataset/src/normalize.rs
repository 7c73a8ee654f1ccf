//! Turns a [`RawTable`] into a typed [`Dataset`].
//!
//! Kinds are inferred for every column first. The temporal columns are then
//! reparsed explicitly; one bad `dateCommitted` or `timeCommitted` cell
//! fails the whole load.

use accident_dashboard_accident_models::{
    AccidentRecord, Column, ColumnKind, ColumnSlot, Dataset, RecordField,
};

use crate::DatasetError;
use crate::loader::RawTable;
use crate::parsing::{infer_kind, parse_date, parse_time};

/// Normalizes a raw table into a dataset.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] if a required column is absent,
/// or [`DatasetError::InvalidDate`] / [`DatasetError::InvalidTime`] for the
/// first temporal cell that fails to parse.
pub fn normalize(raw: RawTable) -> Result<Dataset, DatasetError> {
    let columns = layout(&raw)?;

    let field_index = |field: RecordField| -> usize {
        columns
            .iter()
            .position(|c| c.slot == ColumnSlot::Field(field))
            .unwrap_or_default()
    };
    let date_idx = field_index(RecordField::DateCommitted);
    let time_idx = field_index(RecordField::TimeCommitted);
    let barangay_idx = field_index(RecordField::Barangay);
    let incident_idx = field_index(RecordField::IncidentType);
    let offense_idx = field_index(RecordField::Offense);
    let offense_type_idx = field_index(RecordField::OffenseType);
    let extra_idxs: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c.slot, ColumnSlot::Extra(_)))
        .map(|(i, _)| i)
        .collect();

    let mut records = Vec::with_capacity(raw.rows.len());
    for (i, mut row) in raw.rows.into_iter().enumerate() {
        let row_number = i + 1;

        let date_committed =
            parse_date(&row[date_idx]).ok_or_else(|| DatasetError::InvalidDate {
                row: row_number,
                value: row[date_idx].clone(),
            })?;
        let time_committed =
            parse_time(&row[time_idx]).ok_or_else(|| DatasetError::InvalidTime {
                row: row_number,
                value: row[time_idx].clone(),
            })?;

        let extras = extra_idxs
            .iter()
            .map(|&idx| std::mem::take(&mut row[idx]))
            .collect();

        records.push(AccidentRecord {
            date_committed,
            time_committed,
            barangay: std::mem::take(&mut row[barangay_idx]),
            incident_type: std::mem::take(&mut row[incident_idx]),
            offense: std::mem::take(&mut row[offense_idx]),
            offense_type: std::mem::take(&mut row[offense_type_idx]),
            extras,
        });
    }

    Ok(Dataset::new(columns, records))
}

/// Builds the column layout: the first occurrence of each required header
/// becomes a typed field, every other column an extra with an inferred
/// kind.
fn layout(raw: &RawTable) -> Result<Vec<Column>, DatasetError> {
    let mut columns = Vec::with_capacity(raw.headers.len());
    let mut extras = 0;

    for (i, name) in raw.headers.iter().enumerate() {
        let field = name
            .parse::<RecordField>()
            .ok()
            .filter(|f| !columns.iter().any(|c: &Column| c.slot == ColumnSlot::Field(*f)));

        let column = match field {
            Some(field) => Column {
                name: name.clone(),
                kind: match field {
                    RecordField::DateCommitted => ColumnKind::Date,
                    RecordField::TimeCommitted => ColumnKind::Time,
                    _ => ColumnKind::Text,
                },
                slot: ColumnSlot::Field(field),
            },
            None => {
                let kind = infer_kind(raw.rows.iter().map(|row| row[i].as_str()));
                let slot = ColumnSlot::Extra(extras);
                extras += 1;
                Column {
                    name: name.clone(),
                    kind,
                    slot,
                }
            }
        };
        columns.push(column);
    }

    for field in RecordField::all() {
        if !columns.iter().any(|c| c.slot == ColumnSlot::Field(*field)) {
            return Err(DatasetError::MissingColumn { column: *field });
        }
    }

    Ok(columns)
}
