//! CSV export of datasets.
//!
//! Every column is written in source order with no index column. Temporal
//! fields use the canonical formats and extras are written verbatim, so
//! loading an export gives back an identical dataset.
//!
//! [`original_csv_bytes`] is the exception: it copies a file's cells
//! without typing them, so the default dataset is exported as stored.

use std::io::Write;
use std::path::Path;

use accident_dashboard_accident_models::Dataset;

use crate::DatasetError;
use crate::loader::{RawTable, read_raw};

/// Writes `dataset` as CSV to `writer`.
///
/// # Errors
///
/// Returns [`DatasetError`] if writing fails.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), DatasetError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.headers())?;
    for record in dataset.records() {
        out.write_record(
            dataset
                .columns()
                .iter()
                .map(|column| record.cell(column.slot).into_owned()),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Serializes `dataset` to UTF-8 CSV bytes.
///
/// # Errors
///
/// Returns [`DatasetError`] if serialization fails.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, DatasetError> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    log::debug!("Exported {} records ({} bytes)", dataset.len(), buf.len());
    Ok(buf)
}

/// Writes the header and cells of `table` as read, with no reformatting.
///
/// # Errors
///
/// Returns [`DatasetError`] if writing fails.
pub fn write_raw_csv<W: Write>(table: &RawTable, writer: W) -> Result<(), DatasetError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.headers)?;
    for row in &table.rows {
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads the CSV at `path` and serializes its cells unchanged.
///
/// Dates and times are not parsed, so a file the dashboard would reject
/// for a bad temporal value still exports.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file can't be read or isn't valid CSV.
pub fn original_csv_bytes(path: &Path) -> Result<Vec<u8>, DatasetError> {
    let table = read_raw(std::fs::File::open(path)?)?;
    let mut buf = Vec::new();
    write_raw_csv(&table, &mut buf)?;
    log::debug!("Exported {} raw rows from {}", table.rows.len(), path.display());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_bytes;

    const CSV: &str = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType,remarks,victims
01/05/2023,17:45:00,Anabu I-A,Collision,Reckless driving,Traffic,\"wet road, night\",2
2023-02-10,06:00:00,Bucandala I,Self accident,Speeding,Traffic,,
";

    #[test]
    fn export_then_reload_is_identical() {
        let original = load_bytes(CSV.as_bytes()).unwrap();
        let bytes = to_csv_bytes(&original).unwrap();
        let reloaded = load_bytes(&bytes).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn writes_canonical_temporal_formats() {
        let ds = load_bytes(CSV.as_bytes()).unwrap();
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType,remarks,victims"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-01-05,17:45:00,Anabu I-A,Collision,Reckless driving,Traffic,\"wet road, night\",2"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-02-10,06:00:00,Bucandala I,Self accident,Speeding,Traffic,,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_dataset_exports_header_only() {
        let ds = load_bytes(CSV.as_bytes()).unwrap();
        let empty = ds.with_records(Vec::new());
        let text = String::from_utf8(to_csv_bytes(&empty).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        let reloaded = load_bytes(text.as_bytes()).unwrap();
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.headers(), empty.headers());
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "accident_dashboard_export_{}_{name}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn original_export_keeps_cells_as_stored() {
        let path = scratch_file("as_stored", CSV);
        let bytes = original_csv_bytes(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(String::from_utf8(bytes).unwrap(), CSV);
    }

    #[test]
    fn original_export_ignores_bad_times() {
        let csv = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2023-01-01,8am,A,Collision,Speeding,Traffic
";
        let path = scratch_file("bad_time", csv);
        assert!(load_bytes(csv.as_bytes()).is_err());
        let bytes = original_csv_bytes(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(String::from_utf8(bytes).unwrap(), csv);
    }
}
