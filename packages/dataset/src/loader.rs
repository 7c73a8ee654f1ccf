//! Dataset sources and raw CSV reading.

use std::io::Read;
use std::path::{Path, PathBuf};

use accident_dashboard_accident_models::Dataset;

use crate::DatasetError;
use crate::normalize::normalize;

/// A CSV file supplied by the user through the dashboard's file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// File name as reported by the browser.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Where a dataset is read from. Exactly one source is used per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// An uploaded file held in memory.
    Upload(Upload),
    /// A CSV file on the local filesystem.
    Path(PathBuf),
}

impl DatasetSource {
    /// Picks the upload when present, otherwise the default path.
    #[must_use]
    pub fn resolve(upload: Option<Upload>, default_path: &Path) -> Self {
        upload.map_or_else(|| Self::Path(default_path.to_path_buf()), Self::Upload)
    }

    /// Human-readable label for log messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Upload(upload) => format!("upload '{}'", upload.name),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// Header row and string cells of a CSV file, before any typing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    /// Header names, trimmed.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

/// Loads and normalizes a dataset from `source`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the source can't be read, the CSV is
/// malformed, a required column is missing, or a temporal value fails to
/// parse.
pub fn load(source: &DatasetSource) -> Result<Dataset, DatasetError> {
    let dataset = match source {
        DatasetSource::Upload(upload) => load_bytes(&upload.bytes)?,
        DatasetSource::Path(path) => load_path(path)?,
    };
    log::info!("Loaded {} records from {}", dataset.len(), source.label());
    Ok(dataset)
}

/// Loads and normalizes a dataset from a CSV file on disk.
///
/// # Errors
///
/// See [`load`].
pub fn load_path(path: &Path) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(path)?;
    normalize(read_raw(file)?)
}

/// Loads and normalizes a dataset from in-memory CSV bytes.
///
/// # Errors
///
/// See [`load`].
pub fn load_bytes(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    normalize(read_raw(bytes)?)
}

/// Reads a CSV into a [`RawTable`].
///
/// Rows shorter than the header are padded with empty (missing) cells;
/// longer rows are rejected.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV can't be parsed, has no header row,
/// or has a row with too many fields.
pub fn read_raw<R: Read>(reader: R) -> Result<RawTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DatasetError::NoHeader);
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(DatasetError::MalformedRow {
                row: i + 1,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    log::debug!("Read {} raw rows with {} columns", rows.len(), headers.len());

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2023-01-01,08:00:00,A,Collision,Reckless driving,Traffic
2023-01-02,09:30:00,B,Self accident,Speeding,Traffic
";

    #[test]
    fn resolve_prefers_upload() {
        let upload = Upload {
            name: "mine.csv".to_string(),
            bytes: CSV.as_bytes().to_vec(),
        };
        let source = DatasetSource::resolve(Some(upload), Path::new("default.csv"));
        assert!(matches!(source, DatasetSource::Upload(ref u) if u.name == "mine.csv"));

        let source = DatasetSource::resolve(None, Path::new("default.csv"));
        assert_eq!(source, DatasetSource::Path(PathBuf::from("default.csv")));
    }

    #[test]
    fn loads_upload_bytes() {
        let source = DatasetSource::Upload(Upload {
            name: "mine.csv".to_string(),
            bytes: CSV.as_bytes().to_vec(),
        });
        let ds = load(&source).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].barangay, "B");
    }

    #[test]
    fn missing_default_path_is_an_io_error() {
        let source = DatasetSource::Path(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(load(&source), Err(DatasetError::Io(_))));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "accident_dashboard_loader_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, CSV).unwrap();
        let ds = load_path(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn pads_short_rows_and_strips_bom() {
        let raw = read_raw("\u{feff}a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(raw.headers, ["a", "b", "c"]);
        assert_eq!(raw.rows, [vec!["1", "2", ""]]);
    }

    #[test]
    fn rejects_long_rows() {
        let err = read_raw("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedRow {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn rejects_empty_file() {
        assert!(matches!(
            read_raw("".as_bytes()),
            Err(DatasetError::NoHeader)
        ));
    }
}
