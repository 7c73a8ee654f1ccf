#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading, normalization, and export of accident datasets.
//!
//! A dataset comes from exactly one [`DatasetSource`]: an uploaded file
//! when one is active, otherwise the configured default path. Loading
//! reads the raw CSV ([`loader`]), then [`normalize`] infers column kinds
//! and reparses the temporal columns. [`export`] writes a dataset back to
//! CSV bytes in the same layout.

pub mod export;
pub mod loader;
pub mod normalize;
pub mod parsing;

use accident_dashboard_accident_models::RecordField;
use thiserror::Error;

pub use export::{original_csv_bytes, to_csv_bytes, write_csv, write_raw_csv};
pub use loader::{DatasetSource, RawTable, Upload, load, load_bytes, load_path, read_raw};

/// Errors that can occur while loading or exporting a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row.
    #[error("CSV file contains no header row")]
    NoHeader,

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// The absent column.
        column: RecordField,
    },

    /// A data row has more fields than the header row.
    #[error("Row {row} has {found} fields, expected at most {expected}")]
    MalformedRow {
        /// 1-based data row number.
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of fields found.
        found: usize,
    },

    /// A `dateCommitted` value is not a recognizable calendar date.
    #[error("Row {row}: invalid dateCommitted '{value}'")]
    InvalidDate {
        /// 1-based data row number.
        row: usize,
        /// The offending cell text.
        value: String,
    },

    /// A `timeCommitted` value does not match `HH:MM:SS`.
    #[error("Row {row}: invalid timeCommitted '{value}', expected HH:MM:SS")]
    InvalidTime {
        /// 1-based data row number.
        row: usize,
        /// The offending cell text.
        value: String,
    },
}
