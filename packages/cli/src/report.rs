//! Static report: the dashboard page and both CSV exports written to a
//! directory.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use accident_dashboard_analytics::{AnalyticsError, render};
use accident_dashboard_analytics_models::FilterState;
use accident_dashboard_config::DashboardConfig;
use accident_dashboard_dataset::{
    DatasetError, DatasetSource, Upload, load, original_csv_bytes, write_csv,
};
use accident_dashboard_server::pages::{DashboardPage, PageMode};
use thiserror::Error;

/// File name of the rendered page.
pub const PAGE_FILE: &str = "dashboard.html";
/// File name of the filtered view export.
pub const FILTERED_FILE: &str = "filtered_data.csv";
/// File name of the default dataset export.
pub const ORIGINAL_FILE: &str = "original_data.csv";

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A dataset could not be read or exported.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The filter was rejected.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Row counts of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    /// Rows in the loaded dataset.
    pub total_rows: u64,
    /// Rows in `filtered_data.csv`.
    pub filtered_rows: u64,
}

/// Reads `input` into an in-memory upload, as if picked in the browser.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file can't be read.
pub fn read_upload(input: &Path) -> Result<Upload, DatasetError> {
    let name = input.file_name().map_or_else(
        || input.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    Ok(Upload {
        name,
        bytes: fs::read(input)?,
    })
}

/// Loads the dataset, applies `filter`, and writes [`PAGE_FILE`],
/// [`FILTERED_FILE`], and [`ORIGINAL_FILE`] into `out`.
///
/// `upload` stands in for an uploaded file; without it the configured
/// default dataset is used. The original export is always the default
/// dataset's cells as stored.
///
/// # Errors
///
/// Returns [`ReportError`] if a dataset fails to load, the date range is
/// inverted, or an output file can't be written. Nothing is written for an
/// inverted range.
pub fn write_report(
    out: &Path,
    config: &DashboardConfig,
    upload: Option<Upload>,
    filter: &FilterState,
) -> Result<ReportSummary, ReportError> {
    let source = DatasetSource::resolve(upload, &config.default_dataset);
    let upload_name = match &source {
        DatasetSource::Upload(upload) => Some(upload.name.clone()),
        DatasetSource::Path(_) => None,
    };

    let dataset = load(&source)?;
    let rendered = render(&dataset, filter)?;
    let original = original_csv_bytes(&config.default_dataset)?;

    fs::create_dir_all(out).map_err(|source| ReportError::Io {
        path: out.to_path_buf(),
        source,
    })?;

    let page = DashboardPage {
        title: &config.title,
        mode: PageMode::Report,
        upload_name: upload_name.as_deref(),
        filter,
        options: &rendered.options,
        outcome: Ok(&rendered.outputs),
    };
    write_file(&out.join(PAGE_FILE), page.render().into_string().as_bytes())?;

    let filtered_path = out.join(FILTERED_FILE);
    let file = File::create(&filtered_path).map_err(|source| ReportError::Io {
        path: filtered_path.clone(),
        source,
    })?;
    write_csv(&rendered.view, BufWriter::new(file))?;

    write_file(&out.join(ORIGINAL_FILE), &original)?;

    log::info!("Wrote report for {} to {}", source.label(), out.display());

    Ok(ReportSummary {
        total_rows: rendered.outputs.total_rows,
        filtered_rows: rendered.outputs.filtered_rows,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
