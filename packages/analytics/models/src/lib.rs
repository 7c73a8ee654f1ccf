#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and aggregation result types for the dashboard views.
//!
//! These are plain serializable tables. Styling (colour scales, gradient
//! shading) is left to whoever renders them.

use accident_dashboard_accident_models::RecordField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The user's current filter selections.
///
/// An empty selection list means "no filter" for that field, not "match
/// nothing". A missing date bound is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Earliest `dateCommitted` to keep (inclusive).
    pub start: Option<NaiveDate>,
    /// Latest `dateCommitted` to keep (inclusive).
    pub end: Option<NaiveDate>,
    /// Barangays to keep.
    pub barangays: Vec<String>,
    /// Incident types to keep.
    pub incident_types: Vec<String>,
    /// Offenses to keep.
    pub offenses: Vec<String>,
}

impl FilterState {
    /// Returns the selection list for a filterable field, or an empty slice
    /// for fields that have no multi-select.
    #[must_use]
    pub fn selection(&self, field: RecordField) -> &[String] {
        match field {
            RecordField::Barangay => &self.barangays,
            RecordField::IncidentType => &self.incident_types,
            RecordField::Offense => &self.offenses,
            RecordField::DateCommitted | RecordField::TimeCommitted | RecordField::OffenseType => {
                &[]
            }
        }
    }
}

/// Values offered by each sidebar control for the current selections.
///
/// Each multi-select's options come from the view left after the filters
/// applied before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Earliest date in the loaded dataset.
    pub min_date: Option<NaiveDate>,
    /// Latest date in the loaded dataset.
    pub max_date: Option<NaiveDate>,
    /// Barangays present after the date filter.
    pub barangays: Vec<String>,
    /// Incident types present after the barangay filter.
    pub incident_types: Vec<String>,
    /// Offenses present after the incident type filter.
    pub offenses: Vec<String>,
}

/// Number of rows sharing one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Group key.
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Month label (`YYYY-MM`).
    pub period: String,
    /// Number of rows in this month.
    pub count: u64,
}

/// Row count for one barangay / incident type / offense type path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyCount {
    /// Outermost level.
    pub barangay: String,
    /// Middle level.
    pub incident_type: String,
    /// Innermost level.
    pub offense_type: String,
    /// Number of rows on this path.
    pub count: u64,
}

/// One row plotted as offense against time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// Time of day as `HH:MM:SS`.
    pub time_committed: String,
    /// Seconds since midnight, for positioning on a numeric axis.
    pub seconds: u32,
    /// Offense (categorical y value).
    pub offense: String,
    /// Incident type (series / colour).
    pub incident_type: String,
}

/// One cell of a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Display text.
    pub text: String,
    /// Numeric value for cells in numeric columns.
    pub value: Option<f64>,
}

/// A plain table with per-cell numeric values where they exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Rows of cells, each `headers.len()` long.
    pub rows: Vec<Vec<TableCell>>,
}

/// Every view the dashboard shows for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOutputs {
    /// Rows in the loaded dataset.
    pub total_rows: u64,
    /// Rows left after filtering.
    pub filtered_rows: u64,
    /// Incident count per barangay, keys ascending.
    pub incidents_by_barangay: Vec<CategoryCount>,
    /// Incident count per incident type, keys ascending.
    pub incident_types: Vec<CategoryCount>,
    /// Incident count per month, chronological.
    pub incidents_over_time: Vec<TimeSeriesPoint>,
    /// One point per filtered row.
    pub offense_scatter: Vec<ScatterPoint>,
    /// Counts per barangay / incident type / offense type path.
    pub offense_treemap: Vec<HierarchyCount>,
    /// The filtered rows themselves.
    pub preview: DataTable,
}
