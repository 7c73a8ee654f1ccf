//! The filter pipeline.
//!
//! Filters run in the order date → barangay → incident type → offense.
//! Each one only narrows the working set, so the order doesn't change the
//! result; it only matters for which options each sidebar control offers.

use std::collections::BTreeSet;

use accident_dashboard_accident_models::{AccidentRecord, Dataset, RecordField};
use accident_dashboard_analytics_models::{FilterOptions, FilterState};
use chrono::NaiveDate;

use crate::AnalyticsError;

/// Multi-select filters in application order.
const MEMBERSHIP_FILTERS: &[RecordField] = &[
    RecordField::Barangay,
    RecordField::IncidentType,
    RecordField::Offense,
];

/// Checks that the selected date range is not inverted.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDateRange`] if both bounds are set and
/// `start > end`.
pub fn validate(filter: &FilterState) -> Result<(), AnalyticsError> {
    match (filter.start, filter.end) {
        (Some(start), Some(end)) if start > end => {
            Err(AnalyticsError::InvalidDateRange { start, end })
        }
        _ => Ok(()),
    }
}

/// Keeps records with `start <= dateCommitted <= end`.
#[must_use]
pub fn by_date_range<'a>(
    records: Vec<&'a AccidentRecord>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&'a AccidentRecord> {
    if start.is_none() && end.is_none() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| start.is_none_or(|s| r.date_committed >= s))
        .filter(|r| end.is_none_or(|e| r.date_committed <= e))
        .collect()
}

/// Keeps records whose `field` value is in `selection`. An empty selection
/// keeps everything.
#[must_use]
pub fn by_membership<'a>(
    records: Vec<&'a AccidentRecord>,
    field: RecordField,
    selection: &[String],
) -> Vec<&'a AccidentRecord> {
    if selection.is_empty() {
        return records;
    }
    let wanted: BTreeSet<&str> = selection.iter().map(String::as_str).collect();
    records
        .into_iter()
        .filter(|r| r.category(field).is_some_and(|v| wanted.contains(v)))
        .collect()
}

/// Applies every filter in `filter` to `dataset`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDateRange`] for an inverted date range.
pub fn apply(dataset: &Dataset, filter: &FilterState) -> Result<Dataset, AnalyticsError> {
    apply_with_options(dataset, filter).map(|(view, _)| view)
}

/// Applies every filter and collects the options each sidebar control
/// should offer along the way.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDateRange`] for an inverted date range.
pub fn apply_with_options(
    dataset: &Dataset,
    filter: &FilterState,
) -> Result<(Dataset, FilterOptions), AnalyticsError> {
    validate(filter)?;

    let bounds = dataset.date_bounds();
    let mut options = FilterOptions {
        min_date: bounds.map(|(min, _)| min),
        max_date: bounds.map(|(_, max)| max),
        ..FilterOptions::default()
    };

    let mut working = by_date_range(dataset.records().iter().collect(), filter.start, filter.end);

    for field in MEMBERSHIP_FILTERS {
        let offered = distinct(&working, *field);
        match field {
            RecordField::Barangay => options.barangays = offered,
            RecordField::IncidentType => options.incident_types = offered,
            _ => options.offenses = offered,
        }
        working = by_membership(working, *field, filter.selection(*field));
    }

    log::debug!("Filtered {} of {} records", working.len(), dataset.len());

    let view = dataset.with_records(working.into_iter().cloned().collect());
    Ok((view, options))
}

/// Sidebar options for a filter whose date range was rejected.
///
/// The date bounds are dropped and the membership cascade runs over the
/// whole dataset, so the controls stay usable while the error is shown.
#[must_use]
pub fn options_ignoring_dates(dataset: &Dataset, filter: &FilterState) -> FilterOptions {
    let undated = FilterState {
        start: None,
        end: None,
        ..filter.clone()
    };
    apply_with_options(dataset, &undated).map_or_else(|_| FilterOptions::default(), |(_, o)| o)
}

/// Distinct values of `field` in order of first appearance.
fn distinct(records: &[&AccidentRecord], field: RecordField) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter_map(|r| r.category(field))
        .filter(|v| seen.insert(*v))
        .map(str::to_owned)
        .collect()
}
