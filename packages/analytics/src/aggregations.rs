//! Group-and-count aggregations for each dashboard view.

use std::collections::BTreeMap;

use accident_dashboard_accident_models::{AccidentRecord, Dataset, RecordField, TIME_FORMAT};
use accident_dashboard_analytics_models::{
    CategoryCount, DashboardOutputs, HierarchyCount, ScatterPoint, TimeSeriesPoint,
};
use chrono::{Datelike as _, Timelike as _};

use crate::table::preview_table;

/// Computes every view of a filtered dataset.
///
/// `total_rows` is the size of the dataset before filtering.
#[must_use]
pub fn aggregate(view: &Dataset, total_rows: usize) -> DashboardOutputs {
    DashboardOutputs {
        total_rows: total_rows as u64,
        filtered_rows: view.len() as u64,
        incidents_by_barangay: count_by(view.records(), RecordField::Barangay),
        incident_types: count_by(view.records(), RecordField::IncidentType),
        incidents_over_time: incidents_over_time(view.records()),
        offense_scatter: offense_scatter(view.records()),
        offense_treemap: offense_treemap(view.records()),
        preview: preview_table(view),
    }
}

/// Counts records per value of a categorical field, keys ascending.
#[must_use]
pub fn count_by(records: &[AccidentRecord], field: RecordField) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in records.iter().filter_map(|r| r.category(field)) {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_owned(),
            count,
        })
        .collect()
}

/// Counts records per calendar month of `dateCommitted`, chronologically.
#[must_use]
pub fn incidents_over_time(records: &[AccidentRecord]) -> Vec<TimeSeriesPoint> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for record in records {
        let key = (record.date_committed.year(), record.date_committed.month());
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((year, month), count)| TimeSeriesPoint {
            period: format!("{year:04}-{month:02}"),
            count,
        })
        .collect()
}

/// One point per record: time of day against offense, keyed by incident
/// type.
#[must_use]
pub fn offense_scatter(records: &[AccidentRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            time_committed: r.time_committed.format(TIME_FORMAT).to_string(),
            seconds: r.time_committed.num_seconds_from_midnight(),
            offense: r.offense.clone(),
            incident_type: r.incident_type.clone(),
        })
        .collect()
}

/// Counts records per (barangay, incident type, offense type) path, paths
/// ascending.
#[must_use]
pub fn offense_treemap(records: &[AccidentRecord]) -> Vec<HierarchyCount> {
    let mut counts: BTreeMap<(&str, &str, &str), u64> = BTreeMap::new();
    for r in records {
        let key = (
            r.barangay.as_str(),
            r.incident_type.as_str(),
            r.offense_type.as_str(),
        );
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((barangay, incident_type, offense_type), count)| HierarchyCount {
            barangay: barangay.to_owned(),
            incident_type: incident_type.to_owned(),
            offense_type: offense_type.to_owned(),
            count,
        })
        .collect()
}
