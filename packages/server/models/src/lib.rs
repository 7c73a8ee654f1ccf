#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the dashboard host.
//!
//! Filter state travels in the query string so every page and download
//! link is reproducible: `start` and `end` as `YYYY-MM-DD`, and
//! `barangay`, `incidentType`, `offense` repeated once per selected value.
//! Values may contain commas.

use accident_dashboard_analytics_models::{DashboardOutputs, FilterOptions, FilterState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query key for the start date.
pub const START_PARAM: &str = "start";
/// Query key for the end date.
pub const END_PARAM: &str = "end";
/// Query key for selected barangays.
pub const BARANGAY_PARAM: &str = "barangay";
/// Query key for selected incident types.
pub const INCIDENT_TYPE_PARAM: &str = "incidentType";
/// Query key for selected offenses.
pub const OFFENSE_PARAM: &str = "offense";

/// A query string value that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParamError {
    /// A date bound is not `YYYY-MM-DD`.
    #[error("Invalid {key} date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Query key.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Builds a [`FilterState`] from decoded query pairs.
///
/// Unknown keys and empty values are ignored. Selections keep the order
/// they were given in, without duplicates.
///
/// # Errors
///
/// Returns [`FilterParamError::InvalidDate`] if `start` or `end` isn't a
/// valid date.
pub fn parse_filter_query(pairs: &[(String, String)]) -> Result<FilterState, FilterParamError> {
    let mut filter = FilterState::default();

    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            START_PARAM => filter.start = Some(parse_date_param(START_PARAM, value)?),
            END_PARAM => filter.end = Some(parse_date_param(END_PARAM, value)?),
            BARANGAY_PARAM => push_value(&mut filter.barangays, value),
            INCIDENT_TYPE_PARAM => push_value(&mut filter.incident_types, value),
            OFFENSE_PARAM => push_value(&mut filter.offenses, value),
            _ => {}
        }
    }

    Ok(filter)
}

fn parse_date_param(key: &'static str, value: &str) -> Result<NaiveDate, FilterParamError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterParamError::InvalidDate {
        key,
        value: value.to_string(),
    })
}

fn push_value(selection: &mut Vec<String>, value: &str) {
    if !selection.iter().any(|s| s == value) {
        selection.push(value.to_string());
    }
}

/// Encodes a [`FilterState`] as a query string (without the leading `?`).
///
/// Selections are written as repeated keys. Parsing the result with
/// [`parse_filter_query`] gives back an equal filter.
#[must_use]
pub fn filter_query_string(filter: &FilterState) -> String {
    let dates = [(START_PARAM, filter.start), (END_PARAM, filter.end)]
        .into_iter()
        .filter_map(|(key, date)| date.map(|d| format!("{key}={}", d.format("%Y-%m-%d"))));

    let selections = [
        (BARANGAY_PARAM, &filter.barangays),
        (INCIDENT_TYPE_PARAM, &filter.incident_types),
        (OFFENSE_PARAM, &filter.offenses),
    ]
    .into_iter()
    .flat_map(|(key, values)| {
        values
            .iter()
            .map(move |v| format!("{key}={}", urlencoding::encode(v)))
    });

    dates.chain(selections).collect::<Vec<_>>().join("&")
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Query parameters for the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    /// File name reported by the browser.
    pub name: Option<String>,
}

/// Response to an accepted upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUpload {
    /// Name the upload is shown under.
    pub name: String,
    /// Data rows in the uploaded file.
    pub rows: u64,
}

/// Every view of the dashboard for one filter state, as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// Where the dataset was read from.
    pub source: String,
    /// The filter state the views were computed for.
    pub filter: FilterState,
    /// Options for the sidebar controls.
    pub options: FilterOptions,
    /// The computed views.
    pub outputs: DashboardOutputs,
}

/// Error body returned by the JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}
