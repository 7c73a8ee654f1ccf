#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter pipeline and aggregations behind the dashboard views.
//!
//! [`render`] is the whole per-request computation: it filters a loaded
//! dataset with a [`FilterState`] and derives every view from the result.
//! Nothing is cached between calls.

pub mod aggregations;
pub mod filters;
pub mod table;

use accident_dashboard_accident_models::Dataset;
use accident_dashboard_analytics_models::{DashboardOutputs, FilterOptions, FilterState};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// The selected start date is after the selected end date.
    #[error("Start date must be earlier than or equal to end date.")]
    InvalidDateRange {
        /// Selected start date.
        start: NaiveDate,
        /// Selected end date.
        end: NaiveDate,
    },
}

/// The filtered view, the sidebar options, and every derived view for one
/// filter state.
#[derive(Debug, Clone)]
pub struct RenderedDashboard {
    /// Rows left after filtering, in the loaded dataset's layout.
    pub view: Dataset,
    /// Options for the sidebar controls.
    pub options: FilterOptions,
    /// Aggregated views of `view`.
    pub outputs: DashboardOutputs,
}

/// Filters `dataset` and computes every dashboard view.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDateRange`] if `filter.start` is after
/// `filter.end`; no view is computed in that case.
pub fn render(dataset: &Dataset, filter: &FilterState) -> Result<RenderedDashboard, AnalyticsError> {
    let (view, options) = filters::apply_with_options(dataset, filter)?;
    let outputs = aggregations::aggregate(&view, dataset.len());
    Ok(RenderedDashboard {
        view,
        options,
        outputs,
    })
}
