#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! ECharts option builders for the dashboard views.
//!
//! Each builder turns one aggregation result into an ECharts option object
//! serialized as a JS literal. The page embeds the options and calls
//! `echarts.init(..).setOption(..)` in the browser; this crate never draws
//! anything itself.
//!
//! [`gradient`] holds the colour scales used to shade the data tables.

pub mod gradient;
mod treemap;

use accident_dashboard_analytics_models::{
    CategoryCount, DashboardOutputs, ScatterPoint, TimeSeriesPoint,
};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{
        AxisLabel, AxisType, Formatter, Label, LabelPosition, Symbol, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie, Scatter},
};

pub use treemap::offense_treemap_options;

/// A chart with its HTML container ID and ECharts option literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardChart {
    /// The HTML element ID to render into (kebab-case).
    pub id: &'static str,
    /// Section heading shown above the chart.
    pub heading: &'static str,
    /// The ECharts option as a JS object literal.
    pub options: String,
}

/// Builds every chart of the dashboard, in page order.
#[must_use]
pub fn dashboard_charts(outputs: &DashboardOutputs) -> Vec<DashboardChart> {
    vec![
        DashboardChart {
            id: "incidents-by-barangay",
            heading: "Incidents by Barangay",
            options: barangay_bar_chart(&outputs.incidents_by_barangay).to_string(),
        },
        DashboardChart {
            id: "incident-types",
            heading: "Incident Types Distribution",
            options: incident_type_donut(&outputs.incident_types).to_string(),
        },
        DashboardChart {
            id: "incidents-over-time",
            heading: "Incidents Over Time",
            options: incidents_over_time_line(&outputs.incidents_over_time).to_string(),
        },
        DashboardChart {
            id: "offense-scatter",
            heading: "Scatter Plot: Offenses vs. Time Committed",
            options: offense_scatter_chart(&outputs.offense_scatter).to_string(),
        },
        DashboardChart {
            id: "offense-treemap",
            heading: "Hierarchical view of Offenses using TreeMap",
            options: offense_treemap_options(&outputs.offense_treemap).to_string(),
        },
    ]
}

/// Bar chart with one bar per barangay, labelled with its count.
#[must_use]
pub fn barangay_bar_chart(counts: &[CategoryCount]) -> Chart {
    let (labels, values) = split_counts(counts);

    Chart::new()
        .title(Title::new().text("Number of Incidents per Barangay"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("barangay")
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).name("count"))
        .series(
            Bar::new()
                .name("count")
                .label(Label::new().show(true).position(LabelPosition::Top))
                .data(values),
        )
}

/// Donut chart of incident types.
#[must_use]
pub fn incident_type_donut(counts: &[CategoryCount]) -> Chart {
    let data: Vec<DataPointItem> = counts
        .iter()
        .map(|c| DataPointItem::new(count_value(c.count)).name(c.category.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Incident Types Distribution"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("incidentType")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Line chart of incidents per month with a marker on every point.
#[must_use]
pub fn incidents_over_time_line(points: &[TimeSeriesPoint]) -> Chart {
    let labels: Vec<String> = points.iter().map(|p| p.period.clone()).collect();
    let values: Vec<f64> = points.iter().map(|p| count_value(p.count)).collect();

    Chart::new()
        .title(Title::new().text("Incidents Over Time"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("dateCommitted")
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).name("count"))
        .series(
            Line::new()
                .name("count")
                .symbol(Symbol::Circle)
                .symbol_size(8)
                .data(values),
        )
}

/// Scatter of time of day against offense, one series per incident type.
#[must_use]
pub fn offense_scatter_chart(points: &[ScatterPoint]) -> Chart {
    let offenses = first_seen(points.iter().map(|p| p.offense.as_str()));
    let incident_types = first_seen(points.iter().map(|p| p.incident_type.as_str()));

    let mut chart = Chart::new()
        .title(Title::new().text("Offenses vs. Time Committed"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("12%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Time Committed")
                .axis_label(AxisLabel::new().formatter(time_of_day_formatter())),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Offense")
                .data(offenses.clone()),
        );

    for incident_type in &incident_types {
        let data: Vec<Vec<f64>> = points
            .iter()
            .filter(|p| &p.incident_type == incident_type)
            .map(|p| {
                let row = offenses
                    .iter()
                    .position(|o| o == &p.offense)
                    .unwrap_or_default();
                vec![f64::from(p.seconds), f64::from(u32::try_from(row).unwrap_or(u32::MAX))]
            })
            .collect();
        chart = chart.series(
            Scatter::new()
                .name(incident_type.as_str())
                .symbol_size(10)
                .data(data),
        );
    }

    chart
}

/// Formats seconds since midnight as `HH:MM:SS`.
///
/// Function formatters are written into the options unquoted when the
/// chart is displayed.
fn time_of_day_formatter() -> Formatter {
    Formatter::Function(
        "function (value) {
            const pad = (n) => String(Math.floor(n)).padStart(2, '0');
            return pad(value / 3600) + ':' + pad((value % 3600) / 60) + ':' + pad(value % 60);
        }"
        .into(),
    )
}

fn split_counts(counts: &[CategoryCount]) -> (Vec<String>, Vec<f64>) {
    counts
        .iter()
        .map(|c| (c.category.clone(), count_value(c.count)))
        .unzip()
}

#[allow(clippy::cast_precision_loss)]
fn count_value(count: u64) -> f64 {
    count as f64
}

/// Distinct values in order of first appearance.
fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_owned());
        }
    }
    out
}
