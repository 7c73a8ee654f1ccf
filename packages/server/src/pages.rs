//! HTML rendering of the dashboard with `maud`.
//!
//! Charts are drawn in the browser by ECharts from the option literals
//! built in `accident_dashboard_charts`. Tables are rendered server-side
//! with gradient shading applied per column.

use accident_dashboard_analytics::AnalyticsError;
use accident_dashboard_analytics_models::{
    DashboardOutputs, DataTable, FilterOptions, FilterState, TimeSeriesPoint,
};
use accident_dashboard_charts::{
    DashboardChart, dashboard_charts,
    gradient::{shade_columns, shade_values},
};
use accident_dashboard_server_models::{
    BARANGAY_PARAM, END_PARAM, INCIDENT_TYPE_PARAM, OFFENSE_PARAM, START_PARAM,
    filter_query_string,
};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 280px; flex-shrink: 0; padding: 1rem; background: #f0f2f6; min-height: 100vh; box-sizing: border-box; }
aside label { display: block; margin-top: .75rem; font-weight: bold; }
aside select, aside input { width: 100%; box-sizing: border-box; }
aside fieldset { border: none; padding: 0; margin: 0; }
main { flex: 1; min-width: 0; padding: 1.5rem 2rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.chart { width: 100%; height: 420px; }
#offense-treemap { width: 850px; height: 725px; max-width: 100%; }
.error { background: #ffe5e5; color: #7d0000; padding: .75rem 1rem; border-radius: .25rem; }
table.shaded { border-collapse: collapse; font-size: .85rem; }
table.shaded th, table.shaded td { border: 1px solid #ddd; padding: .25rem .5rem; text-align: right; }
details { margin: 1rem 0; overflow-x: auto; }
";

const UPLOAD_SCRIPT: &str = "
document.getElementById('upload-file').addEventListener('change', async (event) => {
    const file = event.target.files[0];
    if (!file) return;
    const response = await fetch('/upload?name=' + encodeURIComponent(file.name), {
        method: 'POST',
        headers: { 'Content-Type': 'text/csv' },
        body: file,
    });
    if (response.ok) {
        window.location.assign('/');
    } else {
        const body = await response.json().catch(() => ({ error: response.statusText }));
        alert(body.error);
        event.target.value = '';
    }
});
";

const FILTER_SCRIPT: &str = "
document.getElementById('filters').addEventListener('change', (event) => {
    event.currentTarget.submit();
});
";

/// How the page is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Served by the dashboard host: upload widget, live filter form,
    /// download links to the host's endpoints.
    Live,
    /// Written to disk next to the exported CSVs: read-only controls,
    /// relative download links.
    Report,
}

/// Everything needed to render the dashboard page.
#[derive(Debug, Clone, Copy)]
pub struct DashboardPage<'a> {
    /// Page title.
    pub title: &'a str,
    /// How the page is served.
    pub mode: PageMode,
    /// Name of the active upload, if any.
    pub upload_name: Option<&'a str>,
    /// Current filter selections.
    pub filter: &'a FilterState,
    /// Options for the sidebar controls.
    pub options: &'a FilterOptions,
    /// The computed views, or the validation error that replaced them.
    pub outcome: Result<&'a DashboardOutputs, &'a AnalyticsError>,
}

impl DashboardPage<'_> {
    /// Renders the full HTML document.
    #[must_use]
    pub fn render(&self) -> Markup {
        let charts = self.outcome.map(dashboard_charts).unwrap_or_default();

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (self.title) }
                    style { (PreEscaped(STYLE)) }
                    script src=(ECHARTS_SRC) {}
                }
                body {
                    (self.sidebar())
                    main {
                        h1 { "🚦 " (self.title) }
                        @if self.mode == PageMode::Live {
                            (upload_widget(self.upload_name))
                        } @else if let Some(name) = self.upload_name {
                            p { "Uploaded File: " (name) }
                        }
                        @match self.outcome {
                            Ok(outputs) => { (views(outputs, &charts)) }
                            Err(e) => { p class="error" { (e) } }
                        }
                        p {
                            a href=(self.original_href()) download="original_data.csv" {
                                "Download Original Data"
                            }
                        }
                    }
                    (charts_script(&charts))
                }
            }
        }
    }

    fn sidebar(&self) -> Markup {
        let live = self.mode == PageMode::Live;
        let start = self.filter.start.or(self.options.min_date);
        let end = self.filter.end.or(self.options.max_date);

        html! {
            aside {
                h2 { "Filter Data" }
                form id="filters" method="get" action="/" {
                    fieldset disabled[!live] {
                        label for="start" { "Start Date" }
                        input id="start" type="date" name=(START_PARAM) value=[start.map(format_date)];
                        label for="end" { "End Date" }
                        input id="end" type="date" name=(END_PARAM) value=[end.map(format_date)];
                        (multi_select(BARANGAY_PARAM, "Select Barangay", &self.options.barangays, &self.filter.barangays))
                        (multi_select(INCIDENT_TYPE_PARAM, "Select Incident Type", &self.options.incident_types, &self.filter.incident_types))
                        (multi_select(OFFENSE_PARAM, "Select Offense", &self.options.offenses, &self.filter.offenses))
                    }
                    @if live {
                        noscript { button type="submit" { "Apply" } }
                    }
                }
                hr;
                a href=(self.filtered_href()) download="filtered_data.csv" { "Download Filtered Data" }
                @if live {
                    script { (PreEscaped(FILTER_SCRIPT)) }
                }
            }
        }
    }

    fn filtered_href(&self) -> String {
        match self.mode {
            PageMode::Report => "filtered_data.csv".to_string(),
            PageMode::Live => {
                let query = filter_query_string(self.filter);
                if query.is_empty() {
                    "/download/filtered.csv".to_string()
                } else {
                    format!("/download/filtered.csv?{query}")
                }
            }
        }
    }

    const fn original_href(&self) -> &'static str {
        match self.mode {
            PageMode::Report => "original_data.csv",
            PageMode::Live => "/download/original.csv",
        }
    }
}

/// Page shown when the dataset can't be loaded. The cause is only logged.
#[must_use]
pub fn failure_page(title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                main {
                    h1 { "🚦 " (title) }
                    p class="error" {
                        "The dataset could not be loaded. Check the server log for details."
                    }
                    form method="post" action="/upload/clear" {
                        button type="submit" { "Use the default dataset" }
                    }
                }
            }
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn upload_widget(upload_name: Option<&str>) -> Markup {
    html! {
        section id="upload" {
            label for="upload-file" { "📁 Upload a file" }
            " "
            input id="upload-file" type="file" accept=".csv,text/csv";
            @if let Some(name) = upload_name {
                p { "Uploaded File: " (name) }
                form method="post" action="/upload/clear" {
                    button type="submit" { "Remove upload" }
                }
            }
            script { (PreEscaped(UPLOAD_SCRIPT)) }
        }
    }
}

/// A multi-select over `options`. Selected values no longer offered are
/// kept at the end so they can still be deselected.
fn multi_select(name: &str, label: &str, options: &[String], selected: &[String]) -> Markup {
    let stale = selected.iter().filter(|s| !options.contains(s));

    html! {
        label for=(name) { (label) }
        select id=(name) name=(name) multiple size="6" {
            @for value in options {
                option value=(value) selected[selected.contains(value)] { (value) }
            }
            @for value in stale {
                option value=(value) selected { (value) }
            }
        }
    }
}

fn views(outputs: &DashboardOutputs, charts: &[DashboardChart]) -> Markup {
    // `dashboard_charts` returns bar, donut, line, scatter, treemap.
    html! {
        h2 { "Visualizations" }
        div class="columns" {
            @for chart in charts.iter().take(2) {
                (chart_block(chart))
            }
        }
        @for chart in charts.iter().skip(2).take(1) {
            (chart_block(chart))
        }
        details {
            summary { "View Data of TimeSeries:" }
            (time_series_table(&outputs.incidents_over_time))
        }
        @for chart in charts.iter().skip(3) {
            (chart_block(chart))
        }
        h2 { "Data Preview" }
        details {
            summary { "View Filtered Data" }
            (data_table(&outputs.preview))
        }
    }
}

fn chart_block(chart: &DashboardChart) -> Markup {
    html! {
        section {
            h3 { (chart.heading) }
            div id=(chart.id) class="chart" {}
        }
    }
}

/// The month → count table, transposed so months run across.
#[allow(clippy::cast_precision_loss)]
fn time_series_table(points: &[TimeSeriesPoint]) -> Markup {
    let counts: Vec<f64> = points.iter().map(|p| p.count as f64).collect();
    let shades = shade_values(&counts);

    html! {
        table class="shaded" {
            tr {
                th {}
                @for i in 0..points.len() {
                    th { (i) }
                }
            }
            tr {
                th { "dateCommitted" }
                @for point in points {
                    td { (point.period) }
                }
            }
            tr {
                th { "count" }
                @for (point, shade) in points.iter().zip(&shades) {
                    td style=(shade.style()) { (point.count) }
                }
            }
        }
    }
}

fn data_table(table: &DataTable) -> Markup {
    let shades = shade_columns(table);

    html! {
        table class="shaded" {
            thead {
                tr {
                    th {}
                    @for header in &table.headers {
                        th { (header) }
                    }
                }
            }
            tbody {
                @for (i, (row, row_shades)) in table.rows.iter().zip(&shades).enumerate() {
                    tr {
                        th { (i) }
                        @for (cell, shade) in row.iter().zip(row_shades) {
                            @if let Some(shade) = shade {
                                td style=(shade.style()) { (cell.text) }
                            } @else {
                                td { (cell.text) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn charts_script(charts: &[DashboardChart]) -> Markup {
    if charts.is_empty() {
        return html! {};
    }

    let body = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
    const chart = echarts.init(document.getElementById("{}"));
    chart.setOption({});
    window.addEventListener('resize', () => chart.resize());
}})();"#,
                chart.id,
                // Cell text must not close the surrounding script element.
                chart.options.replace("</", "<\\/"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html! {
        script {
            (PreEscaped(format!(
                "document.addEventListener('DOMContentLoaded', function() {{\n{body}\n}});"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_dashboard_analytics::render;
    use accident_dashboard_dataset::load_bytes;

    const CSV: &str = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2023-01-01,08:00:00,Anabu I-A,Collision,Reckless driving,Traffic
2023-02-02,12:15:00,Bucandala I,Self accident,Speeding,Traffic
";

    #[test]
    fn live_page_has_every_view() {
        let ds = load_bytes(CSV.as_bytes()).unwrap();
        let filter = FilterState::default();
        let rendered = render(&ds, &filter).unwrap();
        let html = DashboardPage {
            title: "Accidents",
            mode: PageMode::Live,
            upload_name: Some("jan.csv"),
            filter: &filter,
            options: &rendered.options,
            outcome: Ok(&rendered.outputs),
        }
        .render()
        .into_string();

        for id in [
            "incidents-by-barangay",
            "incident-types",
            "incidents-over-time",
            "offense-scatter",
            "offense-treemap",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(html.contains("Uploaded File: jan.csv"));
        assert!(html.contains("View Data of TimeSeries:"));
        assert!(html.contains("value=\"2023-01-01\""));
        assert!(html.contains("value=\"2023-02-02\""));
        assert!(html.contains("href=\"/download/filtered.csv\""));
        assert!(html.contains("upload-file"));
    }

    #[test]
    fn invalid_range_replaces_views_with_message() {
        let filter = FilterState::default();
        let error = AnalyticsError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        };
        let html = DashboardPage {
            title: "Accidents",
            mode: PageMode::Live,
            upload_name: None,
            filter: &filter,
            options: &FilterOptions::default(),
            outcome: Err(&error),
        }
        .render()
        .into_string();

        assert!(html.contains("Start date must be earlier than or equal to end date."));
        assert!(!html.contains("echarts.init"));
        assert!(html.contains("Download Original Data"));
    }

    #[test]
    fn report_page_links_to_local_files() {
        let filter = FilterState {
            barangays: vec!["Anabu I-A".to_string()],
            ..FilterState::default()
        };
        let outputs = DashboardOutputs::default();
        let html = DashboardPage {
            title: "Accidents",
            mode: PageMode::Report,
            upload_name: None,
            filter: &filter,
            options: &FilterOptions::default(),
            outcome: Ok(&outputs),
        }
        .render()
        .into_string();

        assert!(html.contains("href=\"filtered_data.csv\""));
        assert!(html.contains("href=\"original_data.csv\""));
        assert!(html.contains("disabled"));
        assert!(!html.contains("upload-file"));
        // A selected value missing from the options is still listed.
        assert!(html.contains("Anabu I-A"));
    }

    #[test]
    fn chart_options_cannot_close_the_script() {
        let chart = DashboardChart {
            id: "x",
            heading: "X",
            options: r#"{"name":"</script>"}"#.to_string(),
        };
        let script = charts_script(&[chart]).into_string();
        assert!(!script.contains("</script>\""));
        assert!(script.contains(r"<\/script>"));
    }
}
