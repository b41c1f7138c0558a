//! Plotly figures for the dashboard charts

use plotly::common::{Line, Marker, Mode};
use plotly::layout::themes::PLOTLY_WHITE;
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot, Scatter};
use serde_json::Value;
use tracing::debug;

use crate::config::{CountryChartConfig, TrendChartConfig};
use crate::error::{ReportError, ReportResult};
use crate::report::roles::{ColumnRole, RoleAssignment};
use crate::report::series::{yearly_aggregate, YearlyAggregate};
use crate::types::{format_number, Table};

pub const TREND_CHART: &str = "tren_tahunan";
pub const BALANCE_CHART: &str = "neraca_tahunan";
pub const COUNTRY_CHART: &str = "ekspor_impor_negara";

/// Display order of chart ids on the page
pub const CHART_ORDER: [&str; 3] = [TREND_CHART, BALANCE_CHART, COUNTRY_CHART];

pub const EXPORT_COLOR: &str = "#2E8B57";
pub const IMPORT_COLOR: &str = "#DC143C";
pub const SURPLUS_COLOR: &str = "#28a745";
pub const DEFICIT_COLOR: &str = "#dc3545";
pub const COUNTRY_COLOR: &str = "#1f77b4";

const VALUE_AXIS: &str = "Total Nilai (Juta US$)";

/// A finished chart: its page id and the serialized plotly figure
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub id: &'static str,
    json: String,
}

impl Chart {
    fn from_plot(id: &'static str, plot: &Plot) -> Self {
        Self {
            id,
            json: plot.to_json(),
        }
    }

    /// Figure JSON as handed to `Plotly.newPlot`
    pub fn to_json(&self) -> &str {
        &self.json
    }

    /// Parsed figure, for inspection
    pub fn figure(&self) -> ReportResult<Value> {
        serde_json::from_str(&self.json).map_err(|e| ReportError::Chart {
            chart: self.id.to_string(),
            message: e.to_string(),
        })
    }

    /// Label and summed `y` of every trace. Unnamed traces take the chart label.
    pub fn trace_totals(&self) -> ReportResult<Vec<(String, String)>> {
        let figure = self.figure()?;
        let traces = figure["data"].as_array().cloned().unwrap_or_default();
        Ok(traces
            .iter()
            .map(|trace| {
                let label = trace["name"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| chart_label(self.id));
                let total: f64 = trace["y"]
                    .as_array()
                    .map(|ys| ys.iter().filter_map(Value::as_f64).sum())
                    .unwrap_or(0.0);
                (label, format_number(total))
            })
            .collect())
    }
}

fn layout(title: &str, x_title: &str, y_title: &str, height: usize) -> Layout {
    Layout::new()
        .title(title)
        .x_axis(Axis::new().title(x_title))
        .y_axis(Axis::new().title(y_title))
        .height(height)
        .template(&*PLOTLY_WHITE)
}

//==============================================================================
// Chart construction
//==============================================================================

/// Trend and balance charts from the period sheet.
///
/// Needs a period column plus export or import; otherwise no charts. The
/// trend line needs both export and import. The balance bars use the
/// balance column, or export minus import when there is none.
pub fn trend_and_balance_charts(
    table: &Table,
    roles: &RoleAssignment,
    config: &TrendChartConfig,
) -> ReportResult<Vec<Chart>> {
    let has_export = roles.has(ColumnRole::Export);
    let has_import = roles.has(ColumnRole::Import);
    if !roles.has(ColumnRole::Period) || !(has_export || has_import) {
        debug!(table = %table.name, "period charts skipped: required columns not found");
        return Ok(Vec::new());
    }

    let yearly = yearly_aggregate(
        table,
        roles,
        config.monthly_threshold,
        config.synthetic_start_year,
    )?;
    debug!(
        rows = yearly.rows.len(),
        source = ?yearly.source,
        aggregated = yearly.aggregated,
        "yearly series ready"
    );

    let mut charts = Vec::new();
    if has_export && has_import {
        charts.push(trend_chart(&yearly));
    }
    if roles.has(ColumnRole::Balance) || (has_export && has_import) {
        charts.push(balance_chart(&yearly));
    }
    Ok(charts)
}

fn line_trace(
    years: Vec<i32>,
    values: Vec<Option<f64>>,
    name: &str,
    color: &'static str,
) -> Box<Scatter<i32, Option<f64>>> {
    Scatter::new(years, values)
        .mode(Mode::LinesMarkers)
        .name(name)
        .line(Line::new().color(color).width(3.0))
        .marker(Marker::new().size(8))
}

pub fn trend_chart(yearly: &YearlyAggregate) -> Chart {
    let export = yearly.rows.iter().map(|r| r.export).collect();
    let import = yearly.rows.iter().map(|r| r.import).collect();

    let mut plot = Plot::new();
    plot.add_trace(line_trace(yearly.years(), export, "Ekspor", EXPORT_COLOR));
    plot.add_trace(line_trace(yearly.years(), import, "Impor", IMPORT_COLOR));
    plot.set_layout(layout(
        "Tren Tahunan Ekspor dan Impor (2020-2025)",
        "Tahun",
        VALUE_AXIS,
        400,
    ));

    Chart::from_plot(TREND_CHART, &plot)
}

pub fn balance_color(value: f64) -> &'static str {
    if value >= 0.0 {
        SURPLUS_COLOR
    } else {
        DEFICIT_COLOR
    }
}

pub fn balance_chart(yearly: &YearlyAggregate) -> Chart {
    let (years, values): (Vec<i32>, Vec<f64>) = yearly
        .rows
        .iter()
        .filter_map(|r| r.balance_or_computed().map(|b| (r.year, b)))
        .unzip();
    let colors: Vec<&'static str> = values.iter().map(|v| balance_color(*v)).collect();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(years, values).marker(Marker::new().color_array(colors)));
    plot.set_layout(layout(
        "Neraca Perdagangan Tahunan (2020-2025)",
        "Tahun",
        VALUE_AXIS,
        400,
    ));

    Chart::from_plot(BALANCE_CHART, &plot)
}

/// Top-N countries by the value column, descending
pub fn country_chart(
    table: &Table,
    roles: &RoleAssignment,
    config: &CountryChartConfig,
) -> ReportResult<Option<Chart>> {
    let (Some(country_name), Some(value_name)) =
        (roles.get(ColumnRole::Country), roles.get(ColumnRole::Value))
    else {
        debug!(table = %table.name, "country chart skipped: required columns not found");
        return Ok(None);
    };

    let missing = |name: &str| ReportError::Sheet {
        sheet: table.name.clone(),
        message: format!("column '{}' not in table", name),
    };
    let countries = table.column(country_name).ok_or_else(|| missing(country_name))?;
    let values = table.column(value_name).ok_or_else(|| missing(value_name))?;

    let mut ranked: Vec<(String, f64)> = countries
        .values
        .iter()
        .zip(&values.values)
        .filter(|(country, _)| !country.is_empty())
        .filter_map(|(country, value)| value.as_number().map(|v| (country.display(), v)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(config.top_n);

    debug!(countries = ranked.len(), "country ranking ready");

    let (names, totals): (Vec<String>, Vec<f64>) = ranked.into_iter().unzip();

    let title = format!(
        "Top {} Negara Tujuan Ekspor (FOB) Tahun {}",
        config.top_n, config.value_marker
    );

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(names, totals).marker(Marker::new().color(COUNTRY_COLOR)));
    plot.set_layout(
        Layout::new()
            .title(title.as_str())
            .x_axis(Axis::new().title("Negara").tick_angle(45.0))
            .y_axis(Axis::new().title("Nilai FOB (Juta US$)"))
            .height(500)
            .template(&*PLOTLY_WHITE),
    );

    Ok(Some(Chart::from_plot(COUNTRY_CHART, &plot)))
}

/// Short label for a chart id, used in headings and CLI output
pub fn chart_label(id: &str) -> String {
    match id {
        TREND_CHART => "Tren Tahunan Ekspor dan Impor".to_string(),
        BALANCE_CHART => "Neraca Perdagangan Tahunan".to_string(),
        COUNTRY_CHART => "Negara Tujuan Ekspor".to_string(),
        other => other.to_string(),
    }
}
