//! Report assembly: sheets → tables, tables → charts, charts → render context

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::excel::{LoadedSheet, SheetLoader};
use crate::report::charts::{self, Chart};
use crate::report::roles::{detect_column_roles, RoleAssignment};
use crate::types::Table;

/// Everything the page template needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    /// Sheet name → HTML table or inline error marker
    pub tables: BTreeMap<String, String>,
    /// Chart id → serialized plotly figure
    pub graphs: BTreeMap<String, String>,
    /// Configured sheet names in tab order
    pub sheet_names: Vec<String>,
}

/// Context for the error page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub error_message: String,
}

impl From<&ReportError> for ErrorContext {
    fn from(err: &ReportError) -> Self {
        let error_message = if err.is_file_not_found() {
            err.to_string()
        } else {
            format!("Terjadi kesalahan yang tidak terduga: {}", err)
        };
        Self { error_message }
    }
}

impl ErrorContext {
    pub fn unexpected(message: impl std::fmt::Display) -> Self {
        Self {
            error_message: format!("Terjadi kesalahan yang tidak terduga: {}", message),
        }
    }
}

/// A chart that could not be built, kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFailure {
    pub source: String,
    pub message: String,
}

/// Fully built report before serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sheets: Vec<LoadedSheet>,
    pub trend_roles: RoleAssignment,
    pub country_roles: RoleAssignment,
    pub charts: Vec<Chart>,
    pub failures: Vec<ChartFailure>,
}

impl Report {
    pub fn sheet(&self, name: &str) -> Option<&LoadedSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.id == id)
    }

    /// Serialize into the page context
    pub fn to_context(&self) -> ReportContext {
        let tables = self
            .sheets
            .iter()
            .map(|s| (s.name.clone(), s.html.clone()))
            .collect();

        let graphs = self
            .charts
            .iter()
            .map(|chart| (chart.id.to_string(), chart.to_json().to_string()))
            .collect();

        ReportContext {
            tables,
            graphs,
            sheet_names: self.sheets.iter().map(|s| s.name.clone()).collect(),
        }
    }
}

/// Builds the dashboard report from one workbook
pub struct ReportBuilder<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    pub fn load_sheets(&self) -> ReportResult<Vec<LoadedSheet>> {
        SheetLoader::new(&self.config.workbook_path).load(&self.config.sheets)
    }

    /// Load every sheet and derive the charts.
    ///
    /// Fails only when the workbook itself cannot be read. A chart whose
    /// inputs are broken is recorded in `failures` and skipped.
    pub fn build(&self) -> ReportResult<Report> {
        let sheets = self.load_sheets()?;
        let mut charts = Vec::new();
        let mut failures = Vec::new();

        let trend = &self.config.trend;
        let mut trend_roles = RoleAssignment::default();
        if let Some(table) = find_table(&sheets, &trend.sheet) {
            trend_roles = detect_column_roles(table, &trend.rules(), &trend.columns);
            info!(sheet = %trend.sheet, roles = ?trend_roles, "period columns detected");
            match charts::trend_and_balance_charts(table, &trend_roles, trend) {
                Ok(built) => charts.extend(built),
                Err(e) => {
                    warn!(sheet = %trend.sheet, error = %e, "period charts omitted");
                    failures.push(ChartFailure {
                        source: trend.sheet.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let country = &self.config.country;
        let mut country_roles = RoleAssignment::default();
        if let Some(table) = find_table(&sheets, &country.sheet) {
            country_roles = detect_column_roles(table, &country.rules(), &country.columns);
            info!(sheet = %country.sheet, roles = ?country_roles, "country columns detected");
            match charts::country_chart(table, &country_roles, country) {
                Ok(Some(chart)) => charts.push(chart),
                Ok(None) => {}
                Err(e) => {
                    warn!(sheet = %country.sheet, error = %e, "country chart omitted");
                    failures.push(ChartFailure {
                        source: country.sheet.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            charts = ?charts.iter().map(|c| c.id).collect::<Vec<_>>(),
            "charts generated"
        );

        Ok(Report {
            sheets,
            trend_roles,
            country_roles,
            charts,
            failures,
        })
    }

    pub fn build_context(&self) -> ReportResult<ReportContext> {
        Ok(self.build()?.to_context())
    }
}

fn find_table<'s>(sheets: &'s [LoadedSheet], name: &str) -> Option<&'s Table> {
    sheets
        .iter()
        .find(|s| s.name == name)
        .and_then(LoadedSheet::table)
        .filter(|t| !t.is_empty())
}

/// Build the page context, or the error page context on fatal failure
pub fn render_report(config: &ReportConfig) -> Result<ReportContext, ErrorContext> {
    ReportBuilder::new(config).build_context().map_err(|e| {
        error!(error = %e, "report failed");
        ErrorContext::from(&e)
    })
}
