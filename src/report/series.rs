//! Numeric coercion, period → year resolution and yearly aggregation

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::report::roles::{ColumnRole, RoleAssignment};
use crate::types::{Cell, Column, Table};

/// How the years of a period column were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSource {
    /// At least one period parsed as a date
    Date,
    /// Periods were plain year numbers
    Numeric,
    /// No period resolved; sequential years assigned in row order
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRow {
    pub year: i32,
    pub export: Option<f64>,
    pub import: Option<f64>,
    pub balance: Option<f64>,
}

impl YearlyRow {
    /// Balance column if present, else export minus import
    pub fn balance_or_computed(&self) -> Option<f64> {
        self.balance.or(match (self.export, self.import) {
            (Some(export), Some(import)) => Some(export - import),
            _ => None,
        })
    }
}

/// Per-year export/import/balance series ready for charting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub rows: Vec<YearlyRow>,
    pub source: YearSource,
    /// Whether rows were summed per year (monthly input)
    pub aggregated: bool,
}

impl YearlyAggregate {
    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d %B %Y", "%d %b %Y",
];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
/// Month-precision formats, parsed with a first-of-month day prepended
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%m/%Y", "%m-%Y", "%B %Y", "%b %Y"];

/// Year of a period cell read as a date
pub fn year_from_date(cell: &Cell) -> Option<i32> {
    match cell {
        Cell::DateTime(dt) => Some(dt.year()),
        Cell::Text(s) => parse_date_text(s.trim()).map(|d| d.year()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            let with_day = format!("01 {}", s);
            MONTH_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(&with_day, &format!("%d {}", fmt)).ok()
            })
        })
}

/// Year of a period cell read as a plain number, e.g. `2021` or `"2021"`
pub fn year_from_number(cell: &Cell) -> Option<i32> {
    if matches!(cell, Cell::Bool(_)) {
        return None;
    }
    let value = cell.as_number()?;
    if value.fract() != 0.0 || !(1.0..=9999.0).contains(&value) {
        return None;
    }
    Some(value as i32)
}

/// Year of one period cell: a date first, then a plain year number
pub fn year_of(cell: &Cell) -> Option<(i32, YearSource)> {
    year_from_date(cell)
        .map(|year| (year, YearSource::Date))
        .or_else(|| year_from_number(cell).map(|year| (year, YearSource::Numeric)))
}

/// Resolve each period to a year on its own. Cells that resolve to nothing
/// get `None` and drop out of the yearly series. Only when no cell resolves
/// are sequential years from `synthetic_start` assigned.
pub fn resolve_years(periods: &[&Cell], synthetic_start: i32) -> (Vec<Option<i32>>, YearSource) {
    let resolved: Vec<Option<(i32, YearSource)>> = periods.iter().map(|c| year_of(c)).collect();

    if !periods.is_empty() && resolved.iter().all(Option::is_none) {
        let years = (0..periods.len())
            .map(|i| Some(synthetic_start + i as i32))
            .collect();
        return (years, YearSource::Synthetic);
    }

    let source = if resolved
        .iter()
        .flatten()
        .any(|(_, source)| *source == YearSource::Date)
    {
        YearSource::Date
    } else {
        YearSource::Numeric
    };
    let years = resolved.into_iter().map(|r| r.map(|(year, _)| year)).collect();
    (years, source)
}

fn role_column<'a>(
    table: &'a Table,
    roles: &RoleAssignment,
    role: ColumnRole,
) -> ReportResult<Option<&'a Column>> {
    match roles.get(role) {
        None => Ok(None),
        Some(name) => table.column(name).map(Some).ok_or_else(|| ReportError::Sheet {
            sheet: table.name.clone(),
            message: format!("{} column '{}' not in table", role, name),
        }),
    }
}

/// Build the yearly series from a period table.
///
/// Rows missing any resolved numeric value are dropped before years are
/// resolved, and rows whose period yields no year are dropped after. With
/// more than `monthly_threshold` rows the values are summed per year
/// (ascending); otherwise each row is kept as-is.
pub fn yearly_aggregate(
    table: &Table,
    roles: &RoleAssignment,
    monthly_threshold: usize,
    synthetic_start: i32,
) -> ReportResult<YearlyAggregate> {
    let period = role_column(table, roles, ColumnRole::Period)?.ok_or_else(|| {
        ReportError::Sheet {
            sheet: table.name.clone(),
            message: "no period column".to_string(),
        }
    })?;
    let export = role_column(table, roles, ColumnRole::Export)?;
    let import = role_column(table, roles, ColumnRole::Import)?;
    let balance = role_column(table, roles, ColumnRole::Balance)?;

    let numeric = |column: Option<&Column>, row: usize| -> Option<Option<f64>> {
        match column {
            None => Some(None),
            Some(col) => col.values[row].as_number().map(Some),
        }
    };

    let mut periods: Vec<&Cell> = Vec::new();
    let mut values: Vec<(Option<f64>, Option<f64>, Option<f64>)> = Vec::new();
    for row in 0..table.row_count() {
        let (Some(e), Some(i), Some(b)) = (
            numeric(export, row),
            numeric(import, row),
            numeric(balance, row),
        ) else {
            continue;
        };
        periods.push(&period.values[row]);
        values.push((e, i, b));
    }

    let monthly = periods.len() > monthly_threshold;
    let (years, source) = resolve_years(&periods, synthetic_start);

    let rows: Vec<YearlyRow> = years
        .into_iter()
        .zip(values)
        .filter_map(|(year, (export, import, balance))| {
            year.map(|year| YearlyRow {
                year,
                export,
                import,
                balance,
            })
        })
        .collect();

    if !monthly {
        return Ok(YearlyAggregate {
            rows,
            source,
            aggregated: false,
        });
    }

    let mut by_year: BTreeMap<i32, YearlyRow> = BTreeMap::new();
    for row in rows {
        let entry = by_year.entry(row.year).or_insert(YearlyRow {
            year: row.year,
            export: row.export.map(|_| 0.0),
            import: row.import.map(|_| 0.0),
            balance: row.balance.map(|_| 0.0),
        });
        add_into(&mut entry.export, row.export);
        add_into(&mut entry.import, row.import);
        add_into(&mut entry.balance, row.balance);
    }

    Ok(YearlyAggregate {
        rows: by_year.into_values().collect(),
        source,
        aggregated: true,
    })
}

fn add_into(total: &mut Option<f64>, value: Option<f64>) {
    if let (Some(sum), Some(v)) = (total.as_mut(), value) {
        *sum += v;
    }
}
