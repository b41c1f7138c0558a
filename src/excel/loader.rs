//! Workbook loading: configured sheets → tables and HTML fragments

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};
use crate::excel::html;
use crate::types::{Cell, Column, SheetOutcome, SheetSpec, Table};

/// One configured sheet after loading
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    pub name: String,
    pub outcome: SheetOutcome,
    /// Rendered table, or an inline error marker
    pub html: String,
}

impl LoadedSheet {
    pub fn table(&self) -> Option<&Table> {
        self.outcome.table()
    }
}

/// Reads the configured sheets out of one workbook file
pub struct SheetLoader {
    path: PathBuf,
}

impl SheetLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of every sheet in the workbook
    pub fn sheet_names(&self) -> ReportResult<Vec<String>> {
        self.ensure_exists()?;
        let workbook = open_workbook_auto(&self.path)
            .map_err(|e| ReportError::Workbook(format!("Failed to open workbook: {}", e)))?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// Load every configured sheet in order.
    ///
    /// Only a missing or unreadable workbook is an error; a missing or
    /// broken sheet becomes an inline marker for that sheet alone.
    pub fn load(&self, specs: &[SheetSpec]) -> ReportResult<Vec<LoadedSheet>> {
        self.ensure_exists()?;

        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| ReportError::Workbook(format!("Failed to open workbook: {}", e)))?;
        let available = workbook.sheet_names().to_vec();

        let mut loaded = Vec::with_capacity(specs.len());
        for spec in specs {
            if !available.iter().any(|name| name == &spec.name) {
                warn!(sheet = %spec.name, "sheet not found in workbook");
                loaded.push(LoadedSheet {
                    name: spec.name.clone(),
                    outcome: SheetOutcome::Missing,
                    html: html::missing_marker(&spec.name),
                });
                continue;
            }

            let parsed = workbook
                .worksheet_range(&spec.name)
                .map_err(|e| e.to_string())
                .map(|range| table_from_range(&spec.name, &range, spec.header_skip_rows));

            let sheet = match parsed {
                Ok(table) => {
                    info!(sheet = %spec.name, rows = table.row_count(), "sheet loaded");
                    debug!(sheet = %spec.name, columns = ?table.column_names(), "sheet columns");
                    let html = html::table_to_html(&table, &html::table_id(&spec.name));
                    LoadedSheet {
                        name: spec.name.clone(),
                        outcome: SheetOutcome::Loaded(table),
                        html,
                    }
                }
                Err(message) => {
                    warn!(sheet = %spec.name, error = %message, "failed to load sheet");
                    LoadedSheet {
                        name: spec.name.clone(),
                        html: html::failed_marker(&spec.name, &message),
                        outcome: SheetOutcome::Failed(message),
                    }
                }
            };
            loaded.push(sheet);
        }

        Ok(loaded)
    }

    fn ensure_exists(&self) -> ReportResult<()> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(ReportError::FileNotFound(self.path.clone()))
        }
    }
}

/// Build a table from a worksheet range.
///
/// `skip_rows` counts absolute sheet rows from the top, regardless of where
/// the used range starts. The first non-blank row after them is the header.
/// Fully-empty rows and columns are dropped.
pub fn table_from_range(name: &str, range: &Range<Data>, skip_rows: usize) -> Table {
    let mut table = Table::new(name);

    let (Some(_), Some((end_row, end_col))) = (range.start(), range.end()) else {
        return table;
    };

    let cell_at = |row: u32, col: u32| -> Cell {
        range
            .get_value((row, col))
            .map(cell_from_data)
            .unwrap_or(Cell::Empty)
    };
    let width = end_col as usize + 1;
    let read_row =
        |row: u32| -> Vec<Cell> { (0..=end_col).map(|col| cell_at(row, col)).collect() };
    let is_blank = |cells: &[Cell]| cells.iter().all(Cell::is_empty);

    let first_row = match u32::try_from(skip_rows) {
        Ok(row) if row <= end_row => row,
        _ => return table,
    };

    let mut rows = (first_row..=end_row)
        .map(read_row)
        .filter(|cells| !is_blank(cells.as_slice()));

    let Some(header) = rows.next() else {
        return table;
    };
    let names = header_names(&header);
    let data: Vec<Vec<Cell>> = rows.collect();

    for col in 0..width {
        let values: Vec<Cell> = data.iter().map(|row| row[col].clone()).collect();
        if values.iter().all(Cell::is_empty) {
            continue;
        }
        table.add_column(Column::new(names[col].clone(), values));
    }

    table
}

/// Header cells to unique column names: blanks become `Unnamed: i`,
/// repeats get `.1`, `.2`, ... suffixes.
fn header_names(header: &[Cell]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = if cell.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            cell.display().trim().to_string()
        };

        let mut name = base.clone();
        if let Some(&count) = seen.get(&base) {
            let mut n = count;
            loop {
                n += 1;
                name = format!("{}.{}", base, n);
                if !seen.contains_key(&name) {
                    break;
                }
            }
            seen.insert(base, n);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }

    names
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
