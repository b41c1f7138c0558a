use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

//==============================================================================
// Cells
//==============================================================================

/// A single worksheet value after reading
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl Cell {
    /// Empty cells and zero-length text count as missing
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion: numbers pass through, numeric text is parsed,
    /// booleans count as 1 and 0, anything else is missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text used for table cells and chart category labels
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => "NaN".to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) if s.is_empty() => "NaN".to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            Cell::Error(e) => e.clone(),
        }
    }
}

/// Format a number for display, dropping a trailing `.0` on whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Tables
//==============================================================================

/// A named column with one cell per table row
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parsed sheet: ordered columns of equal length
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows (all columns share the same length)
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }
}

//==============================================================================
// Sheet configuration and outcomes
//==============================================================================

/// A sheet to load and how many leading rows sit above its header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    #[serde(default)]
    pub header_skip_rows: usize,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>, header_skip_rows: usize) -> Self {
        Self {
            name: name.into(),
            header_skip_rows,
        }
    }
}

/// Result of loading one configured sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Loaded(Table),
    /// The workbook has no sheet with this name
    Missing,
    /// Reading the sheet failed; the message is shown inline
    Failed(String),
}

impl SheetOutcome {
    /// The parsed table, or `None` for missing and failed sheets
    pub fn table(&self) -> Option<&Table> {
        match self {
            SheetOutcome::Loaded(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SheetOutcome::Loaded(_))
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            SheetOutcome::Loaded(_) => "loaded",
            SheetOutcome::Missing => "missing",
            SheetOutcome::Failed(_) => "failed",
        }
    }
}
