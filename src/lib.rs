//! Trade Dashboard - export-import analysis from one Excel workbook
//!
//! Loads the configured sheets of a trade workbook, renders each one as an
//! HTML table, and derives Plotly charts from the period and country sheets.
//!
//! # Features
//!
//! - Per-sheet loading with inline markers for missing or broken sheets
//! - Column role detection by name heuristics, with config overrides
//! - Yearly trend and trade balance charts, aggregated from monthly rows
//! - Top destination country chart
//! - Dashboard page rendering, CLI and HTTP server
//!
//! # Example
//!
//! ```no_run
//! use trade_dashboard::config::ReportConfig;
//! use trade_dashboard::report::ReportBuilder;
//!
//! let config = ReportConfig::default().with_workbook("data/neraca.xlsx");
//! let ctx = ReportBuilder::new(&config).build_context()?;
//!
//! println!("Sheets: {}", ctx.sheet_names.len());
//! println!("Charts: {}", ctx.graphs.len());
//! # Ok::<(), trade_dashboard::error::ReportError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod render;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use report::{render_report, ErrorContext, ReportBuilder, ReportContext};
pub use types::{Cell, Column, SheetOutcome, SheetSpec, Table};
