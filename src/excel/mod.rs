//! Workbook reading
//!
//! - Load: configured sheets → cleaned tables
//! - HTML: tables and error markers → HTML fragments

pub mod html;
mod loader;

pub use loader::{table_from_range, LoadedSheet, SheetLoader};
