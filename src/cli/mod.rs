//! CLI command handlers

pub mod commands;

pub use commands::{output_path, render, report, serve, sheets};
