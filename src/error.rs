use std::path::PathBuf;

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File Excel tidak ditemukan di lokasi: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("Chart '{chart}': {message}")]
    Chart { chart: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl ReportError {
    /// True for failures the dashboard reports verbatim rather than as unexpected
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, ReportError::FileNotFound(_))
    }
}
