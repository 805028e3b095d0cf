//! Error types for tabcheck operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabcheckError>;

#[derive(Error, Debug)]
pub enum TabcheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// The input table could not be obtained or parsed
    #[error("Failed to load {table}: {message}")]
    Load { table: String, message: String },

    /// A required column is missing, or the table has no usable header
    #[error("Schema error in {table}: {message}")]
    Schema { table: String, message: String },

    /// The report sink could not persist a result table
    #[error("Failed to write report {path}: {message}")]
    ReportWrite { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{failed} check(s) could not be completed")]
    ChecksFailed { failed: usize },
}

impl TabcheckError {
    pub fn load(table: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            table: table.into(),
            message: msg.into(),
        }
    }

    pub fn schema(table: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            message: msg.into(),
        }
    }

    pub fn report_write(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ReportWrite {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Whether this error came from a missing or malformed schema
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}
