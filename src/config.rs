//! Run configuration: what to compare and where reports go

use crate::error::{Result, TabcheckError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for report artifacts
pub const DEFAULT_OUTPUT_DIR: &str = "log_files";

/// The checks a run can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Count,
    Duplicates,
    Accuracy,
}

impl CheckKind {
    pub fn all() -> Vec<CheckKind> {
        vec![CheckKind::Count, CheckKind::Duplicates, CheckKind::Accuracy]
    }

    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "duplicates" | "duplicate" => Ok(Self::Duplicates),
            "accuracy" => Ok(Self::Accuracy),
            _ => Err(format!(
                "Invalid check: {}. Use 'count', 'duplicates', or 'accuracy'",
                s
            )),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Count => f.write_str("count"),
            CheckKind::Duplicates => f.write_str("duplicates"),
            CheckKind::Accuracy => f.write_str("accuracy"),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_true() -> bool {
    true
}

/// Settings for a validation run, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub id_column: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "CheckKind::all")]
    pub checks: Vec<CheckKind>,
    /// Group duplicates on these columns instead of the full row
    #[serde(default)]
    pub duplicate_key: Vec<String>,
    #[serde(default = "default_true")]
    pub write_reports: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            id_column: None,
            output_dir: default_output_dir(),
            checks: CheckKind::all(),
            duplicate_key: Vec::new(),
            write_reports: true,
        }
    }
}

impl CheckConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TabcheckError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TabcheckError::config(format!(
                "Invalid config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn runs(&self, check: CheckKind) -> bool {
        self.checks.contains(&check)
    }

    /// Make sure every enabled check has the inputs it needs
    pub fn validate(&self) -> Result<()> {
        if self.checks.is_empty() {
            return Err(TabcheckError::config("no checks selected"));
        }

        if self.target.is_none() {
            return Err(TabcheckError::config("a target locator is required"));
        }

        if (self.runs(CheckKind::Count) || self.runs(CheckKind::Accuracy)) && self.source.is_none() {
            return Err(TabcheckError::config(
                "a source locator is required for count and accuracy checks",
            ));
        }

        if self.runs(CheckKind::Accuracy) {
            match self.id_column.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => {}
                _ => {
                    return Err(TabcheckError::config(
                        "an identifier column is required for the accuracy check",
                    ))
                }
            }
        }

        Ok(())
    }
}
