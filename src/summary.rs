//! Summary of a multi-check run

use crate::config::CheckKind;
use crate::error::{Result, TabcheckError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the run summary inside the output directory
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub check: CheckKind,
    /// True when the check completed and found nothing wrong
    pub passed: bool,
    /// Set when the check could not be completed
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub created: DateTime<Utc>,
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub id_column: Option<String>,
    pub checks: Vec<CheckOutcome>,
}

impl RunSummary {
    pub fn new(source: Option<PathBuf>, target: Option<PathBuf>, id_column: Option<String>) -> Self {
        Self {
            created: Utc::now(),
            source,
            target,
            id_column,
            checks: Vec::new(),
        }
    }

    pub fn record(&mut self, check: CheckKind, outcome: Result<bool>) {
        let (passed, error) = match outcome {
            Ok(passed) => (passed, None),
            Err(e) => {
                log::error!("{} check failed: {}", check, e);
                (false, Some(e.to_string()))
            }
        };
        self.checks.push(CheckOutcome { check, passed, error });
    }

    /// Checks that could not be completed
    pub fn errored(&self) -> usize {
        self.checks.iter().filter(|c| c.error.is_some()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Write `summary.json` into `output_dir`
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(SUMMARY_FILE);
        let content = serde_json::to_string_pretty(self)?;

        fs::create_dir_all(output_dir)
            .and_then(|_| fs::write(&path, content))
            .map_err(|e| TabcheckError::report_write(&path, e.to_string()))?;

        Ok(path)
    }
}
