//! Report tables and the sinks that persist them

use crate::error::{Result, TabcheckError};
use crate::table::CellValue;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact name for row-count mismatches
pub const COUNT_REPORT: &str = "count_log";
/// Artifact name for duplicate groups
pub const DUPLICATE_REPORT: &str = "duplicate_log";
/// Artifact name for accuracy discrepancies
pub const ACCURACY_REPORT: &str = "accuracy_log";

/// A named result table, independent of how it is stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index by header name
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Destination for report tables produced by the checks
pub trait ReportSink {
    fn write_report(&mut self, report: &ReportTable) -> Result<()>;

    /// Forget any earlier report with this name
    fn discard_report(&mut self, name: &str) -> Result<()>;
}

/// Writes each report as `<output_dir>/<name>.csv`
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    output_dir: PathBuf,
}

impl CsvReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a report with this name is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", name))
    }

    /// Write next to the destination, then rename into place
    fn write_csv(&self, path: &Path, report: &ReportTable) -> std::result::Result<(), csv::Error> {
        let staging = path.with_extension("csv.partial");

        let written = Self::write_rows(&staging, report)
            .and_then(|_| fs::rename(&staging, path).map_err(csv::Error::from));
        if written.is_err() {
            let _ = fs::remove_file(&staging);
        }
        written
    }

    fn write_rows(path: &Path, report: &ReportTable) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&report.headers)?;
        for row in &report.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ReportSink for CsvReportWriter {
    fn write_report(&mut self, report: &ReportTable) -> Result<()> {
        let path = self.path_for(&report.name);

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| TabcheckError::report_write(&path, e.to_string()))?;

        self.write_csv(&path, report)
            .map_err(|e| TabcheckError::report_write(&path, e.to_string()))?;

        log::info!("Details written to {}", path.display());
        Ok(())
    }

    fn discard_report(&mut self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Removed stale report {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TabcheckError::report_write(&path, e.to_string())),
        }
    }
}

/// Keeps reports in memory instead of persisting them
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<ReportTable>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ReportTable> {
        self.reports.iter().find(|r| r.name == name)
    }
}

impl ReportSink for MemorySink {
    fn write_report(&mut self, report: &ReportTable) -> Result<()> {
        self.discard_report(&report.name)?;
        self.reports.push(report.clone());
        Ok(())
    }

    fn discard_report(&mut self, name: &str) -> Result<()> {
        self.reports.retain(|r| r.name != name);
        Ok(())
    }
}
