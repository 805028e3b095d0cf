//! Row-count parity between source and target

use crate::report::{ReportTable, COUNT_REPORT};
use crate::table::{CellValue, Table};
use serde::Serialize;

/// Row counts that did not line up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountMismatch {
    pub source_count: usize,
    pub target_count: usize,
    pub difference: usize,
}

impl CountMismatch {
    /// Report layout: `Source Count, Target Count, Difference`
    pub fn to_report_table(&self) -> ReportTable {
        let mut report = ReportTable::new(
            COUNT_REPORT,
            vec![
                "Source Count".to_string(),
                "Target Count".to_string(),
                "Difference".to_string(),
            ],
        );
        report.push_row(vec![
            CellValue::from(self.source_count as i64),
            CellValue::from(self.target_count as i64),
            CellValue::from(self.difference as i64),
        ]);
        report
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountCheckResult {
    pub source_count: usize,
    pub target_count: usize,
    pub matches: bool,
    pub mismatch: Option<CountMismatch>,
}

pub struct CountChecker;

impl CountChecker {
    /// Compare the cardinalities of two tables
    pub fn check(source: &Table, target: &Table) -> CountCheckResult {
        let source_count = source.len();
        let target_count = target.len();
        let matches = source_count == target_count;

        let mismatch = if matches {
            log::info!("Row counts match ({} rows)", source_count);
            None
        } else {
            log::warn!(
                "Row count mismatch: {} has {} rows, {} has {} rows",
                source.name(),
                source_count,
                target.name(),
                target_count
            );
            Some(CountMismatch {
                source_count,
                target_count,
                difference: source_count.abs_diff(target_count),
            })
        };

        CountCheckResult {
            source_count,
            target_count,
            matches,
            mismatch,
        }
    }
}
