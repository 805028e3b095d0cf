//! Output formatting utilities

use crate::accuracy_check::{AccuracyReport, RowStatus};
use crate::count_check::CountCheckResult;
use crate::duplicate_check::DuplicateCheckResult;
use crate::error::Result;
use crate::summary::RunSummary;
use crate::table::CellValue;

/// How many discrepancy rows the pretty printer lists before truncating
const SAMPLE_ROWS: usize = 5;

/// Pretty printer for tabcheck output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print row-count comparison
    pub fn print_count_result(result: &CountCheckResult) {
        println!("📊 Row count check");
        println!("├─ Source rows: {}", result.source_count);
        println!("├─ Target rows: {}", result.target_count);
        match &result.mismatch {
            None => println!("└─ ✅ Row counts match"),
            Some(mismatch) => println!("└─ ❌ Row counts differ by {}", mismatch.difference),
        }
    }

    /// Print duplicate detection results
    pub fn print_duplicate_result(result: &DuplicateCheckResult) {
        println!("🔁 Duplicate check: {}", result.table);
        println!("├─ Grouped by: {}", result.columns.join(", "));

        if !result.has_duplicates {
            println!("└─ ✅ No duplicates found");
            return;
        }

        println!(
            "└─ ❌ {} duplicate group(s), {} redundant row(s)",
            result.groups.len(),
            result.redundant_rows()
        );
        for (i, group) in result.groups.iter().take(SAMPLE_ROWS).enumerate() {
            let is_last = i + 1 == result.groups.len().min(SAMPLE_ROWS);
            let prefix = if is_last { "└─" } else { "├─" };
            println!(
                "   {} [{}] x{} (first at row {})",
                prefix,
                format_values(&group.values),
                group.count,
                group.first_row + 1
            );
        }
        if result.groups.len() > SAMPLE_ROWS {
            println!("      ... and {} more groups", result.groups.len() - SAMPLE_ROWS);
        }
    }

    /// Print accuracy comparison results
    pub fn print_accuracy_result(report: &AccuracyReport) {
        println!("🔍 Accuracy check on '{}'", report.id_column);
        println!("├─ Compared columns: {}", report.compared_columns.join(", "));

        if !report.source_only_columns.is_empty() {
            println!("├─ Source-only columns (ignored): {}", report.source_only_columns.join(", "));
        }
        if !report.target_only_columns.is_empty() {
            println!("├─ Target-only columns (ignored): {}", report.target_only_columns.join(", "));
        }
        if report.skipped_null_ids > 0 {
            println!("├─ Skipped rows with null identifier: {}", report.skipped_null_ids);
        }

        println!("├─ Matched: {}", report.matched);

        if report.all_matched {
            println!("└─ ✅ No mismatches found");
            return;
        }

        println!("├─ ❌ Mismatched: {}", report.mismatched);
        println!("└─ ❌ Missing in target: {}", report.missing);

        for (i, row) in report.discrepancies.iter().take(SAMPLE_ROWS).enumerate() {
            let is_last = i + 1 == report.discrepancies.len().min(SAMPLE_ROWS);
            let prefix = if is_last { "└─" } else { "├─" };
            match row.status {
                RowStatus::Missing => {
                    println!("   {} {}: missing", prefix, format_value(&row.identifier));
                }
                _ => {
                    let changes: Vec<String> = row
                        .fields
                        .iter()
                        .filter(|f| row.differing_columns.contains(&f.column))
                        .map(|f| {
                            format!("{}: '{}' → '{}'", f.column, format_value(&f.source), format_value(&f.target))
                        })
                        .collect();
                    println!("   {} {}: {}", prefix, format_value(&row.identifier), changes.join(", "));
                }
            }
        }
        if report.discrepancies.len() > SAMPLE_ROWS {
            println!("      ... and {} more rows", report.discrepancies.len() - SAMPLE_ROWS);
        }
    }

    /// Print the overall outcome of a multi-check run
    pub fn print_run_summary(summary: &RunSummary) {
        println!();
        println!("📋 Summary");
        for (i, outcome) in summary.checks.iter().enumerate() {
            let prefix = if i + 1 == summary.checks.len() { "└─" } else { "├─" };
            let status = match (&outcome.error, outcome.passed) {
                (Some(error), _) => format!("⚠️  error: {}", error),
                (None, true) => "✅ passed".to_string(),
                (None, false) => "❌ failed".to_string(),
            };
            println!("{} {}: {}", prefix, outcome.check, status);
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

fn format_values(values: &[CellValue]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}
