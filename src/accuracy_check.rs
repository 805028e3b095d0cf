//! Field-by-field accuracy comparison of target against source
//!
//! Source rows are left-joined onto target rows by a single identifier
//! column. Every joined pair is compared on the columns both schemas
//! declare, and each source row ends up matched, mismatched, or missing
//! from the target. Only mismatched and missing rows are reported.

use crate::error::Result;
use crate::report::{ReportTable, ACCURACY_REPORT};
use crate::schema::discover_columns;
use crate::table::{CellValue, Table};
use serde::Serialize;
use std::collections::HashMap;

/// Outcome for one joined source row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Matched,
    Mismatched,
    /// No target row shares the identifier
    Missing,
}

/// Source and target values of one compared column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPair {
    pub column: String,
    pub source: CellValue,
    pub target: CellValue,
}

/// A discrepancy row for the accuracy report
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub identifier: CellValue,
    pub status: RowStatus,
    /// 0-based source row index
    pub source_row: usize,
    /// 0-based target row index, absent for missing rows
    pub target_row: Option<usize>,
    pub fields: Vec<FieldPair>,
    /// Compared columns whose values disagree
    pub differing_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    pub id_column: String,
    pub all_matched: bool,
    /// Columns present in both schemas, in source order
    pub compared_columns: Vec<String>,
    pub source_only_columns: Vec<String>,
    pub target_only_columns: Vec<String>,
    /// Joined pairs that were classified
    pub compared_rows: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub missing: usize,
    /// Source rows excluded because their identifier is null
    pub skipped_null_ids: usize,
    pub discrepancies: Vec<ComparisonRow>,
}

impl AccuracyReport {
    /// Report layout: `<id>, Source_<col>, Target_<col>, ...`
    pub fn to_report_table(&self) -> ReportTable {
        let mut headers = vec![self.id_column.clone()];
        for column in &self.compared_columns {
            headers.push(format!("Source_{}", column));
            headers.push(format!("Target_{}", column));
        }

        let mut report = ReportTable::new(ACCURACY_REPORT, headers);
        for row in &self.discrepancies {
            let mut values = Vec::with_capacity(1 + row.fields.len() * 2);
            values.push(row.identifier.clone());
            for field in &row.fields {
                values.push(field.source.clone());
                values.push(field.target.clone());
            }
            report.push_row(values);
        }
        report
    }
}

/// A column compared on both sides, with its position in each table
struct ComparedColumn {
    name: String,
    source_index: usize,
    target_index: usize,
}

/// Whether a source/target value pair counts as a discrepancy.
///
/// Two nulls agree. A null target against a non-null source is checked
/// on its own so it is flagged regardless of how inequality treats nulls.
pub fn values_differ(source: &CellValue, target: &CellValue) -> bool {
    (target.is_null() && !source.is_null()) || source != target
}

#[derive(Default)]
struct SourceRowOutcome {
    skipped: bool,
    matched: usize,
    discrepancies: Vec<ComparisonRow>,
}

/// Compares a source and target table keyed on one identifier column
#[derive(Debug, Clone)]
pub struct AccuracyComparator {
    id_column: String,
}

impl AccuracyComparator {
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
        }
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Left-join source onto target and classify every source row
    pub fn check(&self, source: &Table, target: &Table) -> Result<AccuracyReport> {
        use rayon::prelude::*;

        let source_columns = discover_columns(source)?;
        let target_columns = discover_columns(target)?;

        let source_id = source_columns.require(source.name(), &self.id_column)?;
        let target_id = target_columns.require(target.name(), &self.id_column)?;

        let compared: Vec<ComparedColumn> = source_columns
            .shared_with(&target_columns)
            .into_iter()
            .filter_map(|name| {
                Some(ComparedColumn {
                    source_index: source_columns.index_of(&name)?,
                    target_index: target_columns.index_of(&name)?,
                    name,
                })
            })
            .collect();

        let source_only_columns = source_columns.missing_from(&target_columns);
        let target_only_columns = target_columns.missing_from(&source_columns);
        if !source_only_columns.is_empty() || !target_only_columns.is_empty() {
            log::debug!(
                "Ignoring columns not present on both sides: source-only [{}], target-only [{}]",
                source_only_columns.join(", "),
                target_only_columns.join(", ")
            );
        }

        // Join index; null identifiers never match anything
        let mut target_index: HashMap<&CellValue, Vec<usize>> = HashMap::new();
        for (row_index, row) in target.rows().iter().enumerate() {
            let id = &row[target_id];
            if !id.is_null() {
                target_index.entry(id).or_default().push(row_index);
            }
        }

        let outcomes: Vec<SourceRowOutcome> = source
            .rows()
            .par_iter()
            .enumerate()
            .map(|(source_row, row)| {
                let id = &row[source_id];
                if id.is_null() {
                    return SourceRowOutcome {
                        skipped: true,
                        ..Default::default()
                    };
                }

                let mut outcome = SourceRowOutcome::default();
                match target_index.get(id) {
                    None => outcome.discrepancies.push(ComparisonRow {
                        identifier: id.clone(),
                        status: RowStatus::Missing,
                        source_row,
                        target_row: None,
                        fields: compared
                            .iter()
                            .map(|c| FieldPair {
                                column: c.name.clone(),
                                source: row[c.source_index].clone(),
                                target: CellValue::Null,
                            })
                            .collect(),
                        differing_columns: Vec::new(),
                    }),
                    Some(matches) => {
                        // One classification per joined pair, as a SQL left join would produce
                        for &target_row in matches {
                            let joined = &target.rows()[target_row];
                            match Self::compare_pair(&compared, id, source_row, row, target_row, joined) {
                                Some(discrepancy) => outcome.discrepancies.push(discrepancy),
                                None => outcome.matched += 1,
                            }
                        }
                    }
                }
                outcome
            })
            .collect();

        let mut report = AccuracyReport {
            id_column: self.id_column.clone(),
            all_matched: true,
            compared_columns: compared.iter().map(|c| c.name.clone()).collect(),
            source_only_columns,
            target_only_columns,
            compared_rows: 0,
            matched: 0,
            mismatched: 0,
            missing: 0,
            skipped_null_ids: 0,
            discrepancies: Vec::new(),
        };

        for outcome in outcomes {
            if outcome.skipped {
                report.skipped_null_ids += 1;
                continue;
            }
            report.matched += outcome.matched;
            for discrepancy in outcome.discrepancies {
                match discrepancy.status {
                    RowStatus::Missing => report.missing += 1,
                    RowStatus::Mismatched => report.mismatched += 1,
                    RowStatus::Matched => report.matched += 1,
                }
                report.discrepancies.push(discrepancy);
            }
        }

        report.compared_rows = report.matched + report.mismatched + report.missing;
        report.all_matched = report.discrepancies.is_empty();

        if report.skipped_null_ids > 0 {
            log::warn!(
                "Skipped {} source row(s) with a null '{}'",
                report.skipped_null_ids,
                self.id_column
            );
        }
        if report.all_matched {
            log::info!("Data accuracy check passed: {} row(s) matched", report.matched);
        } else {
            log::warn!(
                "Data accuracy issues found: {} mismatched, {} missing from {}",
                report.mismatched,
                report.missing,
                target.name()
            );
        }

        Ok(report)
    }

    /// Compare one joined pair; `None` when every compared column agrees
    fn compare_pair(
        compared: &[ComparedColumn],
        id: &CellValue,
        source_row: usize,
        source: &[CellValue],
        target_row: usize,
        target: &[CellValue],
    ) -> Option<ComparisonRow> {
        let differing_columns: Vec<String> = compared
            .iter()
            .filter(|c| values_differ(&source[c.source_index], &target[c.target_index]))
            .map(|c| c.name.clone())
            .collect();

        if differing_columns.is_empty() {
            return None;
        }

        Some(ComparisonRow {
            identifier: id.clone(),
            status: RowStatus::Mismatched,
            source_row,
            target_row: Some(target_row),
            fields: compared
                .iter()
                .map(|c| FieldPair {
                    column: c.name.clone(),
                    source: source[c.source_index].clone(),
                    target: target[c.target_index].clone(),
                })
                .collect(),
            differing_columns,
        })
    }
}
