//! Duplicate-row detection by full-row (or key-subset) equality

use crate::error::Result;
use crate::report::{ReportTable, DUPLICATE_REPORT};
use crate::schema::discover_columns;
use crate::table::{CellValue, Table};
use indexmap::IndexMap;
use serde::Serialize;

/// One distinct combination of grouped values seen more than once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub values: Vec<CellValue>,
    pub count: usize,
    /// 0-based index of the first row in the group
    pub first_row: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateCheckResult {
    pub table: String,
    /// Columns the rows were grouped by
    pub columns: Vec<String>,
    pub has_duplicates: bool,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateCheckResult {
    /// Number of rows beyond the first in every group
    pub fn redundant_rows(&self) -> usize {
        self.groups.iter().map(|g| g.count - 1).sum()
    }

    /// Report layout: grouped columns followed by `count`
    pub fn to_report_table(&self) -> ReportTable {
        let mut headers = self.columns.clone();
        headers.push("count".to_string());

        let mut report = ReportTable::new(DUPLICATE_REPORT, headers);
        for group in &self.groups {
            let mut row = group.values.clone();
            row.push(CellValue::from(group.count as i64));
            report.push_row(row);
        }
        report
    }
}

pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Group rows by every discovered column
    pub fn check(table: &Table) -> Result<DuplicateCheckResult> {
        let columns = discover_columns(table)?;
        Ok(Self::group(table, columns.names().to_vec(), (0..columns.len()).collect()))
    }

    /// Group rows by an explicit subset of columns (e.g. the identifier only)
    pub fn by_columns(table: &Table, key: &[String]) -> Result<DuplicateCheckResult> {
        if key.is_empty() {
            return Self::check(table);
        }

        let columns = discover_columns(table)?;
        let indices = key
            .iter()
            .map(|name| columns.require(table.name(), name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::group(table, key.to_vec(), indices))
    }

    fn group(table: &Table, columns: Vec<String>, indices: Vec<usize>) -> DuplicateCheckResult {
        // Insertion order gives first-occurrence ordering of groups
        let mut groups: IndexMap<Vec<&CellValue>, (usize, usize)> = IndexMap::new();

        for (row_index, row) in table.rows().iter().enumerate() {
            let key: Vec<&CellValue> = indices.iter().map(|&i| &row[i]).collect();
            groups
                .entry(key)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, row_index));
        }

        let duplicates: Vec<DuplicateGroup> = groups
            .into_iter()
            .filter(|(_, (count, _))| *count > 1)
            .map(|(values, (count, first_row))| DuplicateGroup {
                values: values.into_iter().cloned().collect(),
                count,
                first_row,
            })
            .collect();

        let has_duplicates = !duplicates.is_empty();
        if has_duplicates {
            log::warn!(
                "Duplicates found in {}: {} group(s)",
                table.name(),
                duplicates.len()
            );
        } else {
            log::info!("No duplicates found in {}", table.name());
        }

        DuplicateCheckResult {
            table: table.name().to_string(),
            columns,
            has_duplicates,
            groups: duplicates,
        }
    }
}
