//! Schema discovery for arbitrary tables

use crate::error::{Result, TabcheckError};
use crate::table::Table;
use serde::Serialize;
use std::collections::HashSet;

/// Ordered, distinct column names taken from a table header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnList {
    names: Vec<String>,
}

impl ColumnList {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Names present in both lists, in this list's order
    pub fn shared_with(&self, other: &ColumnList) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| other.contains(n))
            .cloned()
            .collect()
    }

    /// Names present here but absent from `other`
    pub fn missing_from(&self, other: &ColumnList) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| !other.contains(n))
            .cloned()
            .collect()
    }

    /// Position of `name`, or a schema error naming the table and column
    pub fn require(&self, table: &str, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| {
            TabcheckError::schema(
                table,
                format!(
                    "required column '{}' not found (available: {})",
                    name,
                    self.names.join(", ")
                ),
            )
        })
    }
}

/// Extract the ordered column list of a table.
///
/// Any header is accepted as long as it has at least one column and no
/// repeated names.
pub fn discover_columns(table: &Table) -> Result<ColumnList> {
    let header = table.header();

    if header.is_empty() {
        return Err(TabcheckError::schema(
            table.name(),
            "no columns could be discovered (empty input?)",
        ));
    }

    let mut seen = HashSet::new();
    for name in header {
        if !seen.insert(name.as_str()) {
            return Err(TabcheckError::schema(
                table.name(),
                format!("column '{}' appears more than once in the header", name),
            ));
        }
    }

    log::debug!("Discovered {} columns in {}: [{}]", header.len(), table.name(), header.join(", "));

    Ok(ColumnList {
        names: header.to_vec(),
    })
}
