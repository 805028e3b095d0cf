//! # tabcheck
//!
//! Validates that a target dataset faithfully reproduces a source dataset
//! after a migration: row-count parity, duplicate rows, and field-by-field
//! accuracy keyed on a record identifier.

pub mod accuracy_check;
pub mod cli;
pub mod commands;
pub mod config;
pub mod count_check;
pub mod data;
pub mod duplicate_check;
pub mod error;
pub mod output;
pub mod progress;
pub mod report;
pub mod schema;
pub mod summary;
pub mod table;

pub use accuracy_check::{AccuracyComparator, AccuracyReport, ComparisonRow, RowStatus};
pub use count_check::{CountCheckResult, CountChecker, CountMismatch};
pub use duplicate_check::{DuplicateCheckResult, DuplicateDetector, DuplicateGroup};
pub use error::{Result, TabcheckError};
pub use report::{CsvReportWriter, MemorySink, ReportSink, ReportTable};
pub use schema::{discover_columns, ColumnList};
pub use table::{CellValue, Table};
