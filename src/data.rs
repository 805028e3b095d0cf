//! Table loading using DuckDB and calamine
//!
//! Every cell is loaded as text. Each file gets its own type inference, so
//! typed values would make `10` in one file unequal to `10` in another.

use crate::error::{Result, TabcheckError};
use crate::table::{CellValue, Table};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;

/// Produces an in-memory table from a data locator
pub trait TableLoader {
    fn load(&self, path: &Path) -> Result<Table>;
}

/// Input formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Parquet,
    Json,
    Workbook,
}

impl FileFormat {
    pub fn from_path(file_path: &Path) -> Option<Self> {
        let extension = file_path.extension().and_then(|s| s.to_str())?;
        match extension.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "parquet" => Some(Self::Parquet),
            "json" | "jsonl" | "ndjson" => Some(Self::Json),
            "xlsx" | "xlsm" | "xls" => Some(Self::Workbook),
            _ => None,
        }
    }

    /// DuckDB table function reading this format; `None` for workbooks
    fn scan_expression(self, file_path: &Path) -> Option<String> {
        let path = file_path.to_string_lossy().replace('\'', "''");
        match self {
            Self::Csv => Some(format!("read_csv('{}', header = true, all_varchar = true)", path)),
            Self::Tsv => Some(format!(
                "read_csv('{}', header = true, delim = '\\t', all_varchar = true)",
                path
            )),
            Self::Parquet => Some(format!("read_parquet('{}')", path)),
            Self::Json => Some(format!("read_json_auto('{}')", path)),
            Self::Workbook => None,
        }
    }
}

/// Loads CSV, TSV, Parquet and JSON files through an in-memory DuckDB
/// connection, and Excel workbooks through calamine
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;

        // Row order matters for reports and duplicate first-occurrence
        connection.execute("SET preserve_insertion_order=true", [])?;
        connection.execute("SET enable_progress_bar=false", [])?;

        Ok(Self { connection })
    }

    /// Check if file format is supported
    pub fn is_supported_format(file_path: &Path) -> bool {
        FileFormat::from_path(file_path).is_some()
    }

    fn load_table(&self, file_path: &Path) -> Result<Table> {
        let label = file_path.display().to_string();

        if !file_path.is_file() {
            return Err(TabcheckError::load(&label, "file not found"));
        }
        let format = FileFormat::from_path(file_path).ok_or_else(|| {
            TabcheckError::load(
                &label,
                "unsupported format (expected csv, tsv, parquet, json, jsonl, xlsx or xls)",
            )
        })?;
        let scan = match format.scan_expression(file_path) {
            Some(scan) => scan,
            None => return Self::load_workbook(file_path, label),
        };

        let create_view_sql = format!("CREATE OR REPLACE VIEW data_view AS SELECT * FROM {}", scan);
        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| Self::convert_duckdb_error(e, &label))?;

        let columns = self.column_names(&label)?;
        let column_count = columns.len();

        let mut stmt = self
            .connection
            .prepare("SELECT * FROM data_view")
            .map_err(|e| Self::convert_duckdb_error(e, &label))?;

        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(Self::to_cell_value(row.get_ref(i)?));
                }
                Ok(values)
            })
            .map_err(|e| Self::convert_duckdb_error(e, &label))?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|e| Self::convert_duckdb_error(e, &label))?);
        }

        log::debug!("Loaded {} rows x {} columns from {}", data.len(), column_count, label);

        Table::new(label, columns, data)
    }

    /// Read the first worksheet; its first row is the header
    fn load_workbook(file_path: &Path, label: String) -> Result<Table> {
        let mut workbook: Sheets<_> = open_workbook_auto(file_path)
            .map_err(|e| TabcheckError::load(&label, format!("unreadable workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TabcheckError::load(&label, "workbook contains no sheets"))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            TabcheckError::load(&label, format!("failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let mut rows = range.rows();
        let columns: Vec<String> = rows
            .next()
            .map(|header| header.iter().map(|c| Self::workbook_cell(c).to_string()).collect())
            .unwrap_or_default();
        let data: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(Self::workbook_cell).collect())
            .collect();

        log::debug!(
            "Loaded {} rows x {} columns from sheet '{}' of {}",
            data.len(),
            columns.len(),
            sheet_name,
            label
        );

        Table::new(label, columns, data)
    }

    fn workbook_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Null,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(n) => CellValue::Text(format_float(*n)),
            Data::Int(n) => CellValue::Text(n.to_string()),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                    CellValue::Text(datetime.format("%Y-%m-%d").to_string())
                }
                Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => CellValue::Text(format_float(dt.as_f64())),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    /// Column names of the current view in their original order
    fn column_names(&self, label: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare("DESCRIBE data_view")
            .map_err(|e| Self::convert_duckdb_error(e, label))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Self::convert_duckdb_error(e, label))?;

        let mut columns = Vec::new();
        for name in names {
            columns.push(name.map_err(|e| Self::convert_duckdb_error(e, label))?);
        }
        Ok(columns)
    }

    /// Map DuckDB failures to load errors naming the file
    fn convert_duckdb_error(error: duckdb::Error, label: &str) -> TabcheckError {
        let error_msg = error.to_string();

        let message = if error_msg.contains("CSV Error")
            || error_msg.contains("Invalid CSV")
            || error_msg.contains("Unterminated quoted field")
        {
            format!("malformed CSV: {}", error_msg)
        } else if error_msg.contains("Malformed JSON") {
            format!("malformed JSON: {}", error_msg)
        } else if error_msg.contains("UTF-8") || error_msg.contains("encoding") {
            format!("encoding error: {}", error_msg)
        } else {
            error_msg
        };

        TabcheckError::load(label, message)
    }

    fn to_cell_value(value: ValueRef<'_>) -> CellValue {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Boolean(b) => CellValue::Text(b.to_string()),
            ValueRef::TinyInt(i) => CellValue::Text(i.to_string()),
            ValueRef::SmallInt(i) => CellValue::Text(i.to_string()),
            ValueRef::Int(i) => CellValue::Text(i.to_string()),
            ValueRef::BigInt(i) => CellValue::Text(i.to_string()),
            ValueRef::HugeInt(i) => CellValue::Text(i.to_string()),
            ValueRef::UTinyInt(i) => CellValue::Text(i.to_string()),
            ValueRef::USmallInt(i) => CellValue::Text(i.to_string()),
            ValueRef::UInt(i) => CellValue::Text(i.to_string()),
            ValueRef::UBigInt(i) => CellValue::Text(i.to_string()),
            ValueRef::Float(f) => CellValue::Text(format_float(f as f64)),
            ValueRef::Double(f) => CellValue::Text(format_float(f)),
            ValueRef::Decimal(d) => CellValue::Text(d.to_string()),
            ValueRef::Text(s) => CellValue::Text(String::from_utf8_lossy(s).to_string()),
            ValueRef::Blob(b) => CellValue::Text(format!("<blob:{} bytes>", b.len())),
            ValueRef::Date32(days) => chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
                .map(|date| CellValue::Text(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(CellValue::Text(days.to_string())),
            ValueRef::Timestamp(unit, ts) => {
                let micros = Self::to_micros(unit, ts);
                chrono::DateTime::from_timestamp_micros(micros)
                    .map(|dt| CellValue::Text(dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()))
                    .unwrap_or(CellValue::Text(ts.to_string()))
            }
            ValueRef::Time64(unit, t) => {
                let micros = Self::to_micros(unit, t);
                let secs = (micros / 1_000_000) as u32;
                let nanos = ((micros % 1_000_000) * 1_000) as u32;
                chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                    .map(|time| CellValue::Text(time.format("%H:%M:%S%.f").to_string()))
                    .unwrap_or(CellValue::Text(t.to_string()))
            }
            other => CellValue::Text(format!("{:?}", other)),
        }
    }

    fn to_micros(unit: TimeUnit, value: i64) -> i64 {
        match unit {
            TimeUnit::Second => value.saturating_mul(1_000_000),
            TimeUnit::Millisecond => value.saturating_mul(1_000),
            TimeUnit::Microsecond => value,
            TimeUnit::Nanosecond => value / 1_000,
        }
    }
}

/// Integral floats print without a fractional part (`10.0` -> `10`)
fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl TableLoader for DataProcessor {
    fn load(&self, path: &Path) -> Result<Table> {
        self.load_table(path)
    }
}
