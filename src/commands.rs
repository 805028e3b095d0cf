//! Command implementations for tabcheck CLI

use crate::accuracy_check::AccuracyComparator;
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::{CheckConfig, CheckKind};
use crate::count_check::CountChecker;
use crate::data::{DataProcessor, TableLoader};
use crate::duplicate_check::DuplicateDetector;
use crate::error::{Result, TabcheckError};
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::CheckProgress;
use crate::report::{
    CsvReportWriter, ReportSink, ReportTable, ACCURACY_REPORT, COUNT_REPORT, DUPLICATE_REPORT,
};
use crate::summary::RunSummary;
use crate::table::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub output_dir: Option<PathBuf>,
    pub write_reports: bool,
    pub format: OutputFormat,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            output_dir: cli.output_dir.clone(),
            write_reports: !cli.no_report,
            format: OutputFormat::parse(&cli.format).map_err(TabcheckError::invalid_input)?,
        })
    }
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            write_reports: true,
            format: OutputFormat::Pretty,
        }
    }
}

/// Routes results to the terminal and report files
struct Reporter {
    format: OutputFormat,
    sink: Option<CsvReportWriter>,
    json: serde_json::Map<String, serde_json::Value>,
    progress: CheckProgress,
}

impl Reporter {
    fn new(format: OutputFormat, output_dir: Option<&Path>, write_reports: bool) -> Self {
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(crate::config::DEFAULT_OUTPUT_DIR));

        Self {
            format,
            sink: write_reports.then(|| CsvReportWriter::new(output_dir)),
            json: serde_json::Map::new(),
            progress: CheckProgress::new(format == OutputFormat::Pretty),
        }
    }

    fn load(&self, loader: &dyn TableLoader, path: &Path) -> Result<Table> {
        self.progress.stage(&format!("Loading {}...", path.display()));
        loader.load(path)
    }

    fn write_report(&mut self, report: &ReportTable) -> Result<()> {
        match &mut self.sink {
            Some(sink) => sink.write_report(report),
            None => Ok(()),
        }
    }

    /// Drop a previous run's artifact so only this run's findings remain
    fn discard_report(&mut self, name: &str) -> Result<()> {
        match &mut self.sink {
            Some(sink) => sink.discard_report(name),
            None => Ok(()),
        }
    }

    fn emit<T: Serialize>(&mut self, key: &str, value: &T, print: fn(&T)) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                self.progress.finish();
                print(value);
            }
            OutputFormat::Json => {
                self.json.insert(key.to_string(), serde_json::to_value(value)?);
            }
        }
        Ok(())
    }

    /// Every result emitted so far, keyed by check
    fn json_document(&self) -> Result<String> {
        JsonFormatter::format(&self.json)
    }

    fn finish(mut self) -> Result<()> {
        self.progress.finish();
        if self.format == OutputFormat::Json {
            println!("{}", self.json_document()?);
        }
        Ok(())
    }
}

/// Execute a command; `Ok(false)` means the checks ran and found discrepancies
pub fn execute_command(command: Commands, options: &GlobalOptions) -> Result<bool> {
    let loader = DataProcessor::new()?;

    match command {
        Commands::Count { source, target } => {
            let mut reporter = Reporter::new(options.format, options.output_dir.as_deref(), options.write_reports);
            let source = reporter.load(&loader, &source)?;
            let target = reporter.load(&loader, &target)?;
            let passed = run_count(&mut reporter, &source, &target)?;
            reporter.finish()?;
            Ok(passed)
        }
        Commands::Duplicates { input, key } => {
            let mut reporter = Reporter::new(options.format, options.output_dir.as_deref(), options.write_reports);
            let table = reporter.load(&loader, &input)?;
            let passed = run_duplicates(&mut reporter, &table, &key)?;
            reporter.finish()?;
            Ok(passed)
        }
        Commands::Accuracy {
            source,
            target,
            id_column,
        } => {
            let mut reporter = Reporter::new(options.format, options.output_dir.as_deref(), options.write_reports);
            let source = reporter.load(&loader, &source)?;
            let target = reporter.load(&loader, &target)?;
            let passed = run_accuracy(&mut reporter, &source, &target, &id_column)?;
            reporter.finish()?;
            Ok(passed)
        }
        Commands::Run {
            source,
            target,
            id_column,
            config,
            checks,
            key,
        } => {
            let mut check_config = match config {
                Some(path) => CheckConfig::from_file(&path)?,
                None => CheckConfig::default(),
            };

            if source.is_some() {
                check_config.source = source;
            }
            if target.is_some() {
                check_config.target = target;
            }
            if id_column.is_some() {
                check_config.id_column = id_column;
            }
            if !checks.is_empty() {
                check_config.checks = checks;
            }
            if !key.is_empty() {
                check_config.duplicate_key = key;
            }
            if let Some(dir) = &options.output_dir {
                check_config.output_dir = dir.clone();
            }
            if !options.write_reports {
                check_config.write_reports = false;
            }

            run_checks(&loader, &check_config, options.format)
        }
    }
}

/// Run every configured check; one failing check does not stop the others
pub fn run_checks(loader: &dyn TableLoader, config: &CheckConfig, format: OutputFormat) -> Result<bool> {
    config.validate()?;

    let mut reporter = Reporter::new(format, Some(&config.output_dir), config.write_reports);
    let mut summary = RunSummary::new(
        config.source.clone(),
        config.target.clone(),
        config.id_column.clone(),
    );

    let needs_source = config.runs(CheckKind::Count) || config.runs(CheckKind::Accuracy);
    let source = match &config.source {
        Some(path) if needs_source => Some(reporter.load(loader, path)),
        _ => None,
    };
    let target = match &config.target {
        Some(path) => reporter.load(loader, path),
        None => Err(TabcheckError::config("a target locator is required")),
    };

    for check in &config.checks {
        let outcome = match check {
            CheckKind::Count => with_tables(&source, &target)
                .and_then(|(s, t)| run_count(&mut reporter, s, t)),
            CheckKind::Duplicates => loaded(&target)
                .and_then(|t| run_duplicates(&mut reporter, t, &config.duplicate_key)),
            CheckKind::Accuracy => with_tables(&source, &target).and_then(|(s, t)| {
                let id = config.id_column.as_deref().unwrap_or_default();
                run_accuracy(&mut reporter, s, t, id)
            }),
        };
        summary.record(*check, outcome);
    }

    if config.write_reports {
        let path = summary.write_to(&config.output_dir)?;
        log::debug!("Run summary written to {}", path.display());
    }

    reporter.emit("summary", &summary, PrettyPrinter::print_run_summary)?;
    reporter.finish()?;

    match summary.errored() {
        0 => Ok(summary.all_passed()),
        failed => Err(TabcheckError::ChecksFailed { failed }),
    }
}

/// Borrow a loaded table, re-raising its load failure for this check
fn loaded(table: &Result<Table>) -> Result<&Table> {
    table.as_ref().map_err(reraise)
}

/// Rebuild a stored load failure with the same variant and message
fn reraise(error: &TabcheckError) -> TabcheckError {
    match error {
        TabcheckError::Load { table, message } => TabcheckError::load(table, message),
        TabcheckError::Schema { table, message } => TabcheckError::schema(table, message),
        other => TabcheckError::load("input", other.to_string()),
    }
}

fn with_tables<'a>(
    source: &'a Option<Result<Table>>,
    target: &'a Result<Table>,
) -> Result<(&'a Table, &'a Table)> {
    let source = match source {
        Some(source) => loaded(source)?,
        None => return Err(TabcheckError::config("a source locator is required")),
    };
    Ok((source, loaded(target)?))
}

fn run_count(reporter: &mut Reporter, source: &Table, target: &Table) -> Result<bool> {
    reporter.progress.stage("Comparing row counts...");
    reporter.discard_report(COUNT_REPORT)?;
    let result = CountChecker::check(source, target);

    if let Some(mismatch) = &result.mismatch {
        reporter.write_report(&mismatch.to_report_table())?;
    }
    reporter.emit("count", &result, PrettyPrinter::print_count_result)?;

    Ok(result.matches)
}

fn run_duplicates(reporter: &mut Reporter, table: &Table, key: &[String]) -> Result<bool> {
    reporter.progress.stage("Looking for duplicates...");
    reporter.discard_report(DUPLICATE_REPORT)?;
    let result = DuplicateDetector::by_columns(table, key)?;

    if result.has_duplicates {
        reporter.write_report(&result.to_report_table())?;
    }
    reporter.emit("duplicates", &result, PrettyPrinter::print_duplicate_result)?;

    Ok(!result.has_duplicates)
}

fn run_accuracy(reporter: &mut Reporter, source: &Table, target: &Table, id_column: &str) -> Result<bool> {
    reporter.progress.stage("Comparing fields...");
    reporter.discard_report(ACCURACY_REPORT)?;
    let report = AccuracyComparator::new(id_column).check(source, target)?;

    if !report.all_matched {
        reporter.write_report(&report.to_report_table())?;
    }
    reporter.emit("accuracy", &report, PrettyPrinter::print_accuracy_result)?;

    Ok(report.all_matched)
}
