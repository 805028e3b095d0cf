//! Command-line interface for tabcheck

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabcheck")]
#[command(about = "Validate that a target dataset faithfully reproduces a source dataset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory for report files
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Do not write report files
    #[arg(long, global = true)]
    pub no_report: bool,

    /// Output format: "pretty", "json"
    #[arg(long, global = true, default_value = "pretty")]
    pub format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare row counts of source and target
    Count {
        /// Source file path
        source: PathBuf,

        /// Target file path
        target: PathBuf,
    },

    /// Find rows repeated in a table
    Duplicates {
        /// Input file path
        input: PathBuf,

        /// Group on these columns instead of the full row
        #[arg(long = "key")]
        key: Vec<String>,
    },

    /// Compare target against source field by field
    Accuracy {
        /// Source file path
        source: PathBuf,

        /// Target file path
        target: PathBuf,

        /// Identifier column used to join the two tables
        #[arg(long)]
        id_column: String,
    },

    /// Run several checks in one go
    Run {
        /// Source file path (overrides config)
        source: Option<PathBuf>,

        /// Target file path (overrides config)
        target: Option<PathBuf>,

        /// Identifier column (overrides config)
        #[arg(long)]
        id_column: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Checks to run: "count", "duplicates", "accuracy" (defaults to all)
        #[arg(long = "check", value_parser = parse_check)]
        checks: Vec<crate::config::CheckKind>,

        /// Group duplicates on these columns instead of the full row
        #[arg(long = "key")]
        key: Vec<String>,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

fn parse_check(s: &str) -> Result<crate::config::CheckKind, String> {
    crate::config::CheckKind::parse(s)
}
