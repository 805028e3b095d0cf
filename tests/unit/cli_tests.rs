//! CLI argument handling

use crate::common::CliTestRunner;
use clap::Parser;
use tabcheck::cli::{Cli, Commands, OutputFormat};
use tabcheck::commands::GlobalOptions;
use tabcheck::TabcheckError;

#[test]
fn test_global_options_from_cli() {
    let cli = Cli::try_parse_from(["tabcheck", "count", "a.csv", "b.csv", "--format", "json", "--no-report"])
        .unwrap();
    let options = GlobalOptions::from_cli(&cli).unwrap();

    assert_eq!(options.format, OutputFormat::Json);
    assert!(!options.write_reports);
    assert!(options.output_dir.is_none());
}

#[test]
fn test_invalid_format_rejected() {
    let cli = Cli::try_parse_from(["tabcheck", "count", "a.csv", "b.csv", "--format", "yaml"]).unwrap();
    let error = GlobalOptions::from_cli(&cli).unwrap_err();
    assert!(matches!(error, TabcheckError::InvalidInput { .. }));
}

#[test]
fn test_unknown_check_rejected() {
    assert!(Cli::try_parse_from(["tabcheck", "run", "--check", "speed"]).is_err());
}

#[test]
fn test_run_arguments_are_optional() {
    let cli = Cli::try_parse_from(["tabcheck", "run", "--config", "tabcheck.json"]).unwrap();
    match cli.command {
        Commands::Run {
            source, target, config, ..
        } => {
            assert!(source.is_none());
            assert!(target.is_none());
            assert!(config.is_some());
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    let runner = CliTestRunner::new().unwrap();
    let error = runner.expect_failure(&["snapshot", "data.csv"]);
    assert!(matches!(error, TabcheckError::InvalidInput { .. }));
}
