//! Main entry point for tabcheck CLI

use clap::Parser;
use tabcheck::cli::Cli;
use tabcheck::commands::{execute_command, GlobalOptions};

/// Exit status when checks ran but found discrepancies
const EXIT_DISCREPANCIES: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let options = match GlobalOptions::from_cli(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match execute_command(cli.command, &options) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DISCREPANCIES),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
