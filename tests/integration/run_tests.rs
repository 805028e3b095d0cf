//! Multi-check runs driven by flags and config files

use crate::common::{sample_data, CliTestRunner};
use std::fs;
use tabcheck::report::{ACCURACY_REPORT, COUNT_REPORT, DUPLICATE_REPORT};
use tabcheck::summary::SUMMARY_FILE;

#[test]
fn test_run_all_checks_on_clean_data() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner.fixture().create_csv("source.csv", &sample_data::source_employees()).unwrap();
    let target = runner.fixture().create_csv("target.csv", &sample_data::target_employees_clean()).unwrap();

    runner.expect_pass(&[
        "run",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--id-column",
        "EMPLOYEE_ID",
    ]);

    runner.fixture().assert_report_not_exists(COUNT_REPORT);
    runner.fixture().assert_report_not_exists(DUPLICATE_REPORT);
    runner.fixture().assert_report_not_exists(ACCURACY_REPORT);
    assert!(runner.fixture().output_dir().join(SUMMARY_FILE).exists());
}

#[test]
fn test_run_all_checks_on_dirty_data() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner.fixture().create_csv("source.csv", &sample_data::source_employees()).unwrap();
    let target = runner.fixture().create_csv("target.csv", &sample_data::target_employees_dirty()).unwrap();

    runner.expect_discrepancies(&[
        "run",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--id-column",
        "EMPLOYEE_ID",
    ]);

    // Same number of rows, so only duplicates and accuracy report
    runner.fixture().assert_report_not_exists(COUNT_REPORT);
    runner.fixture().assert_report_exists(DUPLICATE_REPORT);
    runner.fixture().assert_report_exists(ACCURACY_REPORT);

    let summary_path = runner.fixture().output_dir().join(SUMMARY_FILE);
    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    let checks = summary["checks"].as_array().unwrap();
    assert_eq!(checks.len(), 3);
    assert_eq!(checks[0]["check"], "count");
    assert_eq!(checks[0]["passed"], true);
    assert_eq!(checks[1]["passed"], false);
    assert_eq!(checks[2]["passed"], false);
}

#[test]
fn test_run_from_config_file() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner.fixture().create_csv("source.csv", &sample_data::source_employees()).unwrap();
    let target = runner.fixture().create_csv("target.csv", &sample_data::target_employees_dirty()).unwrap();

    let config = serde_json::json!({
        "source": source,
        "target": target,
        "id_column": "EMPLOYEE_ID",
        "checks": ["accuracy"],
    });
    let config_path = runner.fixture().root().join("tabcheck.json");
    fs::write(&config_path, config.to_string()).unwrap();

    runner.expect_discrepancies(&["run", "--config", config_path.to_str().unwrap()]);

    runner.fixture().assert_report_exists(ACCURACY_REPORT);
    runner.fixture().assert_report_not_exists(DUPLICATE_REPORT);
}

#[test]
fn test_failing_check_does_not_stop_the_others() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner.fixture().create_csv("source.csv", &sample_data::source_employees()).unwrap();
    let target = runner.fixture().create_csv("target.csv", &sample_data::target_employees_dirty()).unwrap();

    let error = runner.expect_failure(&[
        "run",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--id-column",
        "NOT_A_COLUMN",
    ]);
    assert!(matches!(error, tabcheck::TabcheckError::ChecksFailed { failed: 1 }));

    // Duplicates still ran and reported; accuracy left no partial output
    runner.fixture().assert_report_exists(DUPLICATE_REPORT);
    runner.fixture().assert_report_not_exists(ACCURACY_REPORT);

    let summary_path = runner.fixture().output_dir().join(SUMMARY_FILE);
    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    let error_text = summary["checks"][2]["error"].as_str().unwrap();
    assert!(error_text.contains("NOT_A_COLUMN"));
}

#[test]
fn test_run_without_identifier_is_config_error() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner.fixture().create_csv("source.csv", &sample_data::source_employees()).unwrap();

    let error = runner.expect_failure(&["run", source.to_str().unwrap(), source.to_str().unwrap()]);
    assert!(matches!(error, tabcheck::TabcheckError::Config { .. }));
}

#[test]
fn test_run_duplicates_only_needs_target() {
    let runner = CliTestRunner::new().unwrap();
    let target = runner.fixture().create_csv("target.csv", &sample_data::target_employees_clean()).unwrap();

    let config = serde_json::json!({ "target": target, "checks": ["duplicates"] });
    let config_path = runner.fixture().root().join("dups.json");
    fs::write(&config_path, config.to_string()).unwrap();

    runner.expect_pass(&["run", "--config", config_path.to_str().unwrap()]);
}
