//! Edge case tests for data-related scenarios

use crate::common::{CliTestRunner, TestFixture};
use tabcheck::data::{DataProcessor, TableLoader};
use tabcheck::report::ACCURACY_REPORT;
use tabcheck::{AccuracyComparator, CellValue, DuplicateDetector, TabcheckError};

#[test]
fn test_missing_input_file_is_load_error() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner
        .fixture()
        .create_csv("source.csv", &[vec!["id"], vec!["1"]])
        .unwrap();
    let missing = runner.fixture().root().join("nope.csv");

    let error = runner.expect_failure(&["count", source.to_str().unwrap(), missing.to_str().unwrap()]);
    assert!(matches!(error, TabcheckError::Load { .. }));
    assert!(error.to_string().contains("nope.csv"));
}

#[test]
fn test_missing_identifier_column_is_schema_error() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner
        .fixture()
        .create_csv("source.csv", &[vec!["EMPLOYEE_ID", "NAME"], vec!["1", "Alice"]])
        .unwrap();
    let target = runner
        .fixture()
        .create_csv("target.csv", &[vec!["EMP_ID", "NAME"], vec!["1", "Alice"]])
        .unwrap();

    let error = runner.expect_failure(&[
        "accuracy",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--id-column",
        "EMPLOYEE_ID",
    ]);
    assert!(error.is_schema_error());
    assert!(error.to_string().contains("target.csv"));
    runner.fixture().assert_report_not_exists(ACCURACY_REPORT);
}

#[test]
fn test_empty_csv_fields_load_as_null() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv_raw("nulls.csv", "id,a,b\n1,,x\n2,,\n")
        .unwrap();

    let table = DataProcessor::new().unwrap().load(&path).unwrap();

    assert_eq!(table.value(0, "a"), Some(&CellValue::Null));
    assert_eq!(table.value(1, "b"), Some(&CellValue::Null));
}

#[test]
fn test_null_identifiers_from_csv_are_skipped() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv_raw("source.csv", "id,name\n1,Alice\n,Ghost\n")
        .unwrap();
    let target = fixture.create_csv_raw("target.csv", "id,name\n1,Alice\n").unwrap();

    let loader = DataProcessor::new().unwrap();
    let source = loader.load(&source).unwrap();
    let target = loader.load(&target).unwrap();

    let report = AccuracyComparator::new("id").check(&source, &target).unwrap();
    assert!(report.all_matched);
    assert_eq!(report.skipped_null_ids, 1);
}

#[test]
fn test_unicode_values_compare_exactly() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv_raw("source.csv", "id,name\n1,Café\n2,北京\n")
        .unwrap();
    let target = fixture
        .create_csv_raw("target.csv", "id,name\n1,Cafe\n2,北京\n")
        .unwrap();

    let loader = DataProcessor::new().unwrap();
    let report = AccuracyComparator::new("id")
        .check(&loader.load(&source).unwrap(), &loader.load(&target).unwrap())
        .unwrap();

    assert_eq!(report.mismatched, 1);
    assert_eq!(report.discrepancies[0].fields[1].source, CellValue::from("Café"));
}

#[test]
fn test_quoted_commas_survive_loading() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv_raw("quoted.csv", "id,name\n1,\"Smith, Jane\"\n1,\"Smith, Jane\"\n")
        .unwrap();

    let table = DataProcessor::new().unwrap().load(&path).unwrap();
    let result = DuplicateDetector::check(&table).unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].values[1], CellValue::from("Smith, Jane"));
}

#[test]
fn test_unsupported_format_rejected() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.create_csv_raw("data.txt", "id,name\n1,Alice\n").unwrap();

    let error = DataProcessor::new().unwrap().load(&path).unwrap_err();

    assert!(matches!(error, TabcheckError::Load { .. }));
    assert!(error.to_string().contains("unsupported format"));
}

#[test]
fn test_columns_inferred_differently_still_compare_equal() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv_raw("source.csv", "id,amount\n1,10\n2,20\n")
        .unwrap();
    let target = fixture
        .create_csv_raw("target.csv", "id,amount\n1,10\n2,N/A\nX9,30\n")
        .unwrap();

    let loader = DataProcessor::new().unwrap();
    let report = AccuracyComparator::new("id")
        .check(&loader.load(&source).unwrap(), &loader.load(&target).unwrap())
        .unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.mismatched, 1);
    assert_eq!(report.missing, 0);
    assert_eq!(report.discrepancies[0].identifier, CellValue::from("2"));
    assert_eq!(report.discrepancies[0].differing_columns, vec!["amount".to_string()]);
}

#[test]
fn test_large_identifiers_stay_distinct() {
    let fixture = TestFixture::new().unwrap();
    let source = fixture
        .create_csv_raw("source.csv", "id,v\n9007199254740992,a\n9007199254740993,b\n")
        .unwrap();
    let target = fixture
        .create_csv_raw("target.csv", "id,v\n9007199254740993,b\n9007199254740992,a\n")
        .unwrap();

    let loader = DataProcessor::new().unwrap();
    let source = loader.load(&source).unwrap();
    let target = loader.load(&target).unwrap();

    assert!(!DuplicateDetector::check(&source).unwrap().has_duplicates);
    assert!(!DuplicateDetector::by_columns(&source, &["id".to_string()]).unwrap().has_duplicates);

    let report = AccuracyComparator::new("id").check(&source, &target).unwrap();
    assert!(report.all_matched);
    assert_eq!(report.matched, 2);
}

#[test]
fn test_workbook_loads_first_sheet() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.create_workbook(
        "employees.xlsx",
        &[
            vec!["EMPLOYEE_ID", "NAME", "SALARY"],
            vec!["1", "Alice", "100"],
            vec!["2", "", "80.5"],
        ],
    );

    let table = DataProcessor::new().unwrap().load(&path).unwrap();

    assert_eq!(table.header(), &["EMPLOYEE_ID", "NAME", "SALARY"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "EMPLOYEE_ID"), Some(&CellValue::from("1")));
    assert_eq!(table.value(1, "NAME"), Some(&CellValue::Null));
    assert_eq!(table.value(1, "SALARY"), Some(&CellValue::from("80.5")));
}

#[test]
fn test_workbook_target_compares_against_csv_source() {
    let runner = CliTestRunner::new().unwrap();
    let source = runner
        .fixture()
        .create_csv("source.csv", &[vec!["id", "name", "salary"], vec!["1", "Alice", "100"], vec!["2", "Bob", "80"]])
        .unwrap();
    let target = runner.fixture().create_workbook(
        "target.xlsx",
        &[vec!["id", "name", "salary"], vec!["1", "Alice", "100"], vec!["2", "Bob", "85"]],
    );

    runner.expect_discrepancies(&[
        "accuracy",
        source.to_str().unwrap(),
        target.to_str().unwrap(),
        "--id-column",
        "id",
    ]);

    let (_, rows) = runner.fixture().read_report(ACCURACY_REPORT);
    assert_eq!(rows, vec![vec!["2", "2", "2", "Bob", "Bob", "80", "85"]]);
}
