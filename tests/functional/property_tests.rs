//! Properties every analyzer must hold regardless of input

use crate::common::{num, table, text};
use tabcheck::{AccuracyComparator, CellValue, CountChecker, DuplicateDetector, Table};

fn mixed_table(name: &str) -> Table {
    table(
        name,
        &["id", "name", "score", "note"],
        vec![
            vec![num(1), text("a"), CellValue::Number(1.5), CellValue::Null],
            vec![num(2), text("b"), CellValue::Null, text("")],
            vec![num(2), text("b"), CellValue::Null, text("")],
            vec![CellValue::Null, text("c"), num(3), text("n")],
            vec![num(4), CellValue::Null, num(0), CellValue::Null],
        ],
    )
}

#[test]
fn test_row_count_symmetry() {
    for (a_len, b_len) in [(0, 0), (0, 3), (5, 2), (4, 4)] {
        let a = table("a", &["id"], (0..a_len).map(|i| vec![num(i)]).collect());
        let b = table("b", &["id"], (0..b_len).map(|i| vec![num(i)]).collect());

        let ab = CountChecker::check(&a, &b);
        let ba = CountChecker::check(&b, &a);

        assert_eq!(ab.matches, ba.matches);
        let expected = (a_len - b_len).unsigned_abs() as usize;
        assert_eq!(ab.mismatch.map(|m| m.difference).unwrap_or(0), expected);
        assert_eq!(ba.mismatch.map(|m| m.difference).unwrap_or(0), expected);
    }
}

#[test]
fn test_duplicate_detection_is_idempotent() {
    let target = mixed_table("target");

    let first = DuplicateDetector::check(&target).unwrap();
    let second = DuplicateDetector::check(&target).unwrap();

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.groups.len(), 1);
}

#[test]
fn test_accuracy_self_comparison_is_clean() {
    let data = mixed_table("data");

    let report = AccuracyComparator::new("id").check(&data, &data).unwrap();

    assert!(report.all_matched);
    assert_eq!(report.mismatched, 0);
    assert_eq!(report.missing, 0);
    assert_eq!(report.skipped_null_ids, 1);
}

#[test]
fn test_null_vs_null_never_mismatches_but_null_target_always_does() {
    let source = table(
        "source",
        &["id", "a", "b"],
        vec![
            vec![num(1), CellValue::Null, text("keep")],
            vec![num(2), CellValue::Null, text("lost")],
        ],
    );
    let target = table(
        "target",
        &["id", "a", "b"],
        vec![
            vec![num(1), CellValue::Null, text("keep")],
            vec![num(2), CellValue::Null, CellValue::Null],
        ],
    );

    let report = AccuracyComparator::new("id").check(&source, &target).unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.mismatched, 1);
    assert_eq!(report.discrepancies[0].identifier, num(2));
    assert_eq!(report.discrepancies[0].differing_columns, vec!["b"]);
}

#[test]
fn test_null_semantics_differ_from_sql() {
    // In SQL `NULL = NULL` is unknown; here two nulls are the same value
    assert_eq!(CellValue::Null, CellValue::Null);
    assert!(!tabcheck::accuracy_check::values_differ(&CellValue::Null, &CellValue::Null));
}
