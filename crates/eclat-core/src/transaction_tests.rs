//! Tests for `transaction` module

use super::error::Error;
use super::transaction::*;

#[test]
fn test_parse_mixed_separators() {
    // Arrange
    let input = b"1 2 5\n2,4\n2\t3\n";

    // Act
    let set = TransactionSet::parse(input, 1.0).expect("parse");

    // Assert
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(0), Some(&[1, 2, 5][..]));
    assert_eq!(set.get(1), Some(&[2, 4][..]));
    assert_eq!(set.get(2), Some(&[2, 3][..]));
    assert_eq!(set.item_max(), Some(5));
    assert_eq!(set.universe(), 6);
    assert_eq!(set.occurrences(), 7);
}

#[test]
fn test_parse_without_trailing_newline() {
    let set = TransactionSet::parse(b"0 1\n7", 1.0).expect("parse");

    assert_eq!(set.len(), 2);
    assert_eq!(set.get(1), Some(&[7][..]));
}

#[test]
fn test_blank_lines_and_crlf_are_skipped() {
    let set = TransactionSet::parse(b"1 2\r\n\r\n\n3\r4\n", 1.0).expect("parse");

    let all: Vec<&[u32]> = set.iter().collect();
    assert_eq!(all, vec![&[1, 2][..], &[3][..], &[4][..]]);
}

#[test]
fn test_runs_of_separators_yield_no_empty_items() {
    let set = TransactionSet::parse(b" ,3,, 4\t\t\n", 1.0).expect("parse");

    assert_eq!(set.get(0), Some(&[3, 4][..]));
    assert_eq!(set.item_max(), Some(4));
}

#[test]
fn test_invalid_character_reports_line() {
    // Arrange
    let input = b"1 2\n3 x\n";

    // Act
    let err = TransactionSet::parse(input, 1.0).unwrap_err();

    // Assert
    match err {
        Error::MalformedInput { line, byte } => {
            assert_eq!(line, 2);
            assert_eq!(byte, b'x');
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_invalid_character_after_fraction_cut_is_still_rejected() {
    let err = TransactionSet::parse(b"1\n2\n3\n-4\n", 0.25).unwrap_err();

    assert!(matches!(err, Error::MalformedInput { line: 4, byte: b'-' }));
}

#[test]
fn test_item_overflow_is_rejected() {
    let err = TransactionSet::parse(b"4294967296\n", 1.0).unwrap_err();

    assert!(matches!(err, Error::InvalidItem { line: 1, .. }));
}

#[test]
fn test_largest_u32_item_is_accepted() {
    let set = TransactionSet::parse(b"4294967295\n", 1.0).expect("parse");

    assert_eq!(set.item_max(), Some(u32::MAX));
}

#[test]
fn test_fraction_keeps_rounded_prefix() {
    // 5 transactions * 0.5 = 2.5, rounded to 3
    let set = TransactionSet::parse(b"1\n2\n3\n9\n10\n", 0.5).expect("parse");

    assert_eq!(set.len(), 3);
    // item_max only covers the kept transactions
    assert_eq!(set.item_max(), Some(3));
}

#[test]
fn test_fraction_above_one_keeps_everything() {
    let set = TransactionSet::parse(b"1\n2\n", 3.0).expect("parse");

    assert_eq!(set.len(), 2);
}

#[test]
fn test_invalid_fraction() {
    assert!(matches!(
        TransactionSet::parse(b"1\n", 0.0),
        Err(Error::InvalidFraction(_))
    ));
    assert!(matches!(
        TransactionSet::parse(b"1\n", f64::NAN),
        Err(Error::InvalidFraction(_))
    ));
}

#[test]
fn test_empty_input() {
    let set = TransactionSet::parse(b"", 1.0).expect("parse");

    assert!(set.is_empty());
    assert_eq!(set.item_max(), None);
    assert_eq!(set.universe(), 0);
}

#[test]
fn test_from_path_reads_file() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("retail.dat");
    std::fs::write(&path, "0 1\n0 1 2\n").expect("write");

    // Act
    let set = TransactionSet::from_path(&path, 1.0).expect("load");

    // Assert
    assert_eq!(set.len(), 2);
    assert_eq!(set.universe(), 3);
}

#[test]
fn test_from_path_missing_file() {
    let err = TransactionSet::from_path("/nonexistent/eclat/input.dat", 1.0).unwrap_err();

    assert_eq!(err.code(), "ECLAT-009");
}

#[test]
fn test_min_support_count_rounds_up() {
    assert_eq!(min_support_count(0.5, 4).unwrap(), 2);
    assert_eq!(min_support_count(0.1, 25).unwrap(), 3);
    assert_eq!(min_support_count(1.0, 7).unwrap(), 7);
}

#[test]
fn test_min_support_count_is_at_least_one() {
    assert_eq!(min_support_count(0.001, 10).unwrap(), 1);
    assert_eq!(min_support_count(0.5, 0).unwrap(), 1);
}

#[test]
fn test_min_support_count_rejects_non_positive() {
    assert!(matches!(min_support_count(0.0, 10), Err(Error::InvalidSupport(_))));
    assert!(matches!(min_support_count(-0.5, 10), Err(Error::InvalidSupport(_))));
    assert!(matches!(
        min_support_count(f64::INFINITY, 10),
        Err(Error::InvalidSupport(_))
    ));
}
