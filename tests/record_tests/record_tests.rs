//! Tests for Record encoding
//!
//! These tests verify:
//! - Line serialization in fixed field order
//! - Marks formatting
//! - Parsing stored lines back into records
//! - Field validation on write
//! - Raw field extraction used by scans

use isamstore::record::{field_of, format_marks, key_of, parse_marks, validate_key, Field, Record};
use isamstore::IsamError;

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_to_line_fixed_order() {
    let record = Record::new("Alice", "101", "alice@x.com", 88.5);
    assert_eq!(record.to_line("s1"), "s1,Alice,101,alice@x.com,88.5");
}

#[test]
fn test_to_line_integral_marks() {
    let record = Record::new("Alicia", "102", "b@x.com", 91.0);
    assert_eq!(record.to_line("s2"), "s2,Alicia,102,b@x.com,91.0");
}

#[test]
fn test_format_marks_variants() {
    assert_eq!(format_marks(100.0), "100.0");
    assert_eq!(format_marks(0.25), "0.25");
    assert_eq!(format_marks(-1.5), "-1.5");
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_from_line_roundtrip_fields() {
    let (key, record) = Record::from_line("s1,Alice,101,alice@x.com,88.5\n").unwrap();
    assert_eq!(key, "s1");
    assert_eq!(record, Record::new("Alice", "101", "alice@x.com", 88.5));
}

#[test]
fn test_from_line_empty_fields_allowed() {
    let (key, record) = Record::from_line("k,,,,0").unwrap();
    assert_eq!(key, "k");
    assert_eq!(record.name, "");
    assert_eq!(record.marks, 0.0);
}

#[test]
fn test_from_line_wrong_field_count() {
    assert!(matches!(
        Record::from_line("s1,Alice,101"),
        Err(IsamError::Parse(_))
    ));
    assert!(matches!(
        Record::from_line("s1,Alice,101,a@x.com,1.0,extra"),
        Err(IsamError::Parse(_))
    ));
}

#[test]
fn test_from_line_bad_marks() {
    let result = Record::from_line("s1,Alice,101,a@x.com,lots");
    assert!(matches!(result, Err(IsamError::Parse(_))));
}

#[test]
fn test_parse_marks_tolerates_whitespace() {
    assert_eq!(parse_marks(" 42.5 ").unwrap(), 42.5);
    assert!(parse_marks("").is_err());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_validate_accepts_plain_record() {
    assert!(Record::new("Bob", "7", "bob@x.com", 12.0).validate().is_ok());
}

#[test]
fn test_validate_rejects_delimiter_in_field() {
    let record = Record::new("Smith, John", "7", "j@x.com", 50.0);
    assert!(matches!(record.validate(), Err(IsamError::InvalidRecord(_))));
}

#[test]
fn test_validate_rejects_newline_in_field() {
    let record = Record::new("John", "7", "j@x.com\nx", 50.0);
    assert!(matches!(record.validate(), Err(IsamError::InvalidRecord(_))));
}

#[test]
fn test_validate_rejects_non_finite_marks() {
    assert!(Record::new("A", "1", "a", f64::NAN).validate().is_err());
    assert!(Record::new("A", "1", "a", f64::INFINITY).validate().is_err());
}

#[test]
fn test_validate_key() {
    assert!(validate_key("s1").is_ok());
    assert!(matches!(validate_key("s,1"), Err(IsamError::InvalidRecord(_))));
    assert!(matches!(validate_key("s\r"), Err(IsamError::InvalidRecord(_))));
}

// =============================================================================
// Field Extraction Tests
// =============================================================================

#[test]
fn test_field_of_each_field() {
    let line = "s1,Alice,101,alice@x.com,88.5\n";
    assert_eq!(field_of(line, Field::Key).unwrap(), "s1");
    assert_eq!(field_of(line, Field::Name).unwrap(), "Alice");
    assert_eq!(field_of(line, Field::RollNo).unwrap(), "101");
    assert_eq!(field_of(line, Field::Email).unwrap(), "alice@x.com");
    assert_eq!(field_of(line, Field::Marks).unwrap(), "88.5");
}

#[test]
fn test_field_of_missing_field() {
    assert!(matches!(
        field_of("only-a-key", Field::Name),
        Err(IsamError::Parse(_))
    ));
}

#[test]
fn test_key_of_strips_terminator() {
    assert_eq!(key_of("abc\r\n"), "abc");
    assert_eq!(key_of("abc,def\n"), "abc");
}
