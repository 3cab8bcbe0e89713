//! # Numeric Series Tests
//!
//! Tests for numeric validation, arithmetic updates and statistics.

use shaped_variants::{array, Factory, Kind, Number, NumericSeries, Value};

fn series(data: Value) -> NumericSeries {
    NumericSeries::new(data).expect("numeric test data")
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_inserting_calls_validate() {
    let s = series(array![1, 2]);
    assert!(s.append("three").unwrap_err().is_input_validation());
    assert!(s.prepend(true).is_err());
    assert!(s.set("k", Value::Null).is_err());
    assert!(s.add("k", array![1]).is_err());

    let grown = s.append("3.5").unwrap().prepend(0).unwrap();
    assert_eq!(grown.to_array(), array![0, 1, 2, "3.5"]);
}

#[test]
fn test_core_operations_still_available() {
    let s = series(array![5, 1, 4]);
    assert_eq!(s.sort().values().to_array(), array![1, 4, 5]);
    assert_eq!(s.count(), 3);
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_increment_and_decrement() {
    let s = series(array!["a" => 1, "b" => 2.5]);
    let s = s.increment("a", 1).decrement("b", 0.5).increment("c", 3);
    assert_eq!(s.get("a"), Some(&Value::Int(2)));
    assert_eq!(s.get("b"), Some(&Value::Float(2.0)));
    assert_eq!(s.get("c"), Some(&Value::Int(3)));
}

#[test]
fn test_increment_numeric_string() {
    let s = series(array!["n" => "41"]).increment("n", 1);
    assert_eq!(s.get("n"), Some(&Value::Int(42)));
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_basic_statistics() {
    let s = series(array![4, 8, 15, 16, 23, 42]);
    assert_eq!(s.sum(), Number::Int(108));
    assert_eq!(s.average(), Some(18.0));
    assert_eq!(s.max(), Some(Number::Int(42)));
    assert_eq!(s.min(), Some(Number::Int(4)));
}

#[test]
fn test_median_sorts_numerically() {
    assert_eq!(series(array![1, 20, 300, 4000]).median(), Some(160.0));
    assert_eq!(series(array![1, 2]).median(), Some(1.5));
    assert_eq!(series(array!["10", "9", "100"]).median(), Some(10.0));
}

#[test]
fn test_mixed_int_float_sum() {
    let s = series(array![1, 2.5, "0.5"]);
    assert_eq!(s.sum(), Number::Float(4.0));
    assert_eq!(s.max(), Some(Number::Float(2.5)));
}

#[test]
fn test_counts_in_first_occurrence_order() {
    let counts = series(array![3, 1, 3, 2, 1, 3]).counts();
    assert_eq!(counts.to_array(), array![3 => 3, 1 => 2, 2 => 1]);
    assert_eq!(counts.sum(), Number::Int(6));
}

#[test]
fn test_factory_dispatch() {
    let any = Factory::create(array![1, "2", 3.0]).unwrap();
    assert_eq!(any.kind(), Kind::Numeric);
    assert_eq!(any.as_numeric().unwrap().sum(), Number::Float(6.0));
}
