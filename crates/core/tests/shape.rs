//! # Shape Tests
//!
//! Tests for input classification:
//! - Individual predicates
//! - Classification order when several predicates hold
//! - Edge cases (empty input, scalars, ragged tables)

use shaped_core::shape::{
    classify, is_all_numeric, is_all_objects, is_character_set, is_multi_dimensional,
    is_tabular, is_traversable, Kind,
};
use shaped_core::{array, Object, Value};

fn table() -> Value {
    array![
        array!["id" => 1, "name" => "Luke", "score" => 20],
        array!["id" => 2, "name" => "Leia", "score" => 15],
        array!["id" => 3, "name" => "Han", "score" => 5],
    ]
}

// ============================================================================
// Predicate Tests
// ============================================================================

#[test]
fn test_traversable_only_for_arrays() {
    assert!(is_traversable(&array![]));
    assert!(is_traversable(&array![1]));
    assert!(!is_traversable(&Value::from("abc")));
    assert!(!is_traversable(&Value::from(Object::new("Thing"))));
}

#[test]
fn test_numeric_accepts_numeric_strings() {
    assert!(is_all_numeric(&array![1, 10, "20", "3.5", "1e3"]));
    assert!(!is_all_numeric(&array![1, true]));
    assert!(!is_all_numeric(&array![1, Value::Null]));
}

#[test]
fn test_tabular_accepts_homogeneous_rows() {
    assert!(is_tabular(&table()));
}

#[test]
fn test_tabular_rejects_ragged_rows() {
    let ragged = array![
        array!["id" => 1, "name" => "Luke"],
        array!["id" => 2],
    ];
    assert!(!is_tabular(&ragged));
    assert!(is_multi_dimensional(&ragged));
}

#[test]
fn test_objects_must_all_be_objects() {
    let mixed = Value::from(vec![
        Value::from(Object::new("User")),
        Value::from("not an object"),
    ]);
    assert!(!is_all_objects(&mixed));
}

#[test]
fn test_scalars_are_character_sets() {
    assert!(is_character_set(&Value::from("")));
    assert!(is_character_set(&Value::from(3.25)));
    assert!(!is_character_set(&Value::Null));
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_classify_each_kind() {
    let users = Value::from(vec![Object::new("User"), Object::new("User")]);
    assert_eq!(classify(&users), Kind::Objects);
    assert_eq!(classify(&table()), Kind::Tabular);
    assert_eq!(classify(&array![1, array![2]]), Kind::MultiDimensional);
    assert_eq!(classify(&array![1, 2.5, "3"]), Kind::Numeric);
    assert_eq!(classify(&Value::from("hello")), Kind::Characters);
    assert_eq!(classify(&array!["a", "b"]), Kind::Generic);
}

#[test]
fn test_table_of_numbers_is_tabular_not_numeric() {
    let grid = array![array![1, 2], array![3, 4]];
    assert_eq!(classify(&grid), Kind::Tabular);
}

#[test]
fn test_empty_input_is_generic() {
    assert_eq!(classify(&array![]), Kind::Generic);
    assert_eq!(classify(&Value::Null), Kind::Generic);
}

#[test]
fn test_non_traversable_non_scalar_is_generic() {
    // The factory rejects these; the classifier only reports the kind.
    assert_eq!(classify(&Value::from(true)), Kind::Generic);
    assert_eq!(classify(&Value::from(Object::new("X"))), Kind::Generic);
}
