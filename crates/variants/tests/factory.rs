//! # Factory Tests
//!
//! Tests for dispatch: classification order, rejection of opaque input,
//! re-specialization and the JSON entry point.

use proptest::prelude::*;
use shaped_variants::{
    array, collect, AnyCollection, Collection, Factory, Kind, MultiDimensional, Object, Tabular,
    Value,
};

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_dispatch_order() {
    let cases = [
        (Value::from(vec![Object::new("A")]), Kind::Objects),
        (array![array![1, 2], array![3, 4]], Kind::Tabular),
        (array![array![1, 2], array![3]], Kind::MultiDimensional),
        (array![1, "2.5"], Kind::Numeric),
        (Value::from("text"), Kind::Characters),
        (array!["a", true], Kind::Generic),
        (array![], Kind::Generic),
    ];
    for (data, expected) in cases {
        let any = Factory::create(data.clone()).unwrap();
        assert_eq!(any.kind(), expected, "{data}");
    }
}

#[test]
fn test_null_yields_empty_generic() {
    let any = collect(Value::Null).unwrap();
    assert_eq!(any.kind(), Kind::Generic);
    assert!(any.is_empty());
}

#[test]
fn test_opaque_input_is_rejected() {
    for data in [Value::from(false), Value::from(Object::new("Thing"))] {
        assert!(collect(data).unwrap_err().is_input_validation());
    }
}

#[test]
fn test_specialize_existing_collection() {
    let generic = Collection::from_values([1, 2, 3]);
    let any = AnyCollection::specialize(generic.clone()).unwrap();
    assert_eq!(any.kind(), Kind::Numeric);
    assert_eq!(AnyCollection::from(generic).kind(), Kind::Generic);
}

#[test]
fn test_build_skips_classification() {
    // A table is also multi-dimensional when asked for explicitly.
    let data = array![array!["a" => 1], array!["a" => 2]];
    let multi: MultiDimensional = Factory::build(data).unwrap();
    assert_eq!(multi.count(), 2);
    assert!(Factory::build::<Tabular>(array![1]).is_err());
}

#[test]
fn test_from_json() {
    let any = Factory::from_json(r#"{"b": 2, "a": 1}"#).unwrap();
    assert_eq!(any.kind(), Kind::Numeric);
    assert_eq!(any.keys().to_array(), array!["b", "a"]);

    let err = Factory::from_json("[1, 2").unwrap_err();
    assert!(err.is_input_validation());
}

#[test]
fn test_try_from_value() {
    let any = AnyCollection::try_from(array!["x" => array!["y" => 1]]).unwrap();
    assert_eq!(any.kind(), Kind::Tabular);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000).prop_map(Value::Int),
        "[a-z]{0,5}".prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn arb_data() -> impl Strategy<Value = Value> {
    let row = prop::collection::vec(arb_scalar(), 1..4).prop_map(Value::from);
    prop_oneof![
        prop::collection::vec(arb_scalar(), 0..12).prop_map(Value::from),
        prop::collection::vec(row, 1..5).prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn collect_of_to_array_is_identity(data in arb_data()) {
        let first = collect(data).unwrap();
        let second = collect(first.to_array()).unwrap();
        prop_assert_eq!(second.kind(), first.kind());
        prop_assert_eq!(second, first);
    }

    #[test]
    fn classification_matches_dispatch(data in arb_data()) {
        let kind = shaped_variants::classify(&data);
        prop_assert_eq!(collect(data).unwrap().kind(), kind);
    }
}
