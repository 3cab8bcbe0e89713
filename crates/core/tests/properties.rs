//! Property-based tests for collection laws.
//!
//! These tests use proptest to generate random collections and verify the
//! algebraic identities every collection must satisfy.
//!
//! Run with: cargo test -p shaped-core -- properties

use proptest::prelude::*;
use shaped_core::{Collection, Key, Value};

// =============================================================================
// Strategies
// =============================================================================

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        (-50i64..50).prop_map(Key::Int),
        "[a-z]{1,4}".prop_map(Key::from),
    ]
}

/// Scalars without floats, so strict equality is reflexive.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9]{0,6}".prop_map(Value::from),
    ]
}

fn arb_collection() -> impl Strategy<Value = Collection> {
    prop::collection::vec((arb_key(), arb_value()), 0..24)
        .prop_map(|entries| entries.into_iter().collect())
}

fn collect_values(c: &Collection) -> Vec<Value> {
    c.iter().map(|(_, v)| v.clone()).collect()
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    #[test]
    fn set_then_get(c in arb_collection(), k in arb_key(), v in arb_value()) {
        let updated = c.set(k.clone(), v.clone());
        prop_assert!(updated.has(k.clone()));
        prop_assert_eq!(updated.get(k), Some(&v));
    }

    #[test]
    fn keys_values_and_count_agree(c in arb_collection()) {
        prop_assert_eq!(c.keys().count(), c.count());
        prop_assert_eq!(c.values().count(), c.count());
    }

    #[test]
    fn reverse_is_an_involution(c in arb_collection()) {
        prop_assert_eq!(c.reverse().reverse(), c);
    }

    #[test]
    fn identity_map_and_filters(c in arb_collection()) {
        prop_assert_eq!(c.map(|v, _, _| v.clone()), c.clone());
        prop_assert_eq!(c.filter(|_, _, _| true), c.clone());
        prop_assert!(c.filter(|_, _, _| false).is_empty());
    }

    #[test]
    fn fold_left_mirrors_fold_right(c in arb_collection()) {
        let push = |v: &Value, mut acc: Vec<Value>, _: &Key, _: usize| {
            acc.push(v.clone());
            acc
        };
        prop_assert_eq!(c.fold_left(Vec::new(), push), c.reverse().fold_right(Vec::new(), push));
    }

    #[test]
    fn splice_partitions_the_collection(
        c in arb_collection(),
        offset in -30isize..30,
        length in prop::option::of(-30isize..30)
    ) {
        let (extracted, remainder) = c.splice(offset, length);
        prop_assert_eq!(&extracted, &c.slice(offset, length));
        prop_assert_eq!(extracted.count() + remainder.count(), c.count());
    }

    #[test]
    fn split_yields_requested_groups(c in arb_collection(), groups in 1usize..8) {
        let parts = c.split(groups).unwrap();
        prop_assert_eq!(parts.count(), groups);
        let sizes: Vec<usize> = parts
            .iter()
            .filter_map(|(_, part)| part.as_collection().map(Collection::count))
            .collect();
        prop_assert_eq!(sizes.iter().sum::<usize>(), c.count());
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1] && w[0] - w[1] <= 1));
    }

    #[test]
    fn chunks_concatenate_back(c in arb_collection(), size in 1usize..6) {
        let chunks = c.chunk(size).unwrap();
        let mut flattened = Vec::new();
        for (_, chunk) in &chunks {
            let chunk = chunk.as_collection().unwrap();
            prop_assert!(chunk.count() <= size);
            flattened.extend(collect_values(chunk));
        }
        prop_assert_eq!(flattened, collect_values(&c));
    }

    #[test]
    fn negative_offsets_count_from_end(c in arb_collection()) {
        let n = c.count() as isize;
        for i in 0..n {
            prop_assert_eq!(c.get_offset(i - n).unwrap(), c.get_offset(i).unwrap());
        }
        prop_assert!(!c.has_offset(n));
    }
}
