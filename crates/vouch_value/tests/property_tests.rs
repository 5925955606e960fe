//! Property-based tests for the equality engine.
//!
//! Random value trees (scalars of several widths, strings, bytes, lists,
//! string-keyed and composite-keyed maps, sets, references and records)
//! are used to check:
//! 1. Reflexivity of `equal_deep` on NaN-free values
//! 2. Symmetry of `equal_deep`
//! 3. `diff_structured` is empty iff `equal_deep` holds
//! 4. `equal_exported` agrees with `equal_deep` on stripped copies

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use vouch_value::{
    clone_exported, diff_structured, equal_deep, equal_exported, Bytes, ToValue, Value,
};

// -- Value Generation Strategies --

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(|b| b.to_value()),
        any::<i32>().prop_map(|n| n.to_value()),
        any::<i64>().prop_map(|n| n.to_value()),
        any::<u8>().prop_map(|n| n.to_value()),
        (-1.0e6f64..1.0e6).prop_map(|f| f.to_value()),
        "[a-z]{0,6}".prop_map(|s| s.to_value()),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(|b| Bytes(b).to_value()),
        Just(Value::nil_bytes()),
        Just(Value::nil_seq("Vec<Value>")),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            prop::collection::vec(("[a-c]", inner.clone()), 0..3).prop_map(|entries| {
                let mut seen = Vec::new();
                let entries = entries
                    .into_iter()
                    .filter(|(k, _)| {
                        let fresh = !seen.contains(k);
                        seen.push(k.clone());
                        fresh
                    })
                    .map(|(k, v)| (k.to_value(), v))
                    .collect();
                Value::map("Map<String, Value>", entries)
            }),
            prop::collection::vec((inner.clone(), inner.clone()), 0..3).prop_map(|entries| {
                let mut keys: Vec<Value> = Vec::new();
                let entries = entries
                    .into_iter()
                    .filter(|(k, _)| {
                        let fresh = !keys.iter().any(|seen| equal_deep(seen, k));
                        keys.push(k.clone());
                        fresh
                    })
                    .collect();
                Value::map("Map<Value, Value>", entries)
            }),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|items| {
                let mut distinct: Vec<Value> = Vec::new();
                for item in items {
                    if !distinct.iter().any(|seen| equal_deep(seen, &item)) {
                        distinct.push(item);
                    }
                }
                Value::set("Set<Value>", distinct)
            }),
            inner.clone().prop_map(Value::pointer),
            (inner.clone(), inner.clone(), inner).prop_map(|(a, b, c)| {
                Value::record("prop::Node")
                    .field("A", a)
                    .field("B", b)
                    .hidden("c", c)
                    .build()
            }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_equal_deep_is_reflexive(v in value_strategy()) {
        prop_assert!(equal_deep(&v, &v));
        prop_assert!(equal_deep(&v, &v.clone()));
    }

    #[test]
    fn prop_equal_deep_is_symmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(equal_deep(&a, &b), equal_deep(&b, &a));
    }

    #[test]
    fn prop_diff_empty_iff_equal(a in value_strategy(), b in value_strategy()) {
        let diff = diff_structured(&a, &b);
        prop_assert_eq!(diff.is_empty(), equal_deep(&a, &b));
    }

    #[test]
    fn prop_diff_of_value_with_itself_is_empty(v in value_strategy()) {
        prop_assert!(diff_structured(&v, &v).is_empty());
    }

    #[test]
    fn prop_equal_exported_matches_stripped_copies(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(
            equal_exported(&a, &b),
            equal_deep(&clone_exported(&a), &clone_exported(&b))
        );
    }

    #[test]
    fn prop_equal_deep_implies_equal_exported(a in value_strategy(), b in value_strategy()) {
        if equal_deep(&a, &b) {
            prop_assert!(equal_exported(&a, &b));
        }
    }
}

// -- Cyclic references inside sets --

fn cyclic(label: &str) -> Value {
    let cell = Value::pointer_to("&prop::Ring", Value::Nil);
    let node = Value::record("prop::Ring")
        .field("Label", label)
        .field("Next", cell.clone())
        .build();
    cell.as_ref_value().unwrap().store(node);
    cell
}

#[test]
fn cyclic_references_inside_sets() {
    let set = |label: &str| Value::set("Set<Value>", vec![cyclic(label), 1i32.to_value()]);
    let (a, same, other) = (set("a"), set("a"), set("b"));

    assert!(equal_deep(&a, &same));
    assert!(equal_deep(&same, &a));
    assert!(diff_structured(&a, &same).is_empty());

    assert!(!equal_deep(&a, &other));
    assert!(!equal_deep(&other, &a));
    assert!(!diff_structured(&a, &other).is_empty());
}
