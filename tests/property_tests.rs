//! Property-based tests using proptest
//!
//! Stripping invariants and codec round-trips over randomly generated trees.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use absent_codec::{decode, encode, strip, Mapping, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
        "[a-z0-9 ]{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(|b| Value::Bytes(b.into())),
    ]
}

fn tree(leaf: BoxedStrategy<Value>) -> impl Strategy<Value = Value> {
    leaf.prop_recursive(6, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::vec(("[a-e]{1,3}", inner), 0..6)
                .prop_map(|entries| Mapping::from_entries(entries).into()),
        ]
    })
}

/// Trees that may contain absent markers anywhere
fn any_tree() -> impl Strategy<Value = Value> {
    tree(prop_oneof![4 => scalar(), 1 => Just(Value::Absent)].boxed())
}

/// Trees without absent markers
fn clean_tree() -> impl Strategy<Value = Value> {
    tree(scalar().boxed())
}

fn contains_absent_key(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => map
            .entries()
            .iter()
            .any(|(_, v)| v.is_absent() || contains_absent_key(v)),
        Value::Sequence(seq) => seq.to_vec().iter().any(contains_absent_key),
        _ => false,
    }
}

// Property: stripping twice equals stripping once
proptest! {
    #[test]
    fn prop_strip_idempotent(value in any_tree()) {
        let once = strip(&value).expect("strip");
        let twice = strip(&once).expect("strip again");
        prop_assert_eq!(&once, &twice);
        prop_assert!(twice.same_node(&once));
    }
}

// Property: no mapping in the output holds an absent value
proptest! {
    #[test]
    fn prop_strip_removes_all_absent_keys(value in any_tree()) {
        let stripped = strip(&value).expect("strip");
        prop_assert!(!contains_absent_key(&stripped));
    }
}

// Property: trees without absent markers come back as the very same node
proptest! {
    #[test]
    fn prop_clean_tree_keeps_identity(value in clean_tree()) {
        let stripped = strip(&value).expect("strip");
        prop_assert!(stripped.same_node(&value));
    }
}

// Property: sequences keep their length
proptest! {
    #[test]
    fn prop_sequence_length_preserved(items in prop::collection::vec(any_tree(), 0..8)) {
        let value = Value::from(items.clone());
        let stripped = strip(&value).expect("strip");
        prop_assert_eq!(stripped.as_sequence().unwrap().len(), items.len());
    }
}

// Property: decode(encode(v)) == v for values without absent markers
proptest! {
    #[test]
    fn prop_codec_roundtrip(value in clean_tree()) {
        let bytes = encode(&value).expect("encode");
        let decoded = decode(&bytes[..]).expect("decode");
        prop_assert_eq!(decoded, value);
    }
}

// Property: encoding equals encoding the stripped value
proptest! {
    #[test]
    fn prop_encode_matches_strip_then_encode(value in any_tree()) {
        let direct = encode(&value).expect("encode");
        let stripped = strip(&value).expect("strip");
        prop_assert_eq!(direct, encode(&stripped).expect("encode stripped"));
    }
}

// Property: arbitrary bytes never panic the decoder
proptest! {
    #[test]
    fn prop_decode_arbitrary_bytes_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&data[..]);
        prop_assert!(true);
    }
}
