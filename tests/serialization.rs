//! Integration tests for the serialization formats
//!
//! Covers the MessagePack wire mapping, the lossy JSON mapping, and format
//! identification.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use absent_codec::{BinaryFormat, CodecError, Mapping, SerializationFormat, Value};
use bytes::Bytes;

#[test]
fn test_format_names() {
    for format in [SerializationFormat::MessagePack, SerializationFormat::Json] {
        assert_eq!(SerializationFormat::from_name(format.name()), Some(format));
    }
    assert_eq!(
        SerializationFormat::from_name("MessagePack"),
        Some(SerializationFormat::MessagePack)
    );
    assert_eq!(SerializationFormat::from_name("bincode"), None);
    assert_eq!(SerializationFormat::default(), SerializationFormat::MessagePack);
}

#[test]
fn test_msgpack_scalars() {
    let format = SerializationFormat::MessagePack;
    assert_eq!(format.serialize_value(&Value::Null).unwrap(), vec![0xC0]);
    assert_eq!(format.serialize_value(&Value::Bool(true)).unwrap(), vec![0xC3]);
    assert_eq!(format.serialize_value(&Value::from(7)).unwrap(), vec![0x07]);
    assert_eq!(format.serialize_value(&Value::from("hi")).unwrap(), vec![0xA2, b'h', b'i']);
}

#[test]
fn test_msgpack_preserves_value_kinds() {
    let format = SerializationFormat::MessagePack;
    let value = Value::from(vec![
        Value::from(-3),
        Value::UInt(u64::MAX),
        Value::Float(1.5),
        Value::Bytes(Bytes::from_static(b"\x00\x01")),
        Value::from(Mapping::from_entries([("k", Value::Null)])),
    ]);

    let bytes = format.serialize_value(&value).expect("serialize");
    let decoded = format.deserialize_value(&bytes).expect("deserialize");

    assert_eq!(decoded, value);
    let items = decoded.as_sequence().unwrap();
    assert!(matches!(items.get(1), Some(Value::UInt(u64::MAX))));
    assert!(matches!(items.get(3), Some(Value::Bytes(_))));
}

#[test]
fn test_small_unsigned_decodes_as_int() {
    let format = SerializationFormat::MessagePack;
    let bytes = format.serialize_value(&Value::UInt(5)).expect("serialize");
    assert!(matches!(format.deserialize_value(&bytes).unwrap(), Value::Int(5)));
}

#[test]
fn test_mapping_order_is_preserved() {
    let format = SerializationFormat::MessagePack;
    let value = Value::from(Mapping::from_entries([
        ("z", Value::from(1)),
        ("a", Value::from(2)),
        ("m", Value::from(3)),
    ]));

    let decoded = format
        .deserialize_value(&format.serialize_value(&value).unwrap())
        .unwrap();
    assert_eq!(
        decoded.as_mapping().unwrap().keys(),
        vec!["z".to_string(), "a".to_string(), "m".to_string()]
    );
}

#[test]
fn test_json_is_lossy_for_bytes() {
    let format = SerializationFormat::Json;
    let value = Value::Bytes(Bytes::from_static(&[1, 2]));

    let bytes = format.serialize_value(&value).expect("serialize");
    assert_eq!(bytes, b"[1,2]");

    let decoded = format.deserialize_value(&bytes).expect("deserialize");
    assert_eq!(decoded, Value::from(vec![Value::from(1), Value::from(2)]));
}

#[test]
fn test_json_errors_are_passed_through() {
    assert!(matches!(
        SerializationFormat::Json.deserialize_value(b"{not json"),
        Err(CodecError::Json(_))
    ));
}

#[test]
fn test_msgpack_non_text_key_rejected() {
    // fixmap of one entry with integer key 1 and value 2
    assert!(matches!(
        SerializationFormat::MessagePack.deserialize_value(&[0x81, 0x01, 0x02]),
        Err(CodecError::Decode(_))
    ));
}

#[test]
fn test_json_nesting_past_limit_rejected() {
    let mut text = "[".repeat(101);
    text.push_str(&"]".repeat(101));
    assert!(matches!(
        SerializationFormat::Json.deserialize_value(text.as_bytes()),
        Err(CodecError::Json(_))
    ));

    let mut text = "[".repeat(100);
    text.push_str(&"]".repeat(100));
    assert!(SerializationFormat::Json.deserialize_value(text.as_bytes()).is_ok());
}
