//! # Serialization Formats
//!
//! The binary formats a [`Codec`](crate::core::codec::Codec) delegates to, and the
//! serde implementations that map [`Value`] onto them.
//!
//! ## Formats
//! - **MessagePack** (default): compact binary, round-trips every non-absent value
//! - **JSON**: text bytes for debugging and interop. Binary blobs become arrays of
//!   numbers and non-finite floats become `null`, so it is not lossless
//!
//! ## Wire mapping
//! - `Null` and `Absent` both serialize as unit (`nil` / `null`)
//! - `Bytes` serializes as a binary string
//! - `Mapping` serializes as a map with text keys; decoding rejects other keys
//!
//! Both directions refuse to nest deeper than [`MAX_DEPTH`]. A cyclic value
//! that reaches a serializer, or a deeply nested payload handed to a
//! deserializer, fails with a format error instead of exhausting the stack.

use crate::core::strip::MAX_DEPTH;
use crate::core::value::{Mapping, Value};
use crate::error::{constants, Result};
use bytes::Bytes;
use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Preallocation cap for sequences whose length is announced by the input.
const MAX_PREALLOCATED_ITEMS: usize = 4096;

/// External serializer/deserializer capability consumed by the codec.
pub trait BinaryFormat {
    /// Serialize a value. Absent values serialize like `Null`.
    fn serialize_value(&self, value: &Value) -> Result<Vec<u8>>;

    /// Deserialize a value. Format errors are returned untranslated.
    fn deserialize_value(&self, data: &[u8]) -> Result<Value>;

    /// Human-readable format name
    fn name(&self) -> &'static str;
}

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum SerializationFormat {
    /// Compact binary MessagePack (default)
    #[default]
    #[serde(rename = "msgpack")]
    MessagePack,
    /// JSON text bytes (debugging, interop)
    #[serde(rename = "json")]
    Json,
}

impl SerializationFormat {
    /// Parse a configuration name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "msgpack" | "messagepack" => Some(SerializationFormat::MessagePack),
            "json" => Some(SerializationFormat::Json),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::MessagePack => "MessagePack",
            SerializationFormat::Json => "JSON",
        }
    }
}

impl BinaryFormat for SerializationFormat {
    fn serialize_value(&self, value: &Value) -> Result<Vec<u8>> {
        match self {
            SerializationFormat::MessagePack => Ok(rmp_serde::to_vec(value)?),
            SerializationFormat::Json => Ok(serde_json::to_vec(value)?),
        }
    }

    fn deserialize_value(&self, data: &[u8]) -> Result<Value> {
        match self {
            SerializationFormat::MessagePack => Ok(rmp_serde::from_slice(data)?),
            SerializationFormat::Json => Ok(serde_json::from_slice(data)?),
        }
    }

    fn name(&self) -> &'static str {
        SerializationFormat::name(*self)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        DepthGuarded {
            value: self,
            depth: 1,
        }
        .serialize(serializer)
    }
}

struct DepthGuarded<'a> {
    value: &'a Value,
    depth: usize,
}

impl DepthGuarded<'_> {
    fn child<'b>(&self, value: &'b Value) -> DepthGuarded<'b> {
        DepthGuarded {
            value,
            depth: self.depth + 1,
        }
    }
}

impl Serialize for DepthGuarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.value.is_composite() && self.depth > MAX_DEPTH {
            return Err(S::Error::custom(constants::ERR_DEPTH_EXCEEDED));
        }

        match self.value {
            Value::Null | Value::Absent => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::UInt(n) => serializer.serialize_u64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Sequence(seq) => {
                // Snapshot so no lock is held while a cycle re-enters this node.
                let items = seq.to_vec();
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    out.serialize_element(&self.child(item))?;
                }
                out.end()
            }
            Value::Mapping(map) => {
                let entries = map.entries();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    out.serialize_entry(key, &self.child(value))?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Value, D::Error> {
        ValueSeed { depth: 1 }.deserialize(deserializer)
    }
}

/// Deserializes a value at a known nesting depth.
///
/// Composites past [`MAX_DEPTH`] are refused before any of their children are
/// read, so decoding stays within the depth `encode` accepts.
#[derive(Clone, Copy)]
struct ValueSeed {
    depth: usize,
}

impl ValueSeed {
    fn child(self) -> ValueSeed {
        ValueSeed {
            depth: self.depth + 1,
        }
    }

    fn enter<E: de::Error>(self) -> std::result::Result<(), E> {
        if self.depth > MAX_DEPTH {
            Err(E::custom(constants::ERR_DEPTH_EXCEEDED))
        } else {
            Ok(())
        }
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a self-describing value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Bytes(Bytes::copy_from_slice(v)))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Bytes(Bytes::from(v)))
    }

    fn visit_unit<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        self.deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        self.enter::<A::Error>()?;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_ITEMS);
        let mut values = Vec::with_capacity(capacity);
        while let Some(value) = seq.next_element_seed(self.child())? {
            values.push(value);
        }
        Ok(Value::from(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Value, A::Error> {
        self.enter::<A::Error>()?;
        let map = Mapping::new();
        while let Some(key) = access.next_key::<MapKey>()? {
            let value = access.next_value_seed(self.child())?;
            map.insert(key.0, value);
        }
        Ok(Value::Mapping(map))
    }
}

/// Text-only mapping key.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(constants::ERR_NON_TEXT_KEY)
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<MapKey, E> {
                Ok(MapKey(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<MapKey, E> {
                Ok(MapKey(v))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}
