//! # Codec Adapter
//!
//! Composes [`strip`] with a [`BinaryFormat`].
//!
//! - **Encode**: strip absent fields, then serialize. The format output is returned as-is.
//! - **Decode**: classify the input, reject text, normalize binary buffers into one
//!   contiguous slice, then deserialize. Nothing is stripped on this path, since
//!   encoded data never contains absent markers.
//!
//! ## Input shapes
//! [`WireInput`] accepts borrowed slices, owned vectors, [`Bytes`], [`BytesMut`] and
//! bounded [`ByteView`]s. Textual input (`&str`, `String`) is always rejected with
//! [`CodecError::UnexpectedTextualInput`], whatever its content: receiving text
//! means the peer is configured with a different encoder.
//!
//! ```rust
//! use absent_codec::{Codec, Mapping, Value};
//!
//! let codec = Codec::new();
//! let value = Mapping::from_entries([("keep", Value::from("value")), ("drop", Value::Absent)]);
//!
//! let bytes = codec.encode(&value.into())?;
//! let decoded = codec.decode(&bytes[..])?;
//!
//! assert!(!decoded.as_mapping().unwrap().contains_key("drop"));
//! # Ok::<(), absent_codec::CodecError>(())
//! ```

use crate::core::serialization::{BinaryFormat, SerializationFormat};
use crate::core::strip::strip;
use crate::core::value::Value;
use crate::error::{CodecError, Result};
use bytes::{Bytes, BytesMut};
use std::borrow::Cow;
use std::ops::Deref;
use tracing::trace;

/// A bounded window `offset..offset + len` into a larger shared buffer.
#[derive(Debug, Clone)]
pub struct ByteView {
    buffer: Bytes,
    offset: usize,
    len: usize,
}

impl ByteView {
    /// Create a view, checking it lies inside `buffer`.
    ///
    /// # Errors
    /// Returns [`CodecError::ViewOutOfBounds`] if the window extends past the buffer.
    pub fn new(buffer: impl Into<Bytes>, offset: usize, len: usize) -> Result<Self> {
        let buffer = buffer.into();
        let capacity = buffer.len();
        match offset.checked_add(len) {
            Some(end) if end <= capacity => Ok(Self {
                buffer,
                offset,
                len,
            }),
            _ => Err(CodecError::ViewOutOfBounds {
                offset,
                len,
                capacity,
            }),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The viewed bytes, excluding the rest of the backing buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.len]
    }

    /// The viewed bytes as a zero-copy `Bytes` slice
    pub fn into_bytes(self) -> Bytes {
        self.buffer.slice(self.offset..self.offset + self.len)
    }
}

/// Input handed to [`Codec::decode`], classified by shape.
#[derive(Debug)]
pub enum WireInput<'a> {
    /// Text. Always rejected by the binary decoder.
    Text(Cow<'a, str>),
    Slice(&'a [u8]),
    Owned(Vec<u8>),
    Shared(Bytes),
    Growable(BytesMut),
    View(ByteView),
}

impl<'a> WireInput<'a> {
    pub fn is_textual(&self) -> bool {
        matches!(self, WireInput::Text(_))
    }

    /// Normalize into the contiguous slice the deserializer expects.
    pub(crate) fn into_payload(self) -> Result<Payload<'a>> {
        match self {
            WireInput::Text(_) => Err(CodecError::UnexpectedTextualInput),
            WireInput::Slice(data) => Ok(Payload::Borrowed(data)),
            WireInput::Owned(data) => Ok(Payload::Shared(Bytes::from(data))),
            WireInput::Shared(data) => Ok(Payload::Shared(data)),
            WireInput::Growable(data) => Ok(Payload::Shared(data.freeze())),
            WireInput::View(view) => Ok(Payload::Shared(view.into_bytes())),
        }
    }
}

/// Binary payload ready for deserialization.
pub(crate) enum Payload<'a> {
    Borrowed(&'a [u8]),
    Shared(Bytes),
}

impl Deref for Payload<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Payload::Borrowed(data) => *data,
            Payload::Shared(data) => &data[..],
        }
    }
}

impl<'a> From<&'a str> for WireInput<'a> {
    fn from(text: &'a str) -> Self {
        WireInput::Text(Cow::Borrowed(text))
    }
}

impl From<String> for WireInput<'_> {
    fn from(text: String) -> Self {
        WireInput::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for WireInput<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        WireInput::Text(text)
    }
}

impl<'a> From<&'a [u8]> for WireInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        WireInput::Slice(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for WireInput<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        WireInput::Slice(data)
    }
}

impl<'a> From<&'a Vec<u8>> for WireInput<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        WireInput::Slice(data)
    }
}

impl From<Vec<u8>> for WireInput<'_> {
    fn from(data: Vec<u8>) -> Self {
        WireInput::Owned(data)
    }
}

impl From<Bytes> for WireInput<'_> {
    fn from(data: Bytes) -> Self {
        WireInput::Shared(data)
    }
}

impl From<BytesMut> for WireInput<'_> {
    fn from(data: BytesMut) -> Self {
        WireInput::Growable(data)
    }
}

impl From<ByteView> for WireInput<'_> {
    fn from(view: ByteView) -> Self {
        WireInput::View(view)
    }
}

/// Strip-then-serialize encoder and type-checking decoder over a [`BinaryFormat`].
#[derive(Debug, Clone, Default)]
pub struct Codec<F = SerializationFormat> {
    format: F,
}

impl Codec {
    /// Codec over the default MessagePack format
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: BinaryFormat> Codec<F> {
    pub fn with_format(format: F) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    /// Strip absent fields from `value` and serialize the result.
    ///
    /// # Errors
    /// [`CodecError::DepthExceeded`] from stripping, or the format's own error.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let pruned = strip(value)?;
        let bytes = self.format.serialize_value(&pruned)?;
        trace!(format = self.format.name(), bytes = bytes.len(), "encoded value");
        Ok(bytes)
    }

    /// Deserialize binary input.
    ///
    /// # Errors
    /// [`CodecError::UnexpectedTextualInput`] for textual input, otherwise the
    /// format's own error for malformed data.
    pub fn decode<'a>(&self, input: impl Into<WireInput<'a>>) -> Result<Value> {
        let payload = input.into().into_payload()?;
        let value = self.format.deserialize_value(&payload)?;
        trace!(format = self.format.name(), bytes = payload.len(), "decoded value");
        Ok(value)
    }
}

/// Encode with the default MessagePack codec.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    Codec::new().encode(value)
}

/// Decode with the default MessagePack codec.
pub fn decode<'a>(input: impl Into<WireInput<'a>>) -> Result<Value> {
    Codec::new().decode(input)
}
