//! # Frame Codec
//!
//! Tokio codec that carries encoded values over a byte stream.
//!
//! ## Frame Format
//! ```text
//! [Length(4, big-endian)] [Payload(N)]
//! ```
//!
//! The payload is whatever the wrapped [`Codec`] produces, so encoding a frame
//! strips absent fields first. Frames longer than the configured maximum are
//! rejected in both directions before any allocation for the payload.

use crate::config::{CodecConfig, MAX_FRAME_SIZE};
use crate::core::codec::Codec;
use crate::core::serialization::{BinaryFormat, SerializationFormat};
use crate::core::value::Value;
use crate::error::{CodecError, Result};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Length prefix size in bytes
pub const HEADER_LEN: usize = 4;

/// Largest payload length the header can carry
const MAX_PREFIXED_LEN: usize = u32::MAX as usize;

/// Length-prefixed framing around a [`Codec`].
#[derive(Debug, Clone)]
pub struct FrameCodec<F = SerializationFormat> {
    codec: Codec<F>,
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::with_codec(Codec::new())
    }

    /// Build from configuration: format and frame size limit
    ///
    /// # Errors
    /// Returns [`CodecError::ConfigError`] if the configuration does not validate.
    pub fn from_config(config: &CodecConfig) -> Result<Self> {
        config.validate_strict()?;
        Ok(Self::with_codec(Codec::with_format(config.format))
            .with_max_frame_size(config.max_frame_size))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: BinaryFormat> FrameCodec<F> {
    pub fn with_codec(codec: Codec<F>) -> Self {
        Self {
            codec,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Set the frame payload limit, capped at what the length prefix can express
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size.min(MAX_PREFIXED_LEN);
        self
    }

    pub fn codec(&self) -> &Codec<F> {
        &self.codec
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl<F: BinaryFormat> Decoder for FrameCodec<F> {
    type Item = Value;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if len > self.max_frame_size {
            return Err(CodecError::OversizedFrame(len));
        }

        let total = HEADER_LEN + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        let frame = src.split_to(len);
        debug!(bytes = len, "decoding frame");
        self.codec.decode(frame).map(Some)
    }
}

impl<F: BinaryFormat> Encoder<Value> for FrameCodec<F> {
    type Error = CodecError;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<()> {
        let payload = self.codec.encode(&item)?;
        if payload.len() > self.max_frame_size {
            return Err(CodecError::OversizedFrame(payload.len()));
        }

        let len = u32::try_from(payload.len())
            .map_err(|_| CodecError::OversizedFrame(payload.len()))?;

        dst.reserve(HEADER_LEN + payload.len());
        dst.put_u32(len);
        dst.extend_from_slice(&payload);
        debug!(bytes = payload.len(), "encoded frame");
        Ok(())
    }
}
