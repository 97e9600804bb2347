//! # Error Types
//!
//! Error handling for the absent-stripping codec.
//!
//! Every fallible operation in the crate returns [`Result`], aliased over
//! [`CodecError`].
//!
//! ## Error Categories
//! - **Stripping**: recursion deeper than [`MAX_DEPTH`](crate::core::strip::MAX_DEPTH)
//! - **Input shape**: textual input handed to the binary decoder, out-of-range views
//! - **Format**: MessagePack and JSON errors, passed through untouched
//! - **Framing**: oversized frames and I/O errors from the stream codec
//! - **Configuration**: invalid or unreadable configuration
//!
//! The crate never logs an error itself; surfacing it is the caller's job.
//!
//! ## Example Usage
//! ```rust
//! use absent_codec::error::CodecError;
//! use absent_codec::Codec;
//!
//! let codec = Codec::new();
//! match codec.decode("not binary") {
//!     Err(CodecError::UnexpectedTextualInput) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants shared by the error variants and their callers.
pub mod constants {
    pub const ERR_TEXTUAL_INPUT: &str = "Received textual data where binary data was expected: \
        both ends of this link are very likely configured with mismatched encoders \
        (one side expects binary framing, the other sends text)";
    pub const ERR_DEPTH_EXCEEDED: &str = "Maximum nesting depth exceeded";
    pub const ERR_NON_TEXT_KEY: &str = "Mapping keys must be text";
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Maximum nesting depth exceeded (limit: {limit})")]
    DepthExceeded { limit: usize },

    #[error("{}", constants::ERR_TEXTUAL_INPUT)]
    UnexpectedTextualInput,

    #[error(transparent)]
    Encode(#[from] rmp_serde::encode::Error),

    #[error(transparent)]
    Decode(#[from] rmp_serde::decode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Byte view out of bounds: offset {offset} + length {len} exceeds buffer of {capacity} bytes")]
    ViewOutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("Frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
