//! # absent-codec
//!
//! Binary value codec that strips absent fields before serializing.
//!
//! Binary formats such as MessagePack can say `nil` but have no way to say
//! "this field does not exist". Outgoing values are therefore passed through
//! [`strip`], which removes every mapping entry holding [`Value::Absent`], before
//! they reach the serializer.
//!
//! ## Features
//! - **Copy-on-write stripping**: unchanged subtrees keep their identity
//! - **Cycle safety**: cyclic graphs never recurse forever
//! - **Bounded depth**: nesting past 100 fails with a dedicated error
//! - **Input checking**: text handed to the binary decoder is rejected with a
//!   diagnostic naming the likely encoder mismatch
//! - **Framing**: a tokio-util codec for length-prefixed streams
//!
//! ## Quick Start
//! ```rust
//! use absent_codec::{decode, encode, Mapping, Value};
//!
//! let user = Mapping::new();
//! user.insert("name", "ada");
//! user.insert("nickname", Value::Absent);
//!
//! let bytes = encode(&user.into())?;
//! let decoded = decode(&bytes[..])?;
//!
//! let decoded = decoded.as_mapping().unwrap();
//! assert_eq!(decoded.keys(), vec!["name".to_string()]);
//! # Ok::<(), absent_codec::CodecError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::CodecConfig;
pub use crate::core::codec::{decode, encode, ByteView, Codec, WireInput};
pub use crate::core::frame::FrameCodec;
pub use crate::core::serialization::{BinaryFormat, SerializationFormat};
pub use crate::core::strip::{strip, MAX_DEPTH};
pub use crate::core::value::{Mapping, Sequence, Value};
pub use crate::error::{CodecError, Result};
