//! # Core Codec Components
//!
//! Value model, absent stripping, formats and framing.
//!
//! ## Components
//! - **Value**: dynamically-typed tree with shared, identity-bearing composites
//! - **Strip**: copy-on-write removal of absent mapping entries
//! - **Serialization**: MessagePack and JSON behind [`BinaryFormat`](serialization::BinaryFormat)
//! - **Codec**: strip-then-serialize encoder, type-checking decoder
//! - **Frame**: tokio codec with a length prefix
//!
//! ## Limits
//! - Maximum nesting depth: 100 composites
//! - Maximum frame size: 16MB by default

pub mod codec;
pub mod frame;
pub mod serialization;
pub mod strip;
pub mod value;
