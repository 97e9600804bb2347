//! # Utility Modules
//!
//! Supporting utilities shared by the codec.
//!
//! ## Components
//! - **Logging**: structured `tracing` subscriber configuration

pub mod logging;
