//! # Logging
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`].
//!
//! `RUST_LOG` takes precedence over the configured level when it is set.
//! The codec itself only emits `trace!`/`debug!` events on successful paths;
//! errors are returned, never logged.

use crate::config::LoggingConfig;
use crate::error::{CodecError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// # Errors
/// Returns `CodecError::ConfigError` if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| CodecError::ConfigError(format!("Failed to install subscriber: {e}")))?;

    info!(app = %config.app_name, level = %config.log_level, "logging initialized");
    Ok(())
}
