//! # Configuration Management
//!
//! Configuration for codecs and the logging they run under.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variable overrides via `from_env()`
//!
//! The stripping depth limit is not configurable; see
//! [`MAX_DEPTH`](crate::core::strip::MAX_DEPTH).

use crate::core::serialization::SerializationFormat;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Max allowed frame payload size (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Smallest frame limit accepted by validation
pub const MIN_FRAME_SIZE: usize = 64;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Wire format
    #[serde(default)]
    pub format: SerializationFormat,

    /// Maximum frame payload size in bytes
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_max_frame_size() -> usize {
    MAX_FRAME_SIZE
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            format: SerializationFormat::default(),
            max_frame_size: MAX_FRAME_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Read a TOML file. The result is not validated; see [`Self::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CodecError::ConfigError(format!("Cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse TOML text. Missing fields take their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CodecError::ConfigError(format!("Invalid codec config: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("ABSENT_CODEC_FORMAT") {
            config.format = SerializationFormat::from_name(&name).ok_or_else(|| {
                CodecError::ConfigError(format!("Unknown serialization format: '{name}'"))
            })?;
        }

        if let Ok(size) = std::env::var("ABSENT_CODEC_MAX_FRAME_SIZE") {
            config.max_frame_size = size.parse::<usize>().map_err(|e| {
                CodecError::ConfigError(format!("Invalid ABSENT_CODEC_MAX_FRAME_SIZE '{size}': {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("ABSENT_CODEC_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                CodecError::ConfigError(format!("Invalid ABSENT_CODEC_LOG_LEVEL '{level}'"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// The default configuration rendered as TOML
    pub fn example_config() -> String {
        Self::default()
            .to_toml()
            .unwrap_or_else(|_| String::from("# default codec configuration unavailable"))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Cannot render codec config: {e}")))
    }

    /// Write as TOML to `path`
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?).map_err(|e| {
            CodecError::ConfigError(format!("Cannot write config {}: {e}", path.display()))
        })
    }

    /// Validate the configuration
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_frame_size < MIN_FRAME_SIZE {
            errors.push(format!(
                "Max frame size too small: {} bytes (minimum: {MIN_FRAME_SIZE})",
                self.max_frame_size
            ));
        } else if self.max_frame_size > u32::MAX as usize {
            errors.push(format!(
                "Max frame size too large: {} bytes (must fit the 4-byte length prefix)",
                self.max_frame_size
            ));
        }

        errors.extend(self.logging.validate());

        errors
    }

    /// Fail with every problem [`Self::validate`] reports, joined into one error
    pub fn validate_strict(&self) -> Result<()> {
        match self.validate().as_slice() {
            [] => Ok(()),
            problems => Err(CodecError::ConfigError(format!(
                "Invalid codec config: {}",
                problems.join("; ")
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level, used when `RUST_LOG` is not set
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("absent-codec"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// `tracing::Level` as a lowercase string
mod log_level_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| de::Error::custom(format!("unknown log level '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_example_config_parses_back() {
        let text = CodecConfig::example_config();
        let parsed = CodecConfig::from_toml(&text).expect("example config parses");
        assert_eq!(parsed.format, SerializationFormat::MessagePack);
        assert_eq!(parsed.max_frame_size, MAX_FRAME_SIZE);
        assert_eq!(parsed.logging.log_level, Level::INFO);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_partial_toml_uses_defaults() {
        let parsed = CodecConfig::from_toml("format = \"json\"\n").expect("parse");
        assert_eq!(parsed.format, SerializationFormat::Json);
        assert_eq!(parsed.max_frame_size, MAX_FRAME_SIZE);
        assert_eq!(parsed.logging.app_name, "absent-codec");
    }
}
