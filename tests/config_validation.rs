//! Integration tests for configuration validation

#![allow(clippy::expect_used)]

use absent_codec::config::{CodecConfig, LoggingConfig, MAX_FRAME_SIZE};
use absent_codec::SerializationFormat;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = CodecConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_tiny_frame_size_rejected() {
    let mut config = CodecConfig::default();
    config.max_frame_size = 16;

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max frame size too small")));
}

#[test]
fn test_frame_size_must_fit_prefix() {
    let mut config = CodecConfig::default();
    config.max_frame_size = u32::MAX as usize + 1;

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max frame size too large")));
}

#[test]
fn test_empty_app_name_rejected() {
    let mut config = CodecConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_long_app_name_rejected() {
    let logging = LoggingConfig {
        app_name: "a".repeat(65),
        ..LoggingConfig::default()
    };
    assert!(logging
        .validate()
        .iter()
        .any(|e| e.contains("Application name too long")));
}

#[test]
fn test_validate_strict_lists_every_error() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.max_frame_size = 0;
        c.logging.app_name = String::new();
    });

    let err = config.validate_strict().expect_err("invalid config");
    let message = err.to_string();
    assert!(message.contains("Max frame size too small"));
    assert!(message.contains("Application name cannot be empty"));
}

#[test]
fn test_toml_roundtrip() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.format = SerializationFormat::Json;
        c.max_frame_size = 4096;
        c.logging.log_level = Level::DEBUG;
        c.logging.json_format = true;
    });

    let text = toml::to_string_pretty(&config).expect("serialize");
    assert!(text.contains("format = \"json\""));
    assert!(text.contains("log_level = \"debug\""));

    let parsed = CodecConfig::from_toml(&text).expect("parse");
    assert_eq!(parsed.format, SerializationFormat::Json);
    assert_eq!(parsed.max_frame_size, 4096);
    assert_eq!(parsed.logging.log_level, Level::DEBUG);
    assert!(parsed.logging.json_format);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = CodecConfig::from_toml("format = \"yaml\"").expect_err("unknown format");
    assert!(err.to_string().contains("Invalid codec config"));

    let err = CodecConfig::from_toml("[logging]\nlog_level = \"loud\"").expect_err("bad level");
    assert!(err.to_string().contains("Invalid codec config"));
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!("absent-codec-{}.toml", std::process::id()));
    let config = CodecConfig::default_with_overrides(|c| c.max_frame_size = 2048);

    config.save_to_file(&path).expect("save");
    let loaded = CodecConfig::from_file(&path).expect("load");
    std::fs::remove_file(&path).expect("cleanup");

    assert_eq!(loaded.max_frame_size, 2048);
    assert_eq!(loaded.format, SerializationFormat::MessagePack);
}

#[test]
fn test_missing_file_is_config_error() {
    let err = CodecConfig::from_file("/nonexistent/absent-codec.toml").expect_err("missing");
    assert!(err.to_string().contains("Cannot read config"));
}

#[test]
fn test_defaults() {
    let config = CodecConfig::default();
    assert_eq!(config.format, SerializationFormat::MessagePack);
    assert_eq!(config.max_frame_size, MAX_FRAME_SIZE);
    assert_eq!(config.logging.log_level, Level::INFO);
    assert!(!config.logging.json_format);
}

#[test]
fn test_partial_logging_table_uses_defaults() {
    let parsed = CodecConfig::from_toml("[logging]\njson_format = true\n").expect("parse");
    assert!(parsed.logging.json_format);
    assert_eq!(parsed.logging.app_name, "absent-codec");
    assert_eq!(parsed.logging.log_level, Level::INFO);
}
