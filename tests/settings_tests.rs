//! Integration tests for settings loading and native conversion
//!
//! Covers the file round trip, the override chain and the build/release
//! pairing of the native record.

use std::fs;
use std::path::PathBuf;

use cef_embed::config::{CliArgs, ConfigError, Settings, SettingsSnapshot};
use cef_embed::sys::cef_settings_t;
use cef_embed::types::{Color, ContextSafetyImplementation, LogSeverity};

fn sample_settings() -> Settings {
    Settings::default()
        .with_no_sandbox(true)
        .with_windowless_rendering(true)
        .with_cache_path("/var/cache/cef-embed")
        .with_user_agent("cef-embed-tests/1.0")
        .with_locale("de-DE")
        .with_log_file("/tmp/cef-embed.log")
        .with_log_severity(LogSeverity::Warning)
        .with_remote_debugging_port(9333)
        .with_uncaught_exception_stack_size(10)
        .with_context_safety(ContextSafetyImplementation::Disabled)
        .with_background_color(Color::with_alpha(0x20, 0x40, 0x60, 0x80))
        .with_accept_language_list("de-DE,de,en")
}

// ============================================================================
// File Round Trip Tests
// ============================================================================

#[test]
fn test_toml_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.toml");

    let settings = sample_settings();
    settings.to_file(&path).unwrap();
    let loaded = Settings::from_file(&path).unwrap();

    assert_eq!(loaded, settings);
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.json");

    let settings = sample_settings();
    settings.to_file(&path).unwrap();
    let loaded = Settings::from_file(&path).unwrap();

    assert_eq!(loaded, settings);
}

#[test]
fn test_file_uses_readable_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.toml");

    sample_settings().to_file(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.contains("log_severity = \"warning\""));
    assert!(text.contains("context_safety_implementation = \"disabled\""));
    assert!(text.contains("background_color = \"#80204060\""));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.yaml");
    fs::write(&path, "single_process: true").unwrap();

    let result = Settings::from_file(&path);
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"));
}

#[test]
fn test_malformed_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.toml");
    fs::write(&path, "log_severity = \"loud\"").unwrap();

    assert!(matches!(
        Settings::from_file(&path),
        Err(ConfigError::TomlParseError(_))
    ));
}

// ============================================================================
// Override Chain Tests
// ============================================================================

#[test]
fn test_cli_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.toml");
    fs::write(
        &path,
        r##"
remote_debugging_port = 9400
locale = "fr-FR"
background_color = "#336699"
"##,
    )
    .unwrap();

    let args = CliArgs {
        remote_debugging_port: Some(9222),
        ..Default::default()
    };
    let settings = Settings::from_file(&path).unwrap().merge_with_args(&args);

    assert_eq!(settings.remote_debugging_port, 9222);
    assert_eq!(settings.locale, "fr-FR");
    assert_eq!(settings.background_color, Color::new(0x33, 0x66, 0x99));
}

#[test]
fn test_load_settings_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cef.json");
    fs::write(&path, r#"{ "uncaught_exception_stack_size": -1 }"#).unwrap();

    let args = CliArgs {
        config_file: Some(path),
        ..Default::default()
    };
    assert!(matches!(
        args.load_settings(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_missing_subprocess_path_fails_validation() {
    let settings = Settings::default()
        .with_browser_subprocess_path(PathBuf::from("/definitely/not/here/cef-helper"));
    assert!(settings.validate().is_err());

    // Conversion is total regardless of validation
    let native = settings.to_native();
    assert_eq!(
        native.snapshot().browser_subprocess_path,
        "/definitely/not/here/cef-helper"
    );
    native.release();
}

// ============================================================================
// Native Conversion Tests
// ============================================================================

#[test]
fn test_end_to_end_scenario() {
    let settings = Settings::default()
        .with_log_severity(LogSeverity::Disable)
        .with_remote_debugging_port(9222)
        .with_background_color(Color::with_alpha(10, 20, 30, 255));

    let native = settings.to_native();
    let raw = native.raw();

    assert_eq!(raw.log_severity, 99);
    assert_eq!(raw.remote_debugging_port, 9222);
    assert_eq!(raw.background_color, 0xFF0A141E);
    assert_eq!(raw.size, std::mem::size_of::<cef_settings_t>());

    native.release();
}

#[test]
fn test_conversion_is_deterministic() {
    let settings = sample_settings();

    let first = settings.to_native();
    let second = settings.to_native();
    assert_eq!(first.snapshot(), second.snapshot());

    // Each record owns its own buffers
    assert_ne!(first.raw().user_agent.str_, second.raw().user_agent.str_);

    first.release();
    second.release();
}

#[test]
fn test_snapshot_reflects_every_field() {
    let snapshot: SettingsSnapshot = {
        let native = sample_settings().to_native();
        native.snapshot()
    };

    assert_eq!(snapshot.no_sandbox, 1);
    assert_eq!(snapshot.single_process, 0);
    assert_eq!(snapshot.windowless_rendering_enabled, 1);
    assert_eq!(snapshot.cache_path, "/var/cache/cef-embed");
    assert_eq!(snapshot.user_agent, "cef-embed-tests/1.0");
    assert_eq!(snapshot.locale, "de-DE");
    assert_eq!(snapshot.log_file, "/tmp/cef-embed.log");
    assert_eq!(snapshot.log_severity, 3);
    assert_eq!(snapshot.remote_debugging_port, 9333);
    assert_eq!(snapshot.uncaught_exception_stack_size, 10);
    assert_eq!(snapshot.context_safety_implementation, -1);
    assert_eq!(snapshot.background_color, 0x80204060);
    assert_eq!(snapshot.accept_language_list, "de-DE,de,en");
    assert_eq!(snapshot.user_data_path, "");
}

#[test]
fn test_every_severity_converts_to_its_native_value() {
    let expected = [
        (LogSeverity::Default, 0),
        (LogSeverity::Verbose, 1),
        (LogSeverity::Info, 2),
        (LogSeverity::Warning, 3),
        (LogSeverity::Error, 4),
        (LogSeverity::Disable, 99),
    ];

    for (severity, raw) in expected {
        let native = Settings::default().with_log_severity(severity).to_native();
        assert_eq!(native.raw().log_severity, raw, "{severity}");
        assert_eq!(LogSeverity::from_raw(raw), Some(severity));
    }
}

#[test]
fn test_empty_text_fields_stay_unallocated() {
    let native = Settings::default().to_native();
    let raw = native.raw();

    assert!(raw.user_agent.str_.is_null());
    assert_eq!(raw.user_agent.length, 0);
    assert!(raw.cache_path.str_.is_null());
}
