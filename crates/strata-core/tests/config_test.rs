//! Tests for layer configuration resolution.

use std::sync::Mutex;

use strata_core::config::{IdentifierPolicy, LayerConfig};
use strata_core::errors::ConfigError;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_strata_env_vars() {
    for key in [
        "STRATA_ORIGIN_COLUMN",
        "STRATA_MIN_ORIGIN_WIDTH",
        "STRATA_IDENTIFIER_POLICY",
        "STRATA_LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn empty_toml_yields_defaults() {
    let config = LayerConfig::from_toml("").unwrap();
    assert_eq!(config.origin_column, "origin_table");
    assert_eq!(config.min_origin_width, 1);
    assert_eq!(config.identifier_policy, IdentifierPolicy::Strict);
    assert_eq!(config.log_level, "info");
    assert_eq!(config, LayerConfig::default());
}

#[test]
fn partial_toml_overrides_only_given_keys() {
    let config = LayerConfig::from_toml(
        r#"
identifier_policy = "trusted"
min_origin_width = 16
"#,
    )
    .unwrap();
    assert_eq!(config.identifier_policy, IdentifierPolicy::Trusted);
    assert_eq!(config.min_origin_width, 16);
    assert_eq!(config.origin_column, "origin_table");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = LayerConfig::from_toml("min_origin_width = \"wide\"").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn validate_rejects_zero_width() {
    let config = LayerConfig {
        min_origin_width: 0,
        ..LayerConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ValidationFailed { ref field, .. } if field == "min_origin_width"
    ));
}

#[test]
fn validate_rejects_unsafe_origin_column() {
    for column in ["origin table", "origin;--", "x.origin", ""] {
        let config = LayerConfig {
            origin_column: column.to_string(),
            ..LayerConfig::default()
        };
        assert!(config.validate().is_err(), "{column:?} should be rejected");
    }
}

#[test]
fn load_without_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strata_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let config = LayerConfig::load(dir.path()).unwrap();
    assert_eq!(config, LayerConfig::default());
}

#[test]
fn env_overrides_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strata_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("strata.toml"),
        "origin_column = \"source_name\"\nmin_origin_width = 8\n",
    )
    .unwrap();

    std::env::set_var("STRATA_MIN_ORIGIN_WIDTH", "32");
    std::env::set_var("STRATA_IDENTIFIER_POLICY", "Trusted");
    let config = LayerConfig::load(dir.path());
    clear_strata_env_vars();

    let config = config.unwrap();
    assert_eq!(config.origin_column, "source_name");
    assert_eq!(config.min_origin_width, 32);
    assert_eq!(config.identifier_policy, IdentifierPolicy::Trusted);
}

#[test]
fn bad_env_value_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strata_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("STRATA_IDENTIFIER_POLICY", "lenient");
    let result = LayerConfig::load(dir.path());
    clear_strata_env_vars();

    assert!(matches!(
        result,
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "STRATA_IDENTIFIER_POLICY"
    ));
}

#[test]
fn invalid_project_file_names_its_path() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_strata_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("strata.toml"), "origin_column = [").unwrap();
    match LayerConfig::load(dir.path()) {
        Err(ConfigError::ParseError { path, .. }) => assert!(path.ends_with("strata.toml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}
