//! Configuration loading tests

use service_call::config::{LogFormat, load_config, load_config_from_str};
use service_call::error::ConfigError;
use std::env;
use std::fs;
use tempfile::tempdir;

const MINIMAL_CONFIG: &str = r#"
[http]
base_url = "https://api.example.com"
"#;

const FULL_CONFIG: &str = r#"
[http]
base_url = "https://api.example.com/v2/"
timeout_secs = 60
user_agent = "integration/1.0"
verify_ssl = false

[auth]
token = "file-token"

[logging]
level = "debug"
format = "json"
"#;

/// Remove every variable the loader reads
fn clear_env() {
    unsafe {
        env::remove_var("SERVICE_CALL_TOKEN");
        env::remove_var("SERVICE_CALL__HTTP__BASE_URL");
        env::remove_var("SERVICE_CALL__HTTP__TIMEOUT_SECS");
        env::remove_var("SERVICE_CALL__AUTH__TOKEN");
        env::remove_var("SERVICE_CALL__LOGGING__LEVEL");
    }
}

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.http.base_url, "https://api.example.com");
    assert!(config.auth.token.is_none());
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    // HTTP
    assert_eq!(config.http.base_url, "https://api.example.com/v2/");
    assert_eq!(config.http.timeout_secs, 60);
    assert_eq!(config.http.user_agent, "integration/1.0");
    assert!(!config.http.verify_ssl);
    assert_eq!(
        config.http.endpoint("/users"),
        "https://api.example.com/v2/users"
    );

    // Auth
    let token = config.auth.token.as_ref().unwrap();
    assert_eq!(token.expose_secret(), "file-token");

    // Logging
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_defaults() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.http.timeout_secs, 30);
    assert!(config.http.verify_ssl);
    assert!(config.http.user_agent.starts_with("service-call/"));
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_token_is_redacted_in_debug_output() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let debug = format!("{:?}", config);

    assert!(!debug.contains("file-token"));
}

#[test]
fn test_invalid_log_format() {
    let config_str = r#"
[http]
base_url = "https://api.example.com"

[logging]
format = "xml"
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_missing_base_url() {
    let result = load_config_from_str("[auth]\ntoken = \"t\"\n");

    match result {
        Err(ConfigError::Missing { field }) => assert_eq!(field, "http.base_url"),
        other => panic!("expected missing field error, got {:?}", other),
    }
}

#[test]
#[serial_test::serial]
fn test_load_from_file() {
    clear_env();

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("service-call.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(config.http.timeout_secs, 60);
    assert_eq!(
        config.auth.token.as_ref().map(|t| t.expose_secret()),
        Some("file-token")
    );
}

#[test]
#[serial_test::serial]
fn test_env_vars_override_file() {
    clear_env();

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("service-call.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("SERVICE_CALL__HTTP__BASE_URL", "https://staging.example.com");
        env::set_var("SERVICE_CALL__HTTP__TIMEOUT_SECS", "5");
        env::set_var("SERVICE_CALL__LOGGING__LEVEL", "trace");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(config.http.base_url, "https://staging.example.com");
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.logging.level, "trace");

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_token_env_var_wins_over_everything() {
    clear_env();

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("service-call.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("SERVICE_CALL__AUTH__TOKEN", "nested-token");
        env::set_var("SERVICE_CALL_TOKEN", "priority-token");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(
        config.auth.token.as_ref().map(|t| t.expose_secret()),
        Some("priority-token")
    );

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_empty_token_env_var_is_ignored() {
    clear_env();

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("service-call.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("SERVICE_CALL_TOKEN", "");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(
        config.auth.token.as_ref().map(|t| t.expose_secret()),
        Some("file-token")
    );

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_invalid_env_base_url_fails_validation() {
    clear_env();

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("service-call.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("SERVICE_CALL__HTTP__BASE_URL", "api.example.com");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));

    clear_env();
}
