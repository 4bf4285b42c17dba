//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use trackplan::config::{load_config, SourceMode};
use trackplan::domain::TrackplanError;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("TRACKPLAN_APPLICATION_LOG_LEVEL");
    std::env::remove_var("TRACKPLAN_SERVER_BIND_ADDRESS");
    std::env::remove_var("TRACKPLAN_AMPLITUDE_SOURCE_MODE");
    std::env::remove_var("TRACKPLAN_AMPLITUDE_CACHE_TTL_SECONDS");
    std::env::remove_var("TRACKPLAN_INSIDER_PATH");
    std::env::remove_var("TEST_AMPLITUDE_API_KEY");
    std::env::remove_var("TEST_AMPLITUDE_SECRET_KEY");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[server]
bind_address = "127.0.0.1:8080"

[amplitude]
source_mode = "api"
api_key = "project-key"
secret_key = "project-secret"
region = "eu"
cache_ttl_seconds = 300
timeout_seconds = 10
property_concurrency = 4
startup_attempts = 3
export_path = "data/events.csv"

[amplitude.retry]
max_retries = 5
backoff_factor_ms = 250
default_retry_after_seconds = 2

[insider]
path = "data/insider.json"

[gtm]
server_path = "data/server.json"
client_path = "data/client.json"

[logging]
local_enabled = true
local_path = "/tmp/trackplan-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    assert_eq!(config.amplitude.source_mode, SourceMode::Api);
    assert_eq!(
        config.amplitude.resolved_base_url(),
        "https://analytics.eu.amplitude.com/api/2"
    );
    assert!(config.amplitude.credentials().is_some());
    assert_eq!(config.amplitude.cache_ttl_seconds, 300);
    assert_eq!(config.amplitude.property_concurrency, 4);
    assert_eq!(config.amplitude.startup_attempts, 3);
    assert_eq!(config.amplitude.retry.max_retries, 5);
    assert_eq!(config.amplitude.retry.backoff_factor_ms, 250);
    assert_eq!(config.amplitude.retry.default_retry_after_seconds, 2);
    assert_eq!(config.gtm.client_path, "data/client.json");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.server.bind_address, "0.0.0.0:5000");
    assert_eq!(config.amplitude.source_mode, SourceMode::File);
    assert_eq!(config.amplitude.resolved_base_url(), "https://amplitude.com/api/2");
    assert_eq!(config.amplitude.cache_ttl_seconds, 900);
    assert_eq!(config.amplitude.timeout_seconds, 30);
    assert!(config.amplitude.credentials().is_none());
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_AMPLITUDE_API_KEY", "substituted-key");
    std::env::set_var("TEST_AMPLITUDE_SECRET_KEY", "substituted-secret");

    let file = write_config(
        r#"
[amplitude]
source_mode = "api"
api_key = "${TEST_AMPLITUDE_API_KEY}"
secret_key = "${TEST_AMPLITUDE_SECRET_KEY}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    let (key, secret) = config.amplitude.credentials().unwrap();
    assert_eq!(key.expose_secret().as_ref(), "substituted-key");
    assert_eq!(secret.expose_secret().as_ref(), "substituted-secret");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[amplitude]\napi_key = \"${TEST_AMPLITUDE_API_KEY}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_AMPLITUDE_API_KEY"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TRACKPLAN_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("TRACKPLAN_SERVER_BIND_ADDRESS", "127.0.0.1:9000");
    std::env::set_var("TRACKPLAN_AMPLITUDE_SOURCE_MODE", "api");
    std::env::set_var("TRACKPLAN_AMPLITUDE_CACHE_TTL_SECONDS", "60");
    std::env::set_var("TRACKPLAN_INSIDER_PATH", "elsewhere/insider.json");

    let file = write_config("[application]\nlog_level = \"debug\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.server.bind_address, "127.0.0.1:9000");
    assert_eq!(config.amplitude.source_mode, SourceMode::Api);
    assert_eq!(config.amplitude.cache_ttl_seconds, 60);
    assert_eq!(config.insider.path, "elsewhere/insider.json");

    cleanup_env_vars();
}

#[test]
fn test_invalid_source_mode_override() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TRACKPLAN_AMPLITUDE_SOURCE_MODE", "ftp");

    let file = write_config("");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TRACKPLAN_AMPLITUDE_SOURCE_MODE"));

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        ("[application]\nlog_level = \"loud\"\n", "log_level"),
        ("[server]\nbind_address = \"nowhere\"\n", "bind_address"),
        ("[amplitude]\nbase_url = \"ftp://amplitude.com\"\n", "base_url"),
        ("[amplitude]\nproperty_concurrency = 0\n", "property_concurrency"),
        ("[amplitude.retry]\nmax_retries = 50\n", "max_retries"),
        ("[logging]\nlocal_rotation = \"weekly\"\n", "local_rotation"),
    ];

    for (contents, field) in cases {
        let file = write_config(contents);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, TrackplanError::Validation(_)), "{err}");
        assert!(
            err.to_string().contains(field),
            "expected '{field}' in: {err}"
        );
    }
}

#[test]
fn test_malformed_toml() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[amplitude\nsource_mode = ");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
