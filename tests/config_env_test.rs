//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides, and that every knob has a working
//! default. Tests use #[serial] to prevent race conditions with shared
//! env vars.

use std::env;
use std::time::Duration;

use serial_test::serial;

use pokedex_data::config::{Config, LogFormat};
use pokedex_data::store::BackendKind;

fn clear_all() {
    for key in [
        "POKEAPI_BASE_URL",
        "FAVORITES_BACKEND",
        "FAVORITES_PATH",
        "FAVORITES_MAX_CONNECTIONS",
        "CACHE_LIST_TTL_MS",
        "CACHE_DETAIL_TTL_MS",
        "CACHE_EVOLUTION_TTL_MS",
        "CACHE_FAVORITES_TTL_MS",
        "REQUEST_TIMEOUT_MS",
        "MAX_RETRIES",
        "RETRY_DELAY_MS",
        "LOG_LEVEL",
        "LOG_FORMAT",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_all();

    let config = Config::from_env().unwrap();

    assert_eq!(config.api.base_url, "https://pokeapi.co/api/v2");
    assert_eq!(config.storage.backend, BackendKind::Sqlite);
    assert_eq!(config.storage.max_connections, 5);
    assert_eq!(config.cache.list_ttl, Duration::from_secs(5 * 60));
    assert_eq!(config.cache.detail_ttl, Duration::from_secs(10 * 60));
    assert_eq!(config.cache.evolution_ttl, Duration::from_secs(10 * 60));
    assert_eq!(config.cache.favorites_ttl, Duration::ZERO);
    assert_eq!(config.request.timeout_ms, 30000);
    assert_eq!(config.request.max_retries, 1);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_custom_base_url() {
    clear_all();
    env::set_var("POKEAPI_BASE_URL", "https://mirror.example.com/api/v2");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api.base_url, "https://mirror.example.com/api/v2");

    clear_all();
}

#[test]
#[serial]
fn test_keyvalue_backend_selection() {
    clear_all();
    env::set_var("FAVORITES_BACKEND", "keyvalue");
    env::set_var("FAVORITES_PATH", "/custom/favorites.json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.storage.backend, BackendKind::KeyValue);
    assert_eq!(
        config.storage.path.to_str().unwrap(),
        "/custom/favorites.json"
    );

    clear_all();
}

#[test]
#[serial]
fn test_unknown_backend_is_an_error() {
    clear_all();
    env::set_var("FAVORITES_BACKEND", "redis");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("redis"));

    clear_all();
}

#[test]
#[serial]
fn test_custom_cache_windows() {
    clear_all();
    env::set_var("CACHE_LIST_TTL_MS", "1000");
    env::set_var("CACHE_FAVORITES_TTL_MS", "2500");

    let config = Config::from_env().unwrap();
    assert_eq!(config.cache.list_ttl, Duration::from_millis(1000));
    assert_eq!(config.cache.favorites_ttl, Duration::from_millis(2500));
    // Unset windows keep their defaults.
    assert_eq!(config.cache.detail_ttl, Duration::from_secs(10 * 60));

    clear_all();
}

#[test]
#[serial]
fn test_custom_request_settings() {
    clear_all();
    env::set_var("REQUEST_TIMEOUT_MS", "60000");
    env::set_var("MAX_RETRIES", "0");
    env::set_var("RETRY_DELAY_MS", "2000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 60000);
    assert_eq!(config.request.max_retries, 0);
    assert_eq!(config.request.retry_delay_ms, 2000);

    clear_all();
}

#[test]
#[serial]
fn test_invalid_number_uses_default() {
    clear_all();
    env::set_var("FAVORITES_MAX_CONNECTIONS", "not-a-number");

    let config = Config::from_env().unwrap();
    assert_eq!(config.storage.max_connections, 5);

    clear_all();
}

#[test]
#[serial]
fn test_json_log_format() {
    clear_all();
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    clear_all();
}
