use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::store::BackendKind;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream Pokemon API settings.
    pub api: ApiConfig,
    /// Favorites store backend selection and location.
    pub storage: StorageConfig,
    /// Freshness windows for the query cache layer.
    pub cache: CacheConfig,
    /// HTTP request timeout and retry settings.
    pub request: RequestConfig,
    /// Logging settings for the embedding app shell.
    pub logging: LoggingConfig,
}

/// Upstream Pokemon API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the resource provider, without a trailing slash.
    pub base_url: String,
}

/// Favorites store configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which backend the factory constructs.
    pub backend: BackendKind,
    /// Database file (relational) or JSON document (key-value) location.
    pub path: PathBuf,
    /// Connection pool size for the relational backend.
    pub max_connections: u32,
}

/// Freshness windows per query family.
///
/// A zero window means the entry is always considered stale: every read
/// refetches, deduplicated while in flight.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Paginated list pages.
    pub list_ttl: Duration,
    /// Pokemon detail by name.
    pub detail_ttl: Duration,
    /// Species and evolution chain stages.
    pub evolution_ttl: Duration,
    /// Favorites list, per-id flags, and derived stats.
    pub favorites_ttl: Duration,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// Structured JSON output.
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Transparent retries the cache layer may issue for retryable
    /// failures. The default is a single retry.
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            base_url: env::var("POKEAPI_BASE_URL")
                .unwrap_or_else(|_| "https://pokeapi.co/api/v2".to_string()),
        };

        let backend = match env::var("FAVORITES_BACKEND") {
            Ok(raw) => raw.parse().map_err(|message| ConfigError { message })?,
            Err(_) => BackendKind::default(),
        };

        let storage = StorageConfig {
            backend,
            path: PathBuf::from(
                env::var("FAVORITES_PATH").unwrap_or_else(|_| "./data/favorites.db".to_string()),
            ),
            max_connections: env_parse("FAVORITES_MAX_CONNECTIONS", 5),
        };

        let cache = CacheConfig {
            list_ttl: Duration::from_millis(env_parse("CACHE_LIST_TTL_MS", 5 * 60 * 1000)),
            detail_ttl: Duration::from_millis(env_parse("CACHE_DETAIL_TTL_MS", 10 * 60 * 1000)),
            evolution_ttl: Duration::from_millis(env_parse(
                "CACHE_EVOLUTION_TTL_MS",
                10 * 60 * 1000,
            )),
            favorites_ttl: Duration::from_millis(env_parse("CACHE_FAVORITES_TTL_MS", 0)),
        };

        let request = RequestConfig {
            timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            max_retries: env_parse("MAX_RETRIES", 1),
            retry_delay_ms: env_parse("RETRY_DELAY_MS", 250),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            api,
            storage,
            cache,
            request,
            logging,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(5 * 60),
            detail_ttl: Duration::from_secs(10 * 60),
            evolution_ttl: Duration::from_secs(10 * 60),
            favorites_ttl: Duration::ZERO,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 1,
            retry_delay_ms: 250,
        }
    }
}
