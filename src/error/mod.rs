use thiserror::Error;

/// Error taxonomy surfaced to the presentation layer.
///
/// The query cache layer is the only place that produces these; raw
/// transport and storage causes never cross it. Every variant is `Clone`
/// so a single failed fetch can be delivered to all deduplicated waiters.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Malformed resource URL: {message}")]
    Parse { message: String },
}

impl DataError {
    /// Whether the operation may be retried transparently.
    ///
    /// Only transport failures qualify; a missing resource stays missing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::Network { .. })
    }
}

/// Favorites store errors, shared by both backends.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Store not initialized")]
    NotInitialized,

    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("I/O failed: {message}")]
    Io { message: String },

    #[error("Serialization failed: {message}")]
    Serialize { message: String },
}

/// Remote resource client errors.
///
/// The client is a pure adapter: it reports what the wire did and leaves
/// retry decisions and taxonomy mapping to the cache layer above it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Map a client error into the UI-facing taxonomy.
    ///
    /// `resource` names what was being fetched, e.g. `pokemon/pikachu`.
    pub fn into_data_error(self, resource: &str) -> DataError {
        match self {
            ApiError::Status { status: 404, .. } => DataError::NotFound {
                resource: resource.to_string(),
            },
            other => DataError::Network {
                message: other.to_string(),
            },
        }
    }
}

/// Configuration loading error.
#[derive(Debug, Clone, Error)]
#[error("Configuration error: {message}")]
pub struct ConfigError {
    /// What was wrong with the environment.
    pub message: String,
}

/// Result type alias for cache-layer operations.
pub type DataResult<T> = Result<T, DataError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for remote client operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_display() {
        let err = DataError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = DataError::NotFound {
            resource: "pokemon/missingno".to_string(),
        };
        assert_eq!(err.to_string(), "Not found: pokemon/missingno");

        let err = DataError::Parse {
            message: "no evolution-chain id in url".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed resource URL: no evolution-chain id in url"
        );
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::NotInitialized.to_string(),
            "Store not initialized"
        );

        let err = StorageError::Query {
            message: "syntax error".to_string(),
        };
        assert_eq!(err.to_string(), "Query failed: syntax error");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 500,
            message: "internal".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - internal");

        let err = ApiError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(DataError::Network {
            message: "reset".to_string()
        }
        .is_retryable());
        assert!(!DataError::NotFound {
            resource: "pokemon/x".to_string()
        }
        .is_retryable());
        assert!(!DataError::Storage(StorageError::NotInitialized).is_retryable());
    }

    #[test]
    fn test_api_error_taxonomy_mapping() {
        let err = ApiError::Status {
            status: 404,
            message: String::new(),
        };
        assert!(matches!(
            err.into_data_error("pokemon/missingno"),
            DataError::NotFound { .. }
        ));

        let err = ApiError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(matches!(
            err.into_data_error("pokemon/pikachu"),
            DataError::Network { .. }
        ));

        let err = ApiError::Transport {
            message: "dns failure".to_string(),
        };
        let mapped = err.into_data_error("pokemon/pikachu");
        assert!(mapped.is_retryable());
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: DataError = StorageError::NotInitialized.into();
        assert!(matches!(err, DataError::Storage(_)));
        assert!(err.to_string().contains("not initialized"));
    }
}
