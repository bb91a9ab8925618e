//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors raised while talking to the search backend
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out
    #[error("Search request timed out: {0}")]
    Timeout(String),

    /// Backend answered with a non-success status
    #[error("Search backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not valid JSON
    #[error("Failed to decode search response: {0}")]
    Decode(String),

    /// Query document could not be serialized
    #[error("Failed to serialize query document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout(err.to_string())
        } else if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::Transport(msg) => AppError::Network(msg),
            SearchError::Timeout(msg) => AppError::Network(msg),
            SearchError::Serialization(err) => AppError::Serialization(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_configuration_error_maps_to_app_configuration() {
        let app: AppError = SearchError::InvalidConfiguration("bad url".to_string()).into();
        assert_eq!(app.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_status_error_maps_to_internal() {
        let app: AppError = SearchError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
        .into();
        assert_eq!(app.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.to_string().contains("503"));
    }

    #[test]
    fn test_serde_error_maps_to_serialization() {
        let err: SearchError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SearchError::Serialization(_)));

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "SERIALIZATION_ERROR");
    }
}
