use thiserror::Error;

/// Application-wide error types for X-Ray search.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request to the search provider failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The provider is throttling us.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider response could not be parsed into hits.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error came from talking to (or decoding) a search
    /// provider. The orchestrator downgrades these to an empty pass.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_)
                | AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::RateLimitExceeded
                | AppError::ParseError(_)
                | AppError::SerializationError(_)
                | AppError::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures() {
        assert!(AppError::NetworkError("reset".into()).is_provider_failure());
        assert!(AppError::Timeout(30).is_provider_failure());
        assert!(AppError::RateLimitExceeded.is_provider_failure());
        assert!(AppError::ParseError("bad html".into()).is_provider_failure());
        assert!(!AppError::ConfigError("bad timeout".into()).is_provider_failure());
        assert!(!AppError::Generic("oops".into()).is_provider_failure());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AppError::Timeout(30).to_string(),
            "Request timed out after 30 seconds"
        );
        assert_eq!(
            AppError::HttpError("HTTP 503".into()).to_string(),
            "HTTP error: HTTP 503"
        );
    }
}
