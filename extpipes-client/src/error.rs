//! Error types for the data-platform client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// One or more requested resources do not exist
    #[error("Resource(s) not found: {}", .0.join(", "))]
    NotFound(Vec<String>),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Token endpoint rejected the credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_ids() {
        let err = ClientError::NotFound(vec!["src:006:gdm".to_string(), "x".to_string()]);
        assert_eq!(err.to_string(), "Resource(s) not found: src:006:gdm, x");
    }
}
