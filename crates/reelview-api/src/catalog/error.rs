//! Error taxonomy for catalog API calls.

use thiserror::Error;

/// Result alias used by every catalog call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a catalog API call.
///
/// Cloneable so a failure can be kept inside a published snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, reset).
    #[error("network error on {path}: {message}")]
    Network {
        /// Request path.
        path: String,
        /// Transport error description.
        message: String,
    },

    /// The server answered with a 4xx/5xx status.
    #[error("HTTP {status} on {path}: {body}")]
    Http {
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// The request exceeded the client timeout.
    #[error("request timed out on {path}")]
    Timeout {
        /// Request path.
        path: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder error description.
        message: String,
    },

    /// Rejected locally; never sent to the server.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// Classifies a transport-level `reqwest` error.
    pub(crate) fn from_transport(path: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                path: String::from(path),
            }
        } else {
            Self::Network {
                path: String::from(path),
                message: err.to_string(),
            }
        }
    }

    /// Builds a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the HTTP status for `Http` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for `Timeout` errors.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_http() {
        // Arrange
        let http = ApiError::Http {
            path: String::from("/api/content/featured"),
            status: 503,
            body: String::new(),
        };
        let timeout = ApiError::Timeout {
            path: String::from("/api/content/featured"),
        };

        // Act & Assert
        assert_eq!(http.status(), Some(503));
        assert_eq!(timeout.status(), None);
        assert!(timeout.is_timeout());
        assert!(!http.is_timeout());
    }

    #[test]
    fn test_display_includes_path() {
        // Arrange
        let err = ApiError::Network {
            path: String::from("/api/users/profiles"),
            message: String::from("connection refused"),
        };

        // Act
        let text = err.to_string();

        // Assert
        assert!(text.contains("/api/users/profiles"));
        assert!(text.contains("connection refused"));
    }
}
