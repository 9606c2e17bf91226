//! Lava error types using thiserror 2.0.
//!
//! Every request either succeeds or fails with exactly one of
//! [`LavaError::Authorization`] or [`LavaError::Request`]. Configuration
//! problems are reported separately when the client is built.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the Lava client.
#[derive(Error, Debug)]
pub enum LavaError {
    /// Authentication could not be established, even after a refresh
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Any other HTTP-level or transport-level failure
    #[error("Request failed: {message}")]
    Request {
        /// Response status, absent for transport failures
        status: Option<StatusCode>,
        /// Failure description
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Lava operations.
pub type LavaResult<T> = Result<T, LavaError>;

impl LavaError {
    /// Create an authorization error.
    #[must_use]
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Create a request error for a response with an error status.
    #[must_use]
    pub fn status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create a request error that has no response status.
    #[must_use]
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request {
            status: None,
            message: msg.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Authorization(_) | Self::InvalidConfig(_) => None,
        }
    }

    /// Check if this is an authorization error.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }
}

impl From<reqwest::Error> for LavaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LavaError {
    fn from(err: serde_json::Error) -> Self {
        Self::request(format!("Invalid JSON response: {err}"))
    }
}
