//! Client error types

use depot_core::CoreError;
use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Session or user storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),
}

/// Error body shape used by the backend: `{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status carried by this error, if it came from a server response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for the statuses that trigger session renewal (401 and 403)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::Forbidden(_))
    }

    /// True when the request never produced a usable server response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Raw response body for status errors
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadRequest(m)
            | Self::AuthenticationFailed(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::ServerError { message: m, .. } => Some(m),
            _ => None,
        }
    }

    /// Message suitable for showing to a user
    ///
    /// Uses the backend's `error` field when the body is a structured error,
    /// the raw body otherwise, and the error display for everything else.
    pub fn server_message(&self) -> String {
        match self.body() {
            Some(body) => match serde_json::from_str::<ErrorBody>(body) {
                Ok(parsed) => parsed.error,
                Err(_) if !body.trim().is_empty() => body.to_string(),
                Err(_) => self.to_string(),
            },
            None => self.to_string(),
        }
    }
}
