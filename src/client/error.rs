//! Client error types
//!
//! Three kinds of failure reach callers: a rejected session (handled
//! globally by the HTTP client), a server-side validation or business error
//! carrying a human-readable `detail`, and everything else (network,
//! decoding, local IO).

use thiserror::Error;

use crate::session::StoreError;

/// Errors returned by the API client and resource services
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered 401 or 403; the token has already been cleared
    #[error("Session expired (HTTP {status})")]
    SessionExpired { status: u16 },

    /// The server rejected the request
    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// The request did not complete
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The request ran past the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// The response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Local file handling failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing persisted session state failed
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// The caller supplied something the request cannot be built from
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Classify a transport error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }

    /// HTTP status of a server-side rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired { status } | ClientError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Server-supplied detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired { .. })
    }

    /// Message to show next to the action that failed
    ///
    /// The server's `detail` wins; otherwise `fallback` is used.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Pull the human-readable `detail` out of an error body
///
/// Accepts `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "...", ...}]}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    }
}
