//! Shared view state primitives

use crate::client::ClientError;

/// Lifecycle of one request as seen by a view
///
/// `Idle → Loading → Success | Error → Idle`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Back to idle, dropping any result
    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }
}

/// Transient error/success messages shown near an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Banner {
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none()
    }
}

/// Message a view should show for `err`
///
/// `None` for an expired session: that case is handled globally by the
/// client and never shown as an inline error.
pub fn inline_error(err: &ClientError, fallback: &str) -> Option<String> {
    if err.is_session_expired() {
        None
    } else {
        Some(err.user_message(fallback))
    }
}

/// Cut `text` to `max_chars` characters with a trailing `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
