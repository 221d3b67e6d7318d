//! API error types

use thiserror::Error;

/// Failure of a single backend request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, timeout, reset)
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("request failed with status {status}")]
    Application {
        status: u16,
        message: Option<String>,
    },

    /// A success response did not carry the expected body
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request could not be built locally
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether the request failed before reaching the application
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user for this failure
    ///
    /// Server-provided messages and transport descriptions are shown as-is; anything
    /// else falls back to the operation's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Application {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Transport(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
