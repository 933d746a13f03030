//! Internal error taxonomy of the Credential Exchange. Nothing here crosses
//! into page code; every variant is flattened into an [`Outcome`] at the
//! client boundary.
//!
//! [`Outcome`]: crate::auth::types::Outcome

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("token not found")]
    TokenMissing,

    #[error("backend unreachable: {0}")]
    Network(String),

    #[error("backend request timed out")]
    Timeout,

    /// 4xx with credentials or token rejected; carries the backend's message.
    #[error("{0}")]
    Unauthorized(String),

    /// 4xx with field errors; carries the backend's message.
    #[error("{0}")]
    Validation(String),

    #[error("backend fault: {0}")]
    Server(String),

    #[error("unexpected response: {0}")]
    Unknown(String),
}

impl ExchangeError {
    /// Short, non-technical message safe to render to end users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TokenMissing => "token not found".to_string(),
            Self::Network(_) => "Unable to reach the server. Please try again.".to_string(),
            Self::Timeout => "The request timed out. Please try again.".to_string(),
            // Backend messages for these are already user-facing.
            Self::Unauthorized(message) | Self::Validation(message) => message.clone(),
            Self::Server(_) | Self::Unknown(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() || err.is_request() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::Unknown(format!("failed to decode response: {err}"))
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
