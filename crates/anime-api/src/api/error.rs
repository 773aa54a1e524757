//! Errors returned by the Jikan client.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JikanError {
    /// The requested resource does not exist upstream
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited by server: {0}")]
    RateLimited(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl JikanError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JikanError::NotFound(_))
    }
}
