//! Errors raised while talking to the hosted backend over HTTP.

use serde::Deserialize;
use store::{AuthError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success status. `message` is its own wording.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not signed in")]
    NoSession,
}

impl ApiError {
    /// Build a [`ApiError::Rejected`] from a failed response body.
    ///
    /// The auth API and the row API disagree on where the message lives, so the
    /// first of `msg`, `error_description`, `message` and `error` wins.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("HTTP {status}"));
        ApiError::Rejected { status, message }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.msg, self.error_description, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        AuthError::new(err.to_string())
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        StoreError::new(err.to_string())
    }
}
