use std::sync::Arc;

use reqwest::StatusCode;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the configuration agent.
///
/// Only the targeted retrieval APIs (single flag, several flags) surface these. Full-document
/// fetches and boolean evaluation absorb them and return a safe default instead.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Invalid base URL configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// The request did not complete (connection refused, timeout, etc.).
    #[error(transparent)]
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    Network(Arc<reqwest::Error>),

    /// The agent answered with a non-2xx status.
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),

    /// The response body was not the expected JSON shape.
    #[error("malformed configuration response")]
    MalformedResponse(#[source] Arc<serde_json::Error>),
}

impl Error {
    /// Return `true` if the error happened before a usable response was received (transport
    /// failure or non-2xx status).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::Network(_) | Error::UnexpectedStatus(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Error::UnexpectedStatus(status),
            None => Error::Network(Arc::new(value.without_url())),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::MalformedResponse(Arc::new(value))
    }
}
