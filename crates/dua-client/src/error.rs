//! Failure classification for requests to the query service.

use thiserror::Error;

/// Why a request did not yield a usable list.
///
/// Every variant is recoverable: the caller marks the affected node as
/// failed and may retry later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The service could not be reached at all.
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The service answered with a non-success status.
    #[error("server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// The body was not a JSON array of the expected records.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client could not be constructed.
    #[error("invalid client setup: {0}")]
    Setup(String),
}

impl FetchError {
    /// Returns a short message suitable for display next to a tree node.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Timeout => "The server took too long to respond.",
            Self::NetworkUnreachable(_) => "Could not reach the server.",
            Self::ServerError { status, .. } if *status >= 500 => {
                "The server failed to answer this request."
            }
            Self::ServerError { .. } => "The server rejected this request.",
            Self::MalformedResponse(_) => "The server sent data that could not be read.",
            Self::Setup(_) => "The client is misconfigured.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::Setup(err.to_string())
        } else {
            Self::NetworkUnreachable(err.to_string())
        }
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
