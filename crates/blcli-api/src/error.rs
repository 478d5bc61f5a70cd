//! Error types for remote API operations.

use thiserror::Error;

/// Classified failure reported by a [`crate::RemoteService`] call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token was rejected.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Message reported by the API.
        message: String,
    },
    /// The addressed resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Message reported by the API.
        message: String,
    },
    /// The API is throttling this account.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Message reported by the API.
        message: String,
    },
    /// Any other non-success response.
    #[error("{message} (status {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message reported by the API, or the raw body.
        message: String,
    },
    /// The request never produced a response.
    #[error("request to {path} failed: {source}")]
    Transport {
        /// Endpoint path relative to the API base URL.
        path: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The response body did not match the expected document.
    #[error("failed to parse {what}: {source}")]
    Decode {
        /// Name of the expected document.
        what: &'static str,
        /// Underlying decoding failure.
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint URL could not be built.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be configured.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Convenience alias for remote operation results.
pub type ApiResult<T> = Result<T, ApiError>;
