//! HTTP-specific error types for the portal client.
//!
//! This module contains error types for HTTP operations, including response
//! errors, retry exhaustion, and request validation failures.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the backend
//! - [`MaxHttpRetriesExceededError`]: When retry attempts are exhausted
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use technexus_portal::clients::HttpError;
//!
//! match client.request(request, None).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Retries exhausted after {} tries", e.tries),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {}", e),
//!     Err(HttpError::Network(e)) => println!("Network error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// `message` is the human readable text extracted from the body (`msg`,
/// `message`, `error_description` or `error`), and `error_code` the machine
/// readable code when the backend sent one.
///
/// # Example
///
/// ```rust
/// use technexus_portal::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 400,
///     message: "Invalid login credentials".to_string(),
///     error_code: Some("invalid_credentials".to_string()),
///     error_reference: None,
/// };
///
/// assert_eq!(error.to_string(), "Invalid login credentials");
/// assert!(error.has_code("invalid_credentials"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human readable error message.
    pub message: String,
    /// Machine readable error code, if present.
    pub error_code: Option<String>,
    /// Reference ID for error reporting (from the request id header).
    pub error_reference: Option<String>,
}

impl HttpResponseError {
    /// Returns `true` if the backend reported the given error code.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.error_code.as_deref() == Some(code)
    }

    /// Returns `true` for 5xx responses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500
    }
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the request id header).
    pub error_reference: Option<String>,
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The number of tries must be at least one.
    #[error("Request tries must be at least 1.")]
    ZeroTries,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }

    /// Returns `true` if the backend rejected the bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Returns `true` for failures a user can only fix by trying again later:
    /// transport errors, exhausted retries and 5xx responses.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::MaxRetries(_) => true,
            Self::Response(e) => e.is_server_error() || e.code == 429,
            Self::InvalidRequest(_) => false,
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
