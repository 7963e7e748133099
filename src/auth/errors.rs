//! Error types for authentication operations.
//!
//! Every upstream failure of a credential operation is surfaced to the caller
//! as one of these types, ready to be shown in a transient notification.
//!
//! - [`AuthenticationError`]: returned by sign-in
//! - [`ValidationError`]: returned by sign-up
//! - [`NetworkError`]: transient upstream failure, returned directly by
//!   password reset and wrapped by the other two
//!
//! Authorization denial is not an error: it is expressed as
//! `is_admin() == false` on the [`SessionContext`](crate::SessionContext).
//!
//! # Example
//!
//! ```rust
//! use technexus_portal::auth::{AuthenticationError, NetworkError};
//!
//! let error = AuthenticationError::InvalidCredentials;
//! assert_eq!(error.to_string(), "Invalid login credentials");
//!
//! let error = AuthenticationError::from(NetworkError::new(Some(503), "Service unavailable"));
//! assert!(error.is_transient());
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// A transient failure talking to the auth service or the data API.
///
/// `status` is `None` for transport failures (DNS, TLS, timeouts).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Network error: {message}")]
pub struct NetworkError {
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,
    /// Description of the failure.
    pub message: String,
}

impl NetworkError {
    /// Creates a new network error.
    #[must_use]
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<HttpError> for NetworkError {
    fn from(error: HttpError) -> Self {
        let status = error.status();
        let message = match error {
            HttpError::Response(e) => e.message,
            HttpError::MaxRetries(e) => e.message,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

/// Errors returned by sign-in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The account exists but its email address has not been verified.
    #[error("Email not confirmed. Please check your email to verify your account.")]
    NotVerified,

    /// The user signed out while the credentials were being checked; the
    /// resulting session was discarded.
    #[error("Sign in was cancelled by a sign out.")]
    Cancelled,

    /// The auth service could not be reached or failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl AuthenticationError {
    /// Returns `true` if retrying the same credentials may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors returned by sign-up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An account already exists for this email address.
    #[error("User already registered")]
    AlreadyRegistered,

    /// The password does not meet the strength policy.
    #[error("Password is too weak: {reason}")]
    WeakPassword {
        /// Why the password was rejected.
        reason: String,
    },

    /// The identity is not a valid email address.
    #[error("Invalid email address '{email}'")]
    InvalidIdentity {
        /// The rejected identity.
        email: String,
    },

    /// A required sign-up field was empty.
    #[error("Missing required field: '{field}'")]
    MissingField {
        /// The name of the empty field.
        field: &'static str,
    },

    /// The auth service refused the sign-up for another reason.
    #[error("Sign up rejected: {message}")]
    Rejected {
        /// The message returned by the auth service.
        message: String,
    },

    /// The auth service could not be reached or failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthenticationError>();
    assert_send_sync::<ValidationError>();
    assert_send_sync::<NetworkError>();
};
