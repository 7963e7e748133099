//! Authenticated sessions.
//!
//! This module provides the [`Session`] type produced by a successful
//! credential exchange, and the [`AuthUser`] record the auth service returns
//! for the bearer of a token.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session.
///
/// A session exists once a credential exchange succeeds and is destroyed on
/// sign-out or upstream invalidation. It serializes with serde so an
/// application can persist it and hand it back to
/// [`SessionContext::initialize`](crate::SessionContext::initialize) on the
/// next start.
///
/// Tokens are masked in `Debug` output.
///
/// # Thread Safety
///
/// `Session` is `Send + Sync`, making it safe to share across threads.
///
/// # Example
///
/// ```rust
/// use technexus_portal::Session;
/// use chrono::{Duration, Utc};
///
/// let session = Session::new("user-1", "access-token")
///     .with_email("ada@example.com")
///     .with_expires_at(Utc::now() + Duration::hours(1));
///
/// assert!(session.is_active());
/// assert!(!format!("{session:?}").contains("access-token"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identity of the signed-in user.
    pub subject: String,

    /// Email address of the signed-in user, if the auth service returned one.
    #[serde(default)]
    pub email: Option<String>,

    /// Bearer token for the auth service and the data API.
    pub access_token: String,

    /// Token used to obtain a new access token.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// When the session was issued.
    pub issued_at: DateTime<Utc>,

    /// When the access token expires, if known.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session issued now, with no refresh token and no expiry.
    #[must_use]
    pub fn new(subject: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: None,
            access_token: access_token.into(),
            refresh_token: None,
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if the access token has expired.
    ///
    /// Sessions without an expiration time are considered never expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| Utc::now() >= expires)
    }

    /// Returns `true` if this session is active (not expired and has a token).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.access_token.is_empty() && !self.expired()
    }

    /// Returns the time left before expiry, if an expiry is known.
    #[must_use]
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_at.map(|expires| expires - Utc::now())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subject", &self.subject)
            .field("email", &self.email)
            .field("access_token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};

/// The user record the auth service returns for a token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    /// Opaque identity.
    pub id: String,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// When the email address was confirmed; `None` until the user follows
    /// the verification link.
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,

    /// Free-form attributes supplied at sign-up, such as `full_name`.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Returns the display name supplied at sign-up, if any.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}
