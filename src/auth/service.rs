//! The remote auth service.
//!
//! [`AuthService`] is the seam between the [`SessionContext`](crate::SessionContext)
//! and the hosted auth service; [`AuthClient`] implements it over HTTP against
//! `{project_url}/auth/v1`.
//!
//! # Error Classification
//!
//! | Operation | Upstream answer | Result |
//! |---|---|---|
//! | sign in | `email_not_confirmed` | [`AuthenticationError::NotVerified`] |
//! | sign in | any other 4xx | [`AuthenticationError::InvalidCredentials`] |
//! | sign up | `user_already_exists` | [`ValidationError::AlreadyRegistered`] |
//! | sign up | `weak_password` | [`ValidationError::WeakPassword`] |
//! | sign up | `email_address_invalid` | [`ValidationError::InvalidIdentity`] |
//! | sign up | any other 4xx | [`ValidationError::Rejected`] |
//! | any | 429, 5xx, transport | [`NetworkError`] |

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthUser, AuthenticationError, NetworkError, Session, ValidationError};
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::{Email, PortalConfig};

/// Result of a successful sign-up.
///
/// No session is established by sign-up; the caller tells the user to verify
/// their email address and sign in afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// The registered email address.
    pub email: Email,
    /// Identity assigned by the auth service, when it returned one.
    pub user_id: Option<String>,
    /// `true` unless the auth service confirmed the account immediately.
    pub confirmation_required: bool,
}

/// A session change reported by the auth service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session found at start-up, if any.
    InitialSession(Option<Session>),
    /// A session was established.
    SignedIn(Session),
    /// The access token was rotated.
    TokenRefreshed(Session),
    /// The session ended upstream.
    SignedOut,
}

/// Operations offered by the remote auth service.
pub trait AuthService: Send + Sync {
    /// Exchanges an email/password pair for a session.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthenticationError>> + Send;

    /// Registers a new account with a display name.
    fn sign_up(
        &self,
        email: &Email,
        password: &str,
        full_name: &str,
    ) -> impl Future<Output = Result<SignUpOutcome, ValidationError>> + Send;

    /// Sends a password reset email. Succeeds for unknown addresses too.
    fn reset_password_for_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Revokes the session behind `access_token`.
    fn sign_out(&self, access_token: &str) -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Returns the user behind `access_token`, or `None` if the token was
    /// rejected.
    fn get_user(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<AuthUser>, NetworkError>> + Send;

    /// Exchanges a refresh token for a new session, or `None` if the refresh
    /// token was rejected.
    fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<Option<Session>, NetworkError>> + Send;
}

/// Token grant answered by `/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Result<Session, NetworkError> {
        if self.user.id.trim().is_empty() || self.access_token.is_empty() {
            return Err(NetworkError::new(None, "Malformed token response"));
        }

        let issued_at = Utc::now();
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| issued_at + Duration::seconds(secs)));

        Ok(Session {
            subject: self.user.id,
            email: self.user.email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            issued_at,
            expires_at,
        })
    }
}

fn parse_token_response(body: Value) -> Result<Session, NetworkError> {
    serde_json::from_value::<TokenResponse>(body)
        .map_err(|e| NetworkError::new(None, format!("Malformed token response: {e}")))?
        .into_session()
}

/// Returns `true` for a 4xx the caller caused, as opposed to rate limiting.
const fn is_rejection_code(code: u16) -> bool {
    code >= 400 && code < 500 && code != 429
}

fn is_client_rejection(error: &HttpError) -> bool {
    matches!(error, HttpError::Response(e) if is_rejection_code(e.code))
}

fn classify_sign_in_error(error: HttpError) -> AuthenticationError {
    if let HttpError::Response(e) = &error {
        if e.has_code("email_not_confirmed") || e.message.contains("Email not confirmed") {
            return AuthenticationError::NotVerified;
        }
    }
    if is_client_rejection(&error) {
        AuthenticationError::InvalidCredentials
    } else {
        AuthenticationError::Network(error.into())
    }
}

fn classify_sign_up_error(email: &Email, error: HttpError) -> ValidationError {
    let e = match error {
        HttpError::Response(e) if is_rejection_code(e.code) => e,
        other => return ValidationError::Network(other.into()),
    };

    if e.has_code("user_already_exists")
        || e.has_code("email_exists")
        || e.message.contains("already registered")
    {
        ValidationError::AlreadyRegistered
    } else if e.has_code("weak_password") {
        ValidationError::WeakPassword { reason: e.message }
    } else if e.has_code("email_address_invalid") || e.has_code("validation_failed") {
        ValidationError::InvalidIdentity {
            email: email.to_string(),
        }
    } else {
        ValidationError::Rejected { message: e.message }
    }
}

fn parse_sign_up(email: &Email, body: &Value) -> SignUpOutcome {
    // Auto-confirmed projects answer with a full session wrapping the user
    let user = body.get("user").filter(|u| u.is_object()).unwrap_or(body);
    SignUpOutcome {
        email: email.clone(),
        user_id: user.get("id").and_then(Value::as_str).map(String::from),
        confirmation_required: !body.get("access_token").is_some_and(Value::is_string),
    }
}

/// HTTP client for the auth service under `{project_url}/auth/v1`.
///
/// Email redirect targets come from the configured
/// [`SiteUrl`](crate::SiteUrl): confirmation links land on `/dashboard` and
/// reset links on `/auth?mode=reset-password`.
///
/// # Example
///
/// ```rust,ignore
/// use technexus_portal::auth::{AuthClient, AuthService};
///
/// let auth = AuthClient::new(&config)?;
/// let session = auth.sign_in_with_password("ada@example.com", "secret").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    http_client: HttpClient,
    confirmation_redirect: Option<String>,
    reset_redirect: Option<String>,
}

// Verify AuthClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthClient>();
};

impl AuthClient {
    /// Creates a new auth service client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn new(config: &PortalConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http_client: HttpClient::new(config.project_url().auth_url(), config)?,
            confirmation_redirect: config.email_confirmation_redirect(),
            reset_redirect: config.password_reset_redirect(),
        })
    }

    /// Returns the base URL of the auth service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http_client.base_url()
    }

    fn post(path: &str, body: Value, redirect_to: Option<&str>) -> Result<HttpRequest, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Post, path).body(body);
        if let Some(redirect_to) = redirect_to {
            builder = builder.query_param("redirect_to", redirect_to);
        }
        Ok(builder.build()?)
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, "token")
            .query_param("grant_type", grant_type)
            .body(body)
            .build()?;
        Ok(self.http_client.request(request, None).await?.body)
    }
}

impl AuthService for AuthClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let body = json!({ "email": email.trim(), "password": password });
        let body = self
            .token_grant("password", body)
            .await
            .map_err(classify_sign_in_error)?;
        let session = parse_token_response(body)?;
        tracing::debug!(subject = %session.subject, "password sign-in accepted");
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, ValidationError> {
        let body = json!({
            "email": email.as_ref(),
            "password": password,
            "data": { "full_name": full_name },
        });
        let request = Self::post("signup", body, self.confirmation_redirect.as_deref())
            .map_err(|e| ValidationError::Network(e.into()))?;

        match self.http_client.request(request, None).await {
            Ok(response) => Ok(parse_sign_up(email, &response.body)),
            Err(error) => Err(classify_sign_up_error(email, error)),
        }
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), NetworkError> {
        let body = json!({ "email": email.trim() });
        let request = Self::post("recover", body, self.reset_redirect.as_deref())?;
        self.http_client.request(request, None).await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), NetworkError> {
        let request = Self::post("logout", json!({}), None)?;
        match self.http_client.request(request, Some(access_token)).await {
            Ok(_) => Ok(()),
            // Already revoked upstream
            Err(error) if error.is_unauthorized() => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, NetworkError> {
        let request = HttpRequest::builder(HttpMethod::Get, "user")
            .build()
            .map_err(HttpError::from)?;
        match self.http_client.request(request, Some(access_token)).await {
            Ok(response) => serde_json::from_value(response.body)
                .map(Some)
                .map_err(|e| NetworkError::new(Some(response.code), format!("Malformed user: {e}"))),
            Err(error) if is_client_rejection(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<Session>, NetworkError> {
        let body = json!({ "refresh_token": refresh_token });
        match self.token_grant("refresh_token", body).await {
            Ok(body) => parse_token_response(body).map(Some),
            Err(error) if is_client_rejection(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
