//! Integration tests for the HTTP auth service client.
//!
//! These tests run [`AuthClient`] against a mock auth service and verify the
//! request shapes, the session built from token grants, and how upstream
//! failures are classified.

use serde_json::json;
use technexus_portal::auth::{AuthClient, AuthService};
use technexus_portal::{
    AnonKey, AuthenticationError, Email, PortalConfig, ProjectUrl, SiteUrl, ValidationError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> PortalConfig {
    PortalConfig::builder()
        .project_url(ProjectUrl::new(server.uri()).unwrap())
        .anon_key(AnonKey::new("anon-key").unwrap())
        .site_url(SiteUrl::new("https://technexus.ng").unwrap())
        .build()
        .unwrap()
}

fn client_for(server: &MockServer) -> AuthClient {
    AuthClient::new(&config_for(server)).unwrap()
}

fn token_body(user_id: &str, access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": {
            "id": user_id,
            "email": "ada@example.com",
            "user_metadata": { "full_name": "Ada Obi" }
        }
    })
}

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn test_sign_in_sends_password_grant_and_builds_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("u-1", "access-1")))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_in_with_password(" ada@example.com ", "secret")
        .await
        .unwrap();

    assert_eq!(session.subject, "u-1");
    assert_eq!(session.email.as_deref(), Some("ada@example.com"));
    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert!(session.is_active());
    assert!(session.expires_in().is_some());
}

#[tokio::test]
async fn test_sign_in_wrong_password_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .sign_in_with_password("ada@example.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(error, AuthenticationError::InvalidCredentials);
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_sign_in_unconfirmed_email_is_not_verified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_code": "email_not_confirmed",
            "msg": "Email not confirmed"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .sign_in_with_password("ada@example.com", "secret")
        .await
        .unwrap_err();

    assert_eq!(error, AuthenticationError::NotVerified);
}

#[tokio::test]
async fn test_sign_in_server_failure_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .sign_in_with_password("ada@example.com", "secret")
        .await
        .unwrap_err();

    match error {
        AuthenticationError::Network(e) => {
            assert_eq!(e.status, Some(503));
            assert_eq!(e.message, "upstream unavailable");
        }
        other => panic!("Expected Network, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_sign_in_rate_limit_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "msg": "Too many requests"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .sign_in_with_password("ada@example.com", "secret")
        .await
        .unwrap_err();

    assert!(error.is_transient());
}

// ============================================================================
// Sign-up and password reset
// ============================================================================

#[tokio::test]
async fn test_sign_up_sends_full_name_and_confirmation_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(query_param("redirect_to", "https://technexus.ng/dashboard"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret",
            "data": { "full_name": "Ada Obi" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-9",
            "email": "ada@example.com",
            "confirmation_sent_at": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let email = Email::new("ada@example.com").unwrap();
    let outcome = client_for(&server)
        .sign_up(&email, "secret", "Ada Obi")
        .await
        .unwrap();

    assert_eq!(outcome.email, email);
    assert_eq!(outcome.user_id.as_deref(), Some("u-9"));
    assert!(outcome.confirmation_required);
}

#[tokio::test]
async fn test_sign_up_existing_account_is_already_registered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error_code": "user_already_exists",
            "msg": "User already registered"
        })))
        .mount(&server)
        .await;

    let email = Email::new("ada@example.com").unwrap();
    let error = client_for(&server)
        .sign_up(&email, "secret", "Ada Obi")
        .await
        .unwrap_err();

    assert_eq!(error, ValidationError::AlreadyRegistered);
}

#[tokio::test]
async fn test_sign_up_weak_password_keeps_upstream_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error_code": "weak_password",
            "msg": "Password should contain a digit"
        })))
        .mount(&server)
        .await;

    let email = Email::new("ada@example.com").unwrap();
    let error = client_for(&server)
        .sign_up(&email, "secretpw", "Ada Obi")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ValidationError::WeakPassword {
            reason: "Password should contain a digit".to_string()
        }
    );
}

#[tokio::test]
async fn test_password_reset_sends_reset_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(query_param(
            "redirect_to",
            "https://technexus.ng/auth?mode=reset-password",
        ))
        .and(body_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .reset_password_for_email("ada@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_password_reset_server_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "msg": "Error sending recovery email"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .reset_password_for_email("ada@example.com")
        .await
        .unwrap_err();

    assert_eq!(error.status, Some(500));
    assert_eq!(error.message, "Error sending recovery email");
}

// ============================================================================
// Sign-out, user lookup and refresh
// ============================================================================

#[tokio::test]
async fn test_sign_out_authenticates_as_the_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).sign_out("access-1").await.unwrap();
}

#[tokio::test]
async fn test_sign_out_of_revoked_token_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "msg": "invalid JWT"
        })))
        .mount(&server)
        .await;

    assert!(client_for(&server).sign_out("stale").await.is_ok());
}

#[tokio::test]
async fn test_get_user_returns_record_or_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "email_confirmed_at": "2024-05-01T10:00:00Z",
            "user_metadata": { "full_name": "Ada Obi" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer revoked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "msg": "invalid JWT"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let user = client.get_user("good").await.unwrap().unwrap();
    assert_eq!(user.id, "u-1");
    assert_eq!(user.full_name(), Some("Ada Obi"));
    assert!(user.email_confirmed_at.is_some());

    assert!(client.get_user("revoked").await.unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_session_rotates_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("u-1", "access-2")))
        .mount(&server)
        .await;

    let session = client_for(&server)
        .refresh_session("refresh-1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.subject, "u-1");
    assert_eq!(session.access_token, "access-2");
}

#[tokio::test]
async fn test_refresh_with_rejected_token_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_code": "refresh_token_not_found",
            "msg": "Invalid Refresh Token: Refresh Token Not Found"
        })))
        .mount(&server)
        .await;

    assert!(client_for(&server)
        .refresh_session("gone")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_client_without_site_url_sends_no_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = PortalConfig::builder()
        .project_url(ProjectUrl::new(server.uri()).unwrap())
        .anon_key(AnonKey::new("anon-key").unwrap())
        .build()
        .unwrap();
    AuthClient::new(&config)
        .unwrap()
        .reset_password_for_email("ada@example.com")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
}
