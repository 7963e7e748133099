//! Integration tests for the session and authorization context.
//!
//! These tests drive [`SessionContext`] through sign-in, sign-out, session
//! restore and token refresh with in-memory auth and profile backends, and
//! check the authorization views subscribers observe along the way.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use technexus_portal::auth::{AuthEvent, AuthUser};
use technexus_portal::routes::{guard, navigation, Route, RouteDecision};
use technexus_portal::{
    AuthService, AuthState, AuthenticationError, AuthorizationView, Email, HttpError,
    HttpResponseError, NetworkError, Profile, ProfileStore, RestError, Session, SessionContext,
    SignUpOutcome, StoreError, ValidationError,
};
use tokio::sync::Notify;

// ============================================================================
// In-memory backends
// ============================================================================

const ADMIN_EMAIL: &str = "admin@technexus.ng";
const ADMIN_ID: &str = "admin-1";
const USER_EMAIL: &str = "ada@example.com";
const USER_ID: &str = "user-1";
const OTHER_EMAIL: &str = "eve@example.com";
const OTHER_ID: &str = "user-2";
const PASSWORD: &str = "correct-horse";

/// Auth backend with three accounts sharing one password.
#[derive(Default)]
struct FakeAuth {
    unreachable: AtomicBool,
    revoked: Mutex<HashSet<String>>,
    logouts: AtomicUsize,
    logout_fails: AtomicBool,
    /// Set by a test subscriber once it has seen a signed-out view.
    signed_out_seen: Arc<AtomicBool>,
    /// Value of `signed_out_seen` at each upstream logout.
    logout_observations: Mutex<Vec<bool>>,
    sign_in_gate: Mutex<Option<Arc<Notify>>>,
    sign_in_started: Notify,
}

impl FakeAuth {
    fn subject_for(email: &str) -> Option<&'static str> {
        match email {
            ADMIN_EMAIL => Some(ADMIN_ID),
            USER_EMAIL => Some(USER_ID),
            OTHER_EMAIL => Some(OTHER_ID),
            _ => None,
        }
    }

    fn session_for(subject: &str, generation: u32) -> Session {
        Session::new(subject, format!("token-{subject}-{generation}"))
            .with_refresh_token(format!("refresh-{subject}"))
            .with_expires_at(Utc::now() + Duration::hours(1))
    }

    /// Holds password checks until the returned handle is notified.
    fn gate_sign_in(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.sign_in_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().insert(token.to_string());
    }

    fn network_error(&self) -> Option<NetworkError> {
        self.unreachable
            .load(Ordering::SeqCst)
            .then(|| NetworkError::new(None, "connection refused"))
    }
}

impl AuthService for FakeAuth {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let gate = self.sign_in_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.sign_in_started.notify_one();
            gate.notified().await;
        }
        if let Some(error) = self.network_error() {
            return Err(error.into());
        }
        match Self::subject_for(email) {
            Some(subject) if password == PASSWORD => {
                Ok(Self::session_for(subject, 1).with_email(email))
            }
            _ => Err(AuthenticationError::InvalidCredentials),
        }
    }

    async fn sign_up(
        &self,
        email: &Email,
        _password: &str,
        _full_name: &str,
    ) -> Result<SignUpOutcome, ValidationError> {
        if Self::subject_for(email.as_ref()).is_some() {
            return Err(ValidationError::AlreadyRegistered);
        }
        Ok(SignUpOutcome {
            email: email.clone(),
            user_id: Some("user-new".to_string()),
            confirmation_required: true,
        })
    }

    async fn reset_password_for_email(&self, _email: &str) -> Result<(), NetworkError> {
        self.network_error().map_or(Ok(()), Err)
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), NetworkError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        self.logout_observations
            .lock()
            .unwrap()
            .push(self.signed_out_seen.load(Ordering::SeqCst));
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(NetworkError::new(Some(503), "Service unavailable"));
        }
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, NetworkError> {
        if let Some(error) = self.network_error() {
            return Err(error);
        }
        if self.revoked.lock().unwrap().contains(access_token) {
            return Ok(None);
        }
        let subject = access_token
            .strip_prefix("token-")
            .and_then(|rest| rest.rsplit_once('-'))
            .map(|(subject, _)| subject.to_string());
        Ok(subject.map(|id| AuthUser {
            id,
            email: None,
            email_confirmed_at: Some(Utc::now()),
            user_metadata: serde_json::Value::Null,
        }))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<Session>, NetworkError> {
        if let Some(error) = self.network_error() {
            return Err(error);
        }
        if self.revoked.lock().unwrap().contains(refresh_token) {
            return Ok(None);
        }
        Ok(refresh_token
            .strip_prefix("refresh-")
            .map(|subject| Self::session_for(subject, 2)))
    }
}

/// Profile backend where `admin-1` is the only administrator.
#[derive(Default)]
struct FakeProfiles {
    missing: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<String, u16>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    started: Notify,
    fetches: AtomicUsize,
}

impl FakeProfiles {
    /// Holds fetches for `subject` until the returned handle is notified.
    fn gate(&self, subject: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(subject.to_string(), Arc::clone(&gate));
        gate
    }

    fn fail_with(&self, subject: &str, code: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(subject.to_string(), code);
    }
}

impl ProfileStore for FakeProfiles {
    async fn fetch_profile(
        &self,
        subject: &str,
        _access_token: &str,
    ) -> Result<Option<Profile>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(subject).cloned();
        if let Some(gate) = gate {
            self.started.notify_one();
            gate.notified().await;
        }

        let failure = self.failures.lock().unwrap().get(subject).copied();
        if let Some(code) = failure {
            return Err(StoreError::Rest(RestError::Http(HttpError::Response(
                HttpResponseError {
                    code,
                    message: format!("Request failed with status {code}"),
                    error_code: None,
                    error_reference: None,
                },
            ))));
        }
        if self.missing.lock().unwrap().contains(subject) {
            return Ok(None);
        }

        Ok(Some(Profile {
            subject: subject.to_string(),
            display_name: Some(format!("Name of {subject}")),
            company: None,
            phone: None,
            is_admin: subject == ADMIN_ID,
            created_at: None,
        }))
    }
}

type Context = SessionContext<FakeAuth, FakeProfiles>;

async fn ready_context() -> Arc<Context> {
    let context = Arc::new(SessionContext::new(
        FakeAuth::default(),
        FakeProfiles::default(),
    ));
    context.initialize(None).await;
    context
}

fn record(context: &Context) -> Arc<Mutex<Vec<AuthorizationView>>> {
    let views = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&views);
    context.subscribe(move |view| sink.lock().unwrap().push(*view));
    views
}

fn view(is_authenticated: bool, is_admin: bool, is_loading: bool) -> AuthorizationView {
    AuthorizationView {
        is_authenticated,
        is_admin,
        is_loading,
    }
}

// ============================================================================
// Sign-in scenarios
// ============================================================================

#[tokio::test]
async fn test_admin_sign_in_grants_admin_panel() {
    let context = ready_context().await;
    let views = record(&context);

    let session = context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();

    assert_eq!(session.subject, ADMIN_ID);
    assert!(context.is_authenticated());
    assert!(context.is_admin());
    assert!(!context.is_loading());
    assert_eq!(guard(&context.view(), Route::Admin), RouteDecision::Render);
    assert!(navigation(&context.view())
        .iter()
        .any(|item| item.label == "Admin Panel"));

    // Authenticated first, admin only once the profile arrived
    assert_eq!(
        *views.lock().unwrap(),
        vec![view(true, false, true), view(true, true, false)]
    );
}

#[tokio::test]
async fn test_regular_user_is_kept_out_of_admin() {
    let context = ready_context().await;

    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();

    assert!(context.is_authenticated());
    assert!(!context.is_admin());
    assert_eq!(guard(&context.view(), Route::Dashboard), RouteDecision::Render);
    assert_eq!(
        guard(&context.view(), Route::Admin),
        RouteDecision::Redirect("/auth")
    );
    assert_eq!(
        context.profile().and_then(|p| p.display_name),
        Some("Name of user-1".to_string())
    );
}

#[tokio::test]
async fn test_wrong_password_changes_nothing() {
    let context = ready_context().await;
    let views = record(&context);

    let error = context.sign_in(ADMIN_EMAIL, "guess").await.unwrap_err();

    assert_eq!(error, AuthenticationError::InvalidCredentials);
    assert_eq!(error.to_string(), "Invalid login credentials");
    assert_eq!(context.state(), AuthState::Anonymous);
    assert!(views.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_auth_service_is_transient() {
    let context = ready_context().await;
    context.auth_service().unreachable.store(true, Ordering::SeqCst);

    let error = context.sign_in(USER_EMAIL, PASSWORD).await.unwrap_err();

    assert!(error.is_transient());
    assert!(!context.is_authenticated());
}

#[tokio::test]
async fn test_admin_route_waits_for_profile() {
    let context = ready_context().await;
    let gate = context.profile_store().gate(ADMIN_ID);

    let signing_in = {
        let context = Arc::clone(&context);
        tokio::spawn(async move { context.sign_in(ADMIN_EMAIL, PASSWORD).await })
    };
    context.profile_store().started.notified().await;

    assert_eq!(context.view(), view(true, false, true));
    assert_eq!(guard(&context.view(), Route::Admin), RouteDecision::Loading);
    assert!(!navigation(&context.view())
        .iter()
        .any(|item| item.label == "Admin Panel"));

    gate.notify_one();
    signing_in.await.unwrap().unwrap();

    assert_eq!(context.view(), view(true, true, false));
}

#[tokio::test]
async fn test_profile_of_previous_user_is_discarded() {
    let context = ready_context().await;
    let views = record(&context);
    let gate = context.profile_store().gate(ADMIN_ID);

    // Admin signs in; their profile fetch stalls
    let signing_in = {
        let context = Arc::clone(&context);
        tokio::spawn(async move { context.sign_in(ADMIN_EMAIL, PASSWORD).await })
    };
    context.profile_store().started.notified().await;

    // Admin signs out and a regular user signs in on the same device
    context.sign_out().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();

    // The stale admin profile finally arrives
    gate.notify_one();
    signing_in.await.unwrap().unwrap();

    assert_eq!(context.current_user().unwrap().subject, USER_ID);
    assert_eq!(context.profile().unwrap().subject, USER_ID);
    assert!(!context.is_admin());
    assert_eq!(
        *views.lock().unwrap(),
        vec![
            view(true, false, true),
            view(false, false, false),
            view(true, false, true),
            view(true, false, false),
        ]
    );
    assert!(views.lock().unwrap().iter().all(|v| !v.is_admin));
}

#[tokio::test]
async fn test_missing_profile_is_not_admin() {
    let context = ready_context().await;
    context
        .profile_store()
        .missing
        .lock()
        .unwrap()
        .insert(ADMIN_ID.to_string());

    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();

    assert!(context.is_authenticated());
    assert!(!context.is_admin());
    assert!(!context.is_loading());
    assert!(context.profile().is_none());
}

#[tokio::test]
async fn test_failed_profile_fetch_withholds_admin() {
    let context = ready_context().await;
    context.profile_store().fail_with(ADMIN_ID, 500);

    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();

    assert!(context.is_authenticated());
    assert!(!context.is_admin());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_rejected_token_during_profile_fetch_signs_out() {
    let context = ready_context().await;
    context.profile_store().fail_with(ADMIN_ID, 401);

    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();

    assert_eq!(context.state(), AuthState::Anonymous);
    assert_eq!(context.view(), view(false, false, false));
}

// ============================================================================
// Sign-out
// ============================================================================

#[tokio::test]
async fn test_sign_out_clears_before_upstream_logout() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();

    let seen = Arc::clone(&context.auth_service().signed_out_seen);
    context.subscribe(move |view| {
        if !view.is_authenticated {
            seen.store(true, Ordering::SeqCst);
        }
    });

    context.sign_out().await;

    assert_eq!(
        *context.auth_service().logout_observations.lock().unwrap(),
        vec![true]
    );
    assert_eq!(context.view(), view(false, false, false));
}

#[tokio::test]
async fn test_sign_out_during_credential_check_cancels_sign_in() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    let gate = context.auth_service().gate_sign_in();
    let views = record(&context);

    let signing_in = {
        let context = Arc::clone(&context);
        tokio::spawn(async move { context.sign_in(ADMIN_EMAIL, PASSWORD).await })
    };
    context.auth_service().sign_in_started.notified().await;

    context.sign_out().await;
    assert!(!context.is_authenticated());

    // The password check completes only after the user asked to leave
    gate.notify_one();
    let error = signing_in.await.unwrap().unwrap_err();

    assert_eq!(error, AuthenticationError::Cancelled);
    assert!(!error.is_transient());
    assert_eq!(context.state(), AuthState::Anonymous);
    assert!(!context.is_admin());
    assert_eq!(*views.lock().unwrap(), vec![view(false, false, false)]);
    // The discarded admin session is revoked upstream as well
    assert_eq!(context.auth_service().logouts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_sign_out_survives_upstream_failure() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();
    context
        .auth_service()
        .logout_fails
        .store(true, Ordering::SeqCst);

    context.sign_out().await;

    assert_eq!(context.state(), AuthState::Anonymous);
    assert!(!context.is_admin());
    assert!(context.access_token().is_none());
}

#[tokio::test]
async fn test_sign_out_is_idempotent() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    let views = record(&context);

    context.sign_out().await;
    context.sign_out().await;

    assert_eq!(context.auth_service().logouts.load(Ordering::SeqCst), 1);
    assert_eq!(*views.lock().unwrap(), vec![view(false, false, false)]);
}

#[tokio::test]
async fn test_signed_out_event_drops_session_without_logout() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();

    context.handle_auth_event(AuthEvent::SignedOut).await;

    assert!(!context.is_authenticated());
    assert_eq!(context.auth_service().logouts.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Session restore and refresh
// ============================================================================

#[tokio::test]
async fn test_initialize_restores_verified_session() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    assert!(context.is_loading());

    context
        .initialize(Some(FakeAuth::session_for(ADMIN_ID, 1)))
        .await;

    assert!(context.is_authenticated());
    assert!(context.is_admin());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_initialize_drops_revoked_session() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    let session = FakeAuth::session_for(USER_ID, 1);
    context.auth_service().revoke(&session.access_token);

    context.initialize(Some(session)).await;

    assert_eq!(context.view(), view(false, false, false));
    assert_eq!(context.profile_store().fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_initialize_keeps_session_when_offline() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    context.auth_service().unreachable.store(true, Ordering::SeqCst);

    context
        .initialize(Some(FakeAuth::session_for(USER_ID, 1)))
        .await;

    assert!(context.is_authenticated());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_initialize_refreshes_expired_session() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    let expired = FakeAuth::session_for(USER_ID, 1).with_expires_at(Utc::now() - Duration::minutes(5));

    context.initialize(Some(expired)).await;

    assert!(context.is_authenticated());
    assert_eq!(context.access_token().as_deref(), Some("token-user-1-2"));
}

#[tokio::test]
async fn test_initialize_drops_expired_session_without_refresh_token() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    let expired = Session::new(USER_ID, "token-user-1-1")
        .with_expires_at(Utc::now() - Duration::minutes(5));

    context.initialize(Some(expired)).await;

    assert!(!context.is_authenticated());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_token_refresh_keeps_admin_without_refetching() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();
    let fetches = context.profile_store().fetches.load(Ordering::SeqCst);
    let views = record(&context);

    let refreshed = context.refresh_session().await.unwrap().unwrap();

    assert_eq!(refreshed.access_token, "token-admin-1-2");
    assert_eq!(context.access_token().as_deref(), Some("token-admin-1-2"));
    assert!(context.is_admin());
    assert_eq!(context.profile_store().fetches.load(Ordering::SeqCst), fetches);
    assert_eq!(*views.lock().unwrap(), vec![view(true, true, false)]);
}

#[tokio::test]
async fn test_rejected_refresh_token_signs_out() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    context.auth_service().revoke("refresh-user-1");

    assert!(context.refresh_session().await.unwrap().is_none());
    assert!(!context.is_authenticated());
}

#[tokio::test]
async fn test_refresh_while_offline_keeps_session() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    context.auth_service().unreachable.store(true, Ordering::SeqCst);

    assert!(context.refresh_session().await.is_err());
    assert!(context.is_authenticated());
}

#[tokio::test]
async fn test_initial_session_event_installs_and_loads_profile() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    let views = record(&context);
    assert!(context.is_loading());

    context
        .handle_auth_event(AuthEvent::InitialSession(Some(FakeAuth::session_for(
            ADMIN_ID, 1,
        ))))
        .await;

    assert!(!context.is_loading());
    assert!(context.is_admin());
    assert_eq!(context.profile().unwrap().subject, ADMIN_ID);
    assert_eq!(
        *views.lock().unwrap(),
        vec![view(true, false, true), view(true, true, false)]
    );
}

#[tokio::test]
async fn test_late_initial_session_does_not_replace_sign_in() {
    let context = SessionContext::new(FakeAuth::default(), FakeProfiles::default());
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();

    context.handle_auth_event(AuthEvent::InitialSession(None)).await;
    assert_eq!(context.current_user().unwrap().subject, USER_ID);

    context
        .handle_auth_event(AuthEvent::InitialSession(Some(FakeAuth::session_for(
            ADMIN_ID, 1,
        ))))
        .await;
    assert_eq!(context.current_user().unwrap().subject, USER_ID);
    assert!(!context.is_admin());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_signed_in_event_for_other_user_reloads_profile() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();
    assert!(context.is_admin());

    context
        .handle_auth_event(AuthEvent::SignedIn(FakeAuth::session_for(OTHER_ID, 1)))
        .await;

    assert_eq!(context.current_user().unwrap().subject, OTHER_ID);
    assert!(!context.is_admin());
}

// ============================================================================
// Profile refresh
// ============================================================================

#[tokio::test]
async fn test_failed_profile_refresh_withdraws_admin() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();
    assert!(context.is_admin());

    context.profile_store().fail_with(ADMIN_ID, 500);

    assert!(context.refresh_profile().await.is_none());
    assert!(context.is_authenticated());
    assert!(!context.is_admin());
    assert!(!context.is_loading());
}

#[tokio::test]
async fn test_profile_refresh_reflects_new_row() {
    let context = ready_context().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();

    let profile = context.refresh_profile().await.unwrap();

    assert_eq!(profile.subject, USER_ID);
    assert_eq!(context.profile_store().fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_profile_refresh_for_previous_user_is_discarded() {
    let context = ready_context().await;
    context.sign_in(ADMIN_EMAIL, PASSWORD).await.unwrap();
    let gate = context.profile_store().gate(ADMIN_ID);

    let refreshing = {
        let context = Arc::clone(&context);
        tokio::spawn(async move { context.refresh_profile().await })
    };
    context.profile_store().started.notified().await;

    context.sign_out().await;
    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    gate.notify_one();

    assert!(refreshing.await.unwrap().is_none());
    assert_eq!(context.current_user().unwrap().subject, USER_ID);
    assert_eq!(context.profile().unwrap().subject, USER_ID);
    assert!(!context.is_admin());
}

#[tokio::test]
async fn test_refresh_profile_without_session() {
    let context = ready_context().await;
    assert!(context.refresh_profile().await.is_none());
    assert_eq!(context.profile_store().fetches.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Registration, reset and subscriptions
// ============================================================================

#[tokio::test]
async fn test_sign_up_never_signs_in() {
    let context = ready_context().await;

    let outcome = context
        .sign_up("new@example.com", PASSWORD, "New Person")
        .await
        .unwrap();

    assert!(outcome.confirmation_required);
    assert!(!context.is_authenticated());

    let error = context
        .sign_up(USER_EMAIL, PASSWORD, "Ada Obi")
        .await
        .unwrap_err();
    assert_eq!(error, ValidationError::AlreadyRegistered);
}

#[tokio::test]
async fn test_password_reset_reports_network_failure() {
    let context = ready_context().await;
    assert!(context.request_password_reset("nobody@example.com").await.is_ok());

    context.auth_service().unreachable.store(true, Ordering::SeqCst);
    assert!(context.request_password_reset(USER_EMAIL).await.is_err());
}

#[tokio::test]
async fn test_unsubscribed_callback_is_not_called() {
    let context = ready_context().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = context.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    context.sign_in(USER_EMAIL, PASSWORD).await.unwrap();
    let after_sign_in = calls.load(Ordering::SeqCst);
    assert!(context.unsubscribe(id));
    assert!(!context.unsubscribe(id));
    context.sign_out().await;

    assert_eq!(after_sign_in, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
