//! The session and authorization context.
//!
//! [`SessionContext`] is the single source of truth for who is signed in and
//! whether they may use the admin console. It moves through three states:
//!
//! ```text
//! Anonymous ──sign in──▶ ProfilePending(session) ──profile──▶ Authorized(session, profile?)
//!     ▲                          │                                   │
//!     └────── sign out / upstream invalidation ◀─────────────────────┘
//! ```
//!
//! # Ordering
//!
//! Every transition and the notification of its view happen under one
//! transition lock, so subscribers observe views in transition order. A
//! session becomes visible (`is_authenticated`) before its profile can grant
//! `is_admin`.
//!
//! # Staleness
//!
//! Each installed or cleared session bumps a generation counter. A profile
//! fetch remembers the generation and subject it was started for; its result
//! is dropped unless both still match when it completes.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::{
    AuthEvent, AuthService, AuthenticationError, AuthorizationView, NetworkError, Session,
    SignUpOutcome, ValidationError,
};
use crate::config::Email;
use crate::store::{Profile, ProfileStore, StoreError};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication state held by a [`SessionContext`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No session.
    #[default]
    Anonymous,
    /// A session is installed and its profile is being fetched.
    ProfilePending {
        /// The installed session.
        session: Session,
    },
    /// The profile fetch for the session has completed.
    Authorized {
        /// The installed session.
        session: Session,
        /// The fetched profile; `None` when no row exists or the fetch failed.
        profile: Option<Profile>,
    },
}

impl AuthState {
    /// Returns the installed session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Anonymous => None,
            Self::ProfilePending { session } | Self::Authorized { session, .. } => Some(session),
        }
    }

    /// Returns the fetched profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authorized {
                profile: Some(profile),
                ..
            } => Some(profile),
            _ => None,
        }
    }

    /// Returns `true` only for a fetched profile of the current session with
    /// the administrator flag set.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        match self {
            Self::Authorized {
                session,
                profile: Some(profile),
            } => profile.is_admin && profile.subject == session.subject,
            _ => false,
        }
    }

    fn into_session(self) -> Option<Session> {
        match self {
            Self::Anonymous => None,
            Self::ProfilePending { session } | Self::Authorized { session, .. } => Some(session),
        }
    }
}

/// Handle returned by [`SessionContext::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&AuthorizationView) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

#[derive(Debug, Default)]
struct Inner {
    auth: AuthState,
    generation: u64,
    /// Bumped by every sign-out or invalidation.
    clears: u64,
    initialized: bool,
}

impl Inner {
    fn view(&self) -> AuthorizationView {
        let pending = matches!(self.auth, AuthState::ProfilePending { .. });
        AuthorizationView {
            is_authenticated: self.auth.session().is_some(),
            is_admin: self.auth.is_admin(),
            is_loading: !self.initialized || pending,
        }
    }

    fn ticket(&self) -> Option<ProfileTicket> {
        self.auth.session().map(|session| ProfileTicket {
            generation: self.generation,
            subject: session.subject.clone(),
            access_token: session.access_token.clone(),
        })
    }

    fn install(&mut self, session: Session) -> ProfileTicket {
        self.generation += 1;
        self.initialized = true;
        let ticket = ProfileTicket {
            generation: self.generation,
            subject: session.subject.clone(),
            access_token: session.access_token.clone(),
        };
        self.auth = AuthState::ProfilePending { session };
        ticket
    }

    fn is_current(&self, generation: u64, subject: &str) -> bool {
        self.generation == generation
            && self.auth.session().is_some_and(|s| s.subject == subject)
    }
}

/// What a profile fetch was started for.
#[derive(Debug)]
struct ProfileTicket {
    generation: u64,
    subject: String,
    access_token: String,
}

thread_local! {
    static NOTIFYING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running subscriber callbacks.
struct NotifyingGuard;

impl NotifyingGuard {
    fn enter() -> Self {
        NOTIFYING.with(|flag| flag.set(true));
        Self
    }

    fn active() -> bool {
        NOTIFYING.with(Cell::get)
    }
}

impl Drop for NotifyingGuard {
    fn drop(&mut self) {
        NOTIFYING.with(|flag| flag.set(false));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the current session and the authorization flags derived from it.
///
/// Construct one at application start, share it through an [`Arc`], and feed
/// it the auth service's session events with
/// [`handle_auth_event`](Self::handle_auth_event).
///
/// Subscriber callbacks run synchronously while the transition lock is held.
/// They may read the context. A transition started from inside a callback
/// (`invalidate`, for instance) is logged and ignored.
///
/// # Thread Safety
///
/// `SessionContext` is `Send + Sync` whenever its service and store are.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use technexus_portal::{AuthClient, RestClient, SessionContext};
///
/// let context = Arc::new(SessionContext::new(
///     AuthClient::new(&config)?,
///     RestClient::new(&config)?,
/// ));
/// context.initialize(None).await;
///
/// context.sign_in("admin@technexus.ng", "secret").await?;
/// assert!(context.is_authenticated());
/// if context.is_admin() {
///     // show the admin panel link
/// }
/// ```
pub struct SessionContext<A, P> {
    auth: A,
    profiles: P,
    state: RwLock<Inner>,
    transition: Mutex<()>,
    subscribers: Mutex<Subscribers>,
}

impl<A, P> fmt::Debug for SessionContext<A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read(&self.state);
        f.debug_struct("SessionContext")
            .field("state", &state.auth)
            .field("generation", &state.generation)
            .field("initialized", &state.initialized)
            .finish_non_exhaustive()
    }
}

impl<A: AuthService, P: ProfileStore> SessionContext<A, P> {
    /// Creates a context in the Anonymous state with `is_loading` set until
    /// [`initialize`](Self::initialize) completes.
    #[must_use]
    pub fn new(auth: A, profiles: P) -> Self {
        Self {
            auth,
            profiles,
            state: RwLock::new(Inner::default()),
            transition: Mutex::new(()),
            subscribers: Mutex::new(Subscribers::default()),
        }
    }

    /// Returns the auth service.
    #[must_use]
    pub const fn auth_service(&self) -> &A {
        &self.auth
    }

    /// Returns the profile store.
    #[must_use]
    pub const fn profile_store(&self) -> &P {
        &self.profiles
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Returns a snapshot of the authentication state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        read(&self.state).auth.clone()
    }

    /// Returns the derived authorization view.
    #[must_use]
    pub fn view(&self) -> AuthorizationView {
        read(&self.state).view()
    }

    /// Returns the current session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<Session> {
        read(&self.state).auth.session().cloned()
    }

    /// Returns the fetched profile of the current session, if any.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        read(&self.state).auth.profile().cloned()
    }

    /// Returns the access token of the current session, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        read(&self.state)
            .auth
            .session()
            .map(|s| s.access_token.clone())
    }

    /// Returns `true` if a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.view().is_authenticated
    }

    /// Returns `true` if the current session's profile grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.view().is_admin
    }

    /// Returns `true` while the initial check or a profile fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.view().is_loading
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Registers `callback` to receive every view change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AuthorizationView) + Send + Sync + 'static,
    {
        let mut subscribers = lock(&self.subscribers);
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        let callback: Callback = Arc::new(callback);
        subscribers.callbacks.push((id, callback));
        id
    }

    /// Removes a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.callbacks.len();
        subscribers.callbacks.retain(|(existing, _)| *existing != id);
        subscribers.callbacks.len() != before
    }

    /// Applies `change` and notifies subscribers when it returns `Some`.
    fn transition<R>(
        &self,
        reason: &'static str,
        change: impl FnOnce(&mut Inner) -> Option<R>,
    ) -> Option<R> {
        if NotifyingGuard::active() {
            tracing::error!(reason, "state change requested from a subscriber callback, ignored");
            return None;
        }
        let _serial = lock(&self.transition);
        let (result, view) = {
            let mut state = write(&self.state);
            let result = change(&mut state)?;
            (result, state.view())
        };

        tracing::debug!(
            reason,
            is_authenticated = view.is_authenticated,
            is_admin = view.is_admin,
            is_loading = view.is_loading,
            "session state changed"
        );

        let callbacks: Vec<Callback> = lock(&self.subscribers)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        let _notifying = NotifyingGuard::enter();
        for callback in callbacks {
            callback(&view);
        }
        Some(result)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Runs the start-up check of a persisted session.
    ///
    /// An expired session is refreshed when it carries a refresh token; a
    /// session the auth service rejects resolves to Anonymous. A session that
    /// cannot be verified because the auth service is unreachable is kept and
    /// its profile fetched as usual. `is_loading` turns false when this
    /// completes. A sign-in or sign-out that happens meanwhile wins.
    pub async fn initialize(&self, persisted: Option<Session>) {
        let generation = read(&self.state).generation;
        let session = match persisted {
            Some(session) => self.verify_persisted(session).await,
            None => None,
        };
        self.finish_initialization(generation, session).await;
    }

    async fn verify_persisted(&self, session: Session) -> Option<Session> {
        if session.expired() {
            let Some(refresh_token) = session.refresh_token.as_deref() else {
                tracing::debug!(subject = %session.subject, "persisted session expired");
                return None;
            };
            return match self.auth.refresh_session(refresh_token).await {
                Ok(refreshed) => refreshed,
                Err(error) => {
                    tracing::warn!(subject = %session.subject, error = %error, "could not refresh persisted session");
                    None
                }
            };
        }

        match self.auth.get_user(&session.access_token).await {
            Ok(Some(user)) if user.id == session.subject => Some(session),
            Ok(_) => {
                tracing::debug!(subject = %session.subject, "persisted session rejected upstream");
                None
            }
            Err(error) => {
                tracing::warn!(subject = %session.subject, error = %error, "could not verify persisted session, keeping it");
                Some(session)
            }
        }
    }

    async fn finish_initialization(&self, generation: u64, session: Option<Session>) {
        let ticket = self
            .transition("initial session", |state| {
                if state.initialized {
                    tracing::debug!("initial session arrived after initialization, ignored");
                    return None;
                }
                state.initialized = true;
                if state.generation != generation {
                    tracing::debug!("initial session superseded");
                    return Some(None);
                }
                Some(session.map(|session| state.install(session)))
            })
            .flatten();

        if let Some(ticket) = ticket {
            self.load_profile(ticket).await;
        }
    }

    /// Feeds a session event from the auth service into the context.
    ///
    /// Only the first initial session counts; a later `InitialSession` is
    /// ignored.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::InitialSession(session) => {
                let generation = read(&self.state).generation;
                self.finish_initialization(generation, session).await;
            }
            AuthEvent::SignedIn(session) => self.accept_session(session, "signed in").await,
            AuthEvent::TokenRefreshed(session) => {
                self.accept_session(session, "token refreshed").await;
            }
            AuthEvent::SignedOut => {
                self.invalidate();
            }
        }
    }

    /// Installs `session`, keeping the fetched profile when it only rotates
    /// the tokens of the current subject.
    async fn accept_session(&self, session: Session, reason: &'static str) {
        let rotated = self.transition(reason, |state| {
            state.initialized = true;
            rotate_tokens(&mut state.auth, &session)
        });
        if rotated.is_some() {
            return;
        }

        let ticket = self.transition(reason, |state| Some(state.install(session)));
        if let Some(ticket) = ticket {
            self.load_profile(ticket).await;
        }
    }

    /// Exchanges the current refresh token for new tokens.
    ///
    /// Returns the new session, or `None` when there is no session, it has no
    /// refresh token, or the refresh token was rejected. A rejected refresh
    /// token invalidates the session.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] if the auth service could not be reached; the
    /// session is kept.
    pub async fn refresh_session(&self) -> Result<Option<Session>, NetworkError> {
        let (generation, current) = {
            let state = read(&self.state);
            (state.generation, state.auth.session().cloned())
        };
        let Some(refresh_token) = current.and_then(|s| s.refresh_token) else {
            return Ok(None);
        };

        match self.auth.refresh_session(&refresh_token).await? {
            Some(session) => {
                let applied = self.transition("token refreshed", |state| {
                    if state.generation != generation {
                        return None;
                    }
                    rotate_tokens(&mut state.auth, &session)
                });
                if applied.is_none() {
                    tracing::warn!("discarding refreshed tokens for a superseded session");
                    return Ok(None);
                }
                Ok(Some(session))
            }
            None => {
                self.clear(Some(generation), "refresh token rejected");
                Ok(None)
            }
        }
    }

    /// Drops the current session after an upstream invalidation, such as a
    /// 401 from the data API. No logout request is sent.
    ///
    /// Returns `true` if a session was dropped.
    pub fn invalidate(&self) -> bool {
        self.clear(None, "session invalidated").is_some()
    }

    /// Clears the session and bumps the generation.
    ///
    /// With `expected_generation`, nothing happens unless it is current.
    /// Subscribers are notified only if a session was dropped.
    fn clear(&self, expected_generation: Option<u64>, reason: &'static str) -> Option<Session> {
        self.transition(reason, |state| {
            if expected_generation.is_some_and(|g| g != state.generation) {
                return None;
            }
            state.generation += 1;
            state.clears += 1;
            std::mem::take(&mut state.auth).into_session()
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Signs in with an email/password pair.
    ///
    /// On success the session is installed and subscribers see
    /// `is_authenticated` with `is_loading`; the profile is then fetched and
    /// applied. A failed profile fetch does not fail sign-in, it leaves
    /// `is_admin` false.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredentials`] for a rejected
    /// pair, [`AuthenticationError::NotVerified`] for an unconfirmed account,
    /// and [`AuthenticationError::Network`] when the auth service failed.
    /// Returns [`AuthenticationError::Cancelled`] if the user signed out
    /// while the credentials were being checked; the new session is then
    /// logged out upstream and never installed.
    pub async fn sign_in(&self, identity: &str, secret: &str) -> Result<Session, AuthenticationError> {
        let clears = read(&self.state).clears;
        let session = self
            .auth
            .sign_in_with_password(identity.trim(), secret)
            .await?;

        let ticket = self.transition("signed in", |state| {
            (state.clears == clears).then(|| state.install(session.clone()))
        });
        let Some(ticket) = ticket else {
            tracing::debug!(subject = %session.subject, "sign-in finished after a sign-out, discarding session");
            if let Err(error) = self.auth.sign_out(&session.access_token).await {
                tracing::warn!(subject = %session.subject, error = %error, "upstream sign-out of discarded session failed");
            }
            return Err(AuthenticationError::Cancelled);
        };
        self.load_profile(ticket).await;
        Ok(session)
    }

    /// Registers a new account. No session is established; the caller should
    /// ask the user to verify their email address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentity`] or
    /// [`ValidationError::WeakPassword`] before contacting the auth service
    /// when the input is obviously unusable, and the upstream classification
    /// otherwise.
    pub async fn sign_up(
        &self,
        identity: &str,
        secret: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, ValidationError> {
        let email = Email::new(identity).map_err(|_| ValidationError::InvalidIdentity {
            email: identity.trim().to_string(),
        })?;
        if secret.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::WeakPassword {
                reason: format!("Password should be at least {MIN_PASSWORD_LENGTH} characters"),
            });
        }
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::MissingField { field: "full_name" });
        }

        let outcome = self.auth.sign_up(&email, secret, display_name).await?;
        tracing::debug!(
            email = %outcome.email,
            confirmation_required = outcome.confirmation_required,
            "account registered"
        );
        Ok(outcome)
    }

    /// Sends a password reset email.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] only when the auth service could not be
    /// reached or failed; unknown addresses succeed.
    pub async fn request_password_reset(&self, identity: &str) -> Result<(), NetworkError> {
        self.auth.reset_password_for_email(identity.trim()).await
    }

    /// Signs out.
    ///
    /// Local state is cleared and subscribers notified before the upstream
    /// logout is attempted; an upstream failure is logged and otherwise
    /// ignored. Calling this without a session does nothing.
    pub async fn sign_out(&self) {
        let Some(session) = self.clear(None, "signed out") else {
            return;
        };
        if let Err(error) = self.auth.sign_out(&session.access_token).await {
            tracing::warn!(subject = %session.subject, error = %error, "upstream sign-out failed");
        }
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Fetches the current session's profile again and returns it.
    ///
    /// The previous profile stays in effect while the fetch is in flight; a
    /// failed fetch withdraws admin access. Returns `None` without a session,
    /// when no profile row exists, or when the session changed before the
    /// fetch completed.
    pub async fn refresh_profile(&self) -> Option<Profile> {
        let ticket = read(&self.state).ticket()?;
        if self.load_profile(ticket).await {
            self.profile()
        } else {
            None
        }
    }

    /// Fetches and applies the profile for `ticket`. Returns `false` if the
    /// result was discarded as stale.
    async fn load_profile(&self, ticket: ProfileTicket) -> bool {
        let result = self
            .profiles
            .fetch_profile(&ticket.subject, &ticket.access_token)
            .await;

        self.transition("profile loaded", |state| {
            if !state.is_current(ticket.generation, &ticket.subject) {
                tracing::warn!(subject = %ticket.subject, "discarding profile fetched for a stale session");
                return None;
            }
            apply_profile(state, &ticket.subject, result);
            Some(())
        })
        .is_some()
    }
}

/// Replaces the tokens of the current session if `session` has its subject.
fn rotate_tokens(auth: &mut AuthState, session: &Session) -> Option<()> {
    match auth {
        AuthState::ProfilePending { session: current }
        | AuthState::Authorized {
            session: current, ..
        } if current.subject == session.subject => {
            *current = session.clone();
            Some(())
        }
        _ => None,
    }
}

fn apply_profile(state: &mut Inner, subject: &str, result: Result<Option<Profile>, StoreError>) {
    let profile = match result {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => {
            tracing::debug!(subject, "no profile row");
            None
        }
        Err(error) if error.is_unauthorized() => {
            tracing::warn!(subject, error = %error, "access token rejected while fetching profile");
            state.generation += 1;
            state.auth = AuthState::Anonymous;
            return;
        }
        Err(error) => {
            tracing::warn!(subject, error = %error, "profile fetch failed, admin access withheld");
            None
        }
    };

    if let Some(session) = std::mem::take(&mut state.auth).into_session() {
        state.auth = AuthState::Authorized { session, profile };
    }
}

// Verify SessionContext is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SessionContext<crate::auth::AuthClient, crate::clients::RestClient>>();
};
