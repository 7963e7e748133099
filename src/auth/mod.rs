//! Authentication and authorization for the portal.
//!
//! This module owns the answer to two questions every page asks: is anyone
//! signed in, and may they use the admin console.
//!
//! # Overview
//!
//! - [`SessionContext`]: The session state machine and source of the authorization view
//! - [`AuthorizationView`]: The derived `is_authenticated` / `is_admin` / `is_loading` flags
//! - [`Session`]: An authenticated session, serializable for persistence
//! - [`AuthService`]: The remote auth service seam, implemented over HTTP by [`AuthClient`]
//! - [`AuthEvent`]: Session changes reported by the auth service
//! - [`AuthenticationError`], [`ValidationError`], [`NetworkError`]: Credential operation failures
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use technexus_portal::auth::{AuthClient, SessionContext};
//! use technexus_portal::RestClient;
//!
//! let context = Arc::new(SessionContext::new(
//!     AuthClient::new(&config)?,
//!     RestClient::new(&config)?,
//! ));
//! context.initialize(stored_session).await;
//!
//! let id = context.subscribe(|view| {
//!     println!("signed in: {}, admin: {}", view.is_authenticated, view.is_admin);
//! });
//!
//! match context.sign_in("ada@example.com", "password").await {
//!     Ok(_) => println!("Welcome back!"),
//!     Err(e) => println!("{e}"),
//! }
//! context.unsubscribe(id);
//! ```

mod context;
mod errors;
mod service;
pub mod session;
mod view;

pub use context::{AuthState, SessionContext, SubscriptionId, MIN_PASSWORD_LENGTH};
pub use errors::{AuthenticationError, NetworkError, ValidationError};
pub use service::{AuthClient, AuthEvent, AuthService, SignUpOutcome};
pub use session::{AuthUser, Session};
pub use view::AuthorizationView;
