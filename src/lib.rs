//! # Technexus Portal Client
//!
//! A Rust client for the Technexus Solutions portal: the session and
//! authorization context that gates every protected page and admin action,
//! typed access to the hosted tables, and the catalog, contact, account and
//! admin features built on top of them.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`PortalConfig`] and [`PortalConfigBuilder`]
//! - Validated newtypes for the project URL, anon key, site URL and email identities
//! - A [`SessionContext`] owning the current [`Session`] and the derived
//!   [`AuthorizationView`] (`is_authenticated`, `is_admin`, `is_loading`)
//! - An HTTP implementation of the remote auth service via [`AuthClient`]
//! - A data API client ([`RestClient`]) with a query builder and typed records
//! - Portal features: [`portal::Catalog`], [`portal::ContactForm`],
//!   [`portal::Account`] and the [`portal::AdminConsole`]
//! - Route gating and header navigation via [`routes`]
//!
//! ## Quick Start
//!
//! ```rust
//! use technexus_portal::{AnonKey, PortalConfig, ProjectUrl, SiteUrl};
//!
//! // Create configuration using the builder pattern
//! let config = PortalConfig::builder()
//!     .project_url(ProjectUrl::new("https://abcd.supabase.co").unwrap())
//!     .anon_key(AnonKey::new("your-anon-key").unwrap())
//!     .site_url(SiteUrl::new("https://technexus.ng").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Signing In
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use technexus_portal::{AuthClient, RestClient, SessionContext};
//!
//! let rest = RestClient::new(&config)?;
//! let context = Arc::new(SessionContext::new(AuthClient::new(&config)?, rest.clone()));
//!
//! // Resolve the persisted session, if any, before rendering gated pages
//! context.initialize(stored_session).await;
//!
//! context.sign_in("ada@example.com", "password").await?;
//! assert!(context.is_authenticated());
//! ```
//!
//! ## Gating Routes
//!
//! ```rust
//! use technexus_portal::routes::{guard, navigation, Route, RouteDecision};
//! use technexus_portal::AuthorizationView;
//!
//! let view = AuthorizationView {
//!     is_authenticated: true,
//!     is_admin: false,
//!     is_loading: false,
//! };
//!
//! assert_eq!(guard(&view, Route::Admin), RouteDecision::Redirect("/auth"));
//! assert!(navigation(&view).iter().all(|item| item.label != "Admin Panel"));
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: The context is constructed explicitly and shared through `Arc`
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Fail closed**: `is_admin` is false until the current session's profile says otherwise
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod portal;
pub mod routes;
pub mod store;

// Re-export public types at crate root for convenience
pub use auth::{
    AuthClient, AuthEvent, AuthService, AuthState, AuthenticationError, AuthorizationView,
    NetworkError, Session, SessionContext, SignUpOutcome, SubscriptionId, ValidationError,
};
pub use config::{AnonKey, Email, PortalConfig, PortalConfigBuilder, ProjectUrl, SiteUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, RestClient,
    RestError,
};

// Re-export portal and store types
pub use portal::{Portal, PortalError};
pub use store::{Profile, ProfileStore, StoreError};
