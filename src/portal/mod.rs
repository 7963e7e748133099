//! Portal features built on the session context and the data API.
//!
//! [`Portal`] binds a shared [`SessionContext`] to a [`RestClient`]. Data
//! calls authenticate as the signed-in user when there is one; a 401 answer
//! invalidates the session.
//!
//! # Overview
//!
//! - [`Catalog`]: Listed products, categories and the purchase flow
//! - [`ContactForm`]: The public contact form
//! - [`Account`]: The signed-in user's dashboard data
//! - [`AdminConsole`]: Administrator-only product and inbox management
//! - [`PortalError`]: Error type for all of the above

mod account;
mod admin;
mod catalog;
mod contact;
mod errors;

pub use account::Account;
pub use admin::{AdminConsole, AdminSnapshot};
pub use catalog::{Catalog, ALL_CATEGORIES};
pub use contact::ContactForm;
pub use errors::PortalError;

use std::sync::Arc;

use crate::auth::{AuthService, SessionContext};
use crate::clients::rest::{RestClient, RestError};
use crate::store::ProfileStore;

/// Entry point for the portal features.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use technexus_portal::{AuthClient, Portal, RestClient, SessionContext};
///
/// let rest = RestClient::new(&config)?;
/// let context = Arc::new(SessionContext::new(AuthClient::new(&config)?, rest.clone()));
/// let portal = Portal::new(Arc::clone(&context), rest);
///
/// let catalog = portal.catalog().await?;
/// for product in catalog.filter("software") {
///     println!("{} - {}", product.name, product.price);
/// }
/// ```
pub struct Portal<A, P> {
    session: Arc<SessionContext<A, P>>,
    rest: RestClient,
}

impl<A: AuthService, P: ProfileStore> Portal<A, P> {
    /// Creates a portal over a shared session context.
    #[must_use]
    pub const fn new(session: Arc<SessionContext<A, P>>, rest: RestClient) -> Self {
        Self { session, rest }
    }

    /// Returns the session context.
    #[must_use]
    pub fn session(&self) -> &SessionContext<A, P> {
        &self.session
    }

    /// Returns the data API client.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Maps a data API result, dropping the session if its token was rejected.
    fn checked<T>(&self, result: Result<T, RestError>) -> Result<T, PortalError> {
        result.map_err(|error| {
            if error.is_unauthorized() && self.session.invalidate() {
                tracing::warn!("access token rejected by the data API, session invalidated");
            }
            error.into()
        })
    }
}

impl<A, P> std::fmt::Debug for Portal<A, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("session", &self.session)
            .field("rest", &self.rest)
            .finish()
    }
}
