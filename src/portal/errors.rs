//! Error type for portal features.

use crate::clients::rest::RestError;
use crate::store::StoreError;
use thiserror::Error;

/// Error type for catalog, contact, account and admin operations.
///
/// # Example
///
/// ```rust
/// use technexus_portal::PortalError;
///
/// assert_eq!(
///     PortalError::SignInRequired.to_string(),
///     "You need to be logged in to continue."
/// );
/// ```
#[derive(Debug, Error)]
pub enum PortalError {
    /// The operation needs a signed-in user.
    #[error("You need to be logged in to continue.")]
    SignInRequired,

    /// The operation needs an administrator.
    #[error("Administrator access required")]
    AdminRequired,

    /// A required form field was blank.
    #[error("Missing required field: '{field}'")]
    MissingField {
        /// The name of the blank field.
        field: &'static str,
    },

    /// Reading or writing records failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RestError> for PortalError {
    fn from(error: RestError) -> Self {
        Self::Store(StoreError::Rest(error))
    }
}

impl PortalError {
    /// Returns `true` if the user should be sent to the sign-in page.
    #[must_use]
    pub const fn requires_sign_in(&self) -> bool {
        match self {
            Self::SignInRequired => true,
            Self::Store(e) => e.is_unauthorized(),
            Self::AdminRequired | Self::MissingField { .. } => false,
        }
    }
}

// Verify PortalError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PortalError>();
};
