//! Error types for record ingestion.

use crate::clients::rest::RestError;
use thiserror::Error;

/// Error type for reading and writing portal records.
///
/// # Example
///
/// ```rust
/// use technexus_portal::store::StoreError;
///
/// let error = StoreError::InvalidRecord {
///     table: "profiles",
///     reason: "missing user_id".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid profiles record: missing user_id");
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row failed validation at the ingestion boundary.
    #[error("Invalid {table} record: {reason}")]
    InvalidRecord {
        /// The table the row came from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The data API call failed.
    #[error(transparent)]
    Rest(#[from] RestError),
}

impl StoreError {
    /// Returns `true` if the backend rejected the caller's token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Rest(e) => e.is_unauthorized(),
            Self::InvalidRecord { .. } => false,
        }
    }
}

// Verify StoreError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreError>();
};
