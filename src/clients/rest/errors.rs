//! Error types for data API operations.
//!
//! - [`RestError::InvalidTable`]: When a table name fails validation
//! - [`RestError::Decode`]: When returned rows do not match the expected record type
//! - [`RestError::Http`]: Wraps underlying HTTP errors
//!
//! # Example
//!
//! ```rust,ignore
//! use technexus_portal::clients::rest::RestError;
//!
//! match client.select::<Product>(&query, None).await {
//!     Ok(rows) => println!("{} products", rows.len()),
//!     Err(RestError::Http(e)) if e.is_unauthorized() => println!("session expired"),
//!     Err(e) => println!("failed: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for data API operations.
///
/// # Example
///
/// ```rust
/// use technexus_portal::clients::rest::RestError;
///
/// let error = RestError::InvalidTable { table: "".to_string() };
/// assert!(error.to_string().contains("Invalid table"));
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The table name is empty or contains characters outside `[a-z0-9_]`.
    #[error("Invalid table name: '{table}'")]
    InvalidTable {
        /// The invalid table name that was provided.
        table: String,
    },

    /// Rows returned by the data API could not be decoded.
    #[error("Failed to decode rows from '{table}': {message}")]
    Decode {
        /// The table that was queried.
        table: String,
        /// The decoding error.
        message: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl RestError {
    /// Returns `true` if the backend rejected the caller's token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Http(e) => e.is_unauthorized(),
            Self::InvalidTable { .. } | Self::Decode { .. } => false,
        }
    }
}

// Verify RestError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestError>();
};
