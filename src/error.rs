//! Error types for portal configuration.
//!
//! This module contains the error type used when constructing
//! [`PortalConfig`](crate::PortalConfig) and its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use technexus_portal::{AnonKey, ConfigError};
//!
//! let result = AnonKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAnonKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during portal configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Anonymous (publishable) key cannot be empty.
    #[error("Anon key cannot be empty. Please provide the project's publishable anon key.")]
    EmptyAnonKey,

    /// Project URL is invalid.
    #[error("Invalid project URL '{url}'. Please provide a URL with scheme (e.g., 'https://abcd.supabase.co').")]
    InvalidProjectUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Site URL is invalid.
    #[error("Invalid site URL '{url}'. Please provide the public origin of the site (e.g., 'https://technexus.ng').")]
    InvalidSiteUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Email address is invalid.
    #[error("Invalid email address '{email}'. Expected format: 'name@example.com'.")]
    InvalidEmail {
        /// The invalid email that was provided.
        email: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
