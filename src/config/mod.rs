//! Configuration types for the portal client.
//!
//! This module provides the configuration used to reach the hosted backend
//! project that stores users, profiles, products, purchases and contact
//! submissions.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`PortalConfig`]: The main configuration struct holding all client settings
//! - [`PortalConfigBuilder`]: A builder for constructing [`PortalConfig`] instances
//! - [`ProjectUrl`]: The validated base URL of the backend project
//! - [`AnonKey`]: The publishable anon key, masked in debug output
//! - [`SiteUrl`]: The public origin of the website, for email redirects
//! - [`Email`]: A validated sign-in identity
//!
//! # Example
//!
//! ```rust
//! use technexus_portal::{PortalConfig, ProjectUrl, AnonKey, SiteUrl};
//!
//! let config = PortalConfig::builder()
//!     .project_url(ProjectUrl::new("https://abcd.supabase.co").unwrap())
//!     .anon_key(AnonKey::new("anon-key").unwrap())
//!     .site_url(SiteUrl::new("https://technexus.ng").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{AnonKey, Email, ProjectUrl, SiteUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the portal client.
///
/// # Thread Safety
///
/// `PortalConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    project_url: ProjectUrl,
    anon_key: AnonKey,
    site_url: Option<SiteUrl>,
    user_agent_prefix: Option<String>,
    timeout: Duration,
}

impl PortalConfig {
    /// Creates a new builder for constructing a `PortalConfig`.
    #[must_use]
    pub fn builder() -> PortalConfigBuilder {
        PortalConfigBuilder::new()
    }

    /// Returns the backend project URL.
    #[must_use]
    pub const fn project_url(&self) -> &ProjectUrl {
        &self.project_url
    }

    /// Returns the anon key.
    #[must_use]
    pub const fn anon_key(&self) -> &AnonKey {
        &self.anon_key
    }

    /// Returns the public site URL, if configured.
    #[must_use]
    pub const fn site_url(&self) -> Option<&SiteUrl> {
        self.site_url.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Redirect target embedded in sign-up confirmation emails.
    #[must_use]
    pub fn email_confirmation_redirect(&self) -> Option<String> {
        self.site_url.as_ref().map(|site| site.join("/dashboard"))
    }

    /// Redirect target embedded in password reset emails.
    #[must_use]
    pub fn password_reset_redirect(&self) -> Option<String> {
        self.site_url
            .as_ref()
            .map(|site| site.join("/auth?mode=reset-password"))
    }
}

// Verify PortalConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PortalConfig>();
};

/// Builder for constructing [`PortalConfig`] instances.
///
/// Required fields are `project_url` and `anon_key`.
///
/// # Defaults
///
/// - `site_url`: `None` (emails are sent without a redirect target)
/// - `user_agent_prefix`: `None`
/// - `timeout`: [`DEFAULT_TIMEOUT`]
#[derive(Debug, Default)]
pub struct PortalConfigBuilder {
    project_url: Option<ProjectUrl>,
    anon_key: Option<AnonKey>,
    site_url: Option<SiteUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl PortalConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend project URL (required).
    #[must_use]
    pub fn project_url(mut self, url: ProjectUrl) -> Self {
        self.project_url = Some(url);
        self
    }

    /// Sets the anon key (required).
    #[must_use]
    pub fn anon_key(mut self, key: AnonKey) -> Self {
        self.anon_key = Some(key);
        self
    }

    /// Sets the public site URL used for email redirect targets.
    #[must_use]
    pub fn site_url(mut self, url: SiteUrl) -> Self {
        self.site_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`PortalConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `project_url` or
    /// `anon_key` are not set.
    pub fn build(self) -> Result<PortalConfig, ConfigError> {
        let project_url = self.project_url.ok_or(ConfigError::MissingRequiredField {
            field: "project_url",
        })?;
        let anon_key = self
            .anon_key
            .ok_or(ConfigError::MissingRequiredField { field: "anon_key" })?;

        Ok(PortalConfig {
            project_url,
            anon_key,
            site_url: self.site_url,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
