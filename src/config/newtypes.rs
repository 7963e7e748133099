//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Byte offsets of the scheme and host inside a normalized URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UrlParts {
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

/// Trims the URL, drops trailing slashes and locates scheme and host.
///
/// Returns `None` when the scheme is missing or not alphabetic, or when the
/// host is empty.
fn parse_url(raw: &str) -> Option<(String, UrlParts)> {
    let url = raw.trim().trim_end_matches('/').to_string();

    let scheme_end = url.find("://")?;
    let scheme = &url[..scheme_end];
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let host_start = scheme_end + 3;
    if host_start >= url.len() {
        return None;
    }

    // Host ends at port, path, query, or end of string
    let remainder = &url[host_start..];
    let host_end = remainder
        .find([':', '/', '?', '#'])
        .map_or(url.len(), |i| host_start + i);

    if host_end == host_start {
        return None;
    }

    Some((
        url,
        UrlParts {
            scheme_end,
            host_start,
            host_end,
        },
    ))
}

/// The base URL of the hosted backend project.
///
/// The auth service lives under `{project_url}/auth/v1` and the data API
/// under `{project_url}/rest/v1`. Trailing slashes are removed.
///
/// # Example
///
/// ```rust
/// use technexus_portal::ProjectUrl;
///
/// let url = ProjectUrl::new("https://abcd.supabase.co/").unwrap();
/// assert_eq!(url.as_ref(), "https://abcd.supabase.co");
/// assert_eq!(url.auth_url(), "https://abcd.supabase.co/auth/v1");
/// assert_eq!(url.rest_url(), "https://abcd.supabase.co/rest/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectUrl {
    url: String,
    parts: UrlParts,
}

impl ProjectUrl {
    /// Creates a new validated project URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProjectUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let (url, parts) =
            parse_url(&url).ok_or_else(|| ConfigError::InvalidProjectUrl { url: url.clone() })?;
        Ok(Self { url, parts })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.parts.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.parts.host_start..self.parts.host_end]
    }

    /// Returns the base URL of the auth service.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    /// Returns the base URL of the data API.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}

impl AsRef<str> for ProjectUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// The public origin of the website, used to build email redirect targets.
///
/// # Example
///
/// ```rust
/// use technexus_portal::SiteUrl;
///
/// let site = SiteUrl::new("https://technexus.ng").unwrap();
/// assert_eq!(site.join("/dashboard"), "https://technexus.ng/dashboard");
/// assert_eq!(site.join("auth?mode=reset-password"), "https://technexus.ng/auth?mode=reset-password");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteUrl(String);

impl SiteUrl {
    /// Creates a new validated site URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSiteUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let (url, _) =
            parse_url(&url).ok_or_else(|| ConfigError::InvalidSiteUrl { url: url.clone() })?;
        Ok(Self(url))
    }

    /// Appends a path to the origin, inserting a single `/` separator.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for SiteUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The project's publishable anon key.
///
/// Sent as the `apikey` header on every request, and as the bearer token when
/// no user session exists.
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only `AnonKey(*****)`.
///
/// # Example
///
/// ```rust
/// use technexus_portal::AnonKey;
///
/// let key = AnonKey::new("eyJhbGciOi...").unwrap();
/// assert_eq!(format!("{:?}", key), "AnonKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AnonKey(String);

impl AnonKey {
    /// Creates a new validated anon key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAnonKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyAnonKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for AnonKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AnonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnonKey(*****)")
    }
}

/// A validated, lowercased email address used as a sign-in identity.
///
/// # Example
///
/// ```rust
/// use technexus_portal::Email;
///
/// let email = Email::new("  Admin@Example.com ").unwrap();
/// assert_eq!(email.as_ref(), "admin@example.com");
/// assert_eq!(email.initial(), 'A');
/// assert!(Email::new("not-an-email").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Creates a new validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEmail`] if the value is not of the form
    /// `local@domain.tld`.
    pub fn new(email: impl Into<String>) -> Result<Self, ConfigError> {
        let email = email.into().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Self(email))
        } else {
            Err(ConfigError::InvalidEmail { email })
        }
    }

    /// Returns the uppercased first character, used for avatar fallbacks.
    #[must_use]
    pub fn initial(&self) -> char {
        self.0
            .chars()
            .next()
            .map_or('?', |c| c.to_ascii_uppercase())
    }

    fn is_valid(email: &str) -> bool {
        if email.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Email {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anon_key_rejects_empty_string() {
        assert!(matches!(AnonKey::new(""), Err(ConfigError::EmptyAnonKey)));
        assert!(matches!(AnonKey::new("   "), Err(ConfigError::EmptyAnonKey)));
    }

    #[test]
    fn test_anon_key_masks_value_in_debug() {
        let key = AnonKey::new("super-secret-key").unwrap();
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "AnonKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_project_url_validates_format() {
        let url = ProjectUrl::new("https://abcd.supabase.co").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), "abcd.supabase.co");

        // With port, as used by local development stacks
        let url = ProjectUrl::new("http://127.0.0.1:54321").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_name(), "127.0.0.1");
        assert_eq!(url.auth_url(), "http://127.0.0.1:54321/auth/v1");
    }

    #[test]
    fn test_project_url_strips_trailing_slashes() {
        let url = ProjectUrl::new("https://abcd.supabase.co//").unwrap();
        assert_eq!(url.as_ref(), "https://abcd.supabase.co");
        assert_eq!(url.rest_url(), "https://abcd.supabase.co/rest/v1");
    }

    #[test]
    fn test_project_url_rejects_invalid() {
        assert!(ProjectUrl::new("abcd.supabase.co").is_err());
        assert!(ProjectUrl::new("https://").is_err());
        assert!(ProjectUrl::new("://example.com").is_err());
        assert!(ProjectUrl::new("ht-tp://example.com").is_err());
    }

    #[test]
    fn test_site_url_join_avoids_double_slash() {
        let site = SiteUrl::new("https://technexus.ng/").unwrap();
        assert_eq!(site.join("/dashboard"), "https://technexus.ng/dashboard");
        assert_eq!(site.join("dashboard"), "https://technexus.ng/dashboard");
    }

    #[test]
    fn test_site_url_rejects_invalid() {
        assert!(matches!(
            SiteUrl::new("technexus.ng"),
            Err(ConfigError::InvalidSiteUrl { .. })
        ));
    }

    #[test]
    fn test_email_normalizes_case_and_whitespace() {
        let email = Email::new(" User@Example.COM ").unwrap();
        assert_eq!(email.as_ref(), "user@example.com");
        assert_eq!(email.to_string(), "user@example.com");
    }

    #[test]
    fn test_email_rejects_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("user").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@localhost").is_err());
        assert!(Email::new("user@@example.com").is_err());
        assert!(Email::new("us er@example.com").is_err());
        assert!(Email::new("user@example.").is_err());
    }

    #[test]
    fn test_email_deserialization_validates() {
        let email: Email = serde_json::from_str(r#""Admin@Example.com""#).unwrap();
        assert_eq!(email.as_ref(), "admin@example.com");

        let result: Result<Email, _> = serde_json::from_str(r#""nope""#);
        assert!(result.is_err());
    }
}
