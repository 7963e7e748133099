//! User profiles and the profile store.
//!
//! A profile row is keyed by the user's identity and carries the display
//! name, company, phone and the administrator flag. Rows are ingested through
//! [`Profile::from_row`], which rejects rows with an empty or mismatched
//! subject so a profile can never be attributed to the wrong session.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::rest::{RestClient, TableQuery};
use crate::store::StoreError;

/// Name of the profiles table.
pub const PROFILES_TABLE: &str = "profiles";

/// A profile row as stored, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Row id.
    #[serde(default)]
    pub id: Option<String>,
    /// Identity of the user this profile belongs to.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Administrator flag; absent means `false`.
    #[serde(default)]
    pub is_admin: Option<bool>,
    /// When the row was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated user profile.
///
/// # Example
///
/// ```rust
/// use technexus_portal::store::{Profile, ProfileRow};
///
/// let row = ProfileRow {
///     user_id: Some("u-1".to_string()),
///     full_name: Some("Ada Obi".to_string()),
///     is_admin: Some(true),
///     ..ProfileRow::default()
/// };
/// let profile = Profile::from_row(row, "u-1").unwrap();
/// assert!(profile.is_admin);
/// assert_eq!(profile.initials(None), "AO");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity of the user this profile belongs to.
    pub subject: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Whether the user may use the admin console.
    pub is_admin: bool,
    /// When the profile was created.
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Validates a row fetched for `expected_subject`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] if the row's `user_id` is
    /// missing, blank, or belongs to another user.
    pub fn from_row(row: ProfileRow, expected_subject: &str) -> Result<Self, StoreError> {
        let profile = Self::try_from(row)?;
        if profile.subject != expected_subject {
            return Err(StoreError::InvalidRecord {
                table: PROFILES_TABLE,
                reason: format!(
                    "row belongs to '{}', expected '{expected_subject}'",
                    profile.subject
                ),
            });
        }
        Ok(profile)
    }

    /// Returns up to two uppercase initials from the display name, falling
    /// back to the first letter of `email`.
    #[must_use]
    pub fn initials(&self, email: Option<&str>) -> String {
        avatar_initials(self.display_name.as_deref(), email)
    }
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let subject = non_blank(row.user_id).ok_or_else(|| StoreError::InvalidRecord {
            table: PROFILES_TABLE,
            reason: "missing user_id".to_string(),
        })?;

        Ok(Self {
            subject,
            display_name: non_blank(row.full_name),
            company: non_blank(row.company),
            phone: non_blank(row.phone),
            is_admin: row.is_admin.unwrap_or(false),
            created_at: row.created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builds avatar initials: the first letter of up to two words of the display
/// name, or the first letter of the email, or `?`.
///
/// ```rust
/// use technexus_portal::store::avatar_initials;
///
/// assert_eq!(avatar_initials(Some("chinedu okafor eze"), None), "CO");
/// assert_eq!(avatar_initials(None, Some("ada@example.com")), "A");
/// assert_eq!(avatar_initials(Some("  "), None), "?");
/// ```
#[must_use]
pub fn avatar_initials(display_name: Option<&str>, email: Option<&str>) -> String {
    let from_name: String = display_name
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if !from_name.is_empty() {
        return from_name;
    }

    email
        .and_then(|e| e.trim().chars().next())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

/// Source of user profiles, keyed by user identity.
///
/// Implemented for [`RestClient`]; tests supply their own implementations.
pub trait ProfileStore: Send + Sync {
    /// Fetches the profile of `subject`, authenticating as that user.
    ///
    /// Returns `Ok(None)` when no row exists.
    fn fetch_profile(
        &self,
        subject: &str,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send;
}

impl ProfileStore for RestClient {
    async fn fetch_profile(
        &self,
        subject: &str,
        access_token: &str,
    ) -> Result<Option<Profile>, StoreError> {
        let query = TableQuery::new(PROFILES_TABLE).eq("user_id", subject).limit(1);
        let rows: Vec<ProfileRow> = self.select(&query, Some(access_token)).await?;
        rows.into_iter()
            .next()
            .map(|row| Profile::from_row(row, subject))
            .transpose()
    }
}
