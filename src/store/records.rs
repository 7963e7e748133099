//! Typed records for the catalog, contact and purchase tables.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::{ProfileRow, StoreError};

/// Name of the products table.
pub const PRODUCTS_TABLE: &str = "products";
/// Name of the contact submissions table.
pub const CONTACT_SUBMISSIONS_TABLE: &str = "contact_submissions";
/// Name of the purchases table.
pub const PURCHASES_TABLE: &str = "purchases";

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product or service offered in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Row id.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price in naira.
    pub price: f64,
    /// Category label, such as `software` or `consulting`.
    pub category: String,
    /// Feature bullet points.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    /// Whether the product is listed in the store.
    #[serde(default)]
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Fields written when creating or updating a product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductInput {
    /// Product name.
    pub name: String,
    /// Long description.
    pub description: Option<String>,
    /// Price in naira.
    pub price: f64,
    /// Category label.
    pub category: String,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Whether the product is listed in the store.
    pub is_active: bool,
}

impl ProductInput {
    /// Builds product input from the admin form fields.
    ///
    /// `price` is parsed as a number and `features` is comma-separated text;
    /// each feature is trimmed and empty entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] if the name or category is blank,
    /// or the price is not a non-negative number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use technexus_portal::store::ProductInput;
    ///
    /// let input = ProductInput::from_form(
    ///     "School Management System",
    ///     "",
    ///     "250000",
    ///     "software",
    ///     "Attendance, Grading, , Parent portal",
    ///     true,
    /// )
    /// .unwrap();
    /// assert_eq!(input.features, vec!["Attendance", "Grading", "Parent portal"]);
    /// assert_eq!(input.description, None);
    /// ```
    pub fn from_form(
        name: &str,
        description: &str,
        price: &str,
        category: &str,
        features: &str,
        is_active: bool,
    ) -> Result<Self, StoreError> {
        let invalid = |reason: String| StoreError::InvalidRecord {
            table: PRODUCTS_TABLE,
            reason,
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("name is required".to_string()));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(invalid("category is required".to_string()));
        }
        let price: f64 = price
            .trim()
            .parse()
            .map_err(|_| invalid(format!("price '{}' is not a number", price.trim())))?;
        if !price.is_finite() || price < 0.0 {
            return Err(invalid(format!("price {price} must be zero or more")));
        }

        let description = description.trim();
        Ok(Self {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            price,
            category: category.to_string(),
            features: features
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
            is_active,
        })
    }
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            features: product.features.clone(),
            is_active: product.is_active,
        }
    }
}

/// Review status of a contact submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Not yet looked at.
    #[default]
    New,
    /// Seen by an administrator.
    Reviewed,
}

impl ContactStatus {
    /// Returns the other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::New => Self::Reviewed,
            Self::Reviewed => Self::New,
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("new"),
            Self::Reviewed => f.write_str("reviewed"),
        }
    }
}

/// A message sent through the contact form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Row id.
    pub id: String,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Sender company.
    #[serde(default)]
    pub company: Option<String>,
    /// Service the sender is interested in.
    #[serde(default)]
    pub service_interest: Option<String>,
    /// Message body.
    pub message: String,
    /// Review status.
    #[serde(default)]
    pub status: ContactStatus,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

/// A contact form submission before it is stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewContactSubmission {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Sender company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Service the sender is interested in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_interest: Option<String>,
    /// Message body.
    pub message: String,
    /// Always [`ContactStatus::New`] for new submissions.
    pub status: ContactStatus,
}

/// Lifecycle of a purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// Awaiting payment.
    Pending,
    /// Paid.
    Completed,
    /// Cancelled.
    Cancelled,
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Product details embedded in a purchase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchasedProduct {
    /// Product name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Feature bullet points.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
}

/// A recorded purchase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Row id.
    pub id: String,
    /// Buyer identity.
    pub user_id: String,
    /// Purchased product.
    pub product_id: String,
    /// Amount paid in naira.
    pub amount: f64,
    /// Purchase status.
    pub status: PurchaseStatus,
    /// When the purchase was recorded.
    pub created_at: DateTime<Utc>,
    /// Joined product details, when selected with `products(*)`.
    #[serde(default, rename = "products")]
    pub product: Option<PurchasedProduct>,
    /// Joined buyer profile, when selected with `profiles(*)`.
    #[serde(default, rename = "profiles")]
    pub profile: Option<ProfileRow>,
}

/// A purchase before it is stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPurchase {
    /// Buyer identity.
    pub user_id: String,
    /// Purchased product.
    pub product_id: String,
    /// Amount in naira.
    pub amount: f64,
    /// Purchase status.
    pub status: PurchaseStatus,
}
