//! Typed portal records and the profile store.
//!
//! Rows returned by the data API are decoded into the records of this module.
//! Profiles pass through a validation boundary ([`Profile::from_row`]) before
//! they reach the session context.
//!
//! # Overview
//!
//! - [`Profile`], [`ProfileRow`], [`ProfileStore`]: user profiles and where they come from
//! - [`Product`], [`ProductInput`]: catalog entries
//! - [`ContactSubmission`], [`NewContactSubmission`], [`ContactStatus`]: contact form messages
//! - [`Purchase`], [`NewPurchase`], [`PurchaseStatus`]: recorded purchases
//! - [`DashboardStats`], [`format_naira`]: admin dashboard figures
//! - [`StoreError`]: ingestion and data API failures

mod errors;
mod profiles;
mod records;
mod stats;

pub use errors::StoreError;
pub use profiles::{avatar_initials, Profile, ProfileRow, ProfileStore, PROFILES_TABLE};
pub use records::{
    ContactStatus, ContactSubmission, NewContactSubmission, NewPurchase, Product, ProductInput,
    Purchase, PurchaseStatus, PurchasedProduct, CONTACT_SUBMISSIONS_TABLE, PRODUCTS_TABLE,
    PURCHASES_TABLE,
};
pub use stats::{format_naira, DashboardStats};
