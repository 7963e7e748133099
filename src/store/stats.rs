//! Dashboard statistics for the admin console.

use std::collections::BTreeMap;

use crate::store::{ContactStatus, ContactSubmission, Product, Purchase};

/// Headline figures shown on the admin dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardStats {
    /// Number of products, listed or not.
    pub total_products: usize,
    /// Number of registered users.
    pub total_users: usize,
    /// Number of contact submissions.
    pub contact_submissions: usize,
    /// Number of submissions still marked `new`.
    pub unreviewed_submissions: usize,
    /// Sum of all purchase amounts, in naira.
    pub total_sales: f64,
    /// Product count per category.
    pub products_per_category: BTreeMap<String, usize>,
}

impl DashboardStats {
    /// Computes the statistics from loaded records.
    #[must_use]
    pub fn compute(
        products: &[Product],
        total_users: usize,
        contacts: &[ContactSubmission],
        purchases: &[Purchase],
    ) -> Self {
        let mut products_per_category = BTreeMap::new();
        for product in products {
            *products_per_category
                .entry(product.category.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_products: products.len(),
            total_users,
            contact_submissions: contacts.len(),
            unreviewed_submissions: contacts
                .iter()
                .filter(|c| c.status == ContactStatus::New)
                .count(),
            total_sales: purchases.iter().map(|p| p.amount).sum(),
            products_per_category,
        }
    }

    /// Total sales formatted with [`format_naira`].
    #[must_use]
    pub fn total_sales_display(&self) -> String {
        format_naira(self.total_sales)
    }
}

/// Formats an amount in naira with thousands separators.
///
/// Whole amounts print without decimals; otherwise up to two decimals are
/// kept and trailing zeros dropped.
///
/// ```rust
/// use technexus_portal::store::format_naira;
///
/// assert_eq!(format_naira(1_234_567.0), "₦1,234,567");
/// assert_eq!(format_naira(1500.5), "₦1,500.5");
/// assert_eq!(format_naira(0.0), "₦0");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_naira(amount: f64) -> String {
    let kobo = (amount.abs() * 100.0).round() as u64;
    let (whole, fraction) = (kobo / 100, kobo % 100);
    let sign = if amount < 0.0 && kobo > 0 { "-" } else { "" };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        0 => format!("{sign}₦{grouped}"),
        f if f % 10 == 0 => format!("{sign}₦{grouped}.{}", f / 10),
        f => format!("{sign}₦{grouped}.{f:02}"),
    }
}
