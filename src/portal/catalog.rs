//! The product catalog and the purchase flow.

use crate::auth::AuthService;
use crate::clients::rest::{Order, TableQuery};
use crate::portal::{Portal, PortalError};
use crate::store::{
    NewPurchase, Product, ProfileStore, Purchase, PurchaseStatus, StoreError, PRODUCTS_TABLE,
    PURCHASES_TABLE,
};

/// Category label that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// The listed products, newest first.
///
/// # Example
///
/// ```rust
/// use technexus_portal::portal::Catalog;
///
/// let catalog = Catalog::new(Vec::new());
/// assert_eq!(catalog.categories(), vec!["all"]);
/// assert!(catalog.filter("all").is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps already loaded products.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Returns every product.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns [`ALL_CATEGORIES`] followed by each distinct category in order
    /// of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Returns the products in `category`, or all of them for
    /// [`ALL_CATEGORIES`].
    #[must_use]
    pub fn filter(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category == ALL_CATEGORIES || p.category == category)
            .collect()
    }

    /// Finds a product by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl<A: AuthService, P: ProfileStore> Portal<A, P> {
    /// Loads the listed products, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the data API call fails.
    pub async fn catalog(&self) -> Result<Catalog, PortalError> {
        let query = TableQuery::new(PRODUCTS_TABLE)
            .eq("is_active", true)
            .order("created_at", Order::Descending);
        let token = self.session().access_token();
        let products = self.checked(self.rest().select(&query, token.as_deref()).await)?;
        Ok(Catalog::new(products))
    }

    /// Records a completed purchase of `product` at its listed price.
    ///
    /// No payment is taken.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::SignInRequired`] without a session, and
    /// [`PortalError::Store`] if the data API call fails.
    pub async fn purchase(&self, product: &Product) -> Result<Purchase, PortalError> {
        let session = self
            .session()
            .current_user()
            .ok_or(PortalError::SignInRequired)?;

        let purchase = NewPurchase {
            user_id: session.subject.clone(),
            product_id: product.id.clone(),
            amount: product.price,
            status: PurchaseStatus::Completed,
        };
        let rows: Vec<Purchase> = self.checked(
            self.rest()
                .insert(PURCHASES_TABLE, &[purchase], Some(&session.access_token))
                .await,
        )?;

        let purchase = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidRecord {
                table: PURCHASES_TABLE,
                reason: "insert returned no row".to_string(),
            })?;
        tracing::debug!(
            subject = %session.subject,
            product = %product.name,
            amount = purchase.amount,
            "purchase recorded"
        );
        Ok(purchase)
    }
}
