//! The administrator console.
//!
//! Every operation re-checks the authorization view before touching the data
//! API, so a console obtained while signed in as an administrator stops
//! working as soon as the session changes.

use crate::auth::AuthService;
use crate::clients::rest::{Filter, Order, TableQuery};
use crate::portal::{Portal, PortalError};
use crate::store::{
    ContactStatus, ContactSubmission, DashboardStats, Product, ProductInput, Profile, ProfileRow,
    ProfileStore, Purchase, StoreError, CONTACT_SUBMISSIONS_TABLE, PRODUCTS_TABLE,
    PROFILES_TABLE, PURCHASES_TABLE,
};

/// Columns read for the purchase list.
const PURCHASE_COLUMNS: &str = "*, products(*), profiles(*)";

/// Everything the admin dashboard shows.
#[derive(Clone, Debug, PartialEq)]
pub struct AdminSnapshot {
    /// All products, listed or not, newest first.
    pub products: Vec<Product>,
    /// All contact submissions, newest first.
    pub contacts: Vec<ContactSubmission>,
    /// All purchases with product and buyer details, newest first.
    pub purchases: Vec<Purchase>,
    /// All user profiles, newest first.
    pub users: Vec<Profile>,
    /// Figures computed from the above.
    pub stats: DashboardStats,
}

/// Administrator-only operations.
///
/// Obtained from [`Portal::admin_console`].
pub struct AdminConsole<'a, A, P> {
    portal: &'a Portal<A, P>,
}

impl<A: AuthService, P: ProfileStore> Portal<A, P> {
    /// Opens the admin console.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::AdminRequired`] unless the current session's
    /// profile grants admin access.
    pub fn admin_console(&self) -> Result<AdminConsole<'_, A, P>, PortalError> {
        let console = AdminConsole { portal: self };
        console.authorize()?;
        Ok(console)
    }
}

impl<A: AuthService, P: ProfileStore> AdminConsole<'_, A, P> {
    /// Returns the access token of an administrator session.
    fn authorize(&self) -> Result<String, PortalError> {
        let session = self.portal.session();
        let view = session.view();
        if !(view.is_authenticated && view.is_admin) {
            return Err(PortalError::AdminRequired);
        }
        session.access_token().ok_or(PortalError::AdminRequired)
    }

    /// Loads products, contact submissions, purchases and profiles.
    ///
    /// Profile rows that fail validation are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::AdminRequired`] without admin access and
    /// [`PortalError::Store`] if any data API call fails.
    pub async fn load(&self) -> Result<AdminSnapshot, PortalError> {
        let token = self.authorize()?;
        let rest = self.portal.rest();

        let products_query = TableQuery::new(PRODUCTS_TABLE).order("created_at", Order::Descending);
        let contacts_query =
            TableQuery::new(CONTACT_SUBMISSIONS_TABLE).order("created_at", Order::Descending);
        let purchases_query = TableQuery::new(PURCHASES_TABLE)
            .select(PURCHASE_COLUMNS)
            .order("created_at", Order::Descending);
        let users_query = TableQuery::new(PROFILES_TABLE).order("created_at", Order::Descending);

        let (products, contacts, purchases, rows) = self.portal.checked(tokio::try_join!(
            rest.select::<Product>(&products_query, Some(&token)),
            rest.select::<ContactSubmission>(&contacts_query, Some(&token)),
            rest.select::<Purchase>(&purchases_query, Some(&token)),
            rest.select::<ProfileRow>(&users_query, Some(&token)),
        ))?;

        let users: Vec<Profile> = rows
            .into_iter()
            .filter_map(|row| match Profile::try_from(row) {
                Ok(profile) => Some(profile),
                Err(error) => {
                    tracing::warn!(error = %error, "skipping invalid profile row");
                    None
                }
            })
            .collect();

        let stats = DashboardStats::compute(&products, users.len(), &contacts, &purchases);
        Ok(AdminSnapshot {
            products,
            contacts,
            purchases,
            users,
            stats,
        })
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::load`].
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, PortalError> {
        let token = self.authorize()?;
        let rows: Vec<Product> = self.portal.checked(
            self.portal
                .rest()
                .insert(PRODUCTS_TABLE, &[input], Some(&token))
                .await,
        )?;
        let product = first_row(rows, PRODUCTS_TABLE)?;
        tracing::debug!(id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Replaces the fields of product `id`.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::load`]; a missing product is reported as
    /// [`StoreError::InvalidRecord`].
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product, PortalError> {
        let token = self.authorize()?;
        let rows: Vec<Product> = self.portal.checked(
            self.portal
                .rest()
                .update(PRODUCTS_TABLE, &[Filter::eq("id", id)], input, Some(&token))
                .await,
        )?;
        let product = first_row(rows, PRODUCTS_TABLE)?;
        tracing::debug!(id = %product.id, "product updated");
        Ok(product)
    }

    /// Creates a product when `id` is `None`, otherwise updates it.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::create_product`] and [`AdminConsole::update_product`].
    pub async fn save_product(&self, id: Option<&str>, input: &ProductInput) -> Result<Product, PortalError> {
        match id {
            Some(id) => self.update_product(id, input).await,
            None => self.create_product(input).await,
        }
    }

    /// Deletes product `id`.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::load`].
    pub async fn delete_product(&self, id: &str) -> Result<(), PortalError> {
        let token = self.authorize()?;
        self.portal.checked(
            self.portal
                .rest()
                .delete(PRODUCTS_TABLE, &[Filter::eq("id", id)], Some(&token))
                .await,
        )?;
        tracing::debug!(id, "product deleted");
        Ok(())
    }

    /// Sets the review status of contact submission `id`.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::update_product`].
    pub async fn set_contact_status(
        &self,
        id: &str,
        status: ContactStatus,
    ) -> Result<ContactSubmission, PortalError> {
        let token = self.authorize()?;
        let rows = self.portal.checked(
            self.portal
                .rest()
                .update(
                    CONTACT_SUBMISSIONS_TABLE,
                    &[Filter::eq("id", id)],
                    &serde_json::json!({ "status": status }),
                    Some(&token),
                )
                .await,
        )?;
        first_row(rows, CONTACT_SUBMISSIONS_TABLE)
    }

    /// Flips a submission between `new` and `reviewed`.
    ///
    /// # Errors
    ///
    /// See [`AdminConsole::set_contact_status`].
    pub async fn toggle_contact_status(
        &self,
        contact: &ContactSubmission,
    ) -> Result<ContactSubmission, PortalError> {
        self.set_contact_status(&contact.id, contact.status.toggled())
            .await
    }
}

fn first_row<T>(rows: Vec<T>, table: &'static str) -> Result<T, PortalError> {
    rows.into_iter().next().ok_or_else(|| {
        StoreError::InvalidRecord {
            table,
            reason: "no matching row".to_string(),
        }
        .into()
    })
}

impl<A, P> std::fmt::Debug for AdminConsole<'_, A, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole").finish_non_exhaustive()
    }
}
