//! The signed-in user's dashboard data.

use crate::auth::{AuthService, Session};
use crate::clients::rest::{Order, TableQuery};
use crate::portal::{Portal, PortalError};
use crate::store::{avatar_initials, Profile, ProfileStore, Purchase, PURCHASES_TABLE};

/// Columns read for the purchase history.
const HISTORY_COLUMNS: &str = "*, products(name, description, category, features)";

/// What the customer dashboard shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    /// The current session.
    pub session: Session,
    /// The fetched profile, if any.
    pub profile: Option<Profile>,
    /// Purchases, newest first, with product details.
    pub purchases: Vec<Purchase>,
}

impl Account {
    /// Returns the display name, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.display_name.as_deref())
            .or(self.session.email.as_deref())
            .unwrap_or("User")
    }

    /// Returns the avatar initials.
    #[must_use]
    pub fn initials(&self) -> String {
        avatar_initials(
            self.profile.as_ref().and_then(|p| p.display_name.as_deref()),
            self.session.email.as_deref(),
        )
    }

    /// Returns the sum of all purchase amounts.
    #[must_use]
    pub fn total_spent(&self) -> f64 {
        self.purchases.iter().map(|p| p.amount).sum()
    }
}

impl<A: AuthService, P: ProfileStore> Portal<A, P> {
    /// Loads the dashboard of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::SignInRequired`] without a session, and
    /// [`PortalError::Store`] if the data API call fails.
    pub async fn account(&self) -> Result<Account, PortalError> {
        let session = self
            .session()
            .current_user()
            .ok_or(PortalError::SignInRequired)?;

        let query = TableQuery::new(PURCHASES_TABLE)
            .select(HISTORY_COLUMNS)
            .eq("user_id", &session.subject)
            .order("created_at", Order::Descending);
        let purchases = self.checked(
            self.rest()
                .select(&query, Some(&session.access_token))
                .await,
        )?;

        Ok(Account {
            profile: self.session().profile(),
            session,
            purchases,
        })
    }
}
