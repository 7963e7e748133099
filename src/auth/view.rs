//! The derived authorization view.

/// The three flags every route guard and navigation decision reads.
///
/// Always derived from the [`SessionContext`](crate::SessionContext) state,
/// never stored on its own. `is_admin` implies `is_authenticated`.
///
/// # Example
///
/// ```rust
/// use technexus_portal::AuthorizationView;
///
/// let view = AuthorizationView::default();
/// assert!(!view.is_authenticated);
/// assert!(!view.is_admin);
/// assert!(view.is_settled());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AuthorizationView {
    /// A session is present.
    pub is_authenticated: bool,
    /// The profile of the current session was fetched and grants admin access.
    pub is_admin: bool,
    /// The initial session check or a profile fetch is in flight.
    pub is_loading: bool,
}

impl AuthorizationView {
    /// Returns `true` once nothing is in flight.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_loading
    }
}
