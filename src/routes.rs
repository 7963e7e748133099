//! Route gating and navigation derived from the authorization view.
//!
//! Pages never read the session directly; they ask [`guard`] whether to
//! render, wait, or redirect, and build the header from [`navigation`].
//!
//! # Example
//!
//! ```rust
//! use technexus_portal::routes::{guard, Route, RouteDecision};
//! use technexus_portal::AuthorizationView;
//!
//! let signed_in = AuthorizationView {
//!     is_authenticated: true,
//!     is_admin: false,
//!     is_loading: false,
//! };
//!
//! assert_eq!(guard(&signed_in, Route::Dashboard), RouteDecision::Render);
//! assert_eq!(guard(&signed_in, Route::Admin), RouteDecision::Redirect("/auth"));
//! ```

use std::fmt;

use crate::auth::AuthorizationView;

/// Where unauthorized visitors are sent.
pub const SIGN_IN_PATH: &str = "/auth";

/// A page of the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/about`
    About,
    /// `/services`
    Services,
    /// `/store`
    Store,
    /// `/contact`
    Contact,
    /// `/auth`
    Auth,
    /// `/dashboard`
    Dashboard,
    /// `/admin`
    Admin,
    /// `/privacy`
    Privacy,
    /// `/terms`
    Terms,
    /// Anything else.
    NotFound,
}

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Everyone.
    Public,
    /// Signed-in users.
    Authenticated,
    /// Administrators.
    Admin,
}

/// What to do with a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    /// Show the page.
    Render,
    /// Show a spinner until the authorization view settles.
    Loading,
    /// Send the visitor to another path.
    Redirect(&'static str),
}

impl Route {
    /// Resolves a request path, ignoring any query string, fragment and
    /// trailing slash.
    ///
    /// ```rust
    /// use technexus_portal::routes::Route;
    ///
    /// assert_eq!(Route::from_path("/store/"), Route::Store);
    /// assert_eq!(Route::from_path("/auth?mode=reset-password"), Route::Auth);
    /// assert_eq!(Route::from_path("/nope"), Route::NotFound);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/about" => Self::About,
            "/services" => Self::Services,
            "/store" => Self::Store,
            "/contact" => Self::Contact,
            "/auth" => Self::Auth,
            "/dashboard" => Self::Dashboard,
            "/admin" => Self::Admin,
            "/privacy" => Self::Privacy,
            "/terms" => Self::Terms,
            _ => Self::NotFound,
        }
    }

    /// Returns the canonical path, or `None` for [`Route::NotFound`].
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::About => Some("/about"),
            Self::Services => Some("/services"),
            Self::Store => Some("/store"),
            Self::Contact => Some("/contact"),
            Self::Auth => Some(SIGN_IN_PATH),
            Self::Dashboard => Some("/dashboard"),
            Self::Admin => Some("/admin"),
            Self::Privacy => Some("/privacy"),
            Self::Terms => Some("/terms"),
            Self::NotFound => None,
        }
    }

    /// Returns who may see this route.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Dashboard => Access::Authenticated,
            Self::Admin => Access::Admin,
            _ => Access::Public,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().unwrap_or("*"))
    }
}

/// Decides what to do when `view` navigates to `route`.
///
/// Public routes always render. Gated routes wait while the view is loading,
/// then render or redirect to [`SIGN_IN_PATH`].
#[must_use]
pub const fn guard(view: &AuthorizationView, route: Route) -> RouteDecision {
    let allowed = match route.access() {
        Access::Public => return RouteDecision::Render,
        Access::Authenticated => view.is_authenticated,
        Access::Admin => view.is_authenticated && view.is_admin,
    };

    if view.is_loading {
        RouteDecision::Loading
    } else if allowed {
        RouteDecision::Render
    } else {
        RouteDecision::Redirect(SIGN_IN_PATH)
    }
}

/// A header link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavItem {
    /// Link text.
    pub label: &'static str,
    /// Target route.
    pub route: Route,
}

const PUBLIC_NAVIGATION: [NavItem; 5] = [
    NavItem {
        label: "Home",
        route: Route::Home,
    },
    NavItem {
        label: "About",
        route: Route::About,
    },
    NavItem {
        label: "Services",
        route: Route::Services,
    },
    NavItem {
        label: "Store",
        route: Route::Store,
    },
    NavItem {
        label: "Contact",
        route: Route::Contact,
    },
];

/// Returns the header links for `view`: the public pages, `Dashboard` when
/// signed in, and `Admin Panel` only for administrators.
#[must_use]
pub fn navigation(view: &AuthorizationView) -> Vec<NavItem> {
    let mut items = PUBLIC_NAVIGATION.to_vec();
    if view.is_authenticated {
        items.push(NavItem {
            label: "Dashboard",
            route: Route::Dashboard,
        });
    }
    if view.is_authenticated && view.is_admin {
        items.push(NavItem {
            label: "Admin Panel",
            route: Route::Admin,
        });
    }
    items
}
