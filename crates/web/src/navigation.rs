//! Application routes and the route guard.
//!
//! The guard is a pure function of the session's authentication flag; it
//! owns no state. HTTP handlers reach it through
//! [`RequireAuth`](crate::middleware::RequireAuth).

/// Every page the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` - public entry (sign-in forms).
    Entry,
    /// `/app` - guarded area index.
    App,
    /// `/app/map`
    Map,
    /// `/app/chat`
    Chat,
    /// `/app/settings`
    Settings,
    /// Anything else.
    NotFound,
}

impl Route {
    /// Canonical path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Entry => "/",
            Self::App => "/app",
            Self::Map => "/app/map",
            Self::Chat => "/app/chat",
            Self::Settings => "/app/settings",
            Self::NotFound => "/404",
        }
    }

    /// Resolve a request path to the page it belongs to.
    ///
    /// Sub-paths of a page (`/app/map/pins/3/click`) resolve to that page.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        let mut segments = path.split('/').skip(1);
        match (segments.next(), segments.next()) {
            (None | Some(""), _) => Self::Entry,
            (Some("app"), None) => Self::App,
            (Some("app"), Some("map")) => Self::Map,
            (Some("app"), Some("chat")) => Self::Chat,
            (Some("app"), Some("settings")) => Self::Settings,
            _ => Self::NotFound,
        }
    }

    /// Whether the route lives in the protected area.
    #[must_use]
    pub const fn is_guarded(self) -> bool {
        matches!(self, Self::App | Self::Map | Self::Chat | Self::Settings)
    }
}

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the current history entry; the page left behind is not
    /// reachable with back-navigation.
    Replace(Route),
}

impl Navigation {
    #[must_use]
    pub const fn route(self) -> Route {
        match self {
            Self::Replace(route) => route,
        }
    }
}

/// Outcome of running the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Navigation),
}

/// Decide whether `route` may render for a session.
#[must_use]
pub const fn guard(route: Route, authenticated: bool) -> GuardDecision {
    if route.is_guarded() && !authenticated {
        return GuardDecision::Redirect(Navigation::Replace(Route::Entry));
    }
    match route {
        Route::App => GuardDecision::Redirect(Navigation::Replace(Route::Map)),
        _ => GuardDecision::Allow,
    }
}
