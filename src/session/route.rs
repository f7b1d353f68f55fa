//! Logical views and route guards
//!
//! The client has four entry points. Public ones (login, register) bounce an
//! authenticated user to the dashboard; the dashboard bounces an anonymous
//! user to login.

use std::fmt;

/// Login path marker appended when a session was rejected by the server
pub const EXPIRED_MARKER: &str = "expired=1";

/// A navigable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login {
        /// Set when the previous session was rejected by the server
        expired: bool,
    },
    Register,
    Dashboard,
}

impl Route {
    /// Plain login view
    pub fn login() -> Self {
        Route::Login { expired: false }
    }

    /// Login view carrying the session-expired marker
    pub fn login_expired() -> Self {
        Route::Login { expired: true }
    }

    /// Path form of the route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { expired: false } => "/auth/login".to_string(),
            Route::Login { expired: true } => format!("/auth/login?{}", EXPIRED_MARKER),
            Route::Register => "/auth/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
        }
    }

    /// Parse a path (with optional query string) back into a route
    pub fn parse(path: &str) -> Option<Self> {
        let (base, query) = match path.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (path, None),
        };
        let base = match base.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match base {
            "/" => Some(Route::Home),
            "/auth/login" | "/login" => {
                let expired = query
                    .map(|q| {
                        q.split('&').any(|pair| match pair.split_once('=') {
                            Some(("expired", value)) => !value.is_empty() && value != "0",
                            _ => false,
                        })
                    })
                    .unwrap_or(false);
                Some(Route::Login { expired })
            }
            "/auth/register" | "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }

    /// Whether the view is only meant for anonymous users
    pub fn is_public_only(&self) -> bool {
        matches!(self, Route::Login { .. } | Route::Register)
    }

    /// Whether the view needs a token
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Dashboard)
    }

    /// Apply route guards for the given authentication state
    pub fn guard(self, authenticated: bool) -> Self {
        if authenticated && self.is_public_only() {
            Route::Dashboard
        } else if !authenticated && self.requires_auth() {
            Route::login()
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
