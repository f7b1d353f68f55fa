//! Landing page and header navigation

use crate::session::{Route, Session};

pub const TITLE: &str = "Welcome to DocChat";
pub const HEADLINE: &str = "Chat with your PDFs using AI. Register or log in to get started.";

/// Entry in the header navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Register,
    Login,
    Logout,
}

impl NavLink {
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Register => "Register",
            NavLink::Login => "Login",
            NavLink::Logout => "Logout",
        }
    }

    /// Route the link leads to
    pub fn target(&self) -> Route {
        match self {
            NavLink::Register => Route::Register,
            NavLink::Login | NavLink::Logout => Route::login(),
        }
    }
}

/// Header links for the current authentication state
pub fn nav_links(authenticated: bool) -> Vec<NavLink> {
    if authenticated {
        vec![NavLink::Logout]
    } else {
        vec![NavLink::Register, NavLink::Login]
    }
}

/// Where a visitor of `route` actually ends up
pub async fn resolve(session: &Session, route: Route) -> Route {
    route.guard(session.is_authenticated().await)
}
