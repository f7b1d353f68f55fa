//! Page Components
//!
//! Top-level pages composed from the views. A page action returns the
//! [`Route`] to navigate to; rendering and navigation belong to the caller.

mod dashboard;
mod home;
mod login;
mod register;

pub use dashboard::{error_message, Dashboard, ViewMode};
pub use home::{nav_links, resolve, NavLink, HEADLINE, TITLE};
pub use login::{LoginPage, EXPIRED_NOTICE};
pub use register::RegisterPage;

use crate::client::{ApiClient, ClientResult};
use crate::services::auth;
use crate::session::Route;

/// Forget the token and go to the login page
pub async fn logout(client: &ApiClient) -> ClientResult<Route> {
    auth::logout(client).await?;
    Ok(Route::login())
}
