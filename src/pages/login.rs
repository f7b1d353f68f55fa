//! Login page

use crate::client::{ApiClient, ClientError, ClientResult};
use crate::services::auth;
use crate::session::Route;

/// Notice shown when the previous session was rejected by the server
pub const EXPIRED_NOTICE: &str = "Session expired, please log in again.";

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub username: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
    expired: bool,
}

impl LoginPage {
    /// Page opened at `route`; the expired marker turns on the notice
    pub fn new(route: Route) -> Self {
        Self {
            expired: matches!(route, Route::Login { expired: true }),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.expired.then_some(EXPIRED_NOTICE)
    }

    /// Log in with the form's credentials and return where to go next
    pub async fn submit(&mut self, client: &ApiClient) -> ClientResult<Route> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            let err = ClientError::InvalidInput("Username and password are required".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.loading = true;
        self.error = None;
        let result = auth::login(client, &username, &self.password).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.expired = false;
                self.password.clear();
                Ok(Route::Dashboard)
            }
            Err(e) => {
                self.error = Some(e.user_message("Login failed"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_notice_follows_route() {
        assert_eq!(
            LoginPage::new(Route::login_expired()).notice(),
            Some(EXPIRED_NOTICE)
        );
        assert_eq!(LoginPage::new(Route::login()).notice(), None);
    }
}
