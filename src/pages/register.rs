//! Registration page

use crate::client::{ApiClient, ClientError, ClientResult};
use crate::services::auth;
use crate::session::Route;

#[derive(Debug, Clone, Default)]
pub struct RegisterPage {
    pub username: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
    message: Option<String>,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation returned by the server after a successful registration
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Create the account; success leads to the login page
    pub async fn submit(&mut self, client: &ApiClient) -> ClientResult<Route> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            let err = ClientError::InvalidInput("Username and password are required".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.loading = true;
        self.error = None;
        let result = auth::register(client, &username, &self.password).await;
        self.loading = false;

        match result {
            Ok(message) => {
                self.message = message;
                self.password.clear();
                Ok(Route::login())
            }
            Err(e) => {
                self.error = Some(e.user_message("Registration failed"));
                Err(e)
            }
        }
    }
}
