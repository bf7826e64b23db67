//! Login / registration screen.
//!
//! The gate only exchanges credentials for `{token, user}` and hands them to
//! the caller's `on_login`; persisting the session and routing onward are
//! the caller's job.

#[cfg(test)]
#[path = "session_gate_test.rs"]
mod session_gate_test;

use std::sync::Arc;

use tracing::info;

use super::{ActionError, required};
use crate::net::api::ApiClient;
use crate::net::types::User;
use crate::ui::Notifier;

pub const AUTH_FAILED: &str = "Authentication failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

pub struct SessionGate {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub name: String,
    pub loading: bool,
}

impl SessionGate {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            name: String::new(),
            loading: false,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Submit the current credentials. `on_login` runs exactly once on success.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields (no request is made) or the
    /// backend failure; both are also reported through the notifier.
    pub async fn submit<F>(&mut self, on_login: F) -> Result<(), ActionError>
    where
        F: FnOnce(String, User),
    {
        let result = self.exchange().await;
        match result {
            Ok((token, user)) => {
                info!(user_id = %user.id, mode = ?self.mode, "session established");
                on_login(token, user);
                Ok(())
            }
            Err(err) => {
                let message = match &err {
                    ActionError::Api(api) => api.user_message(AUTH_FAILED),
                    other => other.to_string(),
                };
                self.notifier.error(&message);
                Err(err)
            }
        }
    }

    async fn exchange(&mut self) -> Result<(String, User), ActionError> {
        let email = required(&self.email, "Email is required")?.to_string();
        if self.password.is_empty() {
            return Err(ActionError::Validation("Password is required"));
        }
        let name = match self.mode {
            AuthMode::Login => None,
            AuthMode::Register => Some(required(&self.name, "Name is required")?.to_string()),
        };

        self.loading = true;
        let response = match name {
            None => self.api.login(&email, &self.password).await,
            Some(name) => self.api.register(&email, &self.password, &name).await,
        };
        self.loading = false;

        let auth = response?;
        Ok((auth.token, auth.user))
    }
}
