//! Application shell: current route plus the session handed down to screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token and user live in the persisted store; the router only mirrors
//! the user for display and guards routes. Screens never see each other,
//! they only share the `ApiClient` (which reads the token per request).

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tracing::info;

use crate::net::api::{ApiClient, ApiError};
use crate::net::types::User;
use crate::storage::{KeyValueStore, StoreError, TOKEN_KEY, USER_KEY, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Boards,
    Board(String),
    Inbox,
}

pub struct App {
    api: Arc<ApiClient>,
    pub route: Route,
    pub user: Option<User>,
}

impl App {
    /// Restore any stored session and pick the starting route.
    pub fn new(api: Arc<ApiClient>) -> Self {
        let store = api.store();
        let user: Option<User> = load_json(store.as_ref(), USER_KEY);
        let has_token = store.get(TOKEN_KEY).is_some_and(|t| !t.is_empty());
        let (route, user) = match (has_token, user) {
            (true, Some(user)) => (Route::Boards, Some(user)),
            _ => (Route::Login, None),
        };
        Self { api, route, user }
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.api.store().as_ref()
    }

    /// Persist a freshly issued session and move on to the board overview.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written to the store.
    pub fn on_login(&mut self, token: String, user: User) -> Result<(), StoreError> {
        self.store().set(TOKEN_KEY, &token)?;
        save_json(self.store(), USER_KEY, &user)?;
        info!(user_id = %user.id, "logged in");
        self.user = Some(user);
        self.route = Route::Boards;
        Ok(())
    }

    /// Discard the session locally. Nothing is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store().remove(TOKEN_KEY)?;
        self.store().remove(USER_KEY)?;
        info!("logged out");
        self.user = None;
        self.route = Route::Login;
        Ok(())
    }

    /// Move to `route`, redirecting to login when there is no session.
    pub fn navigate(&mut self, route: Route) -> &Route {
        self.route = if self.is_authenticated() { route } else { Route::Login };
        &self.route
    }

    /// Ask the backend who the stored token belongs to and refresh the stored user.
    ///
    /// # Errors
    ///
    /// Returns the backend failure; an invalid token is only detected here.
    pub async fn verify_session(&mut self) -> Result<User, ApiError> {
        let user = self.api.me().await?;
        if let Err(e) = save_json(self.store(), USER_KEY, &user) {
            tracing::warn!(error = %e, "failed to persist refreshed user");
        }
        self.user = Some(user.clone());
        Ok(user)
    }
}
