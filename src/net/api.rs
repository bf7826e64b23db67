//! REST client for the TaskHandler backend.
//!
//! DESIGN
//! ======
//! `ApiClient` owns endpoint paths, bearer attachment, status checks and
//! decoding. The bytes-on-the-wire part sits behind the [`Transport`] trait
//! so tests can swap in an in-memory backend and count requests.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Backend`] carrying the backend's
//! `detail` string when it sent one. Callers decide how to surface it;
//! nothing here retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{
    AuthResponse, Board, BoardCreate, Card, CardCreate, CardUpdate, ExtractRequest, ExtractResponse, ExtractedTask,
    ListCreate, LoginRequest, RegisterRequest, TaskList, User,
};
use crate::storage::{KeyValueStore, TOKEN_KEY};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}{}", detail_suffix(.detail))]
    Backend { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend-provided message, or `fallback` for every other failure.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Backend { detail: Some(detail), .. } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One outgoing REST call. `path` is relative to the API origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Raw response: status plus undecoded body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed REST client. The bearer token is read from the store per request.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { transport, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // ---- auth ---------------------------------------------------------------

    /// Exchange credentials for a session. Sent without a bearer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend's detail for rejected
    /// credentials, or a transport/decode error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        self.call(Method::Post, "/api/auth/login", Some(&body), false).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] when the email is already registered.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest { email: email.to_string(), name: name.to_string(), password: password.to_string() };
        self.call(Method::Post, "/api/auth/register", Some(&body), false).await
    }

    /// The user owning the stored token.
    ///
    /// # Errors
    ///
    /// Returns a 403 [`ApiError::Backend`] for a missing or stale token.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.call(Method::Get, "/api/auth/me", None::<&()>, true).await
    }

    // ---- boards -------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn boards(&self) -> Result<Vec<Board>, ApiError> {
        self.call(Method::Get, "/api/boards", None::<&()>, true).await
    }

    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn create_board(&self, board: &BoardCreate) -> Result<Board, ApiError> {
        self.call(Method::Post, "/api/boards", Some(board), true).await
    }

    /// # Errors
    ///
    /// Returns a 404 [`ApiError::Backend`] for an unknown board.
    pub async fn board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.call(Method::Get, &board_path(board_id), None::<&()>, true).await
    }

    // ---- lists --------------------------------------------------------------

    /// Lists of a board, in the order the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn lists(&self, board_id: &str) -> Result<Vec<TaskList>, ApiError> {
        self.call(Method::Get, &lists_path(board_id), None::<&()>, true).await
    }

    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn create_list(&self, list: &ListCreate) -> Result<TaskList, ApiError> {
        self.call(Method::Post, &create_list_path(&list.board_id), Some(list), true).await
    }

    // ---- cards --------------------------------------------------------------

    /// Every card on a board, across all lists.
    ///
    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn cards(&self, board_id: &str) -> Result<Vec<Card>, ApiError> {
        self.call(Method::Get, &board_cards_path(board_id), None::<&()>, true).await
    }

    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ApiError> {
        self.call(Method::Get, &list_cards_path(list_id), None::<&()>, true).await
    }

    /// Post a card to `card.list_id`. The position is whatever the caller computed.
    ///
    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn create_card(&self, card: &CardCreate) -> Result<Card, ApiError> {
        self.call(Method::Post, &list_cards_path(&card.list_id), Some(card), true).await
    }

    /// # Errors
    ///
    /// Returns a 404 [`ApiError::Backend`] for an unknown card.
    pub async fn update_card(&self, card_id: &str, update: &CardUpdate) -> Result<Card, ApiError> {
        self.call(Method::Put, &card_path(card_id), Some(update), true).await
    }

    /// # Errors
    ///
    /// Returns a 404 [`ApiError::Backend`] for an unknown card.
    pub async fn delete_card(&self, card_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.call(Method::Delete, &card_path(card_id), None::<&()>, true).await?;
        Ok(())
    }

    // ---- inbox + AI ---------------------------------------------------------

    /// # Errors
    ///
    /// Returns the transport, backend or decode failure.
    pub async fn inbox(&self) -> Result<Vec<Card>, ApiError> {
        self.call(Method::Get, "/api/inbox", None::<&()>, true).await
    }

    /// Ask the backend to turn free text into candidate tasks.
    ///
    /// # Errors
    ///
    /// Returns the transport or backend failure, or a decode error when the
    /// response has no `tasks` array. Individual task shapes never fail.
    pub async fn extract_tasks(&self, text: &str) -> Result<Vec<ExtractedTask>, ApiError> {
        let body = ExtractRequest { text: text.to_string() };
        let resp: ExtractResponse = self.call(Method::Post, "/api/ai/extract-tasks", Some(&body), true).await?;
        Ok(resp.tasks)
    }

    /// Backend liveness check (`GET /`), returning its status message.
    ///
    /// # Errors
    ///
    /// Returns the transport or backend failure.
    pub async fn health(&self) -> Result<String, ApiError> {
        let value: serde_json::Value = self.call(Method::Get, "/", None::<&()>, false).await?;
        Ok(value.get("message").and_then(serde_json::Value::as_str).unwrap_or("ok").to_string())
    }

    // ---- plumbing -----------------------------------------------------------

    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>, authed: bool) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let bearer = if authed { self.store.get(TOKEN_KEY) } else { None };
        let request = ApiRequest { method, path: path.to_string(), bearer, body };

        let response = self.transport.send(request).await?;
        debug!(%method, path, status = response.status, "api response");
        decode_response(&response)
    }
}

// =============================================================================
// PATHS + DECODING
// =============================================================================

fn board_path(board_id: &str) -> String {
    format!("/api/boards/{board_id}")
}

fn lists_path(board_id: &str) -> String {
    format!("/api/lists/{board_id}")
}

fn create_list_path(board_id: &str) -> String {
    format!("/api/boards/{board_id}/lists")
}

fn board_cards_path(board_id: &str) -> String {
    format!("/api/cards/{board_id}")
}

fn list_cards_path(list_id: &str) -> String {
    format!("/api/lists/{list_id}/cards")
}

fn card_path(card_id: &str) -> String {
    format!("/api/cards/{card_id}")
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

fn decode_response<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Backend { status: response.status, detail: error_detail(&response.body) });
    }
    let body = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull the `detail` string out of an error body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
