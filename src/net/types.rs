//! Wire DTOs for the TaskHandler REST API.
//!
//! DESIGN
//! ======
//! Response types are lenient: optional fields default when absent so a
//! backend that omits bookkeeping columns still decodes. Request types skip
//! `None` fields so the backend applies its own defaults.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// Authenticated user identity. Immutable from the client's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Successful login/registration response.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// BOARDS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /api/boards`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BoardCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

// =============================================================================
// LISTS
// =============================================================================

/// A workflow column within a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /api/boards/{board_id}/lists`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListCreate {
    pub title: String,
    pub board_id: String,
    pub position: i64,
}

// =============================================================================
// CARDS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub board_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    pub position: i64,
    #[serde(default)]
    pub assigned_to: Option<Vec<String>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub mirrored_to: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /api/lists/{list_id}/cards`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CardCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub list_id: String,
    pub board_id: String,
    pub position: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Partial card update for `PUT /api/cards/{id}`. Only `Some` fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CardUpdate {
    /// Update touching only the description, as exposed by the card dialog.
    #[must_use]
    pub fn description(text: impl Into<String>) -> Self {
        Self { description: Some(text.into()), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// AI EXTRACTION
// =============================================================================

/// Body of `POST /api/ai/extract-tasks`.
#[derive(Clone, Debug, Serialize)]
pub struct ExtractRequest {
    pub text: String,
}

/// A candidate task returned by extraction.
///
/// Task shape is not validated: a missing or non-string field reads as `None`
/// and a non-object element becomes an empty task, so one odd entry never
/// rejects the batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct ExtractedTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

impl From<serde_json::Value> for ExtractedTask {
    fn from(value: serde_json::Value) -> Self {
        let field = |key: &str| value.get(key).and_then(serde_json::Value::as_str).map(str::to_string);
        Self { title: field("title"), description: field("description"), priority: field("priority") }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExtractResponse {
    pub tasks: Vec<ExtractedTask>,
}
