//! Test doubles shared by the controller and client tests.
//!
//! `FakeBackend` is an in-memory stand-in for the REST backend: it keeps
//! boards, lists and cards, records every request it receives, and can be
//! told to fail specific calls.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::net::api::{ApiClient, ApiError, ApiRequest, ApiResponse, Method, Transport};
use crate::net::types::{Board, Card, ExtractedTask, TaskList, User};
use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};
use crate::ui::{Confirm, Notifier, Toast, ToastKind};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_EMAIL: &str = "ada@example.test";
pub const TEST_PASSWORD: &str = "hunter2";

// =========================================================================
// FakeBackend
// =========================================================================

#[derive(Default)]
struct FakeState {
    users: Vec<(User, String)>,
    tokens: Vec<(String, String)>,
    boards: Vec<Board>,
    lists: Vec<TaskList>,
    cards: Vec<Card>,
    extracted: Vec<ExtractedTask>,
    /// Verbatim `tasks` array, overriding `extracted` when set.
    extracted_raw: Option<Value>,
    requests: Vec<ApiRequest>,
    /// `(method, path)` pairs answered with a 500.
    failing: Vec<(Method, String)>,
    /// Zero-based indexes of card POSTs answered with a 500.
    failing_card_posts: HashSet<usize>,
    card_posts_seen: usize,
    /// Simulate a network failure for every request.
    offline: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    /// Backend with one registered user whose token is [`TEST_TOKEN`].
    pub fn new() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            let user = test_user();
            state.tokens.push((TEST_TOKEN.to_string(), user.id.clone()));
            state.users.push((user, TEST_PASSWORD.to_string()));
        }
        backend
    }

    pub fn seed_board(&self, title: &str) -> String {
        let id = new_id();
        self.state.lock().unwrap().boards.push(Board {
            id: id.clone(),
            title: title.to_string(),
            description: None,
            background: Some("#e0f7fa".into()),
            owner_id: Some("user-1".into()),
            members: Vec::new(),
            created_at: None,
            updated_at: None,
        });
        id
    }

    pub fn seed_list(&self, board_id: &str, title: &str) -> String {
        let id = new_id();
        let mut state = self.state.lock().unwrap();
        let position = count_as_i64(state.lists.iter().filter(|l| l.board_id == board_id).count());
        state.lists.push(TaskList {
            id: id.clone(),
            board_id: board_id.to_string(),
            title: title.to_string(),
            position,
            created_at: None,
        });
        id
    }

    pub fn seed_card(&self, board_id: &str, list_id: &str, title: &str) -> String {
        let id = new_id();
        let mut state = self.state.lock().unwrap();
        let position = count_as_i64(state.cards.iter().filter(|c| c.list_id == list_id).count());
        state.cards.push(make_card(&id, board_id, list_id, title, position));
        id
    }

    pub fn set_extracted(&self, tasks: Vec<ExtractedTask>) {
        self.state.lock().unwrap().extracted = tasks;
    }

    /// Answer extraction with `tasks` exactly as given, whatever its shape.
    pub fn set_extracted_raw(&self, tasks: Value) {
        self.state.lock().unwrap().extracted_raw = Some(tasks);
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.state.lock().unwrap().failing.push((method, path.to_string()));
    }

    pub fn fail_card_post(&self, index: usize) {
        self.state.lock().unwrap().failing_card_posts.insert(index);
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    /// Requests matching `method` whose path starts with `prefix`.
    pub fn count(&self, method: Method, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.state.lock().unwrap().cards.clone()
    }

    pub fn lists(&self) -> Vec<TaskList> {
        self.state.lock().unwrap().lists.clone()
    }

    pub fn boards(&self) -> Vec<Board> {
        self.state.lock().unwrap().boards.clone()
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state
            .failing
            .iter()
            .any(|(method, path)| *method == request.method && *path == request.path)
        {
            return respond(500, &json!({ "detail": "Injected failure" }));
        }

        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (Method::Get, [""]) => respond(200, &json!({ "message": "TaskHandler backend running" })),
            (Method::Post, ["api", "auth", "login"]) => {
                let email = body["email"].as_str().unwrap_or_default();
                let password = body["password"].as_str().unwrap_or_default();
                let found = state
                    .users
                    .iter()
                    .find(|(u, p)| u.email == email && p == password)
                    .map(|(u, _)| u.clone());
                match found {
                    Some(user) => respond(200, &json!({ "token": token_for(&state, &user.id), "user": user })),
                    None => respond(401, &json!({ "detail": "Invalid credentials" })),
                }
            }
            (Method::Post, ["api", "auth", "register"]) => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if state.users.iter().any(|(u, _)| u.email == email) {
                    return respond(400, &json!({ "detail": "Email already registered" }));
                }
                let user = User {
                    id: new_id(),
                    email,
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    created_at: None,
                };
                let token = format!("token-{}", user.id);
                state.tokens.push((token.clone(), user.id.clone()));
                state
                    .users
                    .push((user.clone(), body["password"].as_str().unwrap_or_default().to_string()));
                respond(200, &json!({ "token": token, "user": user }))
            }
            (_, ["api", ..]) if !authorized(&state, request) => {
                respond(403, &json!({ "detail": "Not authenticated" }))
            }
            (Method::Get, ["api", "auth", "me"]) => {
                let user_id = state
                    .tokens
                    .iter()
                    .find(|(t, _)| Some(t) == request.bearer.as_ref())
                    .map(|(_, id)| id.clone());
                let user = state.users.iter().find(|(u, _)| Some(&u.id) == user_id.as_ref());
                match user {
                    Some((user, _)) => respond(200, &json!(user)),
                    None => respond(404, &json!({ "detail": "User not found" })),
                }
            }
            (Method::Get, ["api", "boards"]) => respond(200, &json!(state.boards)),
            (Method::Post, ["api", "boards"]) => {
                let board = Board {
                    id: new_id(),
                    title: body["title"].as_str().unwrap_or_default().to_string(),
                    description: body["description"].as_str().map(str::to_string),
                    background: Some(body["background"].as_str().unwrap_or("#e0f7fa").to_string()),
                    owner_id: Some("user-1".into()),
                    members: Vec::new(),
                    created_at: None,
                    updated_at: None,
                };
                state.boards.push(board.clone());
                respond(200, &json!(board))
            }
            (Method::Get, ["api", "boards", board_id]) => match state.boards.iter().find(|b| b.id == *board_id) {
                Some(board) => respond(200, &json!(board)),
                None => respond(404, &json!({ "detail": "Board not found" })),
            },
            (Method::Post, ["api", "boards", board_id, "lists"]) => {
                let list = TaskList {
                    id: new_id(),
                    board_id: (*board_id).to_string(),
                    title: body["title"].as_str().unwrap_or_default().to_string(),
                    position: body["position"].as_i64().unwrap_or_default(),
                    created_at: None,
                };
                state.lists.push(list.clone());
                respond(200, &json!(list))
            }
            (Method::Get, ["api", "lists", list_id, "cards"]) => {
                let cards: Vec<&Card> = state.cards.iter().filter(|c| c.list_id == *list_id).collect();
                respond(200, &json!(cards))
            }
            (Method::Get, ["api", "lists", board_id]) => {
                let lists: Vec<&TaskList> = state.lists.iter().filter(|l| l.board_id == *board_id).collect();
                respond(200, &json!(lists))
            }
            (Method::Post, ["api", "lists", list_id, "cards"]) => {
                let index = state.card_posts_seen;
                state.card_posts_seen += 1;
                if state.failing_card_posts.contains(&index) {
                    return respond(500, &json!({ "detail": "Failed to create card" }));
                }
                let mut card = make_card(
                    &new_id(),
                    body["board_id"].as_str().unwrap_or_default(),
                    list_id,
                    body["title"].as_str().unwrap_or_default(),
                    body["position"].as_i64().unwrap_or_default(),
                );
                card.description = body["description"].as_str().map(str::to_string);
                card.priority = Some(body["priority"].as_str().unwrap_or("medium").to_string());
                state.cards.push(card.clone());
                respond(200, &json!(card))
            }
            (Method::Get, ["api", "cards", board_id]) => {
                let cards: Vec<&Card> = state.cards.iter().filter(|c| c.board_id == *board_id).collect();
                respond(200, &json!(cards))
            }
            (Method::Put, ["api", "cards", card_id]) => match state.cards.iter_mut().find(|c| c.id == *card_id) {
                Some(card) => {
                    if let Some(description) = body["description"].as_str() {
                        card.description = Some(description.to_string());
                    }
                    if let Some(title) = body["title"].as_str() {
                        card.title = title.to_string();
                    }
                    if let Some(priority) = body["priority"].as_str() {
                        card.priority = Some(priority.to_string());
                    }
                    respond(200, &json!(card))
                }
                None => respond(404, &json!({ "detail": "Card not found" })),
            },
            (Method::Delete, ["api", "cards", card_id]) => {
                let before = state.cards.len();
                state.cards.retain(|c| c.id != *card_id);
                if state.cards.len() == before {
                    respond(404, &json!({ "detail": "Card not found" }))
                } else {
                    respond(200, &json!({ "message": "Card deleted successfully" }))
                }
            }
            (Method::Get, ["api", "inbox"]) => respond(200, &json!(state.cards)),
            (Method::Post, ["api", "ai", "extract-tasks"]) => {
                let tasks = state.extracted_raw.clone().unwrap_or_else(|| json!(state.extracted));
                respond(200, &json!({ "tasks": tasks }))
            }
            _ => respond(404, &json!({ "detail": "Not Found" })),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if self.state.lock().unwrap().offline {
            self.state.lock().unwrap().requests.push(request);
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(self.handle(&request))
    }
}

fn authorized(state: &FakeState, request: &ApiRequest) -> bool {
    request
        .bearer
        .as_ref()
        .is_some_and(|bearer| state.tokens.iter().any(|(t, _)| t == bearer))
}

fn token_for(state: &FakeState, user_id: &str) -> String {
    state
        .tokens
        .iter()
        .find(|(_, id)| id == user_id)
        .map(|(t, _)| t.clone())
        .unwrap_or_default()
}

fn respond(status: u16, body: &Value) -> ApiResponse {
    ApiResponse { status, body: body.to_string() }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn count_as_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap()
}

pub fn make_card(id: &str, board_id: &str, list_id: &str, title: &str, position: i64) -> Card {
    Card {
        id: id.to_string(),
        list_id: list_id.to_string(),
        board_id: board_id.to_string(),
        title: title.to_string(),
        description: None,
        priority: Some("medium".into()),
        position,
        assigned_to: Some(Vec::new()),
        labels: Vec::new(),
        due_date: None,
        custom_fields: serde_json::Map::new(),
        mirrored_to: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn test_user() -> User {
    User { id: "user-1".into(), email: TEST_EMAIL.into(), name: "Ada".into(), created_at: None }
}

// =========================================================================
// Client wiring
// =========================================================================

/// Client over `backend` with an already-stored session token.
pub fn authed_client(backend: &FakeBackend) -> Arc<ApiClient> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, TEST_TOKEN).unwrap();
    Arc::new(ApiClient::new(Arc::new(backend.clone()), store))
}

/// Client over `backend` with no session.
pub fn anonymous_client(backend: &FakeBackend) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(Arc::new(backend.clone()), Arc::new(MemoryStore::new())))
}

// =========================================================================
// UI doubles
// =========================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.of_kind(ToastKind::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.of_kind(ToastKind::Success)
    }

    fn of_kind(&self, kind: ToastKind) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Confirmation prompt with a fixed answer that counts how often it was asked.
pub struct FixedConfirm {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self { answer, asked: Mutex::new(Vec::new()) })
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answer
    }
}
