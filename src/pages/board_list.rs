//! Board overview: list the session's boards and create new ones.

#[cfg(test)]
#[path = "board_list_test.rs"]
mod board_list_test;

use std::sync::Arc;

use tracing::error;

use super::{ActionError, required};
use crate::app::Route;
use crate::net::api::ApiClient;
use crate::net::types::{Board, BoardCreate};
use crate::ui::Notifier;

/// Form state of the "create board" dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardDraft {
    pub title: String,
    pub description: String,
}

pub struct BoardList {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    pub boards: Vec<Board>,
    pub loading: bool,
    pub dialog_open: bool,
    pub draft: BoardDraft,
}

impl BoardList {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier, boards: Vec::new(), loading: false, dialog_open: false, draft: BoardDraft::default() }
    }

    /// Fetch the full board set. On failure the list is emptied.
    ///
    /// # Errors
    ///
    /// Returns the backend failure after reporting it.
    pub async fn load(&mut self) -> Result<(), ActionError> {
        self.loading = true;
        let result = self.api.boards().await;
        self.loading = false;

        match result {
            Ok(boards) => {
                self.boards = boards;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load boards");
                self.boards.clear();
                self.notifier.error("Failed to load boards");
                Err(err.into())
            }
        }
    }

    pub fn open_create_dialog(&mut self) {
        self.dialog_open = true;
    }

    pub fn close_create_dialog(&mut self) {
        self.dialog_open = false;
        self.draft = BoardDraft::default();
    }

    /// Create a board from the draft, then re-fetch the whole board set.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title (no request is made) or
    /// the backend failure; the dialog stays open on either.
    pub async fn create_board(&mut self) -> Result<Board, ActionError> {
        let title = match required(&self.draft.title, "Board title is required") {
            Ok(title) => title.to_string(),
            Err(err) => {
                self.notifier.error(&err.to_string());
                return Err(err);
            }
        };
        let description = self.draft.description.trim();
        let body = BoardCreate {
            title,
            description: (!description.is_empty()).then(|| description.to_string()),
            background: None,
        };

        match self.api.create_board(&body).await {
            Ok(board) => {
                self.notifier.success("Board created!");
                self.close_create_dialog();
                let _ = self.load().await;
                Ok(board)
            }
            Err(err) => {
                error!(error = %err, "failed to create board");
                self.notifier.error(&err.user_message("Failed to create board"));
                Err(err.into())
            }
        }
    }

    /// Navigation target for a board selection.
    #[must_use]
    pub fn select(&self, board_id: &str) -> Route {
        Route::Board(board_id.to_string())
    }
}
