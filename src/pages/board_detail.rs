//! Single-board kanban screen.
//!
//! DESIGN
//! ======
//! `load` fetches board metadata, lists and cards concurrently and applies
//! them only if all three succeed. Every mutation is followed by a full
//! `load`; nothing is patched locally. New lists and cards are appended at
//! a position equal to the number of siblings currently held in memory.
//!
//! Cards are grouped per list by filtering on `list_id` each time a view
//! asks for them; there is no index.

#[cfg(test)]
#[path = "board_detail_test.rs"]
mod board_detail_test;

use std::sync::Arc;

use tracing::error;

use super::{ActionError, append_position, required};
use crate::net::api::{ApiClient, ApiError};
use crate::net::types::{Board, Card, CardCreate, CardUpdate, ListCreate, TaskList};
use crate::ui::{Confirm, Notifier};

pub const DELETE_CARD_PROMPT: &str = "Are you sure you want to delete this card?";

/// One kanban column: a list and the cards that currently point at it.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    pub list: &'a TaskList,
    pub cards: Vec<&'a Card>,
}

pub struct BoardDetail {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
    board_id: String,
    pub board: Option<Board>,
    pub lists: Vec<TaskList>,
    pub cards: Vec<Card>,
    pub loading: bool,
    /// Card shown in the detail dialog, if open.
    pub open_card: Option<Card>,
}

impl BoardDetail {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>, confirm: Arc<dyn Confirm>, board_id: &str) -> Self {
        Self {
            api,
            notifier,
            confirm,
            board_id: board_id.to_string(),
            board: None,
            lists: Vec::new(),
            cards: Vec::new(),
            loading: false,
            open_card: None,
        }
    }

    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Point the screen at another board and reload. No-op for the same id.
    ///
    /// # Errors
    ///
    /// Returns the load failure.
    pub async fn set_board(&mut self, board_id: &str) -> Result<(), ActionError> {
        if self.board_id == board_id {
            return Ok(());
        }
        self.board_id = board_id.to_string();
        self.open_card = None;
        self.load().await
    }

    /// Fetch board, lists and cards together and replace all local state.
    ///
    /// # Errors
    ///
    /// Returns the first failure; previously loaded state is left as it was.
    pub async fn load(&mut self) -> Result<(), ActionError> {
        self.loading = true;
        let id = self.board_id.as_str();
        let result = tokio::try_join!(self.api.board(id), self.api.lists(id), self.api.cards(id));
        self.loading = false;

        match result {
            Ok((board, lists, cards)) => {
                self.board = Some(board);
                self.lists = lists;
                self.cards = cards;
                let open_id = self.open_card.as_ref().map(|c| c.id.clone());
                if let Some(open_id) = open_id {
                    self.open_card = self.cards.iter().find(|c| c.id == open_id).cloned();
                }
                Ok(())
            }
            Err(err) => {
                error!(board_id = %self.board_id, error = %err, "failed to load board");
                self.notifier.error("Failed to load board");
                Err(err.into())
            }
        }
    }

    /// Cards of `list_id`, in the order the backend returned them.
    pub fn cards_in<'a>(&'a self, list_id: &'a str) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |c| c.list_id == list_id)
    }

    /// Column-per-list layout, recomputed on every call.
    #[must_use]
    pub fn columns(&self) -> Vec<Column<'_>> {
        self.lists
            .iter()
            .map(|list| Column { list, cards: self.cards_in(&list.id).collect() })
            .collect()
    }

    /// # Errors
    ///
    /// Returns a validation error for a blank title or the backend failure.
    pub async fn create_list(&mut self, title: &str) -> Result<TaskList, ActionError> {
        let title = self.check(required(title, "List title is required"))?.to_string();
        let body = ListCreate { title, board_id: self.board_id.clone(), position: append_position(self.lists.len()) };

        let created = self.api.create_list(&body).await;
        let list = self.report(created, "List created!", "Failed to create list")?;
        let _ = self.load().await;
        Ok(list)
    }

    /// # Errors
    ///
    /// Returns a validation error for a blank title or the backend failure.
    pub async fn create_card(&mut self, list_id: &str, title: &str) -> Result<Card, ActionError> {
        let title = self.check(required(title, "Card title is required"))?.to_string();
        let body = CardCreate {
            title,
            description: Some(String::new()),
            list_id: list_id.to_string(),
            board_id: self.board_id.clone(),
            position: append_position(self.cards_in(list_id).count()),
            ..CardCreate::default()
        };

        let created = self.api.create_card(&body).await;
        let card = self.report(created, "Card created!", "Failed to create card")?;
        let _ = self.load().await;
        Ok(card)
    }

    pub fn open(&mut self, card_id: &str) -> Option<&Card> {
        self.open_card = self.cards.iter().find(|c| c.id == card_id).cloned();
        self.open_card.as_ref()
    }

    pub fn close(&mut self) {
        self.open_card = None;
    }

    /// Apply a partial update, then reload. No local patch is made.
    ///
    /// # Errors
    ///
    /// Returns the backend failure.
    pub async fn update_card(&mut self, card_id: &str, update: &CardUpdate) -> Result<Card, ActionError> {
        let updated = self.api.update_card(card_id, update).await;
        let card = self.report(updated, "Card updated!", "Failed to update card")?;
        let _ = self.load().await;
        Ok(card)
    }

    /// Delete after confirmation. Returns `Ok(false)` when the user declines,
    /// in which case nothing is sent and nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the backend failure.
    pub async fn delete_card(&mut self, card_id: &str) -> Result<bool, ActionError> {
        if !self.confirm.confirm(DELETE_CARD_PROMPT) {
            return Ok(false);
        }

        let deleted = self.api.delete_card(card_id).await;
        self.report(deleted, "Card deleted!", "Failed to delete card")?;
        self.open_card = None;
        let _ = self.load().await;
        Ok(true)
    }

    fn check<T>(&self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(err) = &result {
            self.notifier.error(&err.to_string());
        }
        result
    }

    fn report<T>(&self, result: Result<T, ApiError>, success: &str, failure: &str) -> Result<T, ActionError> {
        match result {
            Ok(value) => {
                self.notifier.success(success);
                Ok(value)
            }
            Err(err) => {
                error!(board_id = %self.board_id, error = %err, "{failure}");
                self.notifier.error(&err.user_message(failure));
                Err(err.into())
            }
        }
    }
}
