//! Inbox: untriaged cards plus "paste text → extract tasks → add to board".
//!
//! DESIGN
//! ======
//! Committing extracted tasks is best-effort, not atomic. The only hard
//! precondition is that the target board has at least one list. The start
//! position is counted once from the board's cards before the loop; each
//! card is then posted sequentially at `start + index`. A failed post is
//! logged and skipped, and the batch still reports completion.

#[cfg(test)]
#[path = "inbox_test.rs"]
mod inbox_test;

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{ActionError, append_position, required};
use crate::net::api::ApiClient;
use crate::net::types::{Board, Card, CardCreate, ExtractedTask};
use crate::ui::Notifier;

pub const DEFAULT_TASK_TITLE: &str = "Untitled Task";
pub const DEFAULT_TASK_PRIORITY: &str = "medium";
pub const EXTRACT_FAILED: &str = "Failed to extract tasks";
pub const NO_LISTS: &str = "Please create a list in this board first";

/// Outcome of a bulk commit. `attempted` counts every task in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub attempted: usize,
    pub created: usize,
}

impl CommitReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.created
    }
}

pub struct InboxView {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    pub cards: Vec<Card>,
    pub boards: Vec<Board>,
    pub loading: bool,
    pub extracting: bool,
    pub committing: bool,
    pub dialog_open: bool,
    pub text: String,
    pub extracted: Vec<ExtractedTask>,
    pub selected_board: Option<String>,
}

impl InboxView {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            cards: Vec::new(),
            boards: Vec::new(),
            loading: false,
            extracting: false,
            committing: false,
            dialog_open: false,
            text: String::new(),
            extracted: Vec::new(),
            selected_board: None,
        }
    }

    /// Fetch inbox cards and boards together; apply both or neither.
    ///
    /// # Errors
    ///
    /// Returns the first failure after reporting it.
    pub async fn load(&mut self) -> Result<(), ActionError> {
        self.loading = true;
        let result = tokio::try_join!(self.api.inbox(), self.api.boards());
        self.loading = false;

        match result {
            Ok((cards, boards)) => {
                self.cards = cards;
                self.boards = boards;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load inbox");
                self.notifier.error("Failed to load inbox");
                Err(err.into())
            }
        }
    }

    /// Send `self.text` to extraction. On success the returned tasks replace
    /// the previous set verbatim and the review dialog opens; on failure the
    /// previous set is kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or the backend failure.
    pub async fn extract_tasks(&mut self) -> Result<usize, ActionError> {
        let text = match required(&self.text, "Please enter some text") {
            Ok(text) => text.to_string(),
            Err(err) => {
                self.notifier.error(&err.to_string());
                return Err(err);
            }
        };

        self.extracting = true;
        let result = self.api.extract_tasks(&text).await;
        self.extracting = false;

        match result {
            Ok(tasks) => {
                let count = tasks.len();
                self.extracted = tasks;
                self.dialog_open = true;
                self.notifier.success(&format!("Extracted {count} task(s)"));
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "task extraction failed");
                self.notifier.error(EXTRACT_FAILED);
                Err(err.into())
            }
        }
    }

    /// Post every extracted task onto the first list of the selected board.
    ///
    /// # Errors
    ///
    /// Fails before posting anything when no board is selected, there are no
    /// tasks, the board has no lists, or the list/card reads fail. Individual
    /// card failures are not errors.
    pub async fn commit_to_board(&mut self) -> Result<CommitReport, ActionError> {
        let result = self.commit().await;
        self.committing = false;

        match result {
            Ok(report) => {
                self.notifier.success(&format!("{} task(s) added to board!", report.attempted));
                self.reset_dialog();
                let _ = self.load().await;
                Ok(report)
            }
            Err(err) => {
                let message = match &err {
                    ActionError::Api(api) => api.user_message("Failed to add tasks to board"),
                    other => other.to_string(),
                };
                self.notifier.error(&message);
                Err(err)
            }
        }
    }

    pub fn reset_dialog(&mut self) {
        self.dialog_open = false;
        self.extracted.clear();
        self.text.clear();
        self.selected_board = None;
    }

    async fn commit(&mut self) -> Result<CommitReport, ActionError> {
        let board_id = self
            .selected_board
            .clone()
            .ok_or(ActionError::Validation("Please select a board"))?;
        if self.extracted.is_empty() {
            return Err(ActionError::Validation("No tasks to add"));
        }

        self.committing = true;
        let lists = self.api.lists(&board_id).await?;
        let Some(first_list) = lists.first() else {
            return Err(ActionError::Precondition(NO_LISTS));
        };
        let existing = self.api.cards(&board_id).await?;
        let start = existing.iter().filter(|c| c.list_id == first_list.id).count();

        let mut created = 0;
        for (offset, task) in self.extracted.iter().enumerate() {
            let body = card_for_task(task, &first_list.id, &board_id, append_position(start + offset));
            match self.api.create_card(&body).await {
                Ok(_) => created += 1,
                Err(err) => warn!(title = %body.title, position = body.position, error = %err, "skipping task"),
            }
        }

        info!(board_id = %board_id, attempted = self.extracted.len(), created, "extracted tasks committed");
        Ok(CommitReport { attempted: self.extracted.len(), created })
    }
}

/// Card body for an extracted task, filling the defaults for missing fields.
/// Blank strings count as missing.
fn card_for_task(task: &ExtractedTask, list_id: &str, board_id: &str, position: i64) -> CardCreate {
    CardCreate {
        title: non_blank(task.title.as_deref()).unwrap_or(DEFAULT_TASK_TITLE).to_string(),
        description: Some(task.description.clone().unwrap_or_default()),
        list_id: list_id.to_string(),
        board_id: board_id.to_string(),
        position,
        priority: Some(non_blank(task.priority.as_deref()).unwrap_or(DEFAULT_TASK_PRIORITY).to_string()),
        ..CardCreate::default()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
