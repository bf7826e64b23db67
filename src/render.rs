//! Plain-text rendering of boards, kanban columns and cards for the terminal.
//!
//! Columns are laid out side by side at a fixed width. Truncation counts
//! chars, not bytes, so multi-byte titles never split mid-character.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write;

use crate::net::types::{Board, Card};
use crate::pages::board_detail::Column;

pub const COLUMN_WIDTH: usize = 24;
const GUTTER: &str = "  ";

/// Shorten `text` to at most `width` chars, marking the cut with `~`.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('~');
    out
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width))
}

fn card_line(card: &Card) -> String {
    match card.priority.as_deref() {
        Some(priority) if !priority.is_empty() => format!("{} [{priority}]", card.title),
        _ => card.title.clone(),
    }
}

#[must_use]
pub fn render_boards(boards: &[Board]) -> String {
    if boards.is_empty() {
        return "No boards yet\n".to_string();
    }
    let mut out = String::new();
    for board in boards {
        let _ = write!(out, "{}  {}", board.id, board.title);
        if let Some(description) = board.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, "  ({description})");
        }
        out.push('\n');
    }
    out
}

/// Board title followed by one column per list.
#[must_use]
pub fn render_board(board: Option<&Board>, columns: &[Column<'_>]) -> String {
    let mut out = String::new();
    if let Some(board) = board {
        let _ = writeln!(out, "# {}", board.title);
        if let Some(description) = board.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "{description}");
        }
        out.push('\n');
    }
    if columns.is_empty() {
        out.push_str("No lists yet\n");
        return out;
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|c| pad(&format!("{} ({})", c.list.title, c.cards.len()), COLUMN_WIDTH))
        .collect();
    push_row(&mut out, &headers);
    let rule = "-".repeat(COLUMN_WIDTH);
    push_row(&mut out, &vec![rule; columns.len()]);

    let depth = columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| c.cards.get(row).map_or_else(|| pad("", COLUMN_WIDTH), |card| pad(&card_line(card), COLUMN_WIDTH)))
            .collect();
        push_row(&mut out, &cells);
    }
    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(cells.join(GUTTER).trim_end());
    out.push('\n');
}

/// Full card detail, as shown by the card dialog.
#[must_use]
pub fn render_card(card: &Card) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", card.id, card.title);
    if let Some(priority) = card.priority.as_deref() {
        let _ = writeln!(out, "priority: {priority}");
    }
    if let Some(due) = card.due_date.as_deref() {
        let _ = writeln!(out, "due: {due}");
    }
    if !card.labels.is_empty() {
        let _ = writeln!(out, "labels: {}", card.labels.join(", "));
    }
    match card.description.as_deref() {
        Some(text) if !text.is_empty() => {
            let _ = writeln!(out, "\n{text}");
        }
        _ => out.push_str("\n(no description)\n"),
    }
    out
}

/// Inbox cards, one per line.
#[must_use]
pub fn render_inbox(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "Inbox is empty\n".to_string();
    }
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{}  {}", card.id, card_line(card));
    }
    out
}
