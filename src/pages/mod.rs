//! Screen controllers: one per screen, each owning its state and UI flags.
//!
//! DESIGN
//! ======
//! Controllers fetch through the shared [`ApiClient`](crate::net::api::ApiClient),
//! replace their state wholesale from responses, and re-fetch after every
//! mutation instead of patching locally. Every operation both returns its
//! outcome and reports it through the [`Notifier`](crate::ui::Notifier).

pub mod board_detail;
pub mod board_list;
pub mod inbox;
pub mod session_gate;

use crate::net::api::ApiError;

/// Failure of a user action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A required field was empty; no request was made.
    #[error("{0}")]
    Validation(&'static str),

    /// A precondition on remote state did not hold.
    #[error("{0}")]
    Precondition(&'static str),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Trimmed `value`, or a validation error when nothing is left.
fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, ActionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActionError::Validation(message));
    }
    Ok(trimmed)
}

/// Append position for a collection currently holding `count` items.
fn append_position(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
