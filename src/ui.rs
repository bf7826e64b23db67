//! User-facing feedback seams: transient notifications and blocking confirms.
//!
//! SYSTEM CONTEXT
//! ==============
//! Screen controllers never print. They push [`Toast`]s into a [`Notifier`]
//! and ask a [`Confirm`] before destructive actions, so the terminal front
//! end and the tests each plug in their own implementation.

use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast { kind: ToastKind::Success, message: message.to_string() });
    }

    fn error(&self, message: &str) {
        self.notify(Toast { kind: ToastKind::Error, message: message.to_string() });
    }
}

/// Blocking yes/no prompt.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

// =============================================================================
// TERMINAL IMPLEMENTATIONS
// =============================================================================

/// Writes toasts to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        eprintln!("{}", format_toast(&toast));
    }
}

#[must_use]
pub fn format_toast(toast: &Toast) -> String {
    match toast.kind {
        ToastKind::Success => format!("ok: {}", toast.message),
        ToastKind::Error => format!("error: {}", toast.message),
    }
}

/// Asks on stderr and reads one line from stdin. Only `y`/`yes` confirms.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        is_affirmative(&line)
    }
}

/// Confirms everything; backs the `--yes` flag.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
