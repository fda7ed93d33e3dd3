//! Presentation port driven by the orchestrator.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What the workflows need from a front end.
pub trait Ui {
    /// Shows a transient notification.
    fn notify(&mut self, notification: Notification);

    /// Places `text` on the clipboard.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), String>;

    /// Puts decrypted text in the visible result field.
    fn show_result(&mut self, text: &str);

    /// Blocking yes/no question. The only synchronous gate in any workflow.
    fn confirm(&mut self, prompt: &str) -> bool;
}
