//! Core traits for the presentation collaborator
//!
//! The bank never renders anything itself. It reports outcomes and asks for
//! confirmations through a `Notifier`, which the caller implements (a dialog
//! library in a UI, a scripted answer queue in the CLI, a recorder in tests).

use std::fmt;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Confirmation and notification surface consumed by the bank
pub trait Notifier {
    /// Show a transient notice
    fn show(&mut self, notice: Notice);

    /// Ask the user to confirm an action
    ///
    /// Returning `false` aborts the pending action without mutating state.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn show(&mut self, notice: Notice) {
        (**self).show(notice)
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}
