#![warn(missing_docs)]
//! # cstd-ui
//!
//! ## Purpose
//! Defines the shell-facing view state for `cstd-analyzer`: the currently
//! visible view, the authentication dialog, and the user-facing message
//! slots.
//!
//! ## Responsibilities
//! - Hold the single source of truth for which view is visible.
//! - Track the auth dialog's open/closed state and mode.
//! - Carry the dialog's inline message, the non-blocking shell notice, and
//!   the analyze-view status line.
//!
//! ## Data flow
//! Router decisions mutate [`UiState`]; the shell renders from it after
//! every event.
//!
//! ## Ownership and lifetimes
//! `UiState` owns all strings to keep shell event handling free of borrow
//! coupling.
//!
//! ## Error model
//! This crate holds state only; invalid combinations are prevented by the
//! router, not reported as errors.
//!
//! ## Security and privacy notes
//! UI state never holds credentials or password digests.

use cstd_auth::ViewTarget;

/// Initial analyze-view status line.
pub const READY_STATUS: &str = "Ready to analyze data. Please upload a network traffic CSV file.";

/// Mode of the authentication dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    /// Verify credentials and open a session.
    Login,
    /// Create a new account.
    Register,
    /// Reset a forgotten password.
    Forgot,
}

/// Aggregate shell view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// App version string sourced from the root `VERSION`.
    pub version: String,
    /// Currently visible view.
    pub view: ViewTarget,
    /// Whether the auth dialog is open.
    pub dialog_open: bool,
    /// Current auth dialog mode.
    pub dialog_mode: DialogMode,
    /// Inline message shown inside the auth dialog.
    pub dialog_message: Option<String>,
    /// Non-blocking notice shown by the shell (for example a role denial).
    pub notice: Option<String>,
    /// Analyze-view status line.
    pub status_line: String,
}

impl UiState {
    /// Creates the default shell state on the home view.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            view: ViewTarget::Home,
            dialog_open: false,
            dialog_mode: DialogMode::Login,
            dialog_message: None,
            notice: None,
            status_line: READY_STATUS.to_string(),
        }
    }

    /// Opens the auth dialog in `mode`, clearing any previous inline message.
    pub fn open_dialog(&mut self, mode: DialogMode) {
        self.dialog_open = true;
        self.dialog_mode = mode;
        self.dialog_message = None;
    }

    /// Closes the auth dialog and drops its inline message.
    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.dialog_message = None;
    }

    /// Sets the dialog's inline message.
    pub fn set_dialog_message(&mut self, message: impl Into<String>) {
        self.dialog_message = Some(message.into());
    }

    /// Records a non-blocking shell notice.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Takes the pending shell notice, when one is recorded.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Updates the analyze-view status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_line = status.into();
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for dialog state transitions.

    use super::*;

    #[test]
    fn opening_the_dialog_clears_the_previous_message() {
        let mut state = UiState::new("v0.1.0");
        state.open_dialog(DialogMode::Login);
        state.set_dialog_message("access denied");

        state.open_dialog(DialogMode::Register);
        assert!(state.dialog_open);
        assert_eq!(state.dialog_mode, DialogMode::Register);
        assert!(state.dialog_message.is_none());
    }

    #[test]
    fn notices_are_taken_once() {
        let mut state = UiState::new("v0.1.0");
        state.set_notice("admins only");
        assert_eq!(state.take_notice(), Some("admins only".to_string()));
        assert_eq!(state.take_notice(), None);
    }
}
