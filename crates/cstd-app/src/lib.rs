#![warn(missing_docs)]
//! # cstd-app
//!
//! ## Purpose
//! Orchestrates store, auth, classify, listing, and view state into the
//! visible `cstd-analyzer` application.
//!
//! ## Responsibilities
//! - Route every navigation request through the authorization gate.
//! - Dispatch auth-dialog submissions by mode and wire the login success
//!   callback to the analysis view.
//! - Drive upload submissions and listing refreshes with user-facing status
//!   text.
//!
//! ## Data flow
//! Shell events -> [`navigate`] / [`submit_auth_dialog`] /
//! [`submit_selected_file`] / [`refresh_listing`] -> mutated
//! [`cstd_ui::UiState`] rendered by the shell.
//!
//! ## Ownership and lifetimes
//! Orchestration functions borrow the collaborating components per call;
//! nothing here holds global state.
//!
//! ## Error model
//! Expected auth failures become inline dialog messages and are never
//! returned; store, classify, and listing failures are wrapped in
//! [`AppError`].
//!
//! ## Security and privacy notes
//! Role checks happen only inside [`cstd_auth::SessionGate::authorize`];
//! this crate never branches on role flags directly.
//!
//! ## Example
//! ```rust
//! use cstd_app::navigate;
//! use cstd_auth::{NavDecision, SessionGate, ViewTarget};
//! use cstd_ui::UiState;
//!
//! let mut ui = UiState::new(cstd_app::app_version());
//! let gate = SessionGate::new();
//! let decision = navigate(&mut ui, &gate, ViewTarget::Analyze);
//! assert_eq!(decision, NavDecision::RequiresLogin);
//! assert!(ui.dialog_open);
//! ```

use cstd_auth::{
    AuthError, NavDecision, SessionGate, SessionIdentity, ViewTarget, register_account,
    reset_password,
};
use cstd_classify::{ClassifyClient, ClassifyError, UploadReport};
use cstd_core::Role;
use cstd_files::{ListingClient, ListingError, ListingPhase};
use cstd_store::{CredentialStore, StoreError};
use cstd_ui::{DialogMode, READY_STATUS, UiState};
use thiserror::Error;

/// Build-time application version loaded from the root `VERSION` file.
pub const APP_VERSION: &str = env!("CSTD_VERSION");

/// Fixed classify endpoint of the remote service.
pub const CLASSIFY_ENDPOINT: &str = "http://127.0.0.1:5000/api/predict";
/// Fixed listing endpoint of the remote service.
pub const FILES_ENDPOINT: &str = "http://127.0.0.1:5000/api/files";

/// Notice shown when a non-admin requests the file listing.
pub const ADMIN_ONLY_NOTICE: &str = "Only an admin can access this section.";

/// Returns the app version sourced from the root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Routes one navigation request through the authorization gate.
///
/// `Allowed` switches the visible view; `RequiresLogin` opens the auth
/// dialog in login mode without switching; `RequiresAdminRole` records a
/// non-blocking notice without switching.
pub fn navigate(ui: &mut UiState, gate: &SessionGate, target: ViewTarget) -> NavDecision {
    let decision = gate.authorize(target);
    match decision {
        NavDecision::Allowed => ui.view = target,
        NavDecision::RequiresLogin => ui.open_dialog(DialogMode::Login),
        NavDecision::RequiresAdminRole => ui.set_notice(ADMIN_ONLY_NOTICE),
    }

    decision
}

/// Applies one auth-dialog submission in the dialog's current mode.
///
/// Register and reset successes leave the session untouched, set an inline
/// confirmation, and flip the dialog to login mode. A login success closes
/// the dialog and navigates to the analysis view. Expected auth failures
/// become inline dialog messages and yield `Ok(None)`.
///
/// # Errors
/// Returns [`AppError::Store`] when local persistence fails; auth failures
/// are never returned as errors.
pub fn submit_auth_dialog(
    ui: &mut UiState,
    gate: &mut SessionGate,
    store: &mut CredentialStore,
    username: &str,
    password: &str,
    role: Role,
) -> Result<Option<SessionIdentity>, AppError> {
    match ui.dialog_mode {
        DialogMode::Register => match register_account(store, username, password, role) {
            Ok(()) => {
                ui.set_dialog_message("Registration successful! You can now login.");
                ui.dialog_mode = DialogMode::Login;
                Ok(None)
            }
            Err(error) => surface_dialog_error(ui, error).map(|()| None),
        },
        DialogMode::Forgot => match reset_password(store, username, password) {
            Ok(()) => {
                ui.set_dialog_message(
                    "Password reset successful! You can now login with your new password.",
                );
                ui.dialog_mode = DialogMode::Login;
                Ok(None)
            }
            Err(error) => surface_dialog_error(ui, error).map(|()| None),
        },
        DialogMode::Login => match gate.login(store, username, password) {
            Ok(identity) => {
                ui.close_dialog();
                navigate(ui, gate, ViewTarget::Analyze);
                Ok(Some(identity))
            }
            Err(error) => surface_dialog_error(ui, error).map(|()| None),
        },
    }
}

/// Ends the session and returns the shell to the home view.
///
/// # Errors
/// Returns [`AppError::Auth`] when clearing the persisted session fails; the
/// in-memory session is gone either way.
pub fn logout(
    ui: &mut UiState,
    gate: &mut SessionGate,
    store: &mut CredentialStore,
) -> Result<(), AppError> {
    gate.logout(store)?;
    navigate(ui, gate, ViewTarget::Home);
    ui.set_status(READY_STATUS);
    Ok(())
}

/// Drives one classify submission and maintains the analyze status line.
///
/// # Errors
/// Returns [`AppError::Classify`] on any submission failure; the failure
/// message is also written to the status line.
pub fn submit_selected_file(
    ui: &mut UiState,
    client: &mut ClassifyClient,
) -> Result<UploadReport, AppError> {
    ui.set_status("Analyzing data... This may take a moment.");
    match client.submit() {
        Ok(report) => {
            ui.set_status(format!(
                "Analysis complete! Classified file saved. Filename: {}",
                report.filename
            ));
            Ok(report)
        }
        Err(error) => {
            ui.set_status(format!("Prediction Failed: {error}"));
            Err(AppError::Classify(error))
        }
    }
}

/// Performs one listing fetch projected into its displayable state.
pub fn refresh_listing(client: &ListingClient) -> ListingPhase {
    ListingPhase::from_result(client.list_result_files())
}

fn surface_dialog_error(ui: &mut UiState, error: AuthError) -> Result<(), AppError> {
    match error {
        AuthError::Store(inner) => Err(AppError::Store(inner)),
        other => {
            ui.set_dialog_message(other.to_string());
            Ok(())
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Auth subsystem error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    /// Local store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Upload/classify error.
    #[error("classify error: {0}")]
    Classify(#[from] ClassifyError),
    /// Listing error.
    #[error("listing error: {0}")]
    Listing(#[from] ListingError),
}
