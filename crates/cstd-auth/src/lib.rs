#![warn(missing_docs)]
//! # cstd-auth
//!
//! ## Purpose
//! Implements the session and authorization gate for `cstd-analyzer`: local
//! account lifecycle (register, password reset, login, logout) and the pure
//! navigation policy deciding which views a visitor may reach.
//!
//! ## Responsibilities
//! - Model the session as an explicit value, restored once at startup.
//! - Apply the account transitions against the credential store.
//! - Decide navigation outcomes from (session state, requested view) alone.
//!
//! ## Data flow
//! The shell collects credentials -> [`SessionGate::login`] verifies them
//! against the store and persists the session -> every navigation request
//! passes through [`SessionGate::authorize`] before a view switch.
//!
//! ## Ownership and lifetimes
//! The gate owns its [`SessionState`]; store access is passed in per call so
//! the gate never reads global state.
//!
//! ## Error model
//! Account transitions fail with [`AuthError`] values that map one-to-one to
//! inline dialog messages; none of them is fatal. Store persistence failures
//! are wrapped and propagated.
//!
//! ## Security and privacy notes
//! This gate compares password digests, never plaintext, and exists only to
//! gate UI views on a single device. A changed account role does not
//! retroactively update an open session.
//!
//! ## Example
//! ```rust
//! use cstd_auth::{NavDecision, SessionGate, ViewTarget};
//!
//! let gate = SessionGate::new();
//! assert_eq!(gate.authorize(ViewTarget::Home), NavDecision::Allowed);
//! assert_eq!(gate.authorize(ViewTarget::Analyze), NavDecision::RequiresLogin);
//! ```

use cstd_core::Role;
use cstd_store::{Account, CredentialStore, StoreError, hash_password};
use thiserror::Error;

/// View identifiers known to the navigation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// Public landing view.
    Home,
    /// Upload/classify view; requires any authenticated session.
    Analyze,
    /// Result-file listing; requires an admin session.
    AdminFiles,
}

/// Outcome of one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// Navigation may proceed.
    Allowed,
    /// The visitor must authenticate first.
    RequiresLogin,
    /// The session lacks the admin role.
    RequiresAdminRole,
}

/// Identity of the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Username of the authenticated account.
    pub username: String,
    /// Role mirrored from the account at login time.
    pub role: Role,
}

/// Session state of the running application instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No active session.
    Anonymous,
    /// A session is active.
    Authenticated(SessionIdentity),
}

/// Session state machine with explicit legal transitions.
#[derive(Debug, Clone)]
pub struct SessionGate {
    state: SessionState,
}

impl SessionGate {
    /// Creates a gate in the `Anonymous` state.
    pub fn new() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    /// Restores the gate from the persisted session, once, at startup.
    ///
    /// A missing or malformed persisted session yields `Anonymous`.
    pub fn restore(store: &CredentialStore) -> Self {
        match store.load_session() {
            Some(session) => Self {
                state: SessionState::Authenticated(SessionIdentity {
                    username: session.username,
                    role: session.role,
                }),
            },
            None => Self::new(),
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the active identity, when authenticated.
    pub fn current_identity(&self) -> Option<&SessionIdentity> {
        match &self.state {
            SessionState::Anonymous => None,
            SessionState::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns `true` when a session is active.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Verifies credentials and opens a session.
    ///
    /// Succeeds only when an account matches both the trimmed username and
    /// the digest of the trimmed password exactly; the session is persisted
    /// with the role recorded on the account.
    ///
    /// # Errors
    /// Returns [`AuthError::EmptyCredential`] for blank input,
    /// [`AuthError::AccessDenied`] when no account matches, and
    /// [`AuthError::Store`] when persisting the session fails.
    pub fn login(
        &mut self,
        store: &mut CredentialStore,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, AuthError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredential);
        }

        let digest = hash_password(password);
        let account = store
            .list_accounts()
            .into_iter()
            .find(|account| account.username == username && account.password_hash == digest)
            .ok_or(AuthError::AccessDenied)?;

        let identity = SessionIdentity {
            username: account.username,
            role: account.role,
        };
        store.save_session(&identity.username, identity.role)?;
        self.state = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// Ends the session unconditionally and clears the persisted record.
    ///
    /// The in-memory state transitions to `Anonymous` even when clearing the
    /// persisted session fails.
    ///
    /// # Errors
    /// Returns [`AuthError::Store`] when the store rejects the write.
    pub fn logout(&mut self, store: &mut CredentialStore) -> Result<(), AuthError> {
        self.state = SessionState::Anonymous;
        store.clear_session()?;
        Ok(())
    }

    /// Pure navigation decision over current state and the requested view.
    pub fn authorize(&self, target: ViewTarget) -> NavDecision {
        match (target, &self.state) {
            (ViewTarget::Home, _) => NavDecision::Allowed,
            (_, SessionState::Anonymous) => NavDecision::RequiresLogin,
            (ViewTarget::Analyze, SessionState::Authenticated(_)) => NavDecision::Allowed,
            (ViewTarget::AdminFiles, SessionState::Authenticated(identity)) => {
                match identity.role {
                    Role::Admin => NavDecision::Allowed,
                    Role::User => NavDecision::RequiresAdminRole,
                }
            }
        }
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a new account; registering does not open a session.
///
/// # Errors
/// Returns [`AuthError::EmptyCredential`] for blank input and
/// [`AuthError::DuplicateUsername`] when the trimmed username already exists
/// (case-sensitive exact match).
pub fn register_account(
    store: &mut CredentialStore,
    username: &str,
    password: &str,
    role: Role,
) -> Result<(), AuthError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::EmptyCredential);
    }

    let mut accounts = store.list_accounts();
    if accounts.iter().any(|account| account.username == username) {
        return Err(AuthError::DuplicateUsername);
    }

    accounts.push(Account {
        username: username.to_string(),
        password_hash: hash_password(password),
        role,
    });
    store.save_accounts(&accounts)?;
    Ok(())
}

/// Replaces an account's password digest in place; session state unchanged.
///
/// # Errors
/// Returns [`AuthError::EmptyCredential`] for blank input and
/// [`AuthError::UnknownUsername`] when no account matches.
pub fn reset_password(
    store: &mut CredentialStore,
    username: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    let username = username.trim();
    let new_password = new_password.trim();
    if username.is_empty() || new_password.is_empty() {
        return Err(AuthError::EmptyCredential);
    }

    let mut accounts = store.list_accounts();
    let index = accounts
        .iter()
        .position(|account| account.username == username)
        .ok_or(AuthError::UnknownUsername)?;

    accounts[index].password_hash = hash_password(new_password);
    store.save_accounts(&accounts)?;
    Ok(())
}

/// Errors produced by account and session transitions.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is blank after trimming.
    #[error("please enter both username and password")]
    EmptyCredential,
    /// An account with the requested username already exists.
    #[error("username already exists; please choose another one")]
    DuplicateUsername,
    /// No account matches the requested username.
    #[error("user not found; please check the username")]
    UnknownUsername,
    /// Username/password pair did not match any account.
    #[error("access denied")]
    AccessDenied,
    /// Store persistence failure.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}
