#![warn(missing_docs)]
//! # cstd-store
//!
//! ## Purpose
//! Implements the device-scoped credential store for `cstd-analyzer`: a
//! small key-value abstraction, the serialized account collection, the
//! persisted session, and the one-way password digest.
//!
//! ## Responsibilities
//! - Abstract the local key-value store behind [`KeyValueStore`].
//! - Provide a file-backed implementation plus an in-memory one for tests.
//! - Encode/decode the account collection with a strict parse-or-default
//!   policy.
//! - Remember and restore the active session (username + role).
//!
//! ## Data flow
//! The auth layer reads and replaces the account collection through
//! [`CredentialStore`]; login writes the session keys, logout clears them,
//! and startup reads them once.
//!
//! ## Ownership and lifetimes
//! Accounts and session values are owned (`String`) so callers never borrow
//! from the backing store.
//!
//! ## Error model
//! Reads never fail: missing, unreadable, or malformed data loads as empty.
//! Writes surface [`StoreError`] so persistence failures stay visible.
//!
//! ## Security and privacy notes
//! Only password digests are stored, never plaintext. The digest is an
//! unsalted SHA-256; this store gates UI views on a single device and makes
//! no stronger security claim.
//!
//! ## Example
//! ```rust
//! use cstd_store::hash_password;
//!
//! assert_eq!(hash_password("secret"), hash_password("secret"));
//! assert_ne!(hash_password("secret"), hash_password("Secret"));
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use cstd_core::Role;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Store key holding the serialized account collection.
pub const ACCOUNTS_KEY: &str = "cstd_users";
/// Store key holding the active session's username.
pub const SESSION_USER_KEY: &str = "cstd_current_user";
/// Store key holding the active session's role.
pub const SESSION_ROLE_KEY: &str = "cstd_current_role";

/// One stored account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, case-sensitive account name.
    pub username: String,
    /// Hex-encoded SHA-256 digest of the account password.
    pub password_hash: String,
    /// Access role mirrored into the session at login.
    pub role: Role,
}

/// Session record restored from the local store at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Username of the persisted session.
    pub username: String,
    /// Role recorded at login time.
    pub role: Role,
}

/// Abstract device-scoped key-value store.
///
/// The application is single-threaded and single-writer; implementations
/// complete every operation before returning.
pub trait KeyValueStore {
    /// Reads one value, `None` when the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes one value.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the backing medium rejects the
    /// write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes one key; removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] when the backing medium rejects the
    /// write.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store used by tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store persisting the whole key map as one JSON object.
///
/// # Notes
/// Loading never fails: an absent, unreadable, or malformed file yields an
/// empty map. Every mutation rewrites the file synchronously.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, treating unreadable content as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self { path, entries }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                StoreError::Persist(format!(
                    "unable to create store directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let raw = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, raw).map_err(|error| {
            StoreError::Persist(format!(
                "unable to write store file '{}': {error}",
                self.path.display()
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Credential store over an injectable key-value backing.
pub struct CredentialStore {
    store: Box<dyn KeyValueStore>,
}

impl CredentialStore {
    /// Wraps a key-value store.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns all known accounts.
    ///
    /// Malformed or missing stored data is treated as "no accounts" rather
    /// than a failure; every read from the local store is untrusted input.
    pub fn list_accounts(&self) -> Vec<Account> {
        let Some(raw) = self.store.get(ACCOUNTS_KEY) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Replaces the full stored account collection.
    ///
    /// # Errors
    /// Returns [`StoreError`] when encoding or persisting fails.
    pub fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(accounts)?;
        self.store.set(ACCOUNTS_KEY, &raw)
    }

    /// Finds one account by exact, case-sensitive username.
    pub fn find_account(&self, username: &str) -> Option<Account> {
        self.list_accounts()
            .into_iter()
            .find(|account| account.username == username)
    }

    /// Reads the persisted session, `None` when absent or malformed.
    pub fn load_session(&self) -> Option<StoredSession> {
        let username = self.store.get(SESSION_USER_KEY)?;
        if username.trim().is_empty() {
            return None;
        }

        let role = Role::parse(&self.store.get(SESSION_ROLE_KEY)?)?;
        Some(StoredSession { username, role })
    }

    /// Persists the active session.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing store rejects the write.
    pub fn save_session(&mut self, username: &str, role: Role) -> Result<(), StoreError> {
        self.store.set(SESSION_USER_KEY, username)?;
        self.store.set(SESSION_ROLE_KEY, role.as_str())
    }

    /// Clears the persisted session.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing store rejects the write.
    pub fn clear_session(&mut self) -> Result<(), StoreError> {
        self.store.remove(SESSION_USER_KEY)?;
        self.store.remove(SESSION_ROLE_KEY)
    }
}

/// Computes the deterministic one-way password digest.
///
/// Equal plaintexts always yield equal digests. The digest is hex-encoded
/// SHA-256 without per-account salt; see the crate-level security notes.
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Errors produced when persisting store content.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account collection could not be encoded.
    #[error("account codec failure: {0}")]
    Codec(#[from] serde_json::Error),
    /// The backing medium rejected a write.
    #[error("store persistence failure: {0}")]
    Persist(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for parse-or-default reads and the password digest.

    use super::*;

    fn memory_credentials() -> CredentialStore {
        CredentialStore::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn corrupted_account_data_reads_as_empty() {
        let mut backing = MemoryStore::new();
        backing
            .set(ACCOUNTS_KEY, "{not valid json")
            .expect("memory set should work");

        let credentials = CredentialStore::new(Box::new(backing));
        assert!(credentials.list_accounts().is_empty());
    }

    #[test]
    fn accounts_round_trip_through_the_store() {
        let mut credentials = memory_credentials();
        let account = Account {
            username: "alice".to_string(),
            password_hash: hash_password("pw"),
            role: Role::Admin,
        };

        credentials
            .save_accounts(std::slice::from_ref(&account))
            .expect("save should work");
        assert_eq!(credentials.find_account("alice"), Some(account));
        assert_eq!(credentials.find_account("Alice"), None);
    }

    #[test]
    fn session_with_unknown_role_is_treated_as_absent() {
        let mut backing = MemoryStore::new();
        backing
            .set(SESSION_USER_KEY, "alice")
            .expect("memory set should work");
        backing
            .set(SESSION_ROLE_KEY, "superuser")
            .expect("memory set should work");

        let credentials = CredentialStore::new(Box::new(backing));
        assert!(credentials.load_session().is_none());
    }

    #[test]
    fn digest_is_deterministic_and_distinct() {
        assert_eq!(hash_password("pw1"), hash_password("pw1"));
        assert_ne!(hash_password("pw1"), hash_password("pw2"));
        assert_ne!(hash_password("pw1"), "pw1");
    }
}
