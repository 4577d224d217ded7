#![warn(missing_docs)]
//! # cstd-core
//!
//! ## Purpose
//! Defines the shared boundary model used across the `cstd-analyzer`
//! workspace: account roles, the HTTP response snapshot exchanged with
//! transport implementations, and the common interpretation of remote
//! failure bodies.
//!
//! ## Responsibilities
//! - Represent the two account roles and their storage encoding.
//! - Carry status, header, and body data of one remote response.
//! - Distinguish reported remote errors (JSON `error` field) from
//!   unparseable ones (generic HTTP status text).
//!
//! ## Data flow
//! Transport implementations produce [`HttpResponse`] values; the classify
//! and listing clients feed non-success responses through
//! [`interpret_failure`] before surfacing a user-facing message.
//!
//! ## Ownership and lifetimes
//! Response snapshots own their body bytes so clients never borrow from
//! transient network buffers.
//!
//! ## Error model
//! Transport-level failures are [`TransportError`] values; the connection
//! category is kept separate so callers can surface "service unreachable"
//! distinctly from other failures.
//!
//! ## Security and privacy notes
//! This crate handles only response metadata and role labels; it never sees
//! credentials or password digests.
//!
//! ## Example
//! ```rust
//! use cstd_core::Role;
//!
//! assert_eq!(Role::parse("admin"), Some(Role::Admin));
//! assert_eq!(Role::parse("superuser"), None);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role controlling access to the admin file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account; may run analyses.
    User,
    /// Administrator; may additionally view produced result files.
    Admin,
}

impl Role {
    /// Returns the storage encoding of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role string.
    ///
    /// Unknown values yield `None`; stored data is untrusted input.
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Snapshot of one remote HTTP response as seen by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Status reason phrase reported by the server.
    pub status_text: String,
    /// Raw `Content-Disposition` header value, when present.
    pub content_disposition: Option<String>,
    /// Response body bytes, treated as opaque by default.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Failure raised by a transport before any HTTP response exists.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No connection to the remote service could be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Interpretation of a non-success remote response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The server reported a message through a JSON `error` field.
    Reported {
        /// HTTP status of the failing response.
        status: u16,
        /// Server-supplied message, passed through verbatim.
        message: String,
    },
    /// The body carried no parseable error report.
    Unparseable {
        /// HTTP status of the failing response.
        status: u16,
        /// Status reason phrase used to build a generic message.
        status_text: String,
    },
}

impl RemoteFailure {
    /// Returns the user-facing message for this failure.
    pub fn message(&self) -> String {
        match self {
            RemoteFailure::Reported { message, .. } => message.clone(),
            RemoteFailure::Unparseable {
                status,
                status_text,
            } => format!("HTTP {status}: {status_text}"),
        }
    }

    /// Returns the HTTP status of the failing response.
    pub fn status(&self) -> u16 {
        match self {
            RemoteFailure::Reported { status, .. } => *status,
            RemoteFailure::Unparseable { status, .. } => *status,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Interprets a non-success response body.
///
/// The body is read as text and parsed as JSON; when an `error` field with a
/// non-blank value is present its message is surfaced verbatim, otherwise the
/// failure degrades to a generic "HTTP status" form.
pub fn interpret_failure(response: &HttpResponse) -> RemoteFailure {
    if let Ok(body) = serde_json::from_slice::<ErrorBody>(&response.body)
        && !body.error.trim().is_empty()
    {
        return RemoteFailure::Reported {
            status: response.status,
            message: body.error,
        };
    }

    RemoteFailure::Unparseable {
        status: response.status,
        status_text: response.status_text.clone(),
    }
}
