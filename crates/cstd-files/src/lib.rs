#![warn(missing_docs)]
//! # cstd-files
//!
//! ## Purpose
//! Implements the result-listing client: fetching the names of previously
//! produced result files from the remote service and deriving per-file
//! download references.
//!
//! ## Responsibilities
//! - Execute the listing request through an injectable transport.
//! - Decode the `{"files": [...]}` response body (absent field -> empty).
//! - Build percent-encoded download URLs; no bytes move until the user acts.
//! - Project the fetch outcome into the three displayable listing states.
//!
//! ## Data flow
//! Shell opens the admin view -> [`ListingClient::list_result_files`]
//! fetches fresh entries (never cached) -> [`ListingPhase`] drives what the
//! view renders.
//!
//! ## Error model
//! Every failure (unreachable service, non-2xx, undecodable body) resolves
//! to [`ListingError::Failed`] with a user-facing message; the view shows
//! the message instead of crashing.
//!
//! ## Example
//! ```rust
//! use cstd_files::download_url;
//!
//! let url = download_url("http://127.0.0.1:5000/api/files", "out 1.csv").unwrap();
//! assert_eq!(url, "http://127.0.0.1:5000/api/files/out%201.csv");
//! ```

use std::sync::Arc;

use cstd_core::{HttpResponse, TransportError, interpret_failure};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Required listing endpoint path suffix.
pub const REQUIRED_FILES_PATH: &str = "/api/files";

/// One previously produced result file on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileEntry {
    /// Server-side file name.
    pub name: String,
    /// Download reference; fetching it is an explicit user action.
    pub download_url: String,
}

/// Displayable states of the listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPhase {
    /// Fetch in progress.
    Loading,
    /// Fetch failed; the message is shown in place of entries.
    Failed(String),
    /// Fetch succeeded, possibly with zero entries.
    Loaded(Vec<RemoteFileEntry>),
}

impl ListingPhase {
    /// Projects a fetch outcome into its displayable state.
    pub fn from_result(result: Result<Vec<RemoteFileEntry>, ListingError>) -> Self {
        match result {
            Ok(entries) => ListingPhase::Loaded(entries),
            Err(error) => ListingPhase::Failed(error.to_string()),
        }
    }
}

/// Abstract transport used by the listing client.
pub trait ListingTransport: Send + Sync {
    /// Issues one GET against the listing endpoint.
    ///
    /// # Errors
    /// Returns [`TransportError`] for failures below the HTTP layer.
    fn fetch(&self, endpoint: &str) -> Result<HttpResponse, TransportError>;
}

#[derive(Deserialize)]
struct FilesBody {
    #[serde(default)]
    files: Vec<String>,
}

/// Builds the download URL for one listed file.
///
/// The file name is appended to the listing base path as a single
/// percent-encoded path segment.
///
/// # Errors
/// Returns [`ListingError::InvalidEndpoint`] when `base` does not parse as a
/// URL that can carry path segments.
pub fn download_url(base: &str, file_name: &str) -> Result<String, ListingError> {
    let mut url = Url::parse(base)
        .map_err(|error| ListingError::InvalidEndpoint(format!("invalid files url: {error}")))?;

    url.path_segments_mut()
        .map_err(|_| ListingError::InvalidEndpoint("files url cannot carry paths".to_string()))?
        .push(file_name);

    Ok(url.to_string())
}

/// Listing client over an injectable transport.
pub struct ListingClient {
    endpoint: String,
    transport: Arc<dyn ListingTransport>,
}

impl ListingClient {
    /// Creates a validated listing client.
    ///
    /// # Errors
    /// Returns [`ListingError::InvalidEndpoint`] when the URL does not parse
    /// or its path does not end with [`REQUIRED_FILES_PATH`].
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn ListingTransport>,
    ) -> Result<Self, ListingError> {
        let endpoint = endpoint.into();
        let parsed = Url::parse(&endpoint)
            .map_err(|error| ListingError::InvalidEndpoint(format!("invalid files url: {error}")))?;
        if !parsed.path().ends_with(REQUIRED_FILES_PATH) {
            return Err(ListingError::InvalidEndpoint(format!(
                "files endpoint path must end with {REQUIRED_FILES_PATH}"
            )));
        }

        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Returns the configured listing endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the current result-file listing.
    ///
    /// Entries are fetched fresh on every call and preserve response order;
    /// nothing is cached.
    ///
    /// # Errors
    /// Returns [`ListingError::Failed`] with a user-facing message on any
    /// network, HTTP, or decode failure.
    pub fn list_result_files(&self) -> Result<Vec<RemoteFileEntry>, ListingError> {
        let response = self.transport.fetch(&self.endpoint).map_err(|error| {
            ListingError::Failed(match error {
                TransportError::ConnectionFailed(detail) => {
                    format!("file service is unreachable: {detail}")
                }
                TransportError::Other(detail) => detail,
            })
        })?;

        if !response.is_success() {
            return Err(ListingError::Failed(interpret_failure(&response).message()));
        }

        let body: FilesBody = serde_json::from_slice(&response.body).map_err(|error| {
            ListingError::Failed(format!("listing response could not be decoded: {error}"))
        })?;

        body.files
            .into_iter()
            .map(|name| {
                let download_url = download_url(&self.endpoint, &name)?;
                Ok(RemoteFileEntry { name, download_url })
            })
            .collect()
    }
}

/// Errors produced by the listing workflow.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Endpoint violates the listing contract.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Listing could not be produced; message is user-facing.
    #[error("failed to load files: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for body decoding and download URL derivation.

    use super::*;

    struct FixedTransport {
        response: HttpResponse,
    }

    impl ListingTransport for FixedTransport {
        fn fetch(&self, _endpoint: &str) -> Result<HttpResponse, TransportError> {
            Ok(self.response.clone())
        }
    }

    fn client_with_body(status: u16, body: &[u8]) -> ListingClient {
        ListingClient::new(
            "http://127.0.0.1:5000/api/files",
            Arc::new(FixedTransport {
                response: HttpResponse {
                    status,
                    status_text: "".to_string(),
                    content_disposition: None,
                    body: body.to_vec(),
                },
            }),
        )
        .expect("client should build")
    }

    #[test]
    fn absent_files_field_yields_empty_listing() {
        let entries = client_with_body(200, b"{}")
            .list_result_files()
            .expect("listing should succeed");
        assert!(entries.is_empty());
    }

    #[test]
    fn entries_carry_percent_encoded_download_urls() {
        let entries = client_with_body(200, br#"{"files":["a b.csv"]}"#)
            .list_result_files()
            .expect("listing should succeed");
        assert_eq!(entries[0].name, "a b.csv");
        assert_eq!(
            entries[0].download_url,
            "http://127.0.0.1:5000/api/files/a%20b.csv"
        );
    }

    #[test]
    fn reported_server_error_surfaces_verbatim() {
        let failure = client_with_body(500, br#"{"error":"disk full"}"#)
            .list_result_files()
            .expect_err("listing should fail");
        assert!(failure.to_string().contains("disk full"));
    }
}
