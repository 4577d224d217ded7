#![warn(missing_docs)]
//! # cstd-classify
//!
//! ## Purpose
//! Implements the upload/classify client: selecting a traffic-log CSV,
//! submitting it as one multipart form field to the remote classification
//! endpoint, and saving the labeled result file locally.
//!
//! ## Responsibilities
//! - Validate the `.csv` extension before any network contact.
//! - Execute submissions through an injectable transport abstraction.
//! - Extract the suggested result filename from `Content-Disposition`.
//! - Enforce the one-submission-in-flight contract.
//! - Route the result bytes into an injectable [`ResultSink`].
//!
//! ## Data flow
//! Shell stages a file with [`ClassifyClient::select_file`] ->
//! [`ClassifyClient::submit`] sends a [`MultipartSubmission`] through
//! [`ClassifyTransport`] -> the 2xx body is saved under the extracted (or
//! fallback) name -> an [`UploadReport`] flows back to the shell.
//!
//! ## Ownership and lifetimes
//! Staged file bytes are owned by the client and move into the submission;
//! the selection is cleared on every outcome so a new file can be chosen.
//!
//! ## Error model
//! Local validation failures never reach the transport. Remote failures are
//! categorized by [`ClassifyError`]: unreachable service, reported JSON
//! error (verbatim message), or a generic "HTTP status" degradation.
//!
//! ## Security and privacy notes
//! The server-suggested filename is untrusted input; sinks reduce it to its
//! final path component before writing.
//!
//! ## Example
//! ```rust
//! use cstd_classify::is_csv_filename;
//!
//! assert!(is_csv_filename("data.csv"));
//! assert!(!is_csv_filename("data.CSV"));
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cstd_core::{HttpResponse, RemoteFailure, TransportError, interpret_failure};
use thiserror::Error;
use url::Url;

/// Multipart field name carrying the uploaded file.
pub const CLASSIFY_FIELD_NAME: &str = "file";
/// Fallback result filename when the response suggests none.
pub const FALLBACK_RESULT_FILENAME: &str = "classified_packets.csv";
/// Required classify endpoint path suffix.
pub const REQUIRED_CLASSIFY_PATH: &str = "/api/predict";

/// Returns `true` for filenames ending in the exact `.csv` suffix.
///
/// The check is case-sensitive: `"data.CSV"` is rejected.
pub fn is_csv_filename(name: &str) -> bool {
    name.ends_with(".csv")
}

/// Extracts the suggested filename from a `Content-Disposition` value.
///
/// Accepts both the `filename="<name>"` and `filename=<name>` conventions;
/// an absent or empty name yields `None`.
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    let marker = "filename=";
    let start = value.rfind(marker)? + marker.len();
    let raw = value[start..].split(';').next().unwrap_or("").trim();
    let name = raw.trim_matches('"').trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Validates the classify endpoint contract.
///
/// # Errors
/// Returns [`ClassifyError::InvalidEndpoint`] when the URL does not parse or
/// its path does not end with [`REQUIRED_CLASSIFY_PATH`].
pub fn validate_classify_endpoint(endpoint: &str) -> Result<(), ClassifyError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| ClassifyError::InvalidEndpoint(format!("invalid classify url: {error}")))?;

    if !parsed.path().ends_with(REQUIRED_CLASSIFY_PATH) {
        return Err(ClassifyError::InvalidEndpoint(format!(
            "classify endpoint path must end with {REQUIRED_CLASSIFY_PATH}"
        )));
    }

    Ok(())
}

/// One staged local file awaiting submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Local filename, already validated to end in `.csv`.
    pub name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// The single multipart form field handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartSubmission {
    /// Form field name (always [`CLASSIFY_FIELD_NAME`]).
    pub field_name: String,
    /// Filename declared for the form field.
    pub file_name: String,
    /// File bytes.
    pub bytes: Vec<u8>,
}

/// Abstract transport used by the classify client.
///
/// The response body is declared opaque binary: a success response is itself
/// a CSV file, never text/JSON.
pub trait ClassifyTransport: Send + Sync {
    /// Posts one multipart submission to the classify endpoint.
    ///
    /// # Errors
    /// Returns [`TransportError::ConnectionFailed`] when no connection could
    /// be established, [`TransportError::Other`] for any other failure below
    /// the HTTP layer.
    fn submit(
        &self,
        endpoint: &str,
        submission: &MultipartSubmission,
    ) -> Result<HttpResponse, TransportError>;
}

/// Destination for a classified result file.
pub trait ResultSink: Send + Sync {
    /// Saves one result file.
    ///
    /// # Errors
    /// Returns [`ClassifyError::Save`] when the save fails.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ClassifyError>;
}

/// Sink writing result files into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink rooted at `dir`; the directory is created on demand.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResultSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ClassifyError> {
        // The suggested name came from the server; keep only its final
        // path component.
        let safe_name = Path::new(filename)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_RESULT_FILENAME.to_string());

        std::fs::create_dir_all(&self.dir).map_err(|error| {
            ClassifyError::Save(format!(
                "unable to create result directory '{}': {error}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(safe_name);
        std::fs::write(&path, bytes).map_err(|error| {
            ClassifyError::Save(format!(
                "unable to write result file '{}': {error}",
                path.display()
            ))
        })
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the files saved so far as `(filename, bytes)` pairs.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for MemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ClassifyError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| ClassifyError::Save("memory sink lock poisoned".to_string()))?;
        saved.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Summary of one successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Name the result file was saved under.
    pub filename: String,
    /// Size of the saved result body.
    pub bytes_written: usize,
}

/// Upload/classify client over injectable transport and sink.
pub struct ClassifyClient {
    endpoint: String,
    transport: Arc<dyn ClassifyTransport>,
    sink: Arc<dyn ResultSink>,
    selected: Option<UploadFile>,
    in_flight: bool,
}

impl ClassifyClient {
    /// Creates a validated classify client.
    ///
    /// # Errors
    /// Returns [`ClassifyError::InvalidEndpoint`] for a malformed endpoint.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn ClassifyTransport>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self, ClassifyError> {
        let endpoint = endpoint.into();
        validate_classify_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
            sink,
            selected: None,
            in_flight: false,
        })
    }

    /// Returns the configured classify endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Stages one local file for submission.
    ///
    /// # Errors
    /// Returns [`ClassifyError::InvalidExtension`] for non-`.csv` names; an
    /// invalid selection also clears any previously staged file.
    pub fn select_file(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), ClassifyError> {
        let name = name.into();
        if !is_csv_filename(&name) {
            self.selected = None;
            return Err(ClassifyError::InvalidExtension(name));
        }

        self.selected = Some(UploadFile { name, bytes });
        Ok(())
    }

    /// Returns the staged filename, when a file is selected.
    pub fn selected_file_name(&self) -> Option<&str> {
        self.selected.as_ref().map(|file| file.name.as_str())
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submits the staged file and saves the classified result locally.
    ///
    /// At most one submission may be in flight per client; the request is
    /// rejected locally when one is in progress or nothing is staged. The
    /// staged selection is cleared regardless of outcome.
    ///
    /// # Errors
    /// See [`ClassifyError`] for the full failure taxonomy.
    pub fn submit(&mut self) -> Result<UploadReport, ClassifyError> {
        if self.in_flight {
            return Err(ClassifyError::SubmissionInProgress);
        }

        let file = self.selected.take().ok_or(ClassifyError::NoFileSelected)?;
        self.in_flight = true;
        let outcome = self.perform(file);
        self.in_flight = false;
        outcome
    }

    fn perform(&self, file: UploadFile) -> Result<UploadReport, ClassifyError> {
        let submission = MultipartSubmission {
            field_name: CLASSIFY_FIELD_NAME.to_string(),
            file_name: file.name,
            bytes: file.bytes,
        };

        let response = self
            .transport
            .submit(&self.endpoint, &submission)
            .map_err(|error| match error {
                TransportError::ConnectionFailed(detail) => {
                    ClassifyError::NetworkUnavailable(detail)
                }
                TransportError::Other(detail) => ClassifyError::Transport(detail),
            })?;

        if !response.is_success() {
            return Err(match interpret_failure(&response) {
                RemoteFailure::Reported { status, message } => {
                    ClassifyError::Remote { status, message }
                }
                RemoteFailure::Unparseable {
                    status,
                    status_text,
                } => ClassifyError::RemoteUnparseable {
                    status,
                    status_text,
                },
            });
        }

        let filename = response
            .content_disposition
            .as_deref()
            .and_then(filename_from_content_disposition)
            .unwrap_or_else(|| FALLBACK_RESULT_FILENAME.to_string());

        self.sink.save(&filename, &response.body)?;
        Ok(UploadReport {
            filename,
            bytes_written: response.body.len(),
        })
    }
}

/// Errors produced by the upload/classify workflow.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Endpoint violates the classify contract.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Selected filename does not end in `.csv`.
    #[error("please select a valid CSV file (got '{0}')")]
    InvalidExtension(String),
    /// No file is staged for submission.
    #[error("no file selected")]
    NoFileSelected,
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    SubmissionInProgress,
    /// The classification service could not be reached.
    #[error("cannot connect to the classification service: {0}")]
    NetworkUnavailable(String),
    /// The server reported a failure message.
    #[error("{message}")]
    Remote {
        /// HTTP status of the failing response.
        status: u16,
        /// Verbatim server message.
        message: String,
    },
    /// The server failed without a parseable error body.
    #[error("HTTP {status}: {status_text}")]
    RemoteUnparseable {
        /// HTTP status of the failing response.
        status: u16,
        /// Status reason phrase.
        status_text: String,
    },
    /// Other transport-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Result file could not be saved.
    #[error("result save failed: {0}")]
    Save(String),
}
