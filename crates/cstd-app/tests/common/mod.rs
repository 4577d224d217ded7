//! Shared fixtures for app integration tests.

use std::sync::Arc;

use cstd_classify::{
    ClassifyClient, ClassifyTransport, MemorySink, MultipartSubmission,
};
use cstd_core::{HttpResponse, Role, TransportError};
use cstd_store::{Account, CredentialStore, MemoryStore, hash_password};

/// Creates an empty in-memory credential store.
#[allow(dead_code)]
pub fn memory_credentials() -> CredentialStore {
    CredentialStore::new(Box::new(MemoryStore::new()))
}

/// Creates a store seeded with `bob` (user) and `carol` (admin), both with
/// password `secret`.
#[allow(dead_code)]
pub fn seeded_credentials() -> CredentialStore {
    let mut store = memory_credentials();
    store
        .save_accounts(&[
            Account {
                username: "bob".to_string(),
                password_hash: hash_password("secret"),
                role: Role::User,
            },
            Account {
                username: "carol".to_string(),
                password_hash: hash_password("secret"),
                role: Role::Admin,
            },
        ])
        .expect("seeding accounts should work");
    store
}

/// Classify transport returning one scripted outcome for every submission.
#[allow(dead_code)]
pub struct ScriptedClassifyTransport {
    outcome: Result<HttpResponse, TransportError>,
}

#[allow(dead_code)]
impl ScriptedClassifyTransport {
    pub fn new(outcome: Result<HttpResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self { outcome })
    }
}

impl ClassifyTransport for ScriptedClassifyTransport {
    fn submit(
        &self,
        _endpoint: &str,
        _submission: &MultipartSubmission,
    ) -> Result<HttpResponse, TransportError> {
        self.outcome.clone()
    }
}

/// Builds a classify client over a scripted transport and a memory sink.
#[allow(dead_code)]
pub fn scripted_classify_client(
    outcome: Result<HttpResponse, TransportError>,
) -> (ClassifyClient, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let client = ClassifyClient::new(
        "http://127.0.0.1:5000/api/predict",
        ScriptedClassifyTransport::new(outcome),
        sink.clone(),
    )
    .expect("classify client should build");
    (client, sink)
}

/// Builds a 2xx classify response with an optional `Content-Disposition`.
#[allow(dead_code)]
pub fn success_response(content_disposition: Option<&str>, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status: 200,
        status_text: "OK".to_string(),
        content_disposition: content_disposition.map(str::to_string),
        body: body.to_vec(),
    }
}

/// Builds a failing classify response with the given status and body.
#[allow(dead_code)]
pub fn failure_response(status: u16, status_text: &str, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        content_disposition: None,
        body: body.to_vec(),
    }
}
