//! Integration tests for the result-listing client.

mod common;

use std::sync::Arc;

use cstd_core::{HttpResponse, TransportError};
use cstd_files::{ListingClient, ListingPhase, ListingTransport, download_url};

struct ScriptedListingTransport {
    outcome: Result<HttpResponse, TransportError>,
}

impl ListingTransport for ScriptedListingTransport {
    fn fetch(&self, _endpoint: &str) -> Result<HttpResponse, TransportError> {
        self.outcome.clone()
    }
}

fn scripted_listing_client(outcome: Result<HttpResponse, TransportError>) -> ListingClient {
    ListingClient::new(
        "http://127.0.0.1:5000/api/files",
        Arc::new(ScriptedListingTransport { outcome }),
    )
    .expect("listing client should build")
}

#[test]
fn listing_client_tests_parses_files_array_in_order() {
    let client = scripted_listing_client(Ok(common::success_response(
        None,
        br#"{"files":["classified_2.csv","classified_1.csv"]}"#,
    )));

    let entries = client.list_result_files().expect("listing should succeed");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "classified_2.csv");
    assert_eq!(
        entries[0].download_url,
        "http://127.0.0.1:5000/api/files/classified_2.csv"
    );
}

#[test]
fn listing_client_tests_reported_error_message_surfaces() {
    let client = scripted_listing_client(Ok(common::failure_response(
        500,
        "Internal Server Error",
        br#"{"error":"disk full"}"#,
    )));

    let failure = client.list_result_files().expect_err("listing should fail");
    assert!(failure.to_string().contains("disk full"));
}

#[test]
fn listing_client_tests_unparseable_error_degrades_to_http_status() {
    let client = scripted_listing_client(Ok(common::failure_response(
        500,
        "Internal Server Error",
        b"boom",
    )));

    let failure = client.list_result_files().expect_err("listing should fail");
    assert!(failure.to_string().contains("HTTP 500"));
}

#[test]
fn listing_client_tests_phase_projection_covers_error_and_loaded() {
    let loaded = ListingPhase::from_result(Ok(Vec::new()));
    assert_eq!(loaded, ListingPhase::Loaded(Vec::new()));

    let failed = ListingPhase::from_result(Err(cstd_files::ListingError::Failed(
        "files unavailable".to_string(),
    )));
    assert!(matches!(failed, ListingPhase::Failed(message) if message.contains("files unavailable")));
}

#[test]
fn listing_client_tests_download_url_is_percent_encoded() {
    let url = download_url("http://127.0.0.1:5000/api/files", "out 1 (final).csv")
        .expect("url should build");
    assert_eq!(
        url,
        "http://127.0.0.1:5000/api/files/out%201%20(final).csv"
    );
}
