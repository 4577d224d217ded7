//! Integration tests for the one-submission-at-a-time contract.

mod common;

use cstd_classify::ClassifyError;
use cstd_core::TransportError;

#[test]
fn submission_guard_tests_rejects_submit_without_selection() {
    let (mut client, sink) =
        common::scripted_classify_client(Ok(common::success_response(None, b"ok")));

    let rejected = client.submit();
    assert!(matches!(rejected, Err(ClassifyError::NoFileSelected)));
    assert!(sink.saved().is_empty());
}

#[test]
fn submission_guard_tests_selection_is_cleared_after_failure() {
    let (mut client, _sink) = common::scripted_classify_client(Err(
        TransportError::ConnectionFailed("refused".to_string()),
    ));

    client
        .select_file("traffic.csv", b"col\n".to_vec())
        .expect("selection should stage");
    assert!(client.submit().is_err());

    // The transient selection is gone; a second submit is a local no-op.
    assert_eq!(client.selected_file_name(), None);
    assert!(matches!(
        client.submit(),
        Err(ClassifyError::NoFileSelected)
    ));
}

#[test]
fn submission_guard_tests_selection_is_cleared_after_success() {
    let (mut client, sink) =
        common::scripted_classify_client(Ok(common::success_response(None, b"labeled")));

    client
        .select_file("traffic.csv", b"col\n".to_vec())
        .expect("selection should stage");
    client.submit().expect("submission should succeed");

    assert_eq!(client.selected_file_name(), None);
    assert!(!client.is_in_flight());
    assert_eq!(sink.saved().len(), 1);
}
