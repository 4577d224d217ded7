//! Integration tests for result filename extraction and fallback.

mod common;

use cstd_classify::FALLBACK_RESULT_FILENAME;

#[test]
fn filename_extraction_tests_uses_suggested_name() {
    let (mut client, sink) = common::scripted_classify_client(Ok(common::success_response(
        Some(r#"attachment; filename="out_123.csv""#),
        b"col,Predicted_Label\n1,Benign\n",
    )));

    client
        .select_file("traffic.csv", b"col\n1\n".to_vec())
        .expect("selection should stage");
    let report = client.submit().expect("submission should succeed");

    assert_eq!(report.filename, "out_123.csv");
    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "out_123.csv");
    assert_eq!(saved[0].1, b"col,Predicted_Label\n1,Benign\n".to_vec());
}

#[test]
fn filename_extraction_tests_missing_header_falls_back() {
    let (mut client, sink) =
        common::scripted_classify_client(Ok(common::success_response(None, b"body")));

    client
        .select_file("traffic.csv", b"col\n".to_vec())
        .expect("selection should stage");
    let report = client.submit().expect("submission should succeed");

    assert_eq!(report.filename, FALLBACK_RESULT_FILENAME);
    assert_eq!(sink.saved()[0].0, "classified_packets.csv");
}

#[test]
fn filename_extraction_tests_unparsable_header_falls_back() {
    let (mut client, _sink) = common::scripted_classify_client(Ok(common::success_response(
        Some("attachment"),
        b"body",
    )));

    client
        .select_file("traffic.csv", b"col\n".to_vec())
        .expect("selection should stage");
    let report = client.submit().expect("submission should succeed");

    assert_eq!(report.filename, FALLBACK_RESULT_FILENAME);
}
