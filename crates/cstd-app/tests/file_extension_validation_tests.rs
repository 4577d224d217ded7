//! Integration tests for local CSV extension validation.

mod common;

use cstd_classify::{ClassifyError, is_csv_filename};

#[test]
fn file_extension_validation_tests_exact_suffix_only() {
    assert!(is_csv_filename("data.csv"));
    assert!(!is_csv_filename("data.CSV"));
    assert!(!is_csv_filename("data.csv.txt"));
    assert!(!is_csv_filename("data"));
}

#[test]
fn file_extension_validation_tests_invalid_selection_clears_previous_file() {
    let (mut client, _sink) =
        common::scripted_classify_client(Ok(common::success_response(None, b"ok")));

    client
        .select_file("traffic.csv", b"rows".to_vec())
        .expect("valid selection should stage");
    assert_eq!(client.selected_file_name(), Some("traffic.csv"));

    let rejected = client.select_file("traffic.CSV", b"rows".to_vec());
    assert!(matches!(rejected, Err(ClassifyError::InvalidExtension(_))));
    assert_eq!(client.selected_file_name(), None);
}
