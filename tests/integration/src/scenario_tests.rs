//! End-to-end acceptance scenarios
//!
//! Each test drives the public `compare_*` surface the way a test suite
//! would: raw text in, `Ok(())` or a structured mismatch out.

use equiv_core::{
    CompareOptions, Comparator, Document, Error, Format, MismatchKind, compare_csv, compare_json,
    compare_xml,
};
use pretty_assertions::assert_eq;

fn location(err: &Error) -> Option<String> {
    err.location().map(ToString::to_string)
}

#[test]
fn test_reordered_json_keys_pass() {
    equiv_test_utils::logging::init();
    compare_json(r#"{"a":1,"b":2}"#, r#"{"b":2,"a":1}"#, &CompareOptions::default()).unwrap();
}

#[test]
fn test_renamed_json_root_key_fails() {
    let options = CompareOptions::default();
    let expected = r#"{"root":1}"#;
    let actual = r#"{"diff-root":1}"#;

    let err = compare_json(expected, actual, &options).unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::MissingKey));
    assert_eq!(location(&err).as_deref(), Some("/root"));
    assert!(err.to_string().contains("missing key \"root\""));

    let expected = Document::parse_as(expected, Format::Json, &options).unwrap();
    let actual = Document::parse_as(actual, Format::Json, &options).unwrap();
    let all = Comparator::new(&options)
        .unwrap()
        .compare_all(expected.value(), actual.value());
    let found: Vec<(MismatchKind, String)> = all
        .iter()
        .map(|m| (m.kind, m.location.to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            (MismatchKind::MissingKey, "/root".to_string()),
            (MismatchKind::UnexpectedKey, "/diff-root".to_string()),
        ]
    );
}

#[test]
fn test_ignored_xml_node_passes() {
    let expected = "<root><Node1>first</Node1><Node2>same</Node2></root>";
    let actual = "<root><Node1>second</Node1><Node2>same</Node2></root>";

    let err = compare_xml(expected, actual, &CompareOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::ValueMismatch));

    let options = CompareOptions::new().ignore_node("Node1");
    compare_xml(expected, actual, &options).unwrap();
}

#[test]
fn test_csv_cell_difference_fails() {
    let err = compare_csv("a,b\n1,2\n", "a,b\n1,3\n", &CompareOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::ValueMismatch));
    assert_eq!(location(&err).as_deref(), Some("row 1, column \"b\""));

    let Error::Mismatch(report) = err else {
        panic!("expected a mismatch");
    };
    assert_eq!(report.mismatch.expected, "2");
    assert_eq!(report.mismatch.actual, "3");
    assert_eq!(report.expected_format, Format::Csv);
}

#[test]
fn test_csv_row_wider_than_header_fails() {
    let err = compare_csv("a,b\n1,2\n", "a,b\n1,2,3\n", &CompareOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::InvalidRow));
    assert!(err.to_string().contains("3 cells in actual document"));
}

#[test]
fn test_first_mismatch_is_first_of_all() {
    let options = CompareOptions::default();
    let expected = r#"{"a":[1,2],"b":{"c":"x"},"d":1}"#;
    let actual = r#"{"e":0,"a":[1,3],"b":{"c":"y"}}"#;

    let err = compare_json(expected, actual, &options).unwrap_err();

    let expected = Document::parse_as(expected, Format::Json, &options).unwrap();
    let actual = Document::parse_as(actual, Format::Json, &options).unwrap();
    let all = Comparator::new(&options)
        .unwrap()
        .compare_all(expected.value(), actual.value());

    assert_eq!(all.len(), 4);
    assert_eq!(Some(&all[0].location), err.location());
    assert_eq!(all[0].kind, MismatchKind::MissingKey);
}
