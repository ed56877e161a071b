//! Comparisons over checked-in golden fixtures

use equiv_core::{
    CompareOptions, Document, Error, Format, MismatchKind, compare_csv, compare_documents,
    compare_json, compare_xml,
};
use equiv_test_utils::golden::{GoldenDir, load};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn options() -> CompareOptions {
    CompareOptions::from_toml_str(&load("compare_options.toml")).unwrap()
}

#[test]
fn test_options_fixture_loads() {
    let options = options();
    assert!(options.ignored_names.contains("generated"));
    assert!(options.ignored_names.contains("exported_at"));
    assert_eq!(options.max_excerpt_chars, 400);
}

#[test]
fn test_xml_exports_equivalent() {
    compare_xml(&load("orders_expected.xml"), &load("orders_actual.xml"), &options()).unwrap();
}

#[test]
fn test_xml_exports_differ_without_ignore() {
    let err = compare_xml(
        &load("orders_expected.xml"),
        &load("orders_actual.xml"),
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::ValueMismatch));
    assert_eq!(
        err.location().map(ToString::to_string).as_deref(),
        Some("/orders/generated")
    );
}

#[test]
fn test_xml_drift_is_located() {
    let drifted = load("orders_actual.xml").replace("<o:qty>1</o:qty>", "<o:qty>4</o:qty>");
    let err = compare_xml(&load("orders_expected.xml"), &drifted, &options()).unwrap_err();
    assert_eq!(
        err.location().map(ToString::to_string).as_deref(),
        Some("/orders/order[0]/line[1]/qty")
    );

    let message = err.to_string();
    assert!(message.starts_with("XML comparison failed: value mismatch at /orders/order[0]/line[1]/qty"));
    assert!(message.contains("<qty>1</qty>"));
    assert!(message.contains("<qty>4</qty>"));
}

#[test]
fn test_csv_exports_equivalent() {
    compare_csv(&load("orders.csv"), &load("orders_actual.csv"), &options()).unwrap();
}

#[test]
fn test_csv_extra_column_without_ignore() {
    let err = compare_csv(
        &load("orders.csv"),
        &load("orders_actual.csv"),
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::ColumnCountMismatch));
}

#[test]
fn test_xml_and_json_exports_share_a_model() {
    let options = options();
    let xml = Document::parse_as(&load("orders_expected.xml"), Format::Xml, &options).unwrap();
    let json = Document::parse_as(&load("orders.json"), Format::Json, &options).unwrap();
    xml.assert_equivalent(&json, &options).unwrap();
}

#[test]
fn test_json_fixture_against_itself_reformatted() {
    let options = options();
    let doc = Document::parse_as(&load("orders.json"), Format::Json, &options).unwrap();
    let reformatted = doc.render(&options).unwrap();
    compare_json(&load("orders.json"), &reformatted, &options).unwrap();
}

#[rstest]
#[case::xml("orders_expected.xml", Format::Xml)]
#[case::json("orders.json", Format::Json)]
#[case::csv("orders.csv", Format::Csv)]
fn test_fixture_written_at_test_time(#[case] name: &str, #[case] format: Format) {
    let dir = GoldenDir::new();
    let path = dir.write(name, &load(name));
    let ext = path.extension().and_then(|e| e.to_str()).unwrap();
    assert_eq!(Format::from_extension(ext), Some(format));

    compare_documents(&load(name), &dir.read(name), format, &options()).unwrap();
}

#[test]
fn test_truncated_excerpt() {
    let options = CompareOptions::new().max_excerpt_chars(40);
    let err = compare_xml(
        &load("orders_expected.xml"),
        &load("orders_expected.xml").replace("<order id=\"2\">", "<order id=\"2\" rush=\"yes\">"),
        &options,
    )
    .unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::UnexpectedKey));
    assert!(err.to_string().contains("...trimmed..."));

    let Error::Mismatch(report) = err else {
        panic!("expected a mismatch");
    };
    assert_eq!(report.mismatch.key(), Some("rush"));
}
