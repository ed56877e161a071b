//! Transform-then-compare against golden fixtures

use equiv_core::{
    CompareOptions, CsvHandler, CsvOptions, Document, Format, MismatchKind, Path, Row, Table,
    TEXT_KEY, Value,
};
use equiv_test_utils::golden::load;
use equiv_transform::{FnTransformer, Transformer, assert_transform, transform_xml_to_csv};
use pretty_assertions::assert_eq;

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_scalar).unwrap_or_default()
}

/// Flattens an order export into one CSV row per order
fn orders_to_csv(_program: &str, input: &str) -> Result<String, equiv_core::Error> {
    let options = CompareOptions::default();
    let doc = Document::parse_as(input, Format::Xml, &options)?;
    let orders = match doc.value().get_path(&Path::parse("/orders/order")) {
        Some(Value::Array(items)) => items.clone(),
        Some(single) => vec![single.clone()],
        None => Vec::new(),
    };

    let rows = orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let total = order.get("total").cloned().unwrap_or(Value::scalar(""));
            Row::new(
                i + 1,
                vec![
                    text(order, "id").to_string(),
                    text(order, "customer").to_string(),
                    text(&total, TEXT_KEY).to_string(),
                    text(&total, "currency").to_string(),
                ],
            )
        })
        .collect();

    let table = Table {
        header: Some(vec!["id".into(), "customer".into(), "total".into(), "currency".into()]),
        rows,
    };
    Ok(CsvHandler::new(CsvOptions::default())?.render_table(&table))
}

#[test]
fn test_orders_transform_to_csv_matches_golden() {
    let transformer = FnTransformer::new(orders_to_csv);
    assert_transform(
        &transformer,
        "",
        &load("orders_expected.xml"),
        &load("orders.csv"),
        Format::Csv,
        &CompareOptions::default(),
    )
    .unwrap();
}

#[test]
fn test_orders_transform_output_text() {
    let transformer = FnTransformer::new(orders_to_csv);
    let csv = transform_xml_to_csv(&transformer, "", &load("orders_actual.xml")).unwrap();
    assert_eq!(csv, load("orders.csv"));
}

#[test]
fn test_transform_regression_is_a_mismatch() {
    let lossy = FnTransformer::new(|program: &str, input: &str| {
        orders_to_csv(program, input).map(|csv| csv.replace("12.50", "12.5"))
    });
    let err = assert_transform(
        &lossy,
        "",
        &load("orders_expected.xml"),
        &load("orders.csv"),
        Format::Csv,
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), Some(MismatchKind::ValueMismatch));
    assert_eq!(
        err.location().map(ToString::to_string).as_deref(),
        Some("row 1, column \"total\"")
    );
}

#[test]
fn test_identity_transform_to_json_across_formats() {
    // XML in, JSON out: the JSON is compared with the JSON fixture
    let to_json = FnTransformer::new(|_: &str, input: &str| -> Result<String, equiv_core::Error> {
        let options = CompareOptions::new().ignore_node("generated");
        let doc = Document::parse_as(input, Format::Xml, &options)?;
        let json = Document::parse_as(&load("orders.json"), Format::Json, &options)?;
        doc.assert_equivalent(&json, &options)?;
        json.render(&options)
    });
    assert_transform(
        &to_json,
        "",
        &load("orders_actual.xml"),
        &load("orders.json"),
        Format::Json,
        &CompareOptions::new().ignore_node("generated"),
    )
    .unwrap();
}

#[cfg(unix)]
#[test]
fn test_command_transform_with_program_file() {
    let sh = equiv_transform::CommandTransformer::new("sh").arg(equiv_transform::PROGRAM_VAR);
    let program = "sed 's/currency=\"EUR\"/currency=\"GBP\"/'";
    let output = sh.transform(program, &load("orders_expected.xml")).unwrap();
    let err = equiv_core::compare_xml(&load("orders_expected.xml"), &output, &CompareOptions::default())
        .unwrap_err();
    assert_eq!(
        err.location().map(ToString::to_string).as_deref(),
        Some("/orders/order[0]/total/currency")
    );
}
