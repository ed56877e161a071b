//! Proptest generators producing document text
//!
//! Generators emit source text rather than parsed values so that every
//! property exercises the parsers as well as the comparator.

use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;

/// A CSV document as header names plus rows of raw cell text
#[derive(Debug, Clone)]
pub struct CsvFixture {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// JSON scalar literal: integer, boolean, null or a plain string
pub fn json_scalar() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        "[a-z0-9 ]{0,8}".prop_map(|s| format!("\"{s}\"")),
    ]
}

/// Arbitrary nested JSON document text
pub fn json_value() -> impl Strategy<Value = String> {
    json_scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..5).prop_map(|items| format!("[{}]", items.join(","))),
            btree_map(key(), inner, 0..5).prop_map(render_object),
        ]
    })
}

/// The same JSON object written with two different key orders
pub fn shuffled_object() -> impl Strategy<Value = (String, String)> {
    btree_map(key(), json_value(), 1..8)
        .prop_flat_map(|map| {
            let entries: Vec<(String, String)> = map.into_iter().collect();
            (Just(entries.clone()), Just(entries).prop_shuffle())
        })
        .prop_map(|(ordered, shuffled)| (render_object(ordered), render_object(shuffled)))
}

/// Pairwise distinct integer literals, at least two of them
pub fn distinct_scalars() -> impl Strategy<Value = Vec<String>> {
    btree_set(0i64..10_000, 2..6).prop_map(|set| set.into_iter().map(|n| n.to_string()).collect())
}

/// Cell text including separators, quotes, backslashes, newlines and spaces
pub fn csv_cell() -> impl Strategy<Value = String> {
    r#"[a-z ,"\\\n]{0,6}"#
}

/// A rectangular CSV table with a distinct-name header
pub fn csv_table() -> impl Strategy<Value = CsvFixture> {
    (1usize..4)
        .prop_flat_map(|width| (btree_set("[a-z]{1,5}", width), vec(vec(csv_cell(), width), 0..6)))
        .prop_map(|(header, rows)| CsvFixture {
            header: header.into_iter().collect(),
            rows,
        })
}

/// A well-formed XML document without attributes or mixed content
pub fn xml_document() -> impl Strategy<Value = String> {
    ("[a-z]{1,5}", xml_content()).prop_map(|(name, content)| format!("<{name}>{content}</{name}>"))
}

fn xml_content() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,8}".prop_recursive(3, 24, 4, |inner| {
        btree_map("[a-z]{1,5}", inner, 1..4).prop_map(|children| {
            children
                .into_iter()
                .map(|(name, content)| format!("<{name}>{content}</{name}>"))
                .collect::<String>()
        })
    })
}

fn render_object(entries: impl IntoIterator<Item = (String, String)>) -> String {
    let body: Vec<String> = entries
        .into_iter()
        .map(|(k, v)| format!("\"{k}\":{v}"))
        .collect();
    format!("{{{}}}", body.join(","))
}
