//! Basic usage example for equiv-core

use equiv_core::{CompareOptions, Comparator, Document, Format, compare_json};

fn main() -> equiv_core::Result<()> {
    // Key order does not matter
    compare_json(r#"{"a": 1, "b": 2}"#, r#"{"b": 2, "a": 1}"#, &CompareOptions::default())?;
    println!("JSON documents are equivalent");

    // Volatile fields can be excluded by name
    let options = CompareOptions::new().ignore_node("generated");
    let expected = r#"<report><total>3</total><generated>2024-01-01</generated></report>"#;
    let actual = r#"<report><generated>2025-06-30</generated><total>4</total></report>"#;

    let expected = Document::parse_as(expected, Format::Xml, &options)?;
    let actual = Document::parse_as(actual, Format::Xml, &options)?;

    // Collect every difference instead of stopping at the first
    let comparator = Comparator::new(&options)?;
    for mismatch in comparator.compare_all(expected.value(), actual.value()) {
        println!("  - {mismatch}");
    }

    // Or turn the first one into an error with a rendered report
    if let Err(err) = expected.assert_equivalent(&actual, &options) {
        println!("\n{err}");
    }

    Ok(())
}
