//! Tests for transform-then-compare

use equiv_core::{CompareOptions, Format, MismatchKind};
use equiv_transform::{
    CommandTransformer, Error, FnTransformer, Transformer, assert_transform, transform_xml_to_csv,
    transform_xml_to_json, transform_xml_to_xml,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Renames every `<a>` element to `<b>`
fn rename_a_to_b() -> impl Transformer {
    FnTransformer::new(|_: &str, input: &str| {
        Ok::<_, std::io::Error>(input.replace("<a>", "<b>").replace("</a>", "</b>"))
    })
}

/// Emits a fixed document regardless of input
fn constant(output: &'static str) -> impl Transformer {
    FnTransformer::new(move |_: &str, _: &str| Ok::<_, std::io::Error>(output.to_string()))
}

#[test]
fn test_transform_xml_to_xml_returns_output() {
    let output = transform_xml_to_xml(&rename_a_to_b(), "", "<r><a>1</a></r>").unwrap();
    assert_eq!(output, "<r><b>1</b></r>");
}

#[test]
fn test_transform_output_is_returned_unparsed() {
    let raw = constant("not \"valid, csv or json");
    assert_eq!(transform_xml_to_csv(&raw, "", "<r/>").unwrap(), "not \"valid, csv or json");
    assert_eq!(transform_xml_to_json(&raw, "", "<r/>").unwrap(), "not \"valid, csv or json");
}

#[test]
fn test_function_error_is_kept_as_source() {
    use std::error::Error as _;

    let failing = FnTransformer::new(|_: &str, _: &str| -> Result<String, String> {
        Err("template error".to_string())
    });
    let err = transform_xml_to_xml(&failing, "", "<r/>").unwrap_err();
    assert_eq!(err.to_string(), "Transform failed: transform function failed");
    assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("template error"));
}

#[test]
fn test_transform_passes_program_through() {
    let echo_program = FnTransformer::new(|program: &str, _: &str| Ok::<_, std::io::Error>(program.to_string()));
    let output = transform_xml_to_json(&echo_program, "{\"from\":\"program\"}", "<r/>").unwrap();
    assert_eq!(output, "{\"from\":\"program\"}");
}

#[rstest]
#[case::xml(Format::Xml, "<r><b>1</b></r>")]
#[case::json(Format::Json, r#"{"r":{"b":"1"}}"#)]
fn test_assert_transform_passes(#[case] target: Format, #[case] expected: &str) {
    let transformer = match target {
        Format::Json => constant(r#"{"r": {"b": "1"}}"#),
        _ => constant("<r>\n  <b>1</b>\n</r>"),
    };
    assert_transform(&transformer, "", "<r><a>1</a></r>", expected, target, &CompareOptions::default())
        .unwrap();
}

#[test]
fn test_assert_transform_to_csv() {
    let transformer = constant("id,name\n1,x\n");
    let csv = transform_xml_to_csv(&transformer, "", "<rows/>").unwrap();
    assert_eq!(csv, "id,name\n1,x\n");

    let options = CompareOptions::new().ignore_column("name");
    assert_transform(&transformer, "", "<rows/>", "id,name\n1,y\n", Format::Csv, &options).unwrap();
}

#[test]
fn test_assert_transform_reports_mismatch() {
    let err = assert_transform(
        &rename_a_to_b(),
        "",
        "<r><a>1</a></r>",
        "<r><a>1</a></r>",
        Format::Xml,
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_mismatch());
    assert_eq!(err.kind(), Some(MismatchKind::MissingKey));
    assert_eq!(err.location().map(ToString::to_string).as_deref(), Some("/r/a"));
}

#[test]
fn test_malformed_input_rejected_before_transform() {
    let never = FnTransformer::new(|_: &str, _: &str| -> Result<String, std::io::Error> {
        panic!("transformer must not run on malformed input")
    });
    let err = transform_xml_to_xml(&never, "", "<r><a></r>").unwrap_err();
    assert!(matches!(
        err,
        Error::Core(equiv_core::Error::MalformedInput { format: Format::Xml, .. })
    ));
}

#[test]
fn test_invalid_options_rejected_before_transform() {
    let never = FnTransformer::new(|_: &str, _: &str| -> Result<String, std::io::Error> {
        panic!("transformer must not run with invalid options")
    });
    let err = assert_transform(
        &never,
        "",
        "<r/>",
        "<r/>",
        Format::Xml,
        &CompareOptions::new().max_excerpt_chars(0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Core(equiv_core::Error::InvalidOptions(_))));
}

#[test]
fn test_transform_failure_is_never_a_mismatch() {
    let failing = FnTransformer::new(|_: &str, _: &str| -> Result<String, String> {
        Err("template error".to_string())
    });
    let err = assert_transform(&failing, "", "<r/>", "<r/>", Format::Xml, &CompareOptions::default())
        .unwrap_err();
    assert!(!err.is_mismatch());
    assert!(matches!(err, Error::TransformExecution { .. }));
}

#[test]
fn test_malformed_output_names_actual_side() {
    let err = assert_transform(
        &constant("{\"unterminated\": "),
        "",
        "<r/>",
        "{}",
        Format::Json,
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(equiv_core::Error::MalformedInput {
            side: Some(equiv_core::Side::Actual),
            ..
        })
    ));
}

#[cfg(unix)]
mod command {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shell() -> CommandTransformer {
        CommandTransformer::new("sh").arg("${PROGRAM}").program_extension("sh")
    }

    #[test]
    fn test_command_pipes_input_and_captures_output() {
        let output = transform_xml_to_xml(&shell(), "sed 's/a>/b>/g'", "<r><a>1</a></r>").unwrap();
        assert_eq!(output.trim_end(), "<r><b>1</b></r>");
    }

    #[test]
    fn test_command_end_to_end() {
        assert_transform(
            &shell(),
            "sed 's/a>/b>/g'",
            "<r><a>1</a></r>",
            "<r><b>1</b></r>",
            Format::Xml,
            &CompareOptions::default(),
        )
        .unwrap();
    }

    #[test]
    fn test_command_failure_includes_stderr() {
        let err = transform_xml_to_xml(&shell(), "echo boom >&2\nexit 3", "<r/>").unwrap_err();
        let Error::TransformExecution { message, .. } = &err else {
            panic!("expected TransformExecution, got {err:?}");
        };
        assert!(message.contains("boom"), "message was {message:?}");
        assert!(message.contains("Some(3)"), "message was {message:?}");
    }

    #[test]
    fn test_command_ignoring_stdin_still_succeeds() {
        let output = transform_xml_to_json(&shell(), "echo '{}'", "<r/>").unwrap();
        assert_eq!(output.trim(), "{}");
    }

    #[test]
    fn test_command_stderr_on_success_is_not_an_error() {
        equiv_test_utils::logging::init();
        let output = transform_xml_to_xml(&shell(), "echo note >&2\ncat", "<r/>").unwrap();
        assert_eq!(output, "<r/>");
    }
}
