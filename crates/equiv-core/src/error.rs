//! Error types for equiv-core

use std::fmt;

use crate::diff::{Location, Mismatch, MismatchKind};
use crate::format::Format;

/// Result type for equiv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two compared documents an error or row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => f.write_str("expected"),
            Self::Actual => f.write_str("actual"),
        }
    }
}

/// A failed comparison: the structured mismatch plus its rendered report
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchReport {
    pub expected_format: Format,
    pub actual_format: Format,
    pub mismatch: Mismatch,
    /// Human-readable report produced by [`crate::render::Renderer`]
    pub message: String,
}

/// Errors that can occur in equiv-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One of the documents is not a valid instance of its declared format
    #[error("Malformed {format} input{}: {message}", describe_origin(.side, .line, .column))]
    MalformedInput {
        format: Format,
        side: Option<Side>,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// Both documents parsed but are not equivalent
    #[error("{}", .0.message)]
    Mismatch(Box<MismatchReport>),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Options could not be loaded from a configuration source
    #[error("Failed to load options: {0}")]
    Config(String),
}

impl Error {
    pub fn malformed(format: Format, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            format,
            side: None,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn malformed_at(format: Format, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MalformedInput {
            format,
            side: None,
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    /// Tag a parse error with the document it came from.
    ///
    /// Other variants are returned unchanged.
    pub fn on_side(self, which: Side) -> Self {
        match self {
            Self::MalformedInput {
                format,
                message,
                line,
                column,
                ..
            } => Self::MalformedInput {
                format,
                side: Some(which),
                message,
                line,
                column,
            },
            other => other,
        }
    }

    /// Machine-readable mismatch kind, if this error is a comparison mismatch
    pub fn kind(&self) -> Option<MismatchKind> {
        match self {
            Self::Mismatch(report) => Some(report.mismatch.kind),
            _ => None,
        }
    }

    /// Location of the mismatch, if this error is a comparison mismatch
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Mismatch(report) => Some(&report.mismatch.location),
            _ => None,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

fn describe_origin(side: &Option<Side>, line: &Option<usize>, column: &Option<usize>) -> String {
    let mut out = String::new();
    if let Some(side) = side {
        out.push_str(&format!(" in {side} document"));
    }
    match (line, column) {
        (Some(line), Some(column)) => out.push_str(&format!(" at line {line}, column {column}")),
        (Some(line), None) => out.push_str(&format!(" at line {line}")),
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_side_and_position() {
        let err = Error::malformed_at(Format::Json, "expected value", 3, 7).on_side(Side::Actual);
        assert_eq!(
            err.to_string(),
            "Malformed JSON input in actual document at line 3, column 7: expected value"
        );
    }

    #[test]
    fn test_malformed_message_without_position() {
        let err = Error::malformed(Format::Xml, "no root element");
        assert_eq!(err.to_string(), "Malformed XML input: no root element");
    }

    #[test]
    fn test_on_side_leaves_other_variants_alone() {
        let err = Error::invalid_options("bad").on_side(Side::Expected);
        assert!(matches!(err, Error::InvalidOptions(msg) if msg == "bad"));
    }

    #[test]
    fn test_kind_is_none_for_parse_errors() {
        let err = Error::malformed(Format::Csv, "unterminated quote");
        assert_eq!(err.kind(), None);
        assert!(err.location().is_none());
        assert!(!err.is_mismatch());
    }
}
