//! Format detection and handler trait

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::handlers::{CsvHandler, JsonHandler, XmlHandler};
use crate::options::CsvOptions;
use crate::value::Value;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Xml,
    Json,
    Csv,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xml" | "xsl" | "xslt" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "csv" | "tsv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Detect format from content heuristics
    pub fn from_content(content: &str) -> Self {
        let trimmed = content.trim_start();

        if trimmed.starts_with('<') {
            return Self::Xml;
        }

        // JSON starts with { or [
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return Self::Json;
        }

        Self::Csv
    }

    /// Get default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Xml => &["xml"],
            Self::Json => &["json"],
            Self::Csv => &["csv", "tsv"],
        }
    }

    /// Build the handler for this format
    pub fn handler(&self, csv: &CsvOptions) -> Result<Box<dyn FormatHandler>> {
        Ok(match self {
            Self::Xml => Box::new(XmlHandler::new()),
            Self::Json => Box::new(JsonHandler::new()),
            Self::Csv => Box::new(CsvHandler::new(csv.clone())?),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml => f.write_str("XML"),
            Self::Json => f.write_str("JSON"),
            Self::Csv => f.write_str("CSV"),
        }
    }
}

/// Trait for format-specific handlers
pub trait FormatHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> Format;

    /// Parse source into the canonical model
    fn parse(&self, source: &str) -> Result<Value>;

    /// Render a canonical value back to text in this format.
    ///
    /// Used for diff excerpts; structural details the canonical model does
    /// not keep (XML attributes vs elements, JSON string vs number) may be
    /// rendered differently from the original source.
    fn render(&self, value: &Value) -> String;
}
