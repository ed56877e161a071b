//! Parsed documents and the `compare_*` assertions

use crate::diff::{Comparator, Comparison};
use crate::error::{Error, MismatchReport, Result, Side};
use crate::format::Format;
use crate::options::CompareOptions;
use crate::render::Renderer;
use crate::value::Value;

/// A document parsed into the canonical model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    format: Format,
    value: Value,
}

impl Document {
    /// Parse content with format auto-detection
    pub fn parse(source: &str, options: &CompareOptions) -> Result<Self> {
        Self::parse_as(source, Format::from_content(source), options)
    }

    /// Parse with explicit format
    pub fn parse_as(source: &str, format: Format, options: &CompareOptions) -> Result<Self> {
        tracing::debug!(%format, bytes = source.len(), "parsing document");
        let value = format.handler(&options.csv)?.parse(source)?;
        Ok(Self { format, value })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Compare against `actual`, treating `self` as the expected side
    pub fn compare(&self, actual: &Document, options: &CompareOptions) -> Result<Comparison> {
        Ok(Comparator::new(options)?.compare(&self.value, &actual.value))
    }

    /// Render the canonical value back to text in this document's format
    pub fn render(&self, options: &CompareOptions) -> Result<String> {
        Ok(self.format.handler(&options.csv)?.render(&self.value))
    }

    /// Compare and turn a mismatch into [`Error::Mismatch`]
    pub fn assert_equivalent(&self, actual: &Document, options: &CompareOptions) -> Result<()> {
        match self.compare(actual, options)? {
            Comparison::Equal => Ok(()),
            Comparison::Mismatch(mismatch) => {
                let renderer = Renderer::new(self.format, actual.format, options)?;
                let message = renderer.render(&mismatch, &self.value, &actual.value);
                Err(Error::Mismatch(Box::new(MismatchReport {
                    expected_format: self.format,
                    actual_format: actual.format,
                    mismatch,
                    message,
                })))
            }
        }
    }
}

/// Parse both documents as `format` and require them to be equivalent.
///
/// Options are validated first; a parse failure names the side it came from.
pub fn compare_documents(
    expected: &str,
    actual: &str,
    format: Format,
    options: &CompareOptions,
) -> Result<()> {
    options.validate()?;
    let expected = Document::parse_as(expected, format, options).map_err(|e| e.on_side(Side::Expected))?;
    let actual = Document::parse_as(actual, format, options).map_err(|e| e.on_side(Side::Actual))?;
    expected.assert_equivalent(&actual, options)
}

/// Require two XML documents to be equivalent.
///
/// ```
/// use equiv_core::{CompareOptions, compare_xml};
///
/// let options = CompareOptions::new().ignore_node("stamp");
/// compare_xml(
///     "<r><a>1</a><stamp>1</stamp></r>",
///     "<r><stamp>2</stamp><a> 1 </a></r>",
///     &options,
/// )
/// .unwrap();
/// ```
pub fn compare_xml(expected: &str, actual: &str, options: &CompareOptions) -> Result<()> {
    compare_documents(expected, actual, Format::Xml, options)
}

/// Require two JSON documents to be equivalent
pub fn compare_json(expected: &str, actual: &str, options: &CompareOptions) -> Result<()> {
    compare_documents(expected, actual, Format::Json, options)
}

/// Require two CSV documents to be equivalent
pub fn compare_csv(expected: &str, actual: &str, options: &CompareOptions) -> Result<()> {
    compare_documents(expected, actual, Format::Csv, options)
}
