//! Transform an XML document and compare the result

use equiv_core::{CompareOptions, Format, FormatHandler, XmlHandler, compare_documents};

use crate::error::Result;
use crate::executor::Transformer;

/// Check the input is well-formed XML, then run the transformer once
fn transform_xml(transformer: &dyn Transformer, program: &str, input: &str) -> Result<String> {
    XmlHandler::new().parse(input)?;
    tracing::debug!(input_bytes = input.len(), "transforming XML document");
    let output = transformer.transform(program, input)?;
    tracing::debug!(output_bytes = output.len(), "transform finished");
    Ok(output)
}

/// Transform an XML document into XML.
///
/// The three `transform_xml_to_*` functions run the same steps: the input must
/// be well-formed XML and the transformer's output is returned as is. Only
/// [`assert_transform`] parses the output in its target format.
pub fn transform_xml_to_xml(transformer: &dyn Transformer, program: &str, input: &str) -> Result<String> {
    transform_xml(transformer, program, input)
}

/// Transform an XML document into JSON; the output is not parsed
pub fn transform_xml_to_json(transformer: &dyn Transformer, program: &str, input: &str) -> Result<String> {
    transform_xml(transformer, program, input)
}

/// Transform an XML document into CSV; the output is not parsed
pub fn transform_xml_to_csv(transformer: &dyn Transformer, program: &str, input: &str) -> Result<String> {
    transform_xml(transformer, program, input)
}

/// Transform `input` and require the output to match `expected` in `target` format.
///
/// The transformer's output is the actual side of the comparison. Options are
/// validated before the transformer runs.
///
/// ```
/// use equiv_core::{CompareOptions, Format};
/// use equiv_transform::{FnTransformer, assert_transform};
///
/// let identity = FnTransformer::new(|_: &str, input: &str| Ok::<_, std::io::Error>(input.to_string()));
/// assert_transform(
///     &identity,
///     "",
///     "<r><a>1</a></r>",
///     "<r><a>1</a></r>",
///     Format::Xml,
///     &CompareOptions::default(),
/// )
/// .unwrap();
/// ```
pub fn assert_transform(
    transformer: &dyn Transformer,
    program: &str,
    input: &str,
    expected: &str,
    target: Format,
    options: &CompareOptions,
) -> Result<()> {
    options.validate()?;
    tracing::debug!(%target, "checking transform output");
    let actual = transform_xml(transformer, program, input)?;
    compare_documents(expected, &actual, target, options)?;
    Ok(())
}
