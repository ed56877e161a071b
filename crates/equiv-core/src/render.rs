//! Human-readable mismatch reports
//!
//! A report has a summary line, kind-specific detail, an excerpt of each
//! document around the mismatch and, when both excerpts span several lines,
//! a line diff between them. Excerpts are rendered from the already parsed
//! values; nothing is re-parsed.

use similar::{ChangeTag, TextDiff};

use crate::diff::{Location, Mismatch, MismatchKind};
use crate::error::Result;
use crate::format::{Format, FormatHandler};
use crate::options::CompareOptions;
use crate::path::Path;
use crate::value::{Table, Value};

/// Marker appended to excerpts cut at the size budget
pub const TRIMMED_MARKER: &str = "...trimmed...";

/// Builds mismatch reports for one pair of document formats
pub struct Renderer {
    expected: Box<dyn FormatHandler>,
    actual: Box<dyn FormatHandler>,
    max_excerpt_chars: usize,
}

impl Renderer {
    pub fn new(expected_format: Format, actual_format: Format, options: &CompareOptions) -> Result<Self> {
        Ok(Self {
            expected: expected_format.handler(&options.csv)?,
            actual: actual_format.handler(&options.csv)?,
            max_excerpt_chars: options.max_excerpt_chars,
        })
    }

    pub fn render(&self, mismatch: &Mismatch, expected: &Value, actual: &Value) -> String {
        let mut out = self.summary(mismatch);
        out.push('\n');
        out.push_str(&detail(mismatch));
        out.push('\n');

        let expected_excerpt = self.excerpt(self.expected.as_ref(), expected, mismatch);
        let actual_excerpt = self.excerpt(self.actual.as_ref(), actual, mismatch);
        out.push_str("Expected:\n");
        out.push_str(&expected_excerpt);
        out.push_str("\nActual:\n");
        out.push_str(&actual_excerpt);

        if expected_excerpt.contains('\n') && actual_excerpt.contains('\n') {
            let diff = line_diff(&expected_excerpt, &actual_excerpt);
            if !diff.is_empty() {
                out.push_str("\nDiff:\n");
                out.push_str(&diff);
            }
        }
        out.trim_end().to_string()
    }

    fn summary(&self, mismatch: &Mismatch) -> String {
        let (e, a) = (self.expected.format(), self.actual.format());
        if e == a {
            format!("{e} comparison failed: {} at {}", mismatch.kind, mismatch.location)
        } else {
            format!(
                "Comparison failed (expected {e} vs actual {a}): {} at {}",
                mismatch.kind, mismatch.location
            )
        }
    }

    fn excerpt(&self, handler: &dyn FormatHandler, root: &Value, mismatch: &Mismatch) -> String {
        let text = match (&mismatch.location, root) {
            (Location::Node(path), _) => {
                let target = match mismatch.kind {
                    MismatchKind::MissingKey | MismatchKind::UnexpectedKey => {
                        path.parent().unwrap_or_else(Path::root)
                    }
                    _ => path.clone(),
                };
                let (at, value) = nearest(root, target);
                render_node(handler, &at, value)
            }
            (Location::Header, Value::Table(table)) => handler.render(&Value::Table(Table {
                header: table.header.clone(),
                rows: Vec::new(),
            })),
            (Location::Row(number) | Location::Cell { row: number, .. }, Value::Table(table)) => {
                match table.row(*number) {
                    Some(row) => handler.render(&Value::Table(Table {
                        header: table.header.clone(),
                        rows: vec![row.clone()],
                    })),
                    None => format!("(no row {number})"),
                }
            }
            _ => handler.render(root),
        };

        let text = text.trim_end();
        if text.is_empty() {
            "(empty)".to_string()
        } else {
            truncate(text, self.max_excerpt_chars)
        }
    }
}

/// The value at `path`, or at its closest ancestor that exists
fn nearest(root: &Value, path: Path) -> (Path, &Value) {
    let mut current = path;
    loop {
        if let Some(value) = root.get_path(&current) {
            return (current, value);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return (Path::root(), root),
        }
    }
}

fn render_node(handler: &dyn FormatHandler, at: &Path, value: &Value) -> String {
    // XML needs an element name to wrap a bare sub-value
    match (handler.format(), at.local_name()) {
        (Format::Xml, Some(name)) => {
            handler.render(&Value::Object(vec![(name.to_string(), value.clone())]))
        }
        _ => handler.render(value),
    }
}

fn detail(mismatch: &Mismatch) -> String {
    let (e, a) = (&mismatch.expected, &mismatch.actual);
    match mismatch.kind {
        MismatchKind::MissingKey => format!(
            "  missing key {:?} (expected {e})",
            mismatch.key().unwrap_or_default()
        ),
        MismatchKind::UnexpectedKey => format!(
            "  unexpected key {:?} (actual {a})",
            mismatch.key().unwrap_or_default()
        ),
        MismatchKind::ArrayLengthMismatch => format!("  expected {e} elements, actual {a}"),
        MismatchKind::RowCountMismatch => format!("  expected {e} rows, actual {a}"),
        MismatchKind::ColumnCountMismatch => format!("  expected {e}, actual {a}"),
        MismatchKind::ValueMismatch | MismatchKind::TypeMismatch | MismatchKind::InvalidRow => {
            format!("  expected: {e}\n  actual:   {a}")
        }
    }
}

/// Cut `text` to at most `max` characters, on a char boundary
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}\n{TRIMMED_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

fn line_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value().trim_end_matches(['\r', '\n']));
        out.push('\n');
    }
    if diff.ratio() >= 1.0 {
        return String::new();
    }
    out
}
