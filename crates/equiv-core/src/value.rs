//! Canonical value model shared by every format handler
//!
//! Parsers turn raw text into a [`Value`]; the comparator walks two of them
//! in lock-step. Objects keep source order for rendering but compare as
//! unordered maps; arrays and table rows compare positionally.

use crate::path::{Path, PathSegment};

/// Deepest element or container nesting the XML and JSON parsers accept.
///
/// Deeper documents are rejected as malformed, which bounds the recursion of
/// every later walk over a parsed value.
pub const MAX_DEPTH: usize = 128;

/// Format-independent document tree or table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Leaf text. Numbers, booleans and null keep their literal spelling.
    Scalar(String),
    /// Named entries in source order. Names are unique within one object.
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    Table(Table),
}

impl Value {
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(text.into())
    }

    /// Look up an object entry by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Resolve a path against this value.
    ///
    /// Returns `None` if any segment does not exist.
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), value) => value.get(key)?,
                (PathSegment::Index(idx), Self::Array(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Short type name used in mismatch descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
        }
    }

    /// One-line description used as the expected/actual side of a mismatch
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(text) => text.trim().to_string(),
            Self::Object(entries) => plural(entries.len(), "object with", "key", "keys"),
            Self::Array(items) => plural(items.len(), "array of", "element", "elements"),
            Self::Table(table) => plural(table.rows.len(), "table with", "row", "rows"),
        }
    }
}

fn plural(count: usize, prefix: &str, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{prefix} 1 {one}")
    } else {
        format!("{prefix} {count} {many}")
    }
}

/// A parsed CSV document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, or `None` when the document has no header line
    pub header: Option<Vec<String>>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of cells every valid row carries
    pub fn width(&self) -> usize {
        match &self.header {
            Some(names) => names.len(),
            None => self.rows.first().map_or(0, |row| row.cells.len()),
        }
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.as_ref()?.iter().position(|n| n == name)
    }

    /// First row whose cell count differs from the table width
    pub fn first_invalid_row(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.invalid)
    }

    pub fn row(&self, number: usize) -> Option<&Row> {
        self.rows.iter().find(|row| row.number == number)
    }
}

/// One data row of a [`Table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based data row number; the header line is not counted
    pub number: usize,
    pub cells: Vec<String>,
    /// Set by the parser when the cell count differs from the table width
    pub invalid: bool,
}

impl Row {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self {
            number,
            cells,
            invalid: false,
        }
    }
}
