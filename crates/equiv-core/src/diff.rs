//! Structural comparison of canonical values
//!
//! The comparator walks two values depth-first and stops at the first
//! difference. Tie-breaks are fixed so the same inputs always report the
//! same mismatch:
//!
//! - objects: missing keys (expected order), then unexpected keys (actual
//!   order), then shared keys (expected order)
//! - arrays: length before elements, then the lowest differing index
//! - tables: columns, invalid rows, row count, then cells row by row
//!
//! The walk recurses once per nesting level. Parsed documents never nest
//! deeper than [`MAX_DEPTH`](crate::value::MAX_DEPTH).

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;

use regex::Regex;

use crate::error::{Result, Side};
use crate::options::CompareOptions;
use crate::path::{Path, PathSegment};
use crate::value::{Table, Value};

/// Why two documents differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    TypeMismatch,
    ValueMismatch,
    MissingKey,
    UnexpectedKey,
    ArrayLengthMismatch,
    RowCountMismatch,
    ColumnCountMismatch,
    InvalidRow,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TypeMismatch => "type mismatch",
            Self::ValueMismatch => "value mismatch",
            Self::MissingKey => "missing key",
            Self::UnexpectedKey => "unexpected key",
            Self::ArrayLengthMismatch => "array length mismatch",
            Self::RowCountMismatch => "row count mismatch",
            Self::ColumnCountMismatch => "column count mismatch",
            Self::InvalidRow => "invalid row",
        };
        f.write_str(text)
    }
}

/// A table column, by header name or by 0-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// Where in a document a mismatch was found
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A node of an XML/JSON tree
    Node(Path),
    /// A table as a whole
    Table,
    /// The column layout of a table
    Header,
    /// A data row (1-based)
    Row(usize),
    Cell { row: usize, column: ColumnRef },
}

impl Location {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Node(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(path) => write!(f, "{path}"),
            Self::Table => f.write_str("table"),
            Self::Header => f.write_str("header"),
            Self::Row(row) => write!(f, "row {row}"),
            Self::Cell { row, column } => write!(f, "row {row}, column {column}"),
        }
    }
}

/// The first point at which two values diverge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub location: Location,
    pub kind: MismatchKind,
    /// Short description of the expected side
    pub expected: String,
    /// Short description of the actual side
    pub actual: String,
}

impl Mismatch {
    fn new(
        location: Location,
        kind: MismatchKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            location,
            kind,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Offending key name for `MissingKey` / `UnexpectedKey`
    pub fn key(&self) -> Option<&str> {
        match (&self.kind, &self.location) {
            (MismatchKind::MissingKey | MismatchKind::UnexpectedKey, Location::Node(path)) => {
                match path.last() {
                    Some(PathSegment::Key(key)) => Some(key),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: expected {}, actual {}",
            self.kind, self.location, self.expected, self.actual
        )
    }
}

/// Outcome of comparing two values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Mismatch(Mismatch),
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, Self::Equal)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Self::Equal => None,
            Self::Mismatch(m) => Some(m),
        }
    }
}

/// Compare two values under `options`, reporting the first mismatch
pub fn compare(expected: &Value, actual: &Value, options: &CompareOptions) -> Result<Comparison> {
    Ok(Comparator::new(options)?.compare(expected, actual))
}

/// Collects mismatches; in first-only mode it stops the walk after one
struct Sink {
    found: Vec<Mismatch>,
    exhaustive: bool,
}

impl Sink {
    fn report(&mut self, mismatch: Mismatch) -> ControlFlow<()> {
        self.found.push(mismatch);
        if self.exhaustive {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

/// Compares canonical values under a fixed set of options
pub struct Comparator<'a> {
    options: &'a CompareOptions,
    patterns: Vec<Regex>,
}

impl<'a> Comparator<'a> {
    /// Validate `options` and prepare ignore patterns
    pub fn new(options: &'a CompareOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            patterns: options.compile_patterns()?,
        })
    }

    /// Compare and stop at the first mismatch
    pub fn compare(&self, expected: &Value, actual: &Value) -> Comparison {
        let mut sink = Sink {
            found: Vec::new(),
            exhaustive: false,
        };
        let _ = self.walk(expected, actual, &Path::root(), &mut sink);
        match sink.found.into_iter().next() {
            Some(mismatch) => {
                tracing::debug!(kind = %mismatch.kind, location = %mismatch.location, "documents differ");
                Comparison::Mismatch(mismatch)
            }
            None => Comparison::Equal,
        }
    }

    /// Compare and collect every mismatch.
    ///
    /// The first element is always what [`Comparator::compare`] reports.
    /// Length and column mismatches still stop descent into that node.
    pub fn compare_all(&self, expected: &Value, actual: &Value) -> Vec<Mismatch> {
        let mut sink = Sink {
            found: Vec::new(),
            exhaustive: true,
        };
        let _ = self.walk(expected, actual, &Path::root(), &mut sink);
        tracing::debug!(count = sink.found.len(), "exhaustive comparison finished");
        sink.found
    }

    /// Whether the node `name` at `path` is excluded from comparison
    pub fn is_ignored(&self, name: &str, path: &Path) -> bool {
        let ignored = self.options.ignored_names.contains(name)
            || (!self.options.ignored_paths.is_empty()
                && self
                    .options
                    .ignored_paths
                    .contains(&path.without_indices().to_string()))
            || self.patterns.iter().any(|re| re.is_match(name))
            || self
                .options
                .predicate()
                .is_some_and(|predicate| predicate.is_ignored(name, path));
        if ignored {
            tracing::trace!(%path, name, "ignoring node");
        }
        ignored
    }

    fn walk(
        &self,
        expected: &Value,
        actual: &Value,
        path: &Path,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        match (expected, actual) {
            (Value::Scalar(e), Value::Scalar(a)) => {
                if e.trim() != a.trim() {
                    return sink.report(Mismatch::new(
                        Location::Node(path.clone()),
                        MismatchKind::ValueMismatch,
                        e.trim(),
                        a.trim(),
                    ));
                }
                ControlFlow::Continue(())
            }
            (Value::Object(e), Value::Object(a)) => self.walk_object(e, a, path, sink),
            (Value::Array(e), Value::Array(a)) => {
                if e.len() != a.len() {
                    return sink.report(Mismatch::new(
                        Location::Node(path.clone()),
                        MismatchKind::ArrayLengthMismatch,
                        e.len().to_string(),
                        a.len().to_string(),
                    ));
                }
                for (i, (ev, av)) in e.iter().zip(a).enumerate() {
                    self.walk(ev, av, &path.index(i), sink)?;
                }
                ControlFlow::Continue(())
            }
            (Value::Table(e), Value::Table(a)) => self.walk_table(e, a, sink),
            _ => sink.report(Mismatch::new(
                Location::Node(path.clone()),
                MismatchKind::TypeMismatch,
                describe_typed(expected),
                describe_typed(actual),
            )),
        }
    }

    fn walk_object(
        &self,
        expected: &[(String, Value)],
        actual: &[(String, Value)],
        path: &Path,
        sink: &mut Sink,
    ) -> ControlFlow<()> {
        let expected_keys: HashMap<&str, &Value> =
            expected.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let actual_keys: HashMap<&str, &Value> =
            actual.iter().map(|(k, v)| (k.as_str(), v)).collect();

        for (key, value) in expected {
            let child = path.child(key.as_str());
            if !actual_keys.contains_key(key.as_str()) && !self.is_ignored(key, &child) {
                sink.report(Mismatch::new(
                    Location::Node(child),
                    MismatchKind::MissingKey,
                    value.describe(),
                    "(missing)",
                ))?;
            }
        }

        for (key, value) in actual {
            let child = path.child(key.as_str());
            if !expected_keys.contains_key(key.as_str()) && !self.is_ignored(key, &child) {
                sink.report(Mismatch::new(
                    Location::Node(child),
                    MismatchKind::UnexpectedKey,
                    "(absent)",
                    value.describe(),
                ))?;
            }
        }

        for (key, value) in expected {
            let Some(other) = actual_keys.get(key.as_str()) else {
                continue;
            };
            let child = path.child(key.as_str());
            if self.is_ignored(key, &child) {
                continue;
            }
            self.walk(value, other, &child, sink)?;
        }

        ControlFlow::Continue(())
    }

    fn walk_table(&self, expected: &Table, actual: &Table, sink: &mut Sink) -> ControlFlow<()> {
        let columns: Vec<(ColumnRef, usize, usize)> = match (&expected.header, &actual.header) {
            (Some(e), Some(a)) => {
                let e_cols = self.kept_columns(e);
                let a_cols = self.kept_columns(a);
                let mut e_names: Vec<&str> = e_cols.iter().map(|(_, n)| *n).collect();
                let mut a_names: Vec<&str> = a_cols.iter().map(|(_, n)| *n).collect();
                e_names.sort_unstable();
                a_names.sort_unstable();
                if e_names != a_names {
                    sink.report(Mismatch::new(
                        Location::Header,
                        MismatchKind::ColumnCountMismatch,
                        describe_columns(&e_cols),
                        describe_columns(&a_cols),
                    ))?;
                    return ControlFlow::Continue(());
                }
                // A repeated name pairs its k-th copy with the k-th copy on the other side
                let mut seen: HashMap<&str, usize> = HashMap::new();
                e_cols
                    .iter()
                    .filter_map(|(idx, name)| {
                        let nth = seen.entry(*name).or_insert(0);
                        let other = a_cols.iter().filter(|(_, n)| n == name).nth(*nth)?.0;
                        *nth += 1;
                        Some((ColumnRef::Name(name.to_string()), *idx, other))
                    })
                    .collect::<Vec<_>>()
            }
            (None, None) => {
                let (e_width, a_width) = (expected.width(), actual.width());
                if e_width != a_width {
                    sink.report(Mismatch::new(
                        Location::Header,
                        MismatchKind::ColumnCountMismatch,
                        count(e_width, "column"),
                        count(a_width, "column"),
                    ))?;
                    return ControlFlow::Continue(());
                }
                (0..e_width)
                    .filter(|idx| {
                        let name = idx.to_string();
                        !self.is_ignored(&name, &Path::root().child(name.as_str()))
                    })
                    .map(|idx| (ColumnRef::Index(idx), idx, idx))
                    .collect()
            }
            (e, _) => {
                let describe = |has_header: bool| {
                    if has_header { "header row" } else { "no header row" }
                };
                sink.report(Mismatch::new(
                    Location::Header,
                    MismatchKind::ColumnCountMismatch,
                    describe(e.is_some()),
                    describe(e.is_none()),
                ))?;
                return ControlFlow::Continue(());
            }
        };

        let mut any_invalid = false;
        for (side, table) in [(Side::Expected, expected), (Side::Actual, actual)] {
            for row in table.rows.iter().filter(|row| row.invalid) {
                any_invalid = true;
                sink.report(Mismatch::new(
                    Location::Row(row.number),
                    MismatchKind::InvalidRow,
                    count(table.width(), "cell"),
                    format!("{} in {side} document", count(row.cells.len(), "cell")),
                ))?;
            }
        }
        if any_invalid {
            return ControlFlow::Continue(());
        }

        if expected.rows.len() != actual.rows.len() {
            return sink.report(Mismatch::new(
                Location::Table,
                MismatchKind::RowCountMismatch,
                expected.rows.len().to_string(),
                actual.rows.len().to_string(),
            ));
        }

        for (e_row, a_row) in expected.rows.iter().zip(&actual.rows) {
            for (column, e_idx, a_idx) in &columns {
                let e_cell = e_row.cells.get(*e_idx).map_or("", String::as_str);
                let a_cell = a_row.cells.get(*a_idx).map_or("", String::as_str);
                if e_cell != a_cell {
                    sink.report(Mismatch::new(
                        Location::Cell {
                            row: e_row.number,
                            column: column.clone(),
                        },
                        MismatchKind::ValueMismatch,
                        e_cell,
                        a_cell,
                    ))?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Header names not excluded by the ignore set, with their positions
    fn kept_columns<'h>(&self, header: &'h [String]) -> Vec<(usize, &'h str)> {
        header
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.is_ignored(name, &Path::root().child(name.as_str())))
            .map(|(idx, name)| (idx, name.as_str()))
            .collect()
    }
}

fn describe_typed(value: &Value) -> String {
    match value {
        Value::Scalar(text) => format!("scalar {:?}", text.trim()),
        other => other.describe(),
    }
}

fn describe_columns(columns: &[(usize, &str)]) -> String {
    let names: Vec<&str> = columns.iter().map(|(_, n)| *n).collect();
    format!("{} ({})", count(names.len(), "column"), names.join(", "))
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 { format!("1 {noun}") } else { format!("{n} {noun}s") }
}
