//! Structural equivalence and diffing for XML, JSON and CSV documents
//!
//! Documents are parsed into a format-independent [`Value`] tree (or table),
//! compared structurally under [`CompareOptions`], and a failed comparison is
//! reported as [`Error::Mismatch`] with a rendered, size-bounded diff.

pub mod diff;
pub mod document;
pub mod error;
pub mod format;
pub mod handlers;
pub mod options;
pub mod path;
pub mod render;
pub mod value;

pub use diff::{ColumnRef, Comparator, Comparison, Location, Mismatch, MismatchKind, compare};
pub use document::{Document, compare_csv, compare_documents, compare_json, compare_xml};
pub use error::{Error, MismatchReport, Result, Side};
pub use format::{Format, FormatHandler};
pub use handlers::{CsvHandler, JsonHandler, TEXT_KEY, XmlHandler};
pub use options::{CompareOptions, CsvOptions, HeaderMode, IgnorePredicate};
pub use path::{Path, PathSegment};
pub use render::Renderer;
pub use value::{MAX_DEPTH, Row, Table, Value};
