//! Comparison and parsing options
//!
//! [`CompareOptions`] is the single configuration surface for a comparison:
//! the ignore set, CSV parsing settings and report sizing. It can be built
//! fluently or loaded from TOML/JSON configuration.
//!
//! ```
//! use equiv_core::{CompareOptions, HeaderMode};
//!
//! let options = CompareOptions::new()
//!     .ignore_node("timestamp")
//!     .ignore_column("id")
//!     .separator(';')
//!     .header(HeaderMode::Present);
//! assert!(options.validate().is_ok());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::Path;

/// Default size of each rendered excerpt in a mismatch report
pub const DEFAULT_MAX_EXCERPT_CHARS: usize = 2000;

/// Whether the first CSV line names the columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    #[default]
    Present,
    Missing,
}

/// CSV parsing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator; must be exactly one character
    pub separator: String,
    /// Record terminator. `"\n"` and `"\r\n"` accept either line ending.
    pub newline: String,
    pub header: HeaderMode,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            newline: "\n".to_string(),
            header: HeaderMode::Present,
        }
    }
}

impl CsvOptions {
    /// Check the settings and return the separator character
    pub fn validate(&self) -> Result<char> {
        let mut chars = self.separator.chars();
        let separator = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            (None, _) => return Err(Error::invalid_options("CSV separator must not be empty")),
            _ => {
                return Err(Error::invalid_options(format!(
                    "CSV separator must be a single character, got {:?}",
                    self.separator
                )));
            }
        };
        if separator == '"' || separator == '\\' {
            return Err(Error::invalid_options(format!(
                "CSV separator {separator:?} conflicts with quoting"
            )));
        }
        if separator.is_control() && separator != '\t' {
            return Err(Error::invalid_options(format!(
                "CSV separator {separator:?} is a control character"
            )));
        }
        if self.newline.is_empty() {
            return Err(Error::invalid_options("CSV newline must not be empty"));
        }
        if self.newline.contains(separator) || self.newline.contains('"') {
            return Err(Error::invalid_options(format!(
                "CSV newline {:?} overlaps the separator or quote character",
                self.newline
            )));
        }
        Ok(separator)
    }
}

/// Caller-supplied rule deciding whether a node is excluded from comparison
pub trait IgnorePredicate: Send + Sync {
    /// `name` is the local name (or CSV column identifier) of the node at `path`
    fn is_ignored(&self, name: &str, path: &Path) -> bool;
}

impl<F> IgnorePredicate for F
where
    F: Fn(&str, &Path) -> bool + Send + Sync,
{
    fn is_ignored(&self, name: &str, path: &Path) -> bool {
        self(name, path)
    }
}

#[derive(Clone)]
struct PredicateHandle(Arc<dyn IgnorePredicate>);

impl fmt::Debug for PredicateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IgnorePredicate")
    }
}

/// Options controlling a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Local names (XML/JSON) or column identifiers (CSV) excluded at any depth
    pub ignored_names: BTreeSet<String>,
    /// Absolute paths without indices, e.g. `/root/Item/Name`
    pub ignored_paths: BTreeSet<String>,
    /// Regular expressions matched against whole local names
    pub ignored_patterns: Vec<String>,
    pub csv: CsvOptions,
    pub max_excerpt_chars: usize,
    #[serde(skip)]
    predicate: Option<PredicateHandle>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignored_names: BTreeSet::new(),
            ignored_paths: BTreeSet::new(),
            ignored_patterns: Vec::new(),
            csv: CsvOptions::default(),
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
            predicate: None,
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON document
    pub fn from_json_str(source: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Exclude every XML/JSON node with this local name
    pub fn ignore_node(mut self, name: impl Into<String>) -> Self {
        self.ignored_names.insert(name.into());
        self
    }

    /// Exclude a CSV column by header name, or by 0-based index without a header
    pub fn ignore_column(mut self, name: impl Into<String>) -> Self {
        self.ignored_names.insert(name.into());
        self
    }

    /// Exclude the node at an absolute path (indices omitted)
    pub fn ignore_path(mut self, path: impl Into<String>) -> Self {
        self.ignored_paths.insert(path.into());
        self
    }

    /// Exclude every node whose local name fully matches `pattern`
    pub fn ignore_matching(mut self, pattern: impl Into<String>) -> Self {
        self.ignored_patterns.push(pattern.into());
        self
    }

    /// Install a caller-supplied ignore rule, evaluated after the static set
    pub fn with_predicate(mut self, predicate: impl IgnorePredicate + 'static) -> Self {
        self.predicate = Some(PredicateHandle(Arc::new(predicate)));
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.csv.separator = separator.to_string();
        self
    }

    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.csv.newline = newline.into();
        self
    }

    pub fn header(mut self, header: HeaderMode) -> Self {
        self.csv.header = header;
        self
    }

    pub fn max_excerpt_chars(mut self, max: usize) -> Self {
        self.max_excerpt_chars = max;
        self
    }

    pub fn predicate(&self) -> Option<&dyn IgnorePredicate> {
        self.predicate.as_ref().map(|handle| handle.0.as_ref())
    }

    /// Reject inconsistent or out-of-range settings
    pub fn validate(&self) -> Result<()> {
        self.csv.validate()?;
        if self.max_excerpt_chars == 0 {
            return Err(Error::invalid_options("max_excerpt_chars must be at least 1"));
        }
        if let Some(path) = self.ignored_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(Error::invalid_options(format!(
                "ignored path {path:?} must start with '/'"
            )));
        }
        self.compile_patterns()?;
        Ok(())
    }

    /// Compile `ignored_patterns`, anchored so they match whole names
    pub(crate) fn compile_patterns(&self) -> Result<Vec<Regex>> {
        self.ignored_patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                    Error::invalid_options(format!("invalid ignore pattern {pattern:?}: {e}"))
                })
            })
            .collect()
    }
}
