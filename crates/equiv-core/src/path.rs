//! Location paths inside canonical documents
//!
//! # Path Syntax
//!
//! - Root: `/`
//! - Object child: `/config/host`
//! - Array element (0-based): `/items[0]/name`
//! - Element of a root array: `/[2]`
//!
//! # Examples
//!
//! ```
//! use equiv_core::path::{Path, PathSegment};
//!
//! let path = Path::parse("/root/Item[2]/Name");
//! assert_eq!(path.segments(), &[
//!     PathSegment::Key("root".to_string()),
//!     PathSegment::Key("Item".to_string()),
//!     PathSegment::Index(2),
//!     PathSegment::Key("Name".to_string()),
//! ]);
//! assert_eq!(path.to_string(), "/root/Item[2]/Name");
//! ```

use std::fmt;

/// A segment of a path - either a key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object entry name (XML local name or JSON key)
    Key(String),
    /// A 0-based position in an array
    Index(usize),
}

/// Location of a node inside a document tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Path of a named child of this node
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Path of an array element of this node
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(idx));
        Self { segments }
    }

    /// Path of the enclosing node, or `None` at the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Name of the nearest key segment, skipping trailing indices.
    ///
    /// For `/root/Item[2]` this is `Item`.
    pub fn local_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Same path with every index segment dropped, as used by ignore rules.
    ///
    /// `/root/Item[2]/Name` becomes `/root/Item/Name`.
    pub fn without_indices(&self) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .filter(|s| matches!(s, PathSegment::Key(_)))
                .cloned()
                .collect(),
        }
    }

    /// Parse the textual notation produced by `Display`.
    ///
    /// Malformed index brackets are ignored rather than rejected.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        for part in text.split('/').filter(|p| !p.is_empty()) {
            let mut rest = part;
            let key_end = rest.find('[').unwrap_or(rest.len());
            if key_end > 0 {
                segments.push(PathSegment::Key(rest[..key_end].to_string()));
            }
            rest = &rest[key_end..];
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(close) = stripped.find(']') else {
                    break;
                };
                if let Ok(idx) = stripped[..close].parse::<usize>() {
                    segments.push(PathSegment::Index(idx));
                }
                rest = &stripped[close + 1..];
            }
        }
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => write!(f, "/{key}")?,
                PathSegment::Index(idx) if i == 0 => write!(f, "/[{idx}]")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
