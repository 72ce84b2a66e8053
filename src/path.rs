//! Diagnostic locations.
//!
//! A [`Path`] names where in the input tree a diagnostic belongs. It is never
//! used for lookup. Paths are chains of borrowed frames living on the
//! extraction call stack, so descending into a child costs nothing until a
//! diagnostic is actually recorded and the path is rendered.
//!
//! Rendering: the root renders as the empty string, a child of the root as
//! its key, anything deeper as `parent.key`.
//!
//! ```rust
//! use formtree::Path;
//!
//! let root = Path::Root;
//! let user = root.key("user");
//! let tags = user.key("tags");
//! let first = tags.index(0);
//! assert_eq!(first.to_string(), "user.tags.0");
//! assert_eq!(Path::Prefix("form").key("age").to_string(), "form.age");
//! ```

use std::fmt;

/// One step below a parent path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A lazily rendered location in the value tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Path<'a> {
    /// Top of a fresh extraction.
    #[default]
    Root,
    /// A caller-supplied location, for embedding an extraction in a larger context.
    Prefix(&'a str),
    Child {
        parent: &'a Path<'a>,
        segment: Segment<'a>,
    },
}

impl<'a> Path<'a> {
    /// The path of the entry `key` below this one.
    #[must_use]
    pub fn key(&'a self, key: &'a str) -> Path<'a> {
        Path::Child {
            parent: self,
            segment: Segment::Key(key),
        }
    }

    /// The path of the array item `index` below this one.
    #[must_use]
    pub fn index(&'a self, index: usize) -> Path<'a> {
        Path::Child {
            parent: self,
            segment: Segment::Index(index),
        }
    }

    /// Returns `true` for the root of an extraction.
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Path::Root)
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => Ok(()),
            Path::Prefix(prefix) => f.write_str(prefix),
            Path::Child { parent, segment } => {
                if parent.is_root() {
                    write!(f, "{}", segment)
                } else {
                    write!(f, "{}.{}", parent, segment)
                }
            }
        }
    }
}
