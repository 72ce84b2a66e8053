//! Variant format: a tagged union dispatching on a scalar tag field.
//!
//! The tag field is named once, up front, by [`VariantFormat::tagged`]; the
//! returned [`VariantBuilder`] then only accepts branch registrations. The
//! matched branch receives the **whole** input at the variant's own path, as
//! if it were the top-level schema for that subtree.
//!
//! Tags compare loosely: the number `0` and the string `"0"` name the same
//! branch. Both registered tags and input tags are canonicalized to a
//! [`Tag`] string key.
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Log, Path};
//!
//! let shape = VariantFormat::tagged("type")
//!     .add("circle", RecordFormat::builder()
//!         .required("type", TextFormat::new())
//!         .required("radius", NumberFormat::new().is_positive())
//!         .build()
//!         .unwrap())
//!     .add("square", RecordFormat::builder()
//!         .required("type", TextFormat::new())
//!         .required("side", NumberFormat::new().is_positive())
//!         .build()
//!         .unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut log = Log::new();
//! let input = value!({ "type": "circle", "radius": (-1) });
//! assert!(shape.extract(&input, &mut log, &Path::Root).is_none());
//! assert_eq!(log.entries()[0].path, "radius");
//! ```

use crate::error::{Error, Result};
use crate::rules::{Rules, WithRules};
use crate::{Extract, Failure, Format, Log, Number, Path, Value};
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// A canonical branch key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Canonicalizes an input value. Containers and null are never tags.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Tag> {
        match value {
            Value::String(s) => Some(Tag(s.clone())),
            Value::Bool(b) => Some(Tag::from(*b)),
            Value::Number(Number::Integer(n)) => Some(Tag::from(*n)),
            Value::Number(Number::Float(f)) if f.is_finite() => {
                if f.fract() == 0.0 && f.abs() < 9.2e18 {
                    // -0.0 also lands here and becomes "0"
                    Some(Tag::from(*f as i64))
                } else {
                    Some(Tag(f.to_string()))
                }
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag(s)
    }
}

impl From<i64> for Tag {
    fn from(n: i64) -> Self {
        Tag(n.to_string())
    }
}

impl From<i32> for Tag {
    fn from(n: i32) -> Self {
        Tag(n.to_string())
    }
}

impl From<u32> for Tag {
    fn from(n: u32) -> Self {
        Tag(n.to_string())
    }
}

impl From<bool> for Tag {
    fn from(b: bool) -> Self {
        Tag(if b { "1" } else { "0" }.to_string())
    }
}

/// Registers the branches of a [`VariantFormat`].
#[derive(Debug, Clone)]
pub struct VariantBuilder {
    tag_field: String,
    branches: IndexMap<Tag, Format>,
    duplicate: Option<Tag>,
}

impl VariantBuilder {
    /// Registers `format` as the branch for `tag`.
    #[must_use]
    pub fn add(mut self, tag: impl Into<Tag>, format: impl Into<Format>) -> Self {
        let tag = tag.into();
        if self.branches.contains_key(&tag) {
            self.duplicate.get_or_insert(tag);
        } else {
            self.branches.insert(tag, format.into());
        }
        self
    }

    /// Finishes the branch list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTag`] for the first tag registered twice
    /// (after canonicalization, so `0` and `"0"` collide).
    pub fn build(self) -> Result<VariantFormat> {
        if let Some(tag) = self.duplicate {
            return Err(Error::DuplicateTag(tag.0));
        }
        Ok(VariantFormat {
            tag_field: self.tag_field,
            branches: self.branches,
            rules: Rules::new(),
        })
    }
}

/// Validates a tagged union.
#[derive(Debug, Clone)]
pub struct VariantFormat {
    tag_field: String,
    branches: IndexMap<Tag, Format>,
    rules: Rules,
}

impl VariantFormat {
    /// Starts a variant dispatching on the field `tag_field`.
    #[must_use]
    pub fn tagged(tag_field: &str) -> VariantBuilder {
        VariantBuilder {
            tag_field: tag_field.to_string(),
            branches: IndexMap::new(),
            duplicate: None,
        }
    }

    /// The name of the field read to pick a branch.
    #[must_use]
    pub fn tag_field(&self) -> &str {
        &self.tag_field
    }

    /// The branch registered for `tag`, if any.
    pub fn branch(&self, tag: impl Into<Tag>) -> Option<&Format> {
        self.branches.get(&tag.into())
    }
}

impl Extract for VariantFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        if !value.is_container() {
            log.add_error(path, Failure::InvalidValue);
            return None;
        }

        let Some(raw_tag) = value.get_entry(&self.tag_field) else {
            log.add_error(path, Failure::MissingField { name: &self.tag_field });
            return None;
        };

        let branch = Tag::from_value(raw_tag).and_then(|tag| self.branches.get(&tag));
        let Some(format) = branch else {
            trace!(path = %path, tag = %raw_tag, tag_kind = raw_tag.kind(), "no branch for tag");
            log.add_error(&path.key(&self.tag_field), Failure::InvalidChoice);
            return None;
        };

        trace!(path = %path, tag = %raw_tag, kind = format.kind(), "variant dispatch");
        let out = format.extract(value, log, path)?;
        self.rules.apply(out, log, path)
    }
}

impl WithRules for VariantFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, BoolFormat, NumberFormat, RecordFormat};

    fn kinds() -> VariantFormat {
        let a = RecordFormat::builder()
            .required("x", NumberFormat::new())
            .build()
            .unwrap();
        let b = RecordFormat::builder()
            .required("y", BoolFormat::new())
            .build()
            .unwrap();
        VariantFormat::tagged("kind").add("a", a).add("b", b).build().unwrap()
    }

    fn run(format: &VariantFormat, input: Value, path: &Path<'_>) -> (Option<Value>, Log) {
        let mut log = Log::new();
        let out = format.extract(&input, &mut log, path);
        (out, log)
    }

    #[test]
    fn test_dispatches_whole_value_at_same_path() {
        let (out, log) = run(&kinds(), value!({ "kind": "a", "x": "+1" }), &Path::Prefix("p"));
        assert_eq!(out, Some(value!({ "x": "1" })));
        assert!(log.is_empty());

        let (out, log) = run(&kinds(), value!({ "kind": "a", "x": "no" }), &Path::Prefix("p"));
        assert_eq!(out, None);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].path, "p.x");
    }

    #[test]
    fn test_unknown_tag_is_reported_at_tag_field() {
        let (out, log) = run(&kinds(), value!({ "kind": "z" }), &Path::Prefix("p"));
        assert_eq!(out, None);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].path, "p.kind");
        assert_eq!(log.entries()[0].message, "please fill in a valid value");
    }

    #[test]
    fn test_missing_tag_is_reported_at_variant_path() {
        let (out, log) = run(&kinds(), value!({}), &Path::Prefix("p"));
        assert_eq!(out, None);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].path, "p");
        assert_eq!(log.entries()[0].message, "please provide required field `kind`");
    }

    #[test]
    fn test_scalar_input_is_invalid() {
        let (out, log) = run(&kinds(), value!("a"), &Path::Root);
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].message, "please provide a valid value");
    }

    #[test]
    fn test_tags_compare_loosely() {
        let format = VariantFormat::tagged("0")
            .add(0, Format::Raw)
            .add(true, Format::Raw)
            .build()
            .unwrap();
        assert!(format.check(&value!(["0"])));
        assert!(format.check(&value!([0.0])));
        assert!(format.check(&value!([1])));
        assert!(format.check(&value!([true])));
        assert!(!format.check(&value!([2])));
        assert!(!format.check(&value!([null])));
        assert!(!format.check(&value!([[0]])));

        let (_, log) = run(&format, value!([]), &Path::Root);
        assert_eq!(log.entries()[0].message, "please provide required index `0`");
    }

    #[test]
    fn test_duplicate_tags_after_canonicalization() {
        let err = VariantFormat::tagged("kind")
            .add(1, Format::Raw)
            .add("1", Format::Raw)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::DuplicateTag("1".to_string()));
    }

    #[test]
    fn test_variant_rules_run_on_branch_output() {
        let format = VariantFormat::tagged("kind")
            .add("a", Format::Raw)
            .build()
            .unwrap()
            .test(|v| v.get_entry("note").is_none(), "notes are not allowed");

        assert!(format.check(&value!({ "kind": "a" })));
        let (out, log) = run(&format, value!({ "kind": "a", "note": "" }), &Path::Root);
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].message, "notes are not allowed");
        assert_eq!(format.branch("a").map(Format::kind), Some("raw"));
    }
}
