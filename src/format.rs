//! The extraction contract and the closed set of schema nodes.
//!
//! Every schema node implements [`Extract`]: given a raw value, a shared
//! [`Log`] and the current [`Path`], return the normalized value, or `None`
//! after logging why. A caller must read the log, not the `None`, to tell a
//! failure apart from a legitimately null result.
//!
//! [`Format`] is the node type used wherever formats nest (record fields,
//! sequence items, variant branches). Composite formats look at which variant
//! a child is, for instance to auto-promote a missing boolean field to
//! `false`, so the set of kinds is a closed enum rather than a trait object.

use crate::{
    BoolFormat, DateFormat, Log, Map, NumberFormat, Path, RecordFormat, SequenceFormat,
    TextFormat, Value, VariantFormat,
};

/// Validates and normalizes a raw value.
pub trait Extract {
    /// Extracts `value` found at `path`, appending diagnostics to `log`.
    ///
    /// Returns `None` when this call added errors to `log`.
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value>;

    /// Pass/fail probe that records no diagnostics.
    ///
    /// Leaf formats override this with a path that never touches a log.
    fn apply(&self, value: &Value) -> Option<Value> {
        let mut log = Log::silent();
        self.extract(value, &mut log, &Path::Root)
    }

    /// Returns `true` if `value` would extract without errors.
    fn check(&self, value: &Value) -> bool {
        self.apply(value).is_some()
    }
}

/// A node of a schema tree.
#[derive(Debug, Clone, Default)]
pub enum Format {
    /// No sub-format: the raw value is taken as is.
    #[default]
    Raw,
    Record(RecordFormat),
    Sequence(SequenceFormat),
    Variant(VariantFormat),
    Number(NumberFormat),
    Boolean(BoolFormat),
    Text(TextFormat),
    Date(DateFormat),
}

impl Format {
    /// The value a missing required field of this format is promoted to.
    ///
    /// An absent HTML checkbox means `false` and an absent group of inputs
    /// means an empty collection; any other missing field is an error.
    pub(crate) fn promoted_default(&self) -> Option<Value> {
        match self {
            Format::Boolean(_) => Some(Value::Bool(false)),
            Format::Record(_) => Some(Value::Object(Map::new())),
            Format::Sequence(_) => Some(Value::Array(Vec::new())),
            _ => None,
        }
    }

    /// Short name of the node kind, for trace output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Format::Raw => "raw",
            Format::Record(_) => "record",
            Format::Sequence(_) => "sequence",
            Format::Variant(_) => "variant",
            Format::Number(_) => "number",
            Format::Boolean(_) => "boolean",
            Format::Text(_) => "text",
            Format::Date(_) => "date",
        }
    }
}

impl Extract for Format {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        match self {
            Format::Raw => Some(value.clone()),
            Format::Record(f) => f.extract(value, log, path),
            Format::Sequence(f) => f.extract(value, log, path),
            Format::Variant(f) => f.extract(value, log, path),
            Format::Number(f) => f.extract(value, log, path),
            Format::Boolean(f) => f.extract(value, log, path),
            Format::Text(f) => f.extract(value, log, path),
            Format::Date(f) => f.extract(value, log, path),
        }
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            Format::Raw => Some(value.clone()),
            Format::Record(f) => f.apply(value),
            Format::Sequence(f) => f.apply(value),
            Format::Variant(f) => f.apply(value),
            Format::Number(f) => f.apply(value),
            Format::Boolean(f) => f.apply(value),
            Format::Text(f) => f.apply(value),
            Format::Date(f) => f.apply(value),
        }
    }
}

macro_rules! impl_from_format {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Format {
                fn from(format: $ty) -> Self {
                    Format::$variant(format)
                }
            }
        )*
    };
}

impl_from_format!(
    Record(RecordFormat),
    Sequence(SequenceFormat),
    Variant(VariantFormat),
    Number(NumberFormat),
    Boolean(BoolFormat),
    Text(TextFormat),
    Date(DateFormat),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_raw_passes_anything_through() {
        let mut log = Log::new();
        let input = value!({ "a": [1, 2] });
        assert_eq!(Format::Raw.extract(&input, &mut log, &Path::Root), Some(input));
        assert!(log.is_empty());
    }

    #[test]
    fn test_promoted_defaults() {
        assert_eq!(
            Format::from(BoolFormat::new()).promoted_default(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            Format::from(SequenceFormat::of(Format::Raw)).promoted_default(),
            Some(Value::Array(vec![]))
        );
        assert_eq!(Format::from(NumberFormat::new()).promoted_default(), None);
        assert_eq!(Format::Raw.promoted_default(), None);
    }

    #[test]
    fn test_formats_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Format>();
    }

    #[test]
    fn test_check_uses_fast_path() {
        let number = Format::from(NumberFormat::new());
        assert!(number.check(&value!("12")));
        assert!(!number.check(&value!("twelve")));
    }
}
