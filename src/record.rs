//! Record format ("dict"): a keyed container with declared fields.
//!
//! Fields are declared on a [`RecordBuilder`] and extracted in declaration
//! order. Rules can only be added once [`RecordBuilder::build`] has produced a
//! [`RecordFormat`], so every field declaration precedes every rule.
//!
//! ## Missing fields
//!
//! | Declared as | Key absent from input |
//! |---|---|
//! | `required` with a boolean format | extracted as `false` |
//! | `required` with a record or sequence format | extracted as an empty container |
//! | `required`, anything else | error at the **record's** path |
//! | `optional_or(default)` | `default` inserted verbatim, not extracted |
//! | `optional` | key left out of the output |
//!
//! The first two rows exist because HTML forms omit unchecked checkboxes and
//! empty groups entirely.
//!
//! ## Examples
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Log, Path, Value};
//!
//! let signup = RecordFormat::builder()
//!     .required("agree", BoolFormat::new())
//!     .required("age", NumberFormat::new().is_min(0))
//!     .optional_or("lang", "en", TextFormat::new())
//!     .build()
//!     .unwrap();
//!
//! let mut log = Log::new();
//! let out = signup.extract(&value!({ "age": "+30" }), &mut log, &Path::Root);
//! assert_eq!(out, Some(value!({ "agree": false, "age": "30", "lang": "en" })));
//! ```

use crate::error::{Error, Result};
use crate::rules::{Rules, WithRules};
use crate::{Extract, Failure, Format, Log, Map, Path, Value};
use indexmap::IndexMap;
use tracing::trace;

/// Whether a field must be present, and what happens when it is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    OptionalOr(Value),
}

/// A declared field.
#[derive(Debug, Clone)]
pub struct Field {
    pub format: Format,
    pub presence: Presence,
}

/// Declares the fields of a [`RecordFormat`].
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: IndexMap<String, Field>,
    allow_dynamic: bool,
    duplicate: Option<String>,
}

impl RecordBuilder {
    fn field(mut self, name: &str, format: Format, presence: Presence) -> Self {
        if self.fields.contains_key(name) {
            self.duplicate.get_or_insert_with(|| name.to_string());
        } else {
            self.fields.insert(name.to_string(), Field { format, presence });
        }
        self
    }

    /// Declares a field that must be present (subject to auto-promotion).
    #[must_use]
    pub fn required(self, name: &str, format: impl Into<Format>) -> Self {
        self.field(name, format.into(), Presence::Required)
    }

    /// Declares a field that is left out of the output when absent.
    #[must_use]
    pub fn optional(self, name: &str, format: impl Into<Format>) -> Self {
        self.field(name, format.into(), Presence::Optional)
    }

    /// Declares a field that takes `default` when absent. The default is not
    /// run through `format`.
    #[must_use]
    pub fn optional_or(
        self,
        name: &str,
        default: impl Into<Value>,
        format: impl Into<Format>,
    ) -> Self {
        self.field(name, format.into(), Presence::OptionalOr(default.into()))
    }

    /// Also copies undeclared input keys into the output.
    #[must_use]
    pub fn allow_dynamic(mut self, allow: bool) -> Self {
        self.allow_dynamic = allow;
        self
    }

    /// Finishes the field list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] for the first field declared twice.
    pub fn build(self) -> Result<RecordFormat> {
        if let Some(name) = self.duplicate {
            return Err(Error::DuplicateField(name));
        }
        Ok(RecordFormat {
            fields: self.fields,
            allow_dynamic: self.allow_dynamic,
            rules: Rules::new(),
        })
    }
}

/// Validates a keyed container against declared fields.
#[derive(Debug, Clone)]
pub struct RecordFormat {
    fields: IndexMap<String, Field>,
    allow_dynamic: bool,
    rules: Rules,
}

impl RecordFormat {
    /// Starts declaring fields.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Changes whether undeclared input keys are copied into the output.
    #[must_use]
    pub fn allow_dynamic(mut self, allow: bool) -> Self {
        self.allow_dynamic = allow;
        self
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    fn extract_missing(
        &self,
        name: &str,
        field: &Field,
        log: &mut Log,
        path: &Path<'_>,
    ) -> Option<Value> {
        match &field.presence {
            Presence::Optional => None,
            Presence::OptionalOr(default) => Some(default.clone()),
            Presence::Required => match field.format.promoted_default() {
                Some(empty) => field.format.extract(&empty, log, &path.key(name)),
                None => {
                    log.add_error(path, Failure::MissingField { name });
                    None
                }
            },
        }
    }
}

impl Extract for RecordFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        if !value.is_container() {
            log.add_error(path, Failure::NotRecord);
            return None;
        }

        let before = log.error_count();
        let mut out = Map::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let extracted = match value.get_entry(name) {
                Some(raw) => field.format.extract(raw, log, &path.key(name)),
                None => self.extract_missing(name, field, log, path),
            };
            if let Some(v) = extracted {
                out.insert(name.clone(), v);
            }
        }

        if self.allow_dynamic {
            for (key, raw) in value.entries() {
                if !self.fields.contains_key(&*key) {
                    out.insert_if_absent(&key, || raw.clone());
                }
            }
        }

        let added = log.error_count() - before;
        if added > 0 {
            trace!(path = %path, errors = added, "record rejected");
            return None;
        }
        self.rules.apply(Value::Object(out), log, path)
    }
}

impl WithRules for RecordFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, BoolFormat, NumberFormat, SequenceFormat, TextFormat};

    fn run(format: &RecordFormat, input: Value) -> (Option<Value>, Log) {
        let mut log = Log::new();
        let out = format.extract(&input, &mut log, &Path::Root);
        (out, log)
    }

    #[test]
    fn test_declared_fields_only() {
        let record = RecordFormat::builder()
            .required("a", NumberFormat::new())
            .optional("b", Format::Raw)
            .build()
            .unwrap();
        let (out, log) = run(&record, value!({ "b": [1], "a": "01", "extra": true }));
        assert_eq!(out, Some(value!({ "a": "1", "b": [1] })));
        assert!(log.is_empty());

        // declaration order, not input order
        let keys: Vec<String> = out.unwrap().as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_not_a_container() {
        let record = RecordFormat::builder().build().unwrap();
        let (out, log) = run(&record, value!("text"));
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].message, "please provide a record");
        assert_eq!(log.entries()[0].path, "");
    }

    #[test]
    fn test_missing_required_field_is_reported_at_record_path() {
        let record = RecordFormat::builder()
            .required("name", TextFormat::new())
            .build()
            .unwrap();
        let mut log = Log::new();
        let root = Path::Root;
        let user = root.key("user");
        assert_eq!(record.extract(&value!({}), &mut log, &user), None);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].path, "user");
        assert_eq!(log.entries()[0].message, "please provide required field `name`");
    }

    #[test]
    fn test_auto_promotion() {
        let record = RecordFormat::builder()
            .required("agree", BoolFormat::new())
            .required("tags", SequenceFormat::of(TextFormat::new()))
            .required("address", RecordFormat::builder().build().unwrap())
            .build()
            .unwrap();
        let (out, log) = run(&record, value!({}));
        assert_eq!(out, Some(value!({ "agree": false, "tags": [], "address": {} })));
        assert!(log.is_empty());
    }

    #[test]
    fn test_promoted_container_still_validates() {
        let address = RecordFormat::builder()
            .required("city", TextFormat::new())
            .build()
            .unwrap();
        let record = RecordFormat::builder()
            .required("address", address)
            .build()
            .unwrap();
        let (out, log) = run(&record, value!({}));
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].path, "address");
        assert_eq!(log.entries()[0].message, "please provide required field `city`");
    }

    #[test]
    fn test_default_is_not_extracted() {
        let record = RecordFormat::builder()
            .optional_or("count", "not a number", NumberFormat::new())
            .optional("note", TextFormat::new())
            .build()
            .unwrap();
        let (out, log) = run(&record, value!({}));
        assert_eq!(out, Some(value!({ "count": "not a number" })));
        assert!(log.is_empty());

        let (out, _) = run(&record, value!({ "count": "+4" }));
        assert_eq!(out, Some(value!({ "count": "4" })));
    }

    #[test]
    fn test_dynamic_keys_do_not_override_declared_fields() {
        let record = RecordFormat::builder()
            .required("n", NumberFormat::new())
            .allow_dynamic(true)
            .build()
            .unwrap();
        let (out, _) = run(&record, value!({ "x": 1, "n": " 5 ", "y": "two" }));
        assert_eq!(out, Some(value!({ "n": "5", "x": 1, "y": "two" })));

        let closed = record.allow_dynamic(false);
        let (out, _) = run(&closed, value!({ "x": 1, "n": "5" }));
        assert_eq!(out, Some(value!({ "n": "5" })));
    }

    #[test]
    fn test_any_child_error_fails_the_record() {
        let record = RecordFormat::builder()
            .required("a", NumberFormat::new())
            .required("b", NumberFormat::new())
            .required("c", NumberFormat::new())
            .build()
            .unwrap();
        let (out, log) = run(&record, value!({ "a": "x", "b": 2 }));
        assert_eq!(out, None);
        let located: Vec<(&str, &str)> = log
            .entries()
            .iter()
            .map(|e| (e.path.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            located,
            vec![
                ("a", "please provide a number"),
                ("", "please provide required field `c`"),
            ]
        );
    }

    #[test]
    fn test_array_input_is_keyed_by_index() {
        let pair = RecordFormat::builder()
            .required("0", NumberFormat::new())
            .required("1", NumberFormat::new())
            .build()
            .unwrap();
        let (out, _) = run(&pair, value!(["1", "2"]));
        assert_eq!(out, Some(value!({ "0": "1", "1": "2" })));

        let (out, log) = run(&pair, value!(["1"]));
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].message, "please provide required index `1`");
    }

    #[test]
    fn test_signed_or_padded_names_are_not_indices() {
        let record = RecordFormat::builder()
            .required("+1", NumberFormat::new())
            .optional("01", NumberFormat::new())
            .build()
            .unwrap();
        let (out, log) = run(&record, value!(["0", "5"]));
        assert_eq!(out, None);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].message, "please provide required field `+1`");
    }

    #[test]
    fn test_record_rules_run_after_fields() {
        let range = RecordFormat::builder()
            .required("from", NumberFormat::new())
            .required("to", NumberFormat::new())
            .build()
            .unwrap()
            .test(
                |v| {
                    let read = |key: &str| {
                        v.get_entry(key)
                            .and_then(Value::as_str)
                            .and_then(|s| s.parse::<f64>().ok())
                    };
                    matches!((read("from"), read("to")), (Some(a), Some(b)) if a <= b)
                },
                "please provide an increasing range",
            );

        let (out, _) = run(&range, value!({ "from": "1", "to": "2" }));
        assert!(out.is_some());

        let (out, log) = run(&range, value!({ "from": "3", "to": "2" }));
        assert_eq!(out, None);
        assert_eq!(log.entries()[0].path, "");
        assert_eq!(log.entries()[0].message, "please provide an increasing range");
    }

    #[test]
    fn test_duplicate_field_is_a_configuration_error() {
        let err = RecordFormat::builder()
            .required("a", Format::Raw)
            .optional("b", Format::Raw)
            .optional("a", Format::Raw)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_silent_probe_still_fails() {
        let record = RecordFormat::builder()
            .required("a", NumberFormat::new())
            .build()
            .unwrap();
        assert!(record.check(&value!({ "a": 1 })));
        assert!(!record.check(&value!({ "a": "x" })));
        assert!(!record.check(&value!({})));
    }
}
