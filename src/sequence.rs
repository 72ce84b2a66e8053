//! Sequence format: a list whose items all share one format.

use crate::rules::{Rule, Rules, WithRules};
use crate::{Extract, Failure, Format, Log, Path, Value};
use tracing::trace;

/// Item count bounds contributed by [`SequenceFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsRule {
    Min(usize),
    Max(usize),
}

impl ItemsRule {
    pub(crate) fn check(&self, value: &Value) -> Result<(), Failure<'_>> {
        let len = value.as_array().map_or(0, Vec::len);
        match *self {
            ItemsRule::Min(min) if len < min => Err(Failure::TooFewItems(min)),
            ItemsRule::Max(max) if len > max => Err(Failure::TooManyItems(max)),
            _ => Ok(()),
        }
    }
}

/// Validates an array item by item.
///
/// Items are extracted at `path.<index>`. Like a record, the sequence fails
/// as a whole if any item added an error.
///
/// ```rust
/// use formtree::prelude::*;
/// use formtree::{value, Log, Path};
///
/// let scores = SequenceFormat::of(NumberFormat::new().is_integer()).max_items(3);
///
/// let mut log = Log::new();
/// let out = scores.extract(&value!(["1", 2, "x"]), &mut log, &Path::Prefix("scores"));
/// assert_eq!(out, None);
/// assert_eq!(log.entries()[0].path, "scores.2");
/// ```
#[derive(Debug, Clone)]
pub struct SequenceFormat {
    item: Box<Format>,
    rules: Rules,
}

impl SequenceFormat {
    /// A list whose items extract with `item`.
    #[must_use]
    pub fn of(item: impl Into<Format>) -> Self {
        SequenceFormat {
            item: Box::new(item.into()),
            rules: Rules::new(),
        }
    }

    /// Requires at least `min` items.
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        self.rules.push(Rule::Items(ItemsRule::Min(min)));
        self
    }

    /// Allows at most `max` items.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        self.rules.push(Rule::Items(ItemsRule::Max(max)));
        self
    }

    /// The format every item is extracted with.
    #[must_use]
    pub fn item(&self) -> &Format {
        &self.item
    }
}

impl Extract for SequenceFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        let Value::Array(items) = value else {
            log.add_error(path, Failure::NotList);
            return None;
        };

        let before = log.error_count();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let child = path.index(i);
            if let Some(v) = self.item.extract(item, log, &child) {
                out.push(v);
            }
        }

        let added = log.error_count() - before;
        if added > 0 {
            trace!(path = %path, errors = added, "sequence rejected");
            return None;
        }
        self.rules.apply(Value::Array(out), log, path)
    }
}

impl WithRules for SequenceFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, NumberFormat, TextFormat};

    #[test]
    fn test_items_are_normalized() {
        let list = SequenceFormat::of(NumberFormat::new());
        let mut log = Log::new();
        let out = list.extract(&value!(["+1", 2, " 3.50 "]), &mut log, &Path::Root);
        assert_eq!(out, Some(value!(["1", 2, "3.5"])));
        assert!(log.is_empty());
    }

    #[test]
    fn test_every_bad_item_is_reported() {
        let list = SequenceFormat::of(NumberFormat::new());
        let mut log = Log::new();
        assert_eq!(list.extract(&value!(["a", 1, "b"]), &mut log, &Path::Root), None);
        let paths: Vec<&str> = log.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["0", "2"]);
    }

    #[test]
    fn test_shape_and_count_rules() {
        let list = SequenceFormat::of(TextFormat::new()).min_items(1).max_items(2);
        let mut log = Log::new();
        assert_eq!(list.extract(&value!({ "0": "a" }), &mut log, &Path::Root), None);
        assert_eq!(list.extract(&value!([]), &mut log, &Path::Root), None);
        assert_eq!(list.extract(&value!(["a", "b", "c"]), &mut log, &Path::Root), None);
        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "please provide a list",
                "please provide at least 1 items",
                "please provide at most 2 items",
            ]
        );
        assert!(list.check(&value!(["a"])));
    }
}
