//! The rule pipeline every format runs after structural extraction.
//!
//! A [`Rule`] is either a *test* (the value passes through unchanged or the
//! rule fails) or a *filter* (the value may be replaced, or the rule fails if
//! it cannot process it). [`Rules`] runs them strictly in registration order
//! and stops at the first failure; later rules never see the value.
//!
//! Two modes share the same code:
//!
//! - [`Rules::run`] is the fast mode. It returns the borrowed [`Failure`] and
//!   touches neither a log nor a path.
//! - [`Rules::apply`] is the full mode. The failing rule's message goes to the
//!   log at the format's own path.
//!
//! Leaf formats contribute typed rules ([`NumberRule`], [`TextRule`],
//! [`ItemsRule`], [`DateRule`]); every format accepts user rules through
//! [`WithRules`].
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Value};
//!
//! let even = NumberFormat::new()
//!     .is_integer()
//!     .test(|v| v.as_i64().map_or(false, |n| n % 2 == 0), "please provide an even number");
//!
//! assert_eq!(even.apply(&value!(4)), Some(Value::from(4)));
//! assert_eq!(even.apply(&value!(3)), None);
//! ```

use crate::date::DateRule;
use crate::number::NumberRule;
use crate::sequence::ItemsRule;
use crate::text::TextRule;
use crate::{Failure, Log, Path, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Predicate of a user test rule.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Transformation of a user filter rule. `None` means the value could not be processed.
pub type Mapper = Arc<dyn Fn(Value) -> Option<Value> + Send + Sync>;

/// One step of a pipeline.
#[derive(Clone)]
pub enum Rule {
    Number(NumberRule),
    Text(TextRule),
    Items(ItemsRule),
    Date(DateRule),
    Test {
        predicate: Predicate,
        message: Cow<'static, str>,
    },
    Filter {
        map: Mapper,
        message: Cow<'static, str>,
    },
}

impl Rule {
    /// Runs this rule on `value`, handing the (possibly replaced) value on.
    pub fn run(&self, value: Value) -> Result<Value, Failure<'_>> {
        match self {
            Rule::Number(rule) => rule.check(&value).map(|()| value),
            Rule::Text(rule) => rule.run(value),
            Rule::Items(rule) => rule.check(&value).map(|()| value),
            Rule::Date(rule) => rule.check(&value).map(|()| value),
            Rule::Test { predicate, message } => {
                if predicate(&value) {
                    Ok(value)
                } else {
                    Err(Failure::Custom(message))
                }
            }
            Rule::Filter { map, message } => map(value).ok_or(Failure::Custom(message)),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Number(rule) => f.debug_tuple("Number").field(rule).finish(),
            Rule::Text(rule) => f.debug_tuple("Text").field(rule).finish(),
            Rule::Items(rule) => f.debug_tuple("Items").field(rule).finish(),
            Rule::Date(rule) => f.debug_tuple("Date").field(rule).finish(),
            Rule::Test { message, .. } => f.debug_struct("Test").field("message", message).finish(),
            Rule::Filter { message, .. } => {
                f.debug_struct("Filter").field("message", message).finish()
            }
        }
    }
}

/// An ordered, append-only list of rules.
#[derive(Debug, Clone, Default)]
pub struct Rules(Vec<Rule>);

impl Rules {
    #[must_use]
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fast mode: runs every rule in order, stopping at the first failure.
    pub fn run(&self, value: Value) -> Result<Value, Failure<'_>> {
        self.0.iter().try_fold(value, |value, rule| rule.run(value))
    }

    /// Full mode: like [`Rules::run`], logging the failure at `path`.
    pub fn apply(&self, value: Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        report(self.run(value), log, path)
    }
}

/// Turns a fast-mode outcome into the logging protocol.
pub(crate) fn report(
    outcome: Result<Value, Failure<'_>>,
    log: &mut Log,
    path: &Path<'_>,
) -> Option<Value> {
    match outcome {
        Ok(value) => Some(value),
        Err(failure) => {
            log.add_error(path, failure);
            None
        }
    }
}

/// User rules for any finished format.
pub trait WithRules: Sized {
    #[doc(hidden)]
    fn rules_mut(&mut self) -> &mut Rules;

    /// Appends a test: the value fails with `message` unless `predicate` holds.
    #[must_use]
    fn test<F>(mut self, predicate: F, message: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rules_mut().push(Rule::Test {
            predicate: Arc::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Appends a filter: the value is replaced by `map`'s output, or fails
    /// with `message` when `map` returns `None`.
    #[must_use]
    fn filter<F>(mut self, map: F, message: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.rules_mut().push(Rule::Filter {
            map: Arc::new(map),
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_rule(
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        msg: &'static str,
    ) -> Rule {
        Rule::Test {
            predicate: Arc::new(predicate),
            message: Cow::Borrowed(msg),
        }
    }

    #[test]
    fn test_rules_run_in_order_and_filters_replace() {
        let mut rules = Rules::new();
        rules.push(Rule::Filter {
            map: Arc::new(|v| v.as_i64().map(|n| Value::from(n * 10))),
            message: Cow::Borrowed("not a number"),
        });
        rules.push(test_rule(|v| v.as_i64() == Some(20), "expected twenty"));

        assert_eq!(rules.run(Value::from(2)), Ok(Value::from(20)));
        assert_eq!(rules.run(Value::from(3)), Err(Failure::Custom("expected twenty")));
        assert_eq!(rules.run(Value::Null), Err(Failure::Custom("not a number")));
    }

    #[test]
    fn test_pipeline_stops_at_first_failure() {
        static LATER: AtomicUsize = AtomicUsize::new(0);
        let mut rules = Rules::new();
        rules.push(test_rule(|_| false, "first"));
        rules.push(test_rule(
            |_| {
                LATER.fetch_add(1, Ordering::SeqCst);
                true
            },
            "second",
        ));

        let mut log = Log::new();
        assert_eq!(rules.apply(Value::Null, &mut log, &Path::Prefix("x")), None);
        assert_eq!(LATER.load(Ordering::SeqCst), 0);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].message, "first");
        assert_eq!(log.entries()[0].path, "x");
    }

    #[test]
    fn test_empty_pipeline_passes_value_through() {
        let rules = Rules::default();
        assert!(rules.is_empty());
        assert_eq!(rules.run(Value::from("a")), Ok(Value::from("a")));
    }
}
