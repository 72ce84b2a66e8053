//! Boolean leaf format.
//!
//! HTML forms submit checkboxes as strings (`"on"`, `"1"`) or not at all, so
//! [`BoolFormat`] accepts the usual spellings in addition to native booleans.
//! A record promotes a missing required boolean field to `false`.

use crate::rules::{report, Rules, WithRules};
use crate::{Extract, Failure, Log, Number, Path, Value};

const TRUE_WORDS: [&str; 4] = ["1", "true", "on", "yes"];
const FALSE_WORDS: [&str; 5] = ["", "0", "false", "off", "no"];

/// Validates booleans and their common text spellings.
///
/// ```rust
/// use formtree::prelude::*;
/// use formtree::{value, Value};
///
/// let flag = BoolFormat::new();
/// assert_eq!(flag.apply(&value!("on")), Some(Value::Bool(true)));
/// assert_eq!(flag.apply(&value!("No")), Some(Value::Bool(false)));
/// assert_eq!(flag.apply(&value!(0)), Some(Value::Bool(false)));
/// assert_eq!(flag.apply(&value!("maybe")), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoolFormat {
    rules: Rules,
}

impl BoolFormat {
    #[must_use]
    pub fn new() -> Self {
        BoolFormat::default()
    }

    fn structural(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(Number::Integer(0)) => Some(false),
            Value::Number(Number::Integer(1)) => Some(true),
            Value::String(s) => {
                let s = s.trim();
                if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s)) {
                    Some(true)
                } else if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s)) {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn run(&self, value: &Value) -> Result<Value, Failure<'_>> {
        let b = Self::structural(value).ok_or(Failure::NotBoolean)?;
        self.rules.run(Value::Bool(b))
    }
}

impl Extract for BoolFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        report(self.run(value), log, path)
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        self.run(value).ok()
    }
}

impl WithRules for BoolFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}
