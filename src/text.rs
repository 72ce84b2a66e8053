//! Text leaf format.
//!
//! [`TextFormat`] accepts strings and offers the rules forms usually need:
//! trimming, length bounds counted in characters, a regular expression and a
//! fixed set of choices.
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Value};
//!
//! let username = TextFormat::new()
//!     .trimmed()
//!     .min_length(3)
//!     .matches("^[a-z0-9_]+$")
//!     .unwrap();
//!
//! assert_eq!(username.apply(&value!("  alice_1 ")), Some(Value::from("alice_1")));
//! assert_eq!(username.apply(&value!("Al")), None);
//! ```

use crate::error::{Error, Result};
use crate::rules::{report, Rule, Rules, WithRules};
use crate::{Extract, Failure, Log, Path, Value};
use regex::Regex;

/// Rules contributed by [`TextFormat`].
#[derive(Debug, Clone)]
pub enum TextRule {
    /// Filter: strips surrounding whitespace.
    Trim,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    OneOf(Vec<String>),
}

impl TextRule {
    pub(crate) fn run(&self, value: Value) -> std::result::Result<Value, Failure<'_>> {
        let Value::String(s) = value else {
            return Err(Failure::NotText);
        };
        match self {
            TextRule::Trim => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    Ok(Value::String(s))
                } else {
                    Ok(Value::String(trimmed.to_string()))
                }
            }
            TextRule::MinLength(min) if s.chars().count() < *min => Err(Failure::TooShort(*min)),
            TextRule::MaxLength(max) if s.chars().count() > *max => Err(Failure::TooLong(*max)),
            TextRule::Pattern(re) if !re.is_match(&s) => Err(Failure::PatternMismatch),
            TextRule::OneOf(choices) if !choices.iter().any(|c| *c == s) => {
                Err(Failure::InvalidChoice)
            }
            _ => Ok(Value::String(s)),
        }
    }
}

/// Validates strings.
#[derive(Debug, Clone, Default)]
pub struct TextFormat {
    rules: Rules,
}

impl TextFormat {
    #[must_use]
    pub fn new() -> Self {
        TextFormat::default()
    }

    fn push(mut self, rule: TextRule) -> Self {
        self.rules.push(Rule::Text(rule));
        self
    }

    /// Strips surrounding whitespace before the rules that follow.
    #[must_use]
    pub fn trimmed(self) -> Self {
        self.push(TextRule::Trim)
    }

    /// Requires at least `min` characters.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.push(TextRule::MinLength(min))
    }

    /// Allows at most `max` characters.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.push(TextRule::MaxLength(max))
    }

    /// Requires a match of the regular expression `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` does not compile.
    pub fn matches(self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.push(TextRule::Pattern(re)))
    }

    /// Requires the text to equal one of `choices`.
    #[must_use]
    pub fn one_of<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(TextRule::OneOf(choices.into_iter().map(Into::into).collect()))
    }

    fn run(&self, value: &Value) -> std::result::Result<Value, Failure<'_>> {
        match value {
            Value::String(s) => self.rules.run(Value::String(s.clone())),
            _ => Err(Failure::NotText),
        }
    }
}

impl Extract for TextFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        report(self.run(value), log, path)
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        self.run(value).ok()
    }
}

impl WithRules for TextFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn first_message(format: &TextFormat, value: Value) -> String {
        let mut log = Log::new();
        assert_eq!(format.extract(&value, &mut log, &Path::Root), None);
        log.entries()[0].message.clone()
    }

    #[test]
    fn test_only_strings_are_text() {
        let text = TextFormat::new();
        assert_eq!(text.apply(&value!("")), Some(value!("")));
        assert_eq!(first_message(&text, value!(12)), "please provide a text");
    }

    #[test]
    fn test_length_counts_characters() {
        let text = TextFormat::new().min_length(2).max_length(3);
        assert!(text.check(&value!("éé")));
        assert!(text.check(&value!("日本語")));
        assert_eq!(first_message(&text, value!("é")), "please provide at least 2 characters");
        assert_eq!(first_message(&text, value!("abcd")), "please provide at most 3 characters");
    }

    #[test]
    fn test_trim_order_matters() {
        let before = TextFormat::new().trimmed().max_length(3);
        let after = TextFormat::new().max_length(3).trimmed();
        assert_eq!(before.apply(&value!("  ab  ")), Some(value!("ab")));
        assert_eq!(after.apply(&value!("  ab  ")), None);
    }

    #[test]
    fn test_pattern_and_choices() {
        let code = TextFormat::new().matches(r"^\d{4}$").unwrap();
        assert!(code.check(&value!("2024")));
        assert_eq!(
            first_message(&code, value!("20x4")),
            "please provide a value in the expected format"
        );

        let color = TextFormat::new().one_of(["red", "green"]);
        assert!(color.check(&value!("red")));
        assert_eq!(first_message(&color, value!("blue")), "please fill in a valid value");
    }

    #[test]
    fn test_bad_pattern_is_a_configuration_error() {
        let err = TextFormat::new().matches("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
