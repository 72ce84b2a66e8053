//! Calendar date leaf format.
//!
//! [`DateFormat`] accepts `YYYY-MM-DD` strings, the value an HTML date input
//! submits, and outputs the canonical zero-padded form.
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Value};
//!
//! let birthday = DateFormat::new().not_after("2024-12-31").unwrap();
//! assert_eq!(birthday.apply(&value!(" 2001-2-3 ")), Some(Value::from("2001-02-03")));
//! assert_eq!(birthday.apply(&value!("2025-01-01")), None);
//! assert_eq!(birthday.apply(&value!("2001-02-30")), None);
//! ```

use crate::error::{Error, Result};
use crate::rules::{report, Rule, Rules, WithRules};
use crate::{Extract, Failure, Log, Path, Value};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Bounds contributed by [`DateFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
    NotBefore(NaiveDate),
    NotAfter(NaiveDate),
}

impl DateRule {
    pub(crate) fn check(&self, value: &Value) -> std::result::Result<(), Failure<'_>> {
        let date = value.as_str().and_then(parse_date).ok_or(Failure::NotDate)?;
        match self {
            DateRule::NotBefore(min) if date < *min => Err(Failure::TooEarly(min)),
            DateRule::NotAfter(max) if date > *max => Err(Failure::TooLate(max)),
            _ => Ok(()),
        }
    }
}

/// Validates calendar dates.
#[derive(Debug, Clone, Default)]
pub struct DateFormat {
    rules: Rules,
}

impl DateFormat {
    #[must_use]
    pub fn new() -> Self {
        DateFormat::default()
    }

    fn bound(s: &str) -> Result<NaiveDate> {
        parse_date(s)
            .ok_or_else(|| Error::invalid_bound(format!("`{}` is not a YYYY-MM-DD date", s)))
    }

    /// Requires the date to be on or after `min` (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] if `min` is not a date.
    pub fn not_before(mut self, min: &str) -> Result<Self> {
        self.rules.push(Rule::Date(DateRule::NotBefore(Self::bound(min)?)));
        Ok(self)
    }

    /// Requires the date to be on or before `max` (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] if `max` is not a date.
    pub fn not_after(mut self, max: &str) -> Result<Self> {
        self.rules.push(Rule::Date(DateRule::NotAfter(Self::bound(max)?)));
        Ok(self)
    }

    fn run(&self, value: &Value) -> std::result::Result<Value, Failure<'_>> {
        let date = value.as_str().and_then(parse_date).ok_or(Failure::NotDate)?;
        self.rules.run(Value::String(date.format(DATE_FORMAT).to_string()))
    }
}

impl Extract for DateFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        report(self.run(value), log, path)
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        self.run(value).ok()
    }
}

impl WithRules for DateFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_accepts_only_calendar_dates() {
        let date = DateFormat::new();
        assert_eq!(date.apply(&value!("2024-02-29")), Some(value!("2024-02-29")));
        assert_eq!(date.apply(&value!("2023-02-29")), None);
        assert_eq!(date.apply(&value!("29/02/2024")), None);
        assert_eq!(date.apply(&value!(20240229)), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = DateFormat::new()
            .not_before("2024-01-01")
            .unwrap()
            .not_after("2024-01-31")
            .unwrap();
        assert!(window.check(&value!("2024-01-01")));
        assert!(window.check(&value!("2024-01-31")));

        let mut log = Log::new();
        assert_eq!(window.extract(&value!("2023-12-31"), &mut log, &Path::Root), None);
        assert_eq!(
            log.entries()[0].message,
            "please provide a date on or after 2024-01-01"
        );
    }

    #[test]
    fn test_bad_bound_is_a_configuration_error() {
        assert!(matches!(
            DateFormat::new().not_before("yesterday"),
            Err(Error::InvalidBound(_))
        ));
    }
}
