//! Numeric leaf format.
//!
//! [`NumberFormat`] accepts native numbers and numeric-looking strings. It works
//! in two phases:
//!
//! 1. **Structural.** Anything that is not a finite native number or a numeric
//!    string is rejected. Numeric strings longer than
//!    [`MAX_NUMERIC_LENGTH`] are rejected. Accepted strings are rewritten into
//!    their canonical form (see [`normalize`]); native numbers pass through.
//! 2. **Rules.** Chained tests (`is_min`, `is_max`, `is_in_range`,
//!    `is_positive`, `is_integer`) run in registration order on the
//!    canonical value and stop at the first failure.
//!
//! Range tests compare through [`Decimal`], so string-encoded numbers keep
//! their full precision.
//!
//! ## Examples
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{value, Value};
//!
//! let age = NumberFormat::new().is_min(0).is_integer();
//!
//! assert_eq!(age.apply(&value!(" +017 ")), Some(Value::from("17")));
//! assert_eq!(age.apply(&value!("17.000")), Some(Value::from("17")));
//! assert_eq!(age.apply(&value!("17.5")), None);
//! assert_eq!(age.apply(&value!((-1))), None);
//! ```

use crate::rules::{report, Rule, Rules, WithRules};
use crate::{Decimal, Extract, Failure, Log, Number, Path, Value};

/// Longest numeric string accepted by default.
pub const MAX_NUMERIC_LENGTH: usize = 128;

/// 2^53. Integral floats must stay strictly below it, since `2^53 + 1` rounds to it.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The lexical pieces of a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumericParts<'s> {
    pub negative: bool,
    pub int: &'s str,
    /// Digits after the point; `Some("")` for a trailing point.
    pub frac: Option<&'s str>,
    /// Exponent sign (`true` when negative) and digits.
    pub exp: Option<(bool, &'s str)>,
}

impl NumericParts<'_> {
    fn canonical(&self) -> String {
        let int = self.int.trim_start_matches('0');
        let frac = self.frac.map_or("", |f| f.trim_end_matches('0'));
        let exp = self
            .exp
            .map(|(negative, digits)| (negative, digits.trim_start_matches('0')))
            .filter(|(_, digits)| !digits.is_empty());

        let mut out = String::with_capacity(self.int.len() + frac.len() + 8);
        if self.negative {
            out.push('-');
        }
        out.push_str(if int.is_empty() { "0" } else { int });
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
        if let Some((negative, digits)) = exp {
            out.push('e');
            out.push(if negative { '-' } else { '+' });
            out.push_str(digits);
        }
        out
    }
}

fn trim_space(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'))
}

fn scan_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Splits a numeric-looking string into its parts.
///
/// Grammar, after trimming surrounding whitespace:
/// `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least one
/// mantissa digit.
pub(crate) fn split_numeric(s: &str) -> Option<NumericParts<'_>> {
    let s = trim_space(s);
    let bytes = s.as_bytes();

    let mut i = 0;
    let mut negative = false;
    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        negative = sign == b'-';
        i = 1;
    }

    let int_start = i;
    i = scan_digits(bytes, i);
    let int = &s[int_start..i];

    let mut frac = None;
    if bytes.get(i) == Some(&b'.') {
        let start = i + 1;
        i = scan_digits(bytes, start);
        frac = Some(&s[start..i]);
    }
    if int.is_empty() && frac.map_or(true, str::is_empty) {
        return None;
    }

    let mut exp = None;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        let mut exp_negative = false;
        if let Some(&sign @ (b'+' | b'-')) = bytes.get(i) {
            exp_negative = sign == b'-';
            i += 1;
        }
        let start = i;
        i = scan_digits(bytes, start);
        if i == start {
            return None;
        }
        exp = Some((exp_negative, &s[start..i]));
    }

    if i != bytes.len() {
        return None;
    }
    Some(NumericParts {
        negative,
        int,
        frac,
        exp,
    })
}

/// Returns `true` if `s` is a numeric-looking string.
///
/// ```rust
/// use formtree::number::is_numeric;
///
/// assert!(is_numeric(" -1.5e3 "));
/// assert!(is_numeric(".5"));
/// assert!(is_numeric("5."));
/// assert!(!is_numeric("."));
/// assert!(!is_numeric("1e"));
/// assert!(!is_numeric("0x1A"));
/// ```
#[must_use]
pub fn is_numeric(s: &str) -> bool {
    split_numeric(s).is_some()
}

/// Rewrites a numeric string into canonical form, or `None` if it is not numeric.
///
/// The rewrite only changes formatting, never the value: surrounding
/// whitespace, a leading `+`, redundant leading zeros, trailing fractional
/// zeros and zero exponents are dropped; `.5` gains its `0`; the exponent
/// marker is lowercased and always signed.
///
/// ```rust
/// use formtree::number::normalize;
///
/// assert_eq!(normalize(" +007.2500 ").as_deref(), Some("7.25"));
/// assert_eq!(normalize(".10").as_deref(), Some("0.1"));
/// assert_eq!(normalize("1.0E05").as_deref(), Some("1e+5"));
/// assert_eq!(normalize("3e-0").as_deref(), Some("3"));
/// assert_eq!(normalize("abc"), None);
/// ```
#[must_use]
pub fn normalize(s: &str) -> Option<String> {
    split_numeric(s).map(|parts| parts.canonical())
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(Number::Integer(_)) => true,
        Value::Number(Number::Float(f)) => f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER,
        Value::String(s) => {
            split_numeric(s).map_or(false, |parts| parts.frac.is_none() && parts.exp.is_none())
        }
        _ => false,
    }
}

/// Tests contributed by [`NumberFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumberRule {
    Min(Decimal),
    Max(Decimal),
    InRange(Decimal, Decimal),
    Positive,
    Integer,
}

impl NumberRule {
    pub(crate) fn check(&self, value: &Value) -> Result<(), Failure<'_>> {
        if let NumberRule::Integer = self {
            return if is_integer(value) {
                Ok(())
            } else {
                Err(Failure::NotInteger)
            };
        }

        let n = Decimal::from_value(value).ok_or(Failure::NotNumber)?;
        let ok = match self {
            NumberRule::Min(min) => n >= *min,
            NumberRule::Max(max) => n <= *max,
            NumberRule::InRange(min, max) => n >= *min && n <= *max,
            NumberRule::Positive => !n.is_negative(),
            NumberRule::Integer => true,
        };
        if ok {
            return Ok(());
        }
        Err(match self {
            NumberRule::Min(min) => Failure::BelowMin(min),
            NumberRule::Max(max) => Failure::AboveMax(max),
            NumberRule::InRange(min, max) => Failure::OutOfRange(min, max),
            NumberRule::Positive => Failure::NotPositive,
            NumberRule::Integer => Failure::NotInteger,
        })
    }
}

/// Validates numbers and numeric strings.
#[derive(Debug, Clone)]
pub struct NumberFormat {
    max_length: usize,
    rules: Rules,
}

impl NumberFormat {
    #[must_use]
    pub fn new() -> Self {
        NumberFormat {
            max_length: MAX_NUMERIC_LENGTH,
            rules: Rules::new(),
        }
    }

    /// Overrides the longest numeric string accepted (default [`MAX_NUMERIC_LENGTH`]).
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    fn push(mut self, rule: NumberRule) -> Self {
        self.rules.push(Rule::Number(rule));
        self
    }

    /// Requires the number to be `>= min`.
    #[must_use]
    pub fn is_min(self, min: impl Into<Decimal>) -> Self {
        self.push(NumberRule::Min(min.into()))
    }

    /// Requires the number to be `<= max`.
    #[must_use]
    pub fn is_max(self, max: impl Into<Decimal>) -> Self {
        self.push(NumberRule::Max(max.into()))
    }

    /// Requires `min <= number <= max`. A range with `min > max` accepts nothing.
    #[must_use]
    pub fn is_in_range(self, min: impl Into<Decimal>, max: impl Into<Decimal>) -> Self {
        self.push(NumberRule::InRange(min.into(), max.into()))
    }

    /// Requires the number to be `>= 0`.
    #[must_use]
    pub fn is_positive(self) -> Self {
        self.push(NumberRule::Positive)
    }

    /// Requires an integer: native integers, integral floats of magnitude
    /// below 2^53, or strings without fractional part and exponent.
    #[must_use]
    pub fn is_integer(self) -> Self {
        self.push(NumberRule::Integer)
    }

    fn structural(&self, value: &Value) -> Result<Value, Failure<'_>> {
        match value {
            Value::Number(n) if n.is_finite() => Ok(Value::Number(*n)),
            Value::String(s) => {
                let parts = split_numeric(s).ok_or(Failure::NotNumber)?;
                if s.len() > self.max_length {
                    return Err(Failure::NumberTooLong);
                }
                Ok(Value::String(parts.canonical()))
            }
            _ => Err(Failure::NotNumber),
        }
    }

    fn run(&self, value: &Value) -> Result<Value, Failure<'_>> {
        let value = self.structural(value)?;
        self.rules.run(value)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Extract for NumberFormat {
    fn extract(&self, value: &Value, log: &mut Log, path: &Path<'_>) -> Option<Value> {
        report(self.run(value), log, path)
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        self.run(value).ok()
    }
}

impl WithRules for NumberFormat {
    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }
}
