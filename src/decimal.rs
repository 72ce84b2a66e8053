//! Exact decimal comparison.
//!
//! Numeric strings can carry more precision than any native type, so range
//! rules compare through [`Decimal`] instead of `f64`. A decimal is stored as
//! a sign, its significant digits and a [`BigInt`] order of magnitude
//! (`0.d1d2d3... × 10^order`). Two decimals compare by sign, then order, then
//! digits, so no arithmetic on the digits is ever needed and exponents of any
//! size stay exact.
//!
//! ```rust
//! use formtree::Decimal;
//!
//! let a: Decimal = "123456789012345678901234567890".parse().unwrap();
//! let b: Decimal = "123456789012345678901234567891".parse().unwrap();
//! assert!(a < b);
//!
//! let tiny: Decimal = "1e-99999999999999999999".parse().unwrap();
//! assert!(tiny > Decimal::from(0));
//! assert_eq!(Decimal::try_from(0.5).unwrap().to_string(), "0.5");
//! ```

use crate::error::{Error, Result};
use crate::number::split_numeric;
use crate::{Number, Value};
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Plain notation is used while the order stays in this window.
const PLAIN_ORDER_MIN: i64 = -20;
const PLAIN_ORDER_MAX: i64 = 40;

/// An exact, arbitrary-precision decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    /// Significant digits without leading or trailing zeros; empty for zero.
    digits: String,
    order: BigInt,
}

impl Decimal {
    /// The value zero.
    #[must_use]
    pub fn zero() -> Self {
        Decimal {
            negative: false,
            digits: String::new(),
            order: BigInt::default(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` for values strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Reads a native number or numeric string. Other values give `None`.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(Number::Integer(i)) => Some(Decimal::from(*i)),
            Value::Number(Number::Float(f)) => Decimal::try_from(*f).ok(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .order
                .cmp(&other.order)
                .then_with(|| self.digits.as_str().cmp(other.digits.as_str())),
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = split_numeric(s)
            .ok_or_else(|| Error::invalid_bound(format!("`{}` is not a number", s)))?;

        let mut all = String::with_capacity(parts.int.len() + parts.frac.map_or(0, str::len));
        all.push_str(parts.int);
        if let Some(frac) = parts.frac {
            all.push_str(frac);
        }

        let leading = all.len() - all.trim_start_matches('0').len();
        let digits = all[leading..].trim_end_matches('0');
        if digits.is_empty() {
            return Ok(Decimal::zero());
        }

        let mut order = BigInt::from(parts.int.len() as i64 - leading as i64);
        if let Some((exp_negative, exp_digits)) = parts.exp {
            let exp_digits = exp_digits.trim_start_matches('0');
            if !exp_digits.is_empty() {
                let exp = BigInt::parse_bytes(exp_digits.as_bytes(), 10).ok_or_else(|| {
                    Error::invalid_bound(format!("`{}` has an unreadable exponent", s))
                })?;
                if exp_negative {
                    order -= exp;
                } else {
                    order += exp;
                }
            }
        }

        Ok(Decimal {
            negative: parts.negative,
            digits: digits.to_string(),
            order,
        })
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        // Integer formatting always yields a valid numeric string.
        value.to_string().parse().unwrap_or_else(|_| Decimal::zero())
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::from(value as i64)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal::from(value as i64)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        value.to_string().parse().unwrap_or_else(|_| Decimal::zero())
    }
}

impl TryFrom<f64> for Decimal {
    type Error = Error;

    /// Uses the shortest decimal representation that reads back as `value`.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_bound(format!("{} is not finite", value)));
        }
        format!("{:e}", value).parse()
    }
}

impl TryFrom<&str> for Decimal {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }

        let digits = self.digits.as_str();
        let order = i64::try_from(&self.order)
            .ok()
            .filter(|o| (PLAIN_ORDER_MIN..=PLAIN_ORDER_MAX).contains(o));

        match order {
            Some(o) if o <= 0 => write!(f, "0.{}{}", "0".repeat(o.unsigned_abs() as usize), digits),
            Some(o) if o as usize >= digits.len() => {
                write!(f, "{}{}", digits, "0".repeat(o as usize - digits.len()))
            }
            Some(o) => {
                let (int, frac) = digits.split_at(o as usize);
                write!(f, "{}.{}", int, frac)
            }
            None => {
                let (first, rest) = digits.split_at(1);
                let exp: BigInt = &self.order - BigInt::from(1);
                let sign = if exp < BigInt::default() { "" } else { "+" };
                if rest.is_empty() {
                    write!(f, "{}e{}{}", first, sign, exp)
                } else {
                    write!(f, "{}.{}e{}{}", first, rest, sign, exp)
                }
            }
        }
    }
}
