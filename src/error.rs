//! Error types.
//!
//! The crate has two disjoint error channels:
//!
//! - [`Error`]: configuration mistakes found while a schema is being built
//!   (duplicate fields or tags, bad patterns, bad bounds). They are returned
//!   from `build()` and from fallible rule constructors, and never reach the
//!   diagnostics log.
//! - [`Failure`]: the user-facing reason a value was rejected. Failures are
//!   written into a [`Log`](crate::Log) and only formatted when the log's
//!   mask asks for them. They borrow their parameters from the rule that
//!   produced them.
//!
//! ## Examples
//!
//! ```rust
//! use formtree::{NumberFormat, RecordFormat, Error};
//!
//! let result = RecordFormat::builder()
//!     .required("age", NumberFormat::new())
//!     .optional("age", NumberFormat::new())
//!     .build();
//!
//! assert!(matches!(result, Err(Error::DuplicateField(ref name)) if name == "age"));
//! ```

use crate::Decimal;
use chrono::NaiveDate;
use thiserror::Error;

/// A schema construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A record declared the same field twice.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    /// A variant registered two sub-formats under tags that compare equal.
    #[error("tag `{0}` is registered more than once")]
    DuplicateTag(String),

    /// A text pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A numeric or date bound could not be used.
    #[error("invalid bound: {0}")]
    InvalidBound(String),
}

impl Error {
    /// Creates an invalid bound error.
    pub fn invalid_bound(msg: impl Into<String>) -> Self {
        Error::InvalidBound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a value was rejected. The `Display` output is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure<'a> {
    #[error("please provide a record")]
    NotRecord,

    #[error("please provide a list")]
    NotList,

    #[error("please provide a number")]
    NotNumber,

    #[error("please provide a shorter number")]
    NumberTooLong,

    #[error("please provide a boolean")]
    NotBoolean,

    #[error("please provide a text")]
    NotText,

    #[error("please provide a date")]
    NotDate,

    #[error("please provide required {} `{}`", field_kind(.name), .name)]
    MissingField { name: &'a str },

    /// The input had the wrong shape for a tagged union.
    #[error("please provide a valid value")]
    InvalidValue,

    /// A value that must come from a fixed set did not.
    #[error("please fill in a valid value")]
    InvalidChoice,

    #[error("please provide a number greater than or equal to {0}")]
    BelowMin(&'a Decimal),

    #[error("please provide a number less than or equal to {0}")]
    AboveMax(&'a Decimal),

    #[error("please provide a number between {0} and {1}")]
    OutOfRange(&'a Decimal, &'a Decimal),

    #[error("please provide a positive number")]
    NotPositive,

    #[error("please provide an integer")]
    NotInteger,

    #[error("please provide at least {0} characters")]
    TooShort(usize),

    #[error("please provide at most {0} characters")]
    TooLong(usize),

    #[error("please provide a value in the expected format")]
    PatternMismatch,

    #[error("please provide at least {0} items")]
    TooFewItems(usize),

    #[error("please provide at most {0} items")]
    TooManyItems(usize),

    #[error("please provide a date on or after {0}")]
    TooEarly(&'a NaiveDate),

    #[error("please provide a date on or before {0}")]
    TooLate(&'a NaiveDate),

    /// Message supplied with a user rule.
    #[error("{0}")]
    Custom(&'a str),
}

/// Field names that read as a non-negative integer address list positions.
pub(crate) fn is_index(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

fn field_kind(name: &str) -> &'static str {
    if is_index(name) {
        "index"
    } else {
        "field"
    }
}
