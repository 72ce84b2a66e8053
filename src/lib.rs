//! # formtree
//!
//! Declarative validation and coercion of untyped, nested request data.
//!
//! Query strings, form bodies and JSON documents all decode into the same
//! kind of tree: strings, numbers, booleans, lists and keyed records, with no
//! guarantee about which is where. `formtree` lets you describe the shape you
//! expect as a tree of formats, then walks the input to produce either a
//! normalized value or a list of diagnostics addressed by path.
//!
//! ## Key Features
//!
//! - **Composable formats**: records, sequences and tagged unions over leaf
//!   formats for numbers, booleans, text and dates
//! - **Path-addressed diagnostics**: every failure names where it happened
//!   (`user.tags.2`), and all failures are reported, not just the first
//! - **Form-friendly defaults**: a missing checkbox is `false`, a missing
//!   group of inputs is empty
//! - **Lossless numbers**: numeric strings are canonicalized without going
//!   through `f64`, and compared exactly
//! - **Fast probes**: [`Extract::check`] answers pass/fail without building
//!   any message
//!
//! ## Quick Start
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{validate, value};
//!
//! let signup = RecordFormat::builder()
//!     .required("agree", BoolFormat::new())
//!     .required("age", NumberFormat::new().is_min(0).is_integer())
//!     .required("email", TextFormat::new().trimmed().matches("^[^@]+@[^@]+$").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let out = validate(&signup, &value!({ "age": "17.0", "email": " a@b.c " })).unwrap();
//! assert_eq!(out, value!({ "agree": false, "age": "17", "email": "a@b.c" }));
//!
//! let log = validate(&signup, &value!({ "age": "-1" })).unwrap_err();
//! assert_eq!(log.to_string(), "error at age: please provide a number greater than or equal to 0\n\
//!                              error: please provide required field `email`");
//! ```
//!
//! ### Tagged unions
//!
//! ```rust
//! use formtree::prelude::*;
//! use formtree::{validate, value};
//!
//! let circle = RecordFormat::builder()
//!     .required("radius", NumberFormat::new().is_positive())
//!     .build()
//!     .unwrap();
//! let square = RecordFormat::builder()
//!     .required("side", NumberFormat::new().is_positive())
//!     .build()
//!     .unwrap();
//! let shape = VariantFormat::tagged("type")
//!     .add("circle", circle)
//!     .add("square", square)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     validate(&shape, &value!({ "type": "square", "side": "2.50" })).unwrap(),
//!     value!({ "side": "2.5" })
//! );
//! ```
//!
//! ## Diagnostics
//!
//! Bad input never produces an `Err` from a format. Formats append entries to
//! a [`Log`] and return `None`; [`validate`] wraps that into a `Result`.
//! [`Error`] is reserved for schema construction mistakes, such as a field
//! declared twice or a pattern that does not compile.
//!
//! The crate emits `tracing` events at `trace` level for variant dispatch and
//! for records and sequences rejected because of child errors. It never
//! installs a subscriber.

pub mod boolean;
pub mod date;
pub mod decimal;
pub mod error;
pub mod format;
pub mod log;
pub mod macros;
pub mod map;
pub mod number;
pub mod path;
pub mod record;
pub mod rules;
pub mod sequence;
pub mod text;
pub mod value;
pub mod variant;

pub use boolean::BoolFormat;
pub use date::DateFormat;
pub use decimal::Decimal;
pub use error::{Error, Failure, Result};
pub use format::{Extract, Format};
pub use log::{Entry, Log, Mask, Severity};
pub use map::Map;
pub use number::NumberFormat;
pub use path::{Path, Segment};
pub use record::{RecordBuilder, RecordFormat};
pub use rules::{Rule, Rules, WithRules};
pub use sequence::SequenceFormat;
pub use text::TextFormat;
pub use value::{Number, Value};
pub use variant::{Tag, VariantBuilder, VariantFormat};

/// The traits and formats needed to declare and run a schema.
pub mod prelude {
    pub use crate::format::{Extract, Format};
    pub use crate::rules::WithRules;
    pub use crate::{
        BoolFormat, DateFormat, NumberFormat, RecordFormat, SequenceFormat, TextFormat,
        VariantFormat,
    };
}

/// Extracts `value` at the root with a fresh log.
///
/// # Examples
///
/// ```rust
/// use formtree::{validate, value, NumberFormat};
///
/// assert_eq!(validate(&NumberFormat::new(), &value!("0.50")).unwrap(), value!("0.5"));
///
/// let log = validate(&NumberFormat::new(), &value!("half")).unwrap_err();
/// assert_eq!(log.error_count(), 1);
/// ```
///
/// # Errors
///
/// Returns the log when the extraction recorded at least one error.
pub fn validate<F>(format: &F, value: &Value) -> std::result::Result<Value, Log>
where
    F: Extract + ?Sized,
{
    let mut log = Log::new();
    match format.extract(value, &mut log, &Path::Root) {
        Some(out) if !log.has_errors() => Ok(out),
        _ => Err(log),
    }
}
