//! The diagnostics log shared through one extraction.
//!
//! Formats never return error values for bad input. They append entries to a
//! [`Log`] and return `None`. Composite formats decide their own outcome by
//! comparing [`Log::error_count`] before and after extracting their children.
//!
//! A log carries a severity [`Mask`]. Entries whose severity is outside the
//! mask are counted but never built, so neither the path nor the message is
//! rendered. [`Log::silent`] is the probe mode used for cheap pass/fail checks.
//!
//! ```rust
//! use formtree::{Log, Mask, Path};
//!
//! let mut log = Log::with_mask(Mask::ERROR);
//! log.add_warning(&Path::Root, "ignored");
//! log.add_error(&Path::Prefix("age"), "please provide a number");
//!
//! assert_eq!(log.error_count(), 1);
//! assert_eq!(log.entries().len(), 1);
//! assert_eq!(log.entries()[0].path, "age");
//! ```

use crate::Path;
use serde::Serialize;
use std::fmt;

bitflags::bitflags! {
    /// Which severities a log records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mask: u8 {
        const ERROR   = 1 << 0;
        const WARNING = 1 << 1;
        const NOTICE  = 1 << 2;
    }
}

/// How serious a diagnostic is. Only errors fail an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

impl Severity {
    const fn mask(self) -> Mask {
        match self {
            Severity::Error => Mask::ERROR,
            Severity::Warning => Mask::WARNING,
            Severity::Notice => Mask::NOTICE,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
        })
    }
}

/// A recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Rendered [`Path`]; empty for the root.
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{} at {}: {}", self.severity, self.path, self.message)
        }
    }
}

/// Append-only, path-addressed diagnostics sink.
///
/// A log is a per-call accumulator: create one per top-level extraction (or
/// pass one in to aggregate several), and do not share it between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    mask: Mask,
    entries: Vec<Entry>,
    errors: usize,
}

impl Log {
    /// A log recording every severity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mask(Mask::all())
    }

    /// A log recording only the severities in `mask`.
    #[must_use]
    pub fn with_mask(mask: Mask) -> Self {
        Log {
            mask,
            entries: Vec::new(),
            errors: 0,
        }
    }

    /// A log that records nothing but still counts errors.
    #[must_use]
    pub fn silent() -> Self {
        Self::with_mask(Mask::empty())
    }

    /// The severities this log records.
    #[must_use]
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns `true` if entries of `severity` would be recorded.
    #[inline]
    #[must_use]
    pub fn records(&self, severity: Severity) -> bool {
        self.mask.contains(severity.mask())
    }

    /// Appends a diagnostic. `message` is only formatted if recorded.
    pub fn add(&mut self, path: &Path<'_>, severity: Severity, message: impl fmt::Display) {
        if severity == Severity::Error {
            self.errors += 1;
        }
        if self.records(severity) {
            self.entries.push(Entry {
                path: path.to_string(),
                severity,
                message: message.to_string(),
            });
        }
    }

    pub fn add_error(&mut self, path: &Path<'_>, message: impl fmt::Display) {
        self.add(path, Severity::Error, message);
    }

    pub fn add_warning(&mut self, path: &Path<'_>, message: impl fmt::Display) {
        self.add(path, Severity::Warning, message);
    }

    pub fn add_notice(&mut self, path: &Path<'_>, message: impl fmt::Display) {
        self.add(path, Severity::Notice, message);
    }

    /// Number of errors added so far, recorded or not.
    #[inline]
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded entries, in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Recorded error entries.
    pub fn errors(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Error)
    }

    /// Recorded entries whose path is exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |e| e.path == path)
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a>(&'a Cell<usize>);

    impl fmt::Display for Counting<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.set(self.0.get() + 1);
            f.write_str("formatted")
        }
    }

    #[test]
    fn test_new_log_records_everything() {
        let mut log = Log::new();
        log.add_error(&Path::Root, "e");
        log.add_warning(&Path::Root, "w");
        log.add_notice(&Path::Root, "n");
        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.errors().count(), 1);
    }

    #[test]
    fn test_silent_log_counts_without_formatting() {
        let calls = Cell::new(0);
        let mut log = Log::silent();
        log.add_error(&Path::Prefix("a"), Counting(&calls));
        log.add_error(&Path::Prefix("b"), Counting(&calls));

        assert_eq!(log.error_count(), 2);
        assert!(log.has_errors());
        assert!(log.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut log = Log::new();
        log.add_warning(&Path::Root, "w");
        assert!(!log.has_errors());
        assert!(!log.is_empty());
    }

    #[test]
    fn test_entry_display() {
        let mut log = Log::new();
        log.add_error(&Path::Root, "please provide a record");
        log.add_error(&Path::Prefix("age"), "please provide a number");
        assert_eq!(
            log.to_string(),
            "error: please provide a record\nerror at age: please provide a number"
        );
        assert_eq!(log.at("age").count(), 1);
    }
}
