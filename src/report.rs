//! Aggregated validation failures.
//!
//! A walk never stops at the first problem: every failure across the whole
//! record graph is collected into one [`Report`], in visit order, so a
//! single run surfaces everything that is wrong. A report is only ever
//! constructed non-empty; success is `Ok(())`, keeping the outcome a single
//! presence test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a validation failure, for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// `flags = "required"` on an absent or zero-valued field.
    Required,
    /// Numeric value or length below a `min` bound.
    BelowMinimum,
    /// Numeric value or length above a `max` bound.
    AboveMaximum,
    /// String value did not match a `regex` pattern.
    PatternMismatch,
    /// An `env` or `default` value that does not parse into the field's type.
    MalformedValue,
    /// A rule argument (bound or pattern) that does not parse.
    InvalidArgument,
    /// A rule applied to a field type it cannot handle.
    UnsupportedType,
}

/// One validation failure, located by its fully-qualified dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path from the root record, e.g. `server.port`.
    pub path: String,
    /// Failure category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every failure found in one validation walk, in visit order.
///
/// Duplicates are preserved; siblings appear in declaration order and
/// nested-record failures at their recursion point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    /// Wrap accumulated violations, or `None` when there are none.
    pub(crate) fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// All violations, in visit order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations. Always at least one.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false: a report is only constructed when at least one
    /// violation exists.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Exact-match check for a failure of the given kind anywhere in the
    /// report.
    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Report {}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
