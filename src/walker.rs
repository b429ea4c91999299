//! Recursive record traversal and annotation resolution.
//!
//! The walk is a synchronous depth-first pass over the record graph: nested
//! records are descended into before their parent field's own rules run,
//! siblings in declaration order, every failure collected, nothing
//! short-circuited. Each [`Validator::validate`] call owns its own
//! accumulator; nothing is shared across calls.
//!
//! Record graphs are expected to be acyclic. A cyclic graph is a caller
//! error and recurses without bound.

use crate::env::{EnvSource, SystemEnv};
use crate::field::FieldMut;
use crate::record::{Annotation, FieldVisitor, Record, annotation_value};
use crate::registry;
use crate::report::{Report, Violation};
use crate::rules::RuleCtx;
use tracing::{debug, trace};

/// Validation engine with a pluggable environment collaborator.
pub struct Validator<'e> {
    env: &'e dyn EnvSource,
}

impl Validator<'static> {
    /// Engine backed by the process environment.
    pub fn new() -> Self {
        Self { env: &SystemEnv }
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'e> Validator<'e> {
    /// Engine backed by a custom environment source.
    pub fn with_env(env: &'e dyn EnvSource) -> Self {
        Self { env }
    }

    /// Walk `record`, applying every applicable rule to every field.
    ///
    /// Fields may be mutated in place by the `env` and `default` rules, so
    /// the record must not be validated concurrently from another thread.
    pub fn validate<R: Record + ?Sized>(&self, record: &mut R) -> Result<(), Report> {
        let mut walk = Walk {
            env: self.env,
            path: String::new(),
            defaults: record.defaults(),
            violations: Vec::new(),
        };
        record.visit_fields(&mut walk);
        match Report::from_violations(walk.violations) {
            Some(report) => Err(report),
            None => Ok(()),
        }
    }
}

/// Validate `record` against the process environment.
pub fn validate<R: Record + ?Sized>(record: &mut R) -> Result<(), Report> {
    Validator::new().validate(record)
}

struct Walk<'a> {
    env: &'a dyn EnvSource,
    /// Dotted path prefix of the record being visited, empty at the root.
    path: String,
    /// Record-level default annotations of the record being visited.
    defaults: &'static [Annotation],
    violations: Vec<Violation>,
}

impl FieldVisitor for Walk<'_> {
    fn field(
        &mut self,
        name: &'static str,
        annotations: &'static [Annotation],
        mut field: FieldMut<'_>,
    ) {
        // Descend first: nested records are walked with their own defaults
        // and an extended path prefix, whether or not this field carries
        // annotations of its own.
        if let FieldMut::Nested(nested) = &mut field {
            let prefix_len = self.path.len();
            self.path.push_str(name);
            self.path.push('.');
            trace!(record = %self.path, "descending into nested record");
            let parent_defaults = std::mem::replace(&mut self.defaults, nested.defaults());
            nested.visit_fields(self);
            self.defaults = parent_defaults;
            self.path.truncate(prefix_len);
        }

        let ctx = RuleCtx { env: self.env };
        for rule in registry::rules() {
            // Explicit field annotation wins over the record-level default;
            // neither present means the rule simply does not apply.
            let arg = annotation_value(annotations, rule.name)
                .or_else(|| annotation_value(self.defaults, rule.name));
            let Some(arg) = arg else {
                continue;
            };
            if let Err(failure) = (rule.run)(&ctx, arg, &mut field) {
                let path = format!("{}{}", self.path, name);
                debug!(%path, rule = rule.name, kind = ?failure.kind, "validation failure");
                self.violations.push(Violation {
                    path,
                    kind: failure.kind,
                    message: failure.message,
                });
            }
        }
    }
}
