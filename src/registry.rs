//! The fixed, ordered rule table.
//!
//! Table order is the evaluation order for the annotations on one field:
//! the two value-sourcing rules (`env`, `default`) come before every
//! constraint rule so constraints always see post-substitution values.
//! Extending the engine is appending a row here; the walker never changes.
//! Annotation names that do not appear in the table are silently ignored.

use crate::rules::{self, RuleFn};

/// A named rule binding in the registry.
pub struct RuleDef {
    /// Annotation name this rule consumes.
    pub name: &'static str,
    pub(crate) run: RuleFn,
}

const REGISTRY: &[RuleDef] = &[
    RuleDef {
        name: "env",
        run: rules::env,
    },
    RuleDef {
        name: "default",
        run: rules::default_value,
    },
    RuleDef {
        name: "flags",
        run: rules::flags,
    },
    RuleDef {
        name: "min",
        run: rules::min,
    },
    RuleDef {
        name: "max",
        run: rules::max,
    },
    RuleDef {
        name: "regex",
        run: rules::regex,
    },
];

/// All registered rules, in evaluation order.
pub fn rules() -> &'static [RuleDef] {
    REGISTRY
}

/// Look up a rule by annotation name. `None` means "not applicable",
/// never an error.
pub fn lookup(name: &str) -> Option<&'static RuleDef> {
    REGISTRY.iter().find(|rule| rule.name == name)
}
