//! Environment collaborator for the `env` sourcing rule.
//!
//! The engine never reads process state directly; everything it knows about
//! the environment comes through [`EnvSource`]. Production code uses
//! [`SystemEnv`]; tests substitute a `HashMap` so env-dependent behavior
//! stays deterministic without mutating process globals.

use std::collections::HashMap;

/// Source of environment-variable values.
pub trait EnvSource {
    /// Look up a variable by name. `None` means the variable is unset.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, used as a deterministic stand-in in tests.
impl EnvSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
