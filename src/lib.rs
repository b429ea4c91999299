//! Annotation-driven validation and defaulting for configuration records.
//!
//! Records declare per-field annotations (env sourcing, defaults, bounds,
//! patterns, presence flags); [`validate`] walks the record graph once,
//! fills values from the environment and defaults, checks every constraint,
//! and returns either success or a [`Report`] of every failure found —
//! never just the first.
//!
//! Intended for configuration objects assembled once at startup and then
//! trusted.
//!
//! # Example
//!
//! ```
//! use fieldcheck::validate;
//!
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//!     host: String,
//! }
//!
//! fieldcheck::record!(Server {
//!     port: scalar { default = "8080", min = "1" },
//!     host: scalar { default = "localhost", regex = "[a-z.]+" },
//! });
//!
//! #[derive(Default)]
//! struct Config {
//!     server: Server,
//!     workers: u32,
//! }
//!
//! fieldcheck::record!(Config {
//!     server: nested,
//!     workers: scalar { default = "4", max = "256" },
//! });
//!
//! let mut config = Config::default();
//! validate(&mut config).unwrap();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.server.host, "localhost");
//! assert_eq!(config.workers, 4);
//! ```

#![forbid(unsafe_code)]

pub mod env;
pub mod field;
pub mod record;
pub mod registry;
pub mod report;
mod rules;
pub mod walker;

pub use env::{EnvSource, SystemEnv};
pub use field::{FieldMut, Kind, Scalar, SetError};
pub use record::{Annotation, FieldVisitor, Record};
pub use report::{Report, Violation, ViolationKind};
pub use walker::{Validator, validate};
