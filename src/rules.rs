//! Rule implementations.
//!
//! Each rule is a stateless function from (raw string argument, field
//! handle) to success or a [`RuleFailure`]; the walker attaches the field
//! path. The two value-sourcing rules (`env`, `default`) mutate the slot in
//! place; everything else only inspects it. Inspecting rules treat an
//! absent optional as vacuously satisfied — only `required` turns absence
//! into a failure.

use crate::env::EnvSource;
use crate::field::{FieldMut, Kind, SetError};
use crate::report::ViolationKind;
use regex::Regex;
use std::fmt::Display;

/// Context handed to every rule invocation.
pub struct RuleCtx<'a> {
    pub(crate) env: &'a dyn EnvSource,
}

/// A failed rule application, before the walker attaches the field path.
#[derive(Debug)]
pub(crate) struct RuleFailure {
    pub kind: ViolationKind,
    pub message: String,
}

impl RuleFailure {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn unsupported(rule: &str) -> Self {
        Self::new(
            ViolationKind::UnsupportedType,
            format!("invalid type for `{rule}` rule"),
        )
    }
}

pub(crate) type RuleFn = fn(&RuleCtx<'_>, &str, &mut FieldMut<'_>) -> Result<(), RuleFailure>;

/// `env KEY`: overwrite the slot from an environment variable.
///
/// An unset or empty variable is a no-op, so the field keeps whatever the
/// caller (or a later `default`) provides.
pub(crate) fn env(
    ctx: &RuleCtx<'_>,
    key: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    let slot = match field {
        FieldMut::Scalar(slot) => slot,
        FieldMut::Nested(_) | FieldMut::MissingNested => {
            return Err(RuleFailure::unsupported("env"));
        }
    };
    let Some(value) = ctx.env.lookup(key) else {
        return Ok(());
    };
    if value.is_empty() {
        return Ok(());
    }
    slot.set_parsed(&value).map_err(|err| match err {
        SetError::Parse { .. } => RuleFailure::new(
            ViolationKind::MalformedValue,
            format!("invalid `env` value {value}"),
        ),
        SetError::Unsupported => RuleFailure::unsupported("env"),
    })
}

/// `default LIT`: fill a still-zero/absent slot with a literal.
///
/// Values already set by the caller or by the `env` rule (which runs
/// first) are never clobbered; this also makes a second validation pass a
/// no-op on an already-defaulted record.
pub(crate) fn default_value(
    _ctx: &RuleCtx<'_>,
    literal: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    if literal.is_empty() {
        return Ok(());
    }
    let slot = match field {
        FieldMut::Scalar(slot) => slot,
        FieldMut::Nested(_) | FieldMut::MissingNested => {
            return Err(RuleFailure::unsupported("default"));
        }
    };
    if !slot.is_zero() {
        return Ok(());
    }
    slot.set_parsed(literal).map_err(|err| match err {
        SetError::Parse { .. } => RuleFailure::new(
            ViolationKind::MalformedValue,
            format!("invalid `default` value {literal}"),
        ),
        SetError::Unsupported => RuleFailure::unsupported("default"),
    })
}

/// `flags a,b,..`: presence flags. Currently only `required`; unknown
/// flags are ignored.
pub(crate) fn flags(
    _ctx: &RuleCtx<'_>,
    arg: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    for flag in arg.split(',').map(str::trim) {
        if flag == "required" {
            let satisfied = match field {
                FieldMut::Scalar(slot) => !slot.is_zero(),
                FieldMut::Nested(_) => true,
                FieldMut::MissingNested => false,
            };
            if !satisfied {
                return Err(RuleFailure::new(
                    ViolationKind::Required,
                    "required value not filled",
                ));
            }
        }
    }
    Ok(())
}

/// `min B`: numeric value or length must not fall below the bound.
pub(crate) fn min(
    _ctx: &RuleCtx<'_>,
    arg: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    bound("min", BoundCheck::Min, arg, field)
}

/// `max B`: numeric value or length must not exceed the bound.
pub(crate) fn max(
    _ctx: &RuleCtx<'_>,
    arg: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    bound("max", BoundCheck::Max, arg, field)
}

#[derive(Clone, Copy)]
enum BoundCheck {
    Min,
    Max,
}

fn bound(
    rule: &str,
    check: BoundCheck,
    arg: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    let slot = match field {
        FieldMut::Scalar(slot) => slot,
        FieldMut::MissingNested => return Ok(()),
        FieldMut::Nested(_) => return Err(RuleFailure::unsupported(rule)),
    };
    if !slot.is_present() {
        return Ok(());
    }

    // A bound that does not parse is a configuration bug and is reported,
    // never silently discarded.
    let bad_bound = || {
        RuleFailure::new(
            ViolationKind::InvalidArgument,
            format!("invalid `{rule}` bound {arg}"),
        )
    };

    match slot.kind() {
        Kind::Signed => {
            let limit: i64 = arg.parse().map_err(|_| bad_bound())?;
            compare(check, slot.as_signed().unwrap_or_default(), limit, arg, "value")
        }
        Kind::Unsigned => {
            let limit: u64 = arg.parse().map_err(|_| bad_bound())?;
            compare(check, slot.as_unsigned().unwrap_or_default(), limit, arg, "value")
        }
        Kind::Float => {
            let limit: f64 = arg.parse().map_err(|_| bad_bound())?;
            compare(check, slot.as_float().unwrap_or_default(), limit, arg, "value")
        }
        Kind::Str | Kind::Seq => {
            let limit: usize = arg.parse().map_err(|_| bad_bound())?;
            compare(check, slot.length().unwrap_or_default(), limit, arg, "length")
        }
        Kind::Bool => Err(RuleFailure::unsupported(rule)),
    }
}

fn compare<T: PartialOrd + Display>(
    check: BoundCheck,
    value: T,
    limit: T,
    arg: &str,
    noun: &str,
) -> Result<(), RuleFailure> {
    let (violated, kind, direction) = match check {
        BoundCheck::Min => (value < limit, ViolationKind::BelowMinimum, "minimum"),
        BoundCheck::Max => (value > limit, ViolationKind::AboveMaximum, "maximum"),
    };
    if violated {
        return Err(RuleFailure::new(
            kind,
            format!("invalid {noun}: {value}, {direction} value is {arg}"),
        ));
    }
    Ok(())
}

/// `regex P`: full-match the string value against the pattern.
///
/// Unanchored patterns are wrapped in `^..$` so `abc` means "exactly abc",
/// not "contains abc".
pub(crate) fn regex(
    _ctx: &RuleCtx<'_>,
    pattern: &str,
    field: &mut FieldMut<'_>,
) -> Result<(), RuleFailure> {
    let slot = match field {
        FieldMut::Scalar(slot) => slot,
        FieldMut::MissingNested => return Ok(()),
        FieldMut::Nested(_) => return Err(RuleFailure::unsupported("regex")),
    };
    if !slot.is_present() {
        return Ok(());
    }

    let anchored = if pattern.starts_with('^') || pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("^{pattern}$")
    };
    let re = Regex::new(&anchored).map_err(|_| {
        RuleFailure::new(
            ViolationKind::InvalidArgument,
            format!("invalid regex: {anchored}"),
        )
    })?;

    let Some(value) = slot.as_str() else {
        return Err(RuleFailure::unsupported("regex"));
    };
    if !re.is_match(value) {
        return Err(RuleFailure::new(
            ViolationKind::PatternMismatch,
            format!("invalid value: {value} does not match regex {anchored}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Scalar;
    use std::collections::HashMap;

    fn ctx_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(
        rule: RuleFn,
        env: &HashMap<String, String>,
        arg: &str,
        slot: &mut dyn Scalar,
    ) -> Result<(), RuleFailure> {
        let ctx = RuleCtx { env };
        rule(&ctx, arg, &mut FieldMut::Scalar(slot))
    }

    #[test]
    fn test_env_overwrites_from_variable() {
        let env_map = ctx_with(&[("APP_PORT", "9090")]);
        let mut port = 8080u16;
        run(env, &env_map, "APP_PORT", &mut port).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_env_unset_or_empty_is_noop() {
        let mut port = 8080u16;
        run(env, &ctx_with(&[]), "APP_PORT", &mut port).unwrap();
        assert_eq!(port, 8080);

        run(env, &ctx_with(&[("APP_PORT", "")]), "APP_PORT", &mut port).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_env_parse_failure_keeps_prior_value() {
        let env_map = ctx_with(&[("APP_PORT", "not-a-port")]);
        let mut port = 8080u16;
        let failure = run(env, &env_map, "APP_PORT", &mut port).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::MalformedValue);
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_env_fills_absent_optional() {
        let env_map = ctx_with(&[("APP_TIMEOUT", "30")]);
        let mut timeout: Option<u64> = None;
        run(env, &env_map, "APP_TIMEOUT", &mut timeout).unwrap();
        assert_eq!(timeout, Some(30));
    }

    #[test]
    fn test_default_fills_only_zero_slots() {
        let none = ctx_with(&[]);
        let mut host = String::new();
        run(default_value, &none, "localhost", &mut host).unwrap();
        assert_eq!(host, "localhost");

        let mut host = "db.internal".to_string();
        run(default_value, &none, "localhost", &mut host).unwrap();
        assert_eq!(host, "db.internal");
    }

    #[test]
    fn test_default_empty_literal_is_noop() {
        let none = ctx_with(&[]);
        let mut level = 0i32;
        run(default_value, &none, "", &mut level).unwrap();
        assert_eq!(level, 0);
    }

    #[test]
    fn test_default_parse_failure() {
        let none = ctx_with(&[]);
        let mut level = 0i32;
        let failure = run(default_value, &none, "three", &mut level).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::MalformedValue);
        assert_eq!(level, 0);
    }

    #[test]
    fn test_required_on_zero_and_absent() {
        let none = ctx_with(&[]);

        let mut count = 0u32;
        let failure = run(flags, &none, "required", &mut count).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::Required);

        let mut name = String::new();
        assert!(run(flags, &none, "required", &mut name).is_err());

        let mut absent: Option<bool> = None;
        assert!(run(flags, &none, "required", &mut absent).is_err());

        let mut present = 1u32;
        run(flags, &none, "required", &mut present).unwrap();

        let ctx = RuleCtx { env: &none };
        assert!(flags(&ctx, "required", &mut FieldMut::MissingNested).is_err());
    }

    #[test]
    fn test_unknown_flags_ignored() {
        let none = ctx_with(&[]);
        let mut count = 0u32;
        run(flags, &none, "sparkly, shiny", &mut count).unwrap();
        // Known flag still honored among unknown ones.
        assert!(run(flags, &none, "sparkly, required", &mut count).is_err());
    }

    #[test]
    fn test_min_at_and_below_bound() {
        let none = ctx_with(&[]);
        let mut level = 10i32;
        run(min, &none, "10", &mut level).unwrap();

        let mut level = 9i32;
        let failure = run(min, &none, "10", &mut level).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::BelowMinimum);
        assert!(failure.message.contains("minimum value is 10"));
    }

    #[test]
    fn test_max_at_and_above_bound() {
        let none = ctx_with(&[]);
        let mut level = 10u32;
        run(max, &none, "10", &mut level).unwrap();

        let mut level = 11u32;
        let failure = run(max, &none, "10", &mut level).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::AboveMaximum);
        assert!(failure.message.contains("maximum value is 10"));
    }

    #[test]
    fn test_bounds_use_length_for_strings_and_seqs() {
        let none = ctx_with(&[]);
        let mut name = "ab".to_string();
        let failure = run(min, &none, "3", &mut name).unwrap_err();
        assert!(failure.message.contains("invalid length: 2"));

        let mut hosts = vec!["a".to_string(), "b".to_string()];
        let failure = run(max, &none, "1", &mut hosts).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::AboveMaximum);
    }

    #[test]
    fn test_bounds_vacuous_on_absent_optional() {
        let none = ctx_with(&[]);
        let mut absent: Option<i64> = None;
        run(min, &none, "10", &mut absent).unwrap();
        run(max, &none, "10", &mut absent).unwrap();
        assert_eq!(absent, None);
    }

    #[test]
    fn test_malformed_bound_is_reported() {
        let none = ctx_with(&[]);
        let mut level = 5i32;
        let failure = run(min, &none, "lots", &mut level).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::InvalidArgument);
    }

    #[test]
    fn test_bound_on_bool_unsupported() {
        let none = ctx_with(&[]);
        let mut flag = true;
        let failure = run(min, &none, "1", &mut flag).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::UnsupportedType);
    }

    #[test]
    fn test_regex_auto_anchors() {
        let none = ctx_with(&[]);
        let mut code = "abc".to_string();
        run(regex, &none, "abc", &mut code).unwrap();

        let mut code = "xabcx".to_string();
        let failure = run(regex, &none, "abc", &mut code).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::PatternMismatch);
        assert!(failure.message.contains("^abc$"));
    }

    #[test]
    fn test_regex_respects_existing_anchor() {
        let none = ctx_with(&[]);
        // A trailing anchor disables auto-wrapping, so this is a suffix match.
        let mut code = "xabc".to_string();
        run(regex, &none, "abc$", &mut code).unwrap();
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let none = ctx_with(&[]);
        let mut code = "abc".to_string();
        let failure = run(regex, &none, "a(b", &mut code).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::InvalidArgument);
    }

    #[test]
    fn test_regex_vacuous_on_absent_non_string_unsupported() {
        let none = ctx_with(&[]);
        let mut absent: Option<String> = None;
        run(regex, &none, "abc", &mut absent).unwrap();

        let mut level = 3i32;
        let failure = run(regex, &none, "abc", &mut level).unwrap_err();
        assert_eq!(failure.kind, ViolationKind::UnsupportedType);
    }
}
