//! Typed access to individual record fields.
//!
//! Rules never see concrete field types. Each field is exposed through
//! [`FieldMut`]: either a [`Scalar`] slot (any primitive, possibly wrapped
//! in `Option`) or a nested [`Record`](crate::Record) to recurse into.
//! Optionality is tracked as a first-class property of the slot, not a
//! separate type: an absent `Option` reports `is_present() == false` and is
//! filled in place by [`Scalar::set_parsed`].

use crate::record::Record;
use thiserror::Error;

/// The primitive shape of a scalar slot, after unwrapping optionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Signed integer of any width.
    Signed,
    /// Unsigned integer of any width.
    Unsigned,
    /// `f32` or `f64`.
    Float,
    /// `String`.
    Str,
    /// `bool`.
    Bool,
    /// Length-only sequence (`Vec<T>`).
    Seq,
}

/// Failure to write a raw string into a field slot.
#[derive(Debug, Error)]
pub enum SetError {
    /// The raw string does not parse into the slot's type.
    #[error("cannot parse '{value}' as {expected}")]
    Parse {
        value: String,
        expected: &'static str,
    },
    /// The slot's type cannot be assigned from a string at all.
    #[error("unsupported target type")]
    Unsupported,
}

impl SetError {
    fn parse(value: &str, expected: &'static str) -> Self {
        Self::Parse {
            value: value.to_string(),
            expected,
        }
    }
}

/// Mutable, dynamically-typed view of one scalar field slot.
pub trait Scalar {
    /// The slot's primitive shape.
    fn kind(&self) -> Kind;

    /// False only for an `Option` slot that is currently `None`.
    fn is_present(&self) -> bool;

    /// Absent, or equal to the type's zero value (0, 0.0, "", false, empty).
    fn is_zero(&self) -> bool;

    /// Numeric view for [`Kind::Signed`] slots.
    fn as_signed(&self) -> Option<i64>;

    /// Numeric view for [`Kind::Unsigned`] slots.
    fn as_unsigned(&self) -> Option<u64>;

    /// Numeric view for [`Kind::Float`] slots.
    fn as_float(&self) -> Option<f64>;

    /// String view for [`Kind::Str`] slots.
    fn as_str(&self) -> Option<&str>;

    /// Length for [`Kind::Str`] and [`Kind::Seq`] slots.
    fn length(&self) -> Option<usize>;

    /// Parse `raw` into the slot's own type and overwrite the slot,
    /// allocating a present value when the slot is an absent `Option`.
    /// On failure the slot keeps its prior value.
    fn set_parsed(&mut self, raw: &str) -> Result<(), SetError>;
}

/// Mutable handle to one field of a record, as handed to the walker.
pub enum FieldMut<'a> {
    /// A primitive-typed (possibly optional) field.
    Scalar(&'a mut dyn Scalar),
    /// A nested record that is present.
    Nested(&'a mut dyn Record),
    /// An optional nested record that is currently `None`.
    MissingNested,
}

impl<'a> FieldMut<'a> {
    /// Handle for an `Option<R>` nested record field.
    pub fn optional_nested<R: Record>(record: Option<&'a mut R>) -> Self {
        match record {
            Some(record) => FieldMut::Nested(record),
            None => FieldMut::MissingNested,
        }
    }
}

macro_rules! impl_scalar_signed {
    ($($t:ty),+) => {$(
        impl Scalar for $t {
            fn kind(&self) -> Kind {
                Kind::Signed
            }
            fn is_present(&self) -> bool {
                true
            }
            fn is_zero(&self) -> bool {
                *self == 0
            }
            fn as_signed(&self) -> Option<i64> {
                Some(*self as i64)
            }
            fn as_unsigned(&self) -> Option<u64> {
                None
            }
            fn as_float(&self) -> Option<f64> {
                None
            }
            fn as_str(&self) -> Option<&str> {
                None
            }
            fn length(&self) -> Option<usize> {
                None
            }
            fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
                *self = raw
                    .parse()
                    .map_err(|_| SetError::parse(raw, stringify!($t)))?;
                Ok(())
            }
        }
    )+};
}

macro_rules! impl_scalar_unsigned {
    ($($t:ty),+) => {$(
        impl Scalar for $t {
            fn kind(&self) -> Kind {
                Kind::Unsigned
            }
            fn is_present(&self) -> bool {
                true
            }
            fn is_zero(&self) -> bool {
                *self == 0
            }
            fn as_signed(&self) -> Option<i64> {
                None
            }
            fn as_unsigned(&self) -> Option<u64> {
                Some(*self as u64)
            }
            fn as_float(&self) -> Option<f64> {
                None
            }
            fn as_str(&self) -> Option<&str> {
                None
            }
            fn length(&self) -> Option<usize> {
                None
            }
            fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
                *self = raw
                    .parse()
                    .map_err(|_| SetError::parse(raw, stringify!($t)))?;
                Ok(())
            }
        }
    )+};
}

impl_scalar_signed!(i8, i16, i32, i64, isize);
impl_scalar_unsigned!(u8, u16, u32, u64, usize);

macro_rules! impl_scalar_float {
    ($($t:ty),+) => {$(
        impl Scalar for $t {
            fn kind(&self) -> Kind {
                Kind::Float
            }
            fn is_present(&self) -> bool {
                true
            }
            fn is_zero(&self) -> bool {
                *self == 0.0
            }
            fn as_signed(&self) -> Option<i64> {
                None
            }
            fn as_unsigned(&self) -> Option<u64> {
                None
            }
            fn as_float(&self) -> Option<f64> {
                Some(*self as f64)
            }
            fn as_str(&self) -> Option<&str> {
                None
            }
            fn length(&self) -> Option<usize> {
                None
            }
            fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
                *self = raw
                    .parse()
                    .map_err(|_| SetError::parse(raw, stringify!($t)))?;
                Ok(())
            }
        }
    )+};
}

impl_scalar_float!(f32, f64);

impl Scalar for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }
    fn is_present(&self) -> bool {
        true
    }
    fn is_zero(&self) -> bool {
        !*self
    }
    fn as_signed(&self) -> Option<i64> {
        None
    }
    fn as_unsigned(&self) -> Option<u64> {
        None
    }
    fn as_float(&self) -> Option<f64> {
        None
    }
    fn as_str(&self) -> Option<&str> {
        None
    }
    fn length(&self) -> Option<usize> {
        None
    }
    fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
        *self = parse_bool(raw).ok_or_else(|| SetError::parse(raw, "bool"))?;
        Ok(())
    }
}

/// Parse a boolean the way environment variables spell them.
///
/// Accepts 1/true/yes/on and 0/false/no/off, case-insensitive.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Scalar for String {
    fn kind(&self) -> Kind {
        Kind::Str
    }
    fn is_present(&self) -> bool {
        true
    }
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
    fn as_signed(&self) -> Option<i64> {
        None
    }
    fn as_unsigned(&self) -> Option<u64> {
        None
    }
    fn as_float(&self) -> Option<f64> {
        None
    }
    fn as_str(&self) -> Option<&str> {
        Some(self)
    }
    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
    fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
        raw.clone_into(self);
        Ok(())
    }
}

/// Sequences participate in length bounds and presence checks only;
/// they cannot be assigned from a string.
impl<T> Scalar for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Seq
    }
    fn is_present(&self) -> bool {
        true
    }
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
    fn as_signed(&self) -> Option<i64> {
        None
    }
    fn as_unsigned(&self) -> Option<u64> {
        None
    }
    fn as_float(&self) -> Option<f64> {
        None
    }
    fn as_str(&self) -> Option<&str> {
        None
    }
    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
    fn set_parsed(&mut self, _raw: &str) -> Result<(), SetError> {
        Err(SetError::Unsupported)
    }
}

impl<T: Scalar + Default> Scalar for Option<T> {
    fn kind(&self) -> Kind {
        match self {
            Some(value) => value.kind(),
            None => T::default().kind(),
        }
    }
    fn is_present(&self) -> bool {
        self.is_some()
    }
    fn is_zero(&self) -> bool {
        self.as_ref().is_none_or(Scalar::is_zero)
    }
    fn as_signed(&self) -> Option<i64> {
        self.as_ref().and_then(Scalar::as_signed)
    }
    fn as_unsigned(&self) -> Option<u64> {
        self.as_ref().and_then(Scalar::as_unsigned)
    }
    fn as_float(&self) -> Option<f64> {
        self.as_ref().and_then(Scalar::as_float)
    }
    fn as_str(&self) -> Option<&str> {
        self.as_ref().and_then(Scalar::as_str)
    }
    fn length(&self) -> Option<usize> {
        self.as_ref().and_then(Scalar::length)
    }
    fn set_parsed(&mut self, raw: &str) -> Result<(), SetError> {
        match self {
            Some(value) => value.set_parsed(raw),
            None => {
                let mut value = T::default();
                value.set_parsed(raw)?;
                *self = Some(value);
                Ok(())
            }
        }
    }
}
