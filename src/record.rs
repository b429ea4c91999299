//! Record descriptors: declared fields, annotations, and traversal.
//!
//! Instead of runtime introspection, every validatable type carries an
//! explicit field descriptor list: [`Record::visit_fields`] hands the walker
//! each field's name, its static annotation set, and a [`FieldMut`] access
//! handle, in declaration order. Record-level defaults live on the type
//! itself ([`Record::defaults`]) rather than on a reserved field name.
//!
//! The [`record!`](crate::record!) macro generates these impls; writing one
//! by hand is equally supported.

use crate::field::FieldMut;

/// A single named string-valued annotation attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    /// Rule name this annotation is consumed by (e.g. `"min"`).
    pub name: &'static str,
    /// Raw string argument handed to the rule.
    pub value: &'static str,
}

impl Annotation {
    /// Create an annotation binding.
    pub const fn new(name: &'static str, value: &'static str) -> Self {
        Self { name, value }
    }
}

/// First annotation in `set` whose name matches, if any.
pub(crate) fn annotation_value(set: &[Annotation], name: &str) -> Option<&'static str> {
    set.iter().find(|a| a.name == name).map(|a| a.value)
}

/// A structured value with named, typed, annotated fields.
///
/// Implementations must visit fields in declaration order and must hand the
/// visitor every field, annotated or not, so nested records are always
/// recursed into.
pub trait Record {
    /// Record-level default annotations, applied to every field that does
    /// not declare the same rule name itself.
    fn defaults(&self) -> &'static [Annotation] {
        &[]
    }

    /// Visit every field in declaration order.
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor);
}

/// Receiver for one record's fields during a walk.
pub trait FieldVisitor {
    /// Called once per field, in declaration order.
    fn field(
        &mut self,
        name: &'static str,
        annotations: &'static [Annotation],
        field: FieldMut<'_>,
    );
}

/// Implement [`Record`] for a struct from a declarative field list.
///
/// Each field names its access kind: `scalar` for primitives and
/// `Option`-wrapped primitives, `nested` for an embedded record, `optional`
/// for an `Option`-wrapped embedded record. Annotations follow in braces;
/// a leading `defaults { .. }` block supplies record-level defaults.
///
/// ```
/// #[derive(Default)]
/// struct Server {
///     port: u16,
///     host: String,
/// }
///
/// fieldcheck::record!(Server {
///     defaults { flags = "required" }
///     port: scalar { default = "8080", max = "65535" },
///     host: scalar { default = "localhost" },
/// });
///
/// let mut server = Server::default();
/// fieldcheck::validate(&mut server).unwrap();
/// assert_eq!(server.port, 8080);
/// ```
#[macro_export]
macro_rules! record {
    (
        $ty:ty {
            $( $fname:ident : $fkind:ident $( { $( $aname:ident = $aval:literal ),* $(,)? } )? ),* $(,)?
        }
    ) => {
        $crate::record!($ty {
            defaults { }
            $( $fname : $fkind $( { $( $aname = $aval ),* } )? ),*
        });
    };
    (
        $ty:ty {
            defaults { $( $dname:ident = $dval:literal ),* $(,)? }
            $( $fname:ident : $fkind:ident $( { $( $aname:ident = $aval:literal ),* $(,)? } )? ),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn defaults(&self) -> &'static [$crate::Annotation] {
                const DEFAULTS: &[$crate::Annotation] =
                    &[ $( $crate::Annotation::new(stringify!($dname), $dval), )* ];
                DEFAULTS
            }

            fn visit_fields(&mut self, visitor: &mut dyn $crate::FieldVisitor) {
                $(
                    visitor.field(
                        stringify!($fname),
                        {
                            const ANNOTATIONS: &[$crate::Annotation] =
                                &[ $( $( $crate::Annotation::new(stringify!($aname), $aval), )* )? ];
                            ANNOTATIONS
                        },
                        $crate::record!(@slot self, $fname, $fkind),
                    );
                )*
            }
        }
    };
    (@slot $self_:ident, $fname:ident, scalar) => {
        $crate::FieldMut::Scalar(&mut $self_.$fname)
    };
    (@slot $self_:ident, $fname:ident, nested) => {
        $crate::FieldMut::Nested(&mut $self_.$fname)
    };
    (@slot $self_:ident, $fname:ident, optional) => {
        $crate::FieldMut::optional_nested($self_.$fname.as_mut())
    };
}
