//! Conversion traits between Variants and typed core arguments.
//!
//! - [`FromVariant`]: extract a typed value from a [`Variant`], rejecting
//!   anything of the wrong kind
//! - [`IntoVariant`]: wrap a typed value back into a [`Variant`]
//!
//! ## Supported Types
//!
//! - Integers: `i32`, `i64`
//! - Floats: `f64` (accepts `Int` by widening; nothing ever narrows)
//! - `bool`, `String`
//! - `[f64; 3]` vectors, `Vec<T>` sequences
//! - `ObjectHandle`, `Option<T>` (accepts `None`)
//! - `Variant` itself (accepts everything)
//!
//! ## Example
//!
//! ```
//! use bindery_core::{FromVariant, IntoVariant, Variant};
//!
//! let v = Variant::Int(42);
//! let value: i64 = i64::from_variant(&v).unwrap();
//! assert_eq!(value.into_variant(), v);
//! assert!(bool::from_variant(&v).is_err());
//! ```

use crate::error::ConversionError;
use crate::kinds::KindSet;
use crate::object::ObjectHandle;
use crate::variant::Variant;

/// Extract a typed value from a Variant.
pub trait FromVariant: Sized {
    /// Kinds this type can be extracted from.
    fn accepted_kinds() -> KindSet;

    /// Core-side type label used in mismatch messages.
    fn type_label() -> String;

    /// Extract a value, or fail with a [`ConversionError`] naming both types.
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError>;
}

/// Convert a typed value into a Variant.
pub trait IntoVariant {
    fn into_variant(self) -> Variant;
}

fn mismatch<T: FromVariant>(variant: &Variant) -> ConversionError {
    ConversionError::mismatch(variant.type_label(), T::type_label())
}

// ============================================================================
// Scalars
// ============================================================================

impl FromVariant for bool {
    fn accepted_kinds() -> KindSet {
        KindSet::BOOL
    }

    fn type_label() -> String {
        "bool".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Bool(v) => Ok(*v),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromVariant for i64 {
    fn accepted_kinds() -> KindSet {
        KindSet::INT
    }

    fn type_label() -> String {
        "int".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Int(v) => Ok(*v),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromVariant for i32 {
    fn accepted_kinds() -> KindSet {
        KindSet::INT
    }

    fn type_label() -> String {
        "int".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Int(v) => i32::try_from(*v).map_err(|_| ConversionError::IntegerOverflow {
                value: *v,
                target: "i32",
            }),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromVariant for f64 {
    fn accepted_kinds() -> KindSet {
        KindSet::NUMBER
    }

    fn type_label() -> String {
        "double".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Float(v) => Ok(*v),
            Variant::Int(v) => Ok(*v as f64),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromVariant for String {
    fn accepted_kinds() -> KindSet {
        KindSet::STRING
    }

    fn type_label() -> String {
        "string".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::String(s) => Ok(s.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl IntoVariant for bool {
    fn into_variant(self) -> Variant {
        Variant::Bool(self)
    }
}

impl IntoVariant for i64 {
    fn into_variant(self) -> Variant {
        Variant::Int(self)
    }
}

impl IntoVariant for i32 {
    fn into_variant(self) -> Variant {
        Variant::Int(self as i64)
    }
}

impl IntoVariant for f64 {
    fn into_variant(self) -> Variant {
        Variant::Float(self)
    }
}

impl IntoVariant for String {
    fn into_variant(self) -> Variant {
        Variant::String(self)
    }
}

impl IntoVariant for &str {
    fn into_variant(self) -> Variant {
        Variant::String(self.to_string())
    }
}

impl IntoVariant for () {
    fn into_variant(self) -> Variant {
        Variant::None
    }
}

// ============================================================================
// Composites
// ============================================================================

impl FromVariant for [f64; 3] {
    fn accepted_kinds() -> KindSet {
        KindSet::SEQUENCE
    }

    fn type_label() -> String {
        "Vector3d".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        let items = variant
            .as_sequence()
            .ok_or_else(|| mismatch::<Self>(variant))?;
        if items.len() != 3 {
            return Err(ConversionError::LengthMismatch {
                actual: items.len(),
                expected: Self::type_label(),
            });
        }
        let mut out = [0.0; 3];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = f64::from_variant(item).map_err(|_| mismatch::<Self>(variant))?;
        }
        Ok(out)
    }
}

impl IntoVariant for [f64; 3] {
    fn into_variant(self) -> Variant {
        Variant::Sequence(self.iter().map(|v| Variant::Float(*v)).collect())
    }
}

impl<T: FromVariant> FromVariant for Vec<T> {
    fn accepted_kinds() -> KindSet {
        KindSet::SEQUENCE
    }

    fn type_label() -> String {
        format!("Sequence<{}>", T::type_label())
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        let items = variant
            .as_sequence()
            .ok_or_else(|| mismatch::<Self>(variant))?;
        items.iter().map(T::from_variant).collect()
    }
}

impl<T: IntoVariant> IntoVariant for Vec<T> {
    fn into_variant(self) -> Variant {
        Variant::Sequence(self.into_iter().map(IntoVariant::into_variant).collect())
    }
}

// ============================================================================
// Handles and optionals
// ============================================================================

impl FromVariant for ObjectHandle {
    fn accepted_kinds() -> KindSet {
        KindSet::OBJECT
    }

    fn type_label() -> String {
        "ObjectHandle".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Object(handle) => Ok(handle.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl IntoVariant for ObjectHandle {
    fn into_variant(self) -> Variant {
        Variant::Object(self)
    }
}

impl<T: FromVariant> FromVariant for Option<T> {
    fn accepted_kinds() -> KindSet {
        T::accepted_kinds() | KindSet::NONE
    }

    fn type_label() -> String {
        T::type_label()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::None => Ok(None),
            other => T::from_variant(other).map(Some),
        }
    }
}

impl<T: IntoVariant> IntoVariant for Option<T> {
    fn into_variant(self) -> Variant {
        match self {
            Some(v) => v.into_variant(),
            None => Variant::None,
        }
    }
}

impl FromVariant for Variant {
    fn accepted_kinds() -> KindSet {
        KindSet::all()
    }

    fn type_label() -> String {
        "Variant".to_string()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        Ok(variant.clone())
    }
}

impl IntoVariant for Variant {
    fn into_variant(self) -> Variant {
        self
    }
}
