//! Unified error types for the binding layer.
//!
//! Every failure at the scripting/core boundary is reported through
//! [`BindError`]. Concern-specific errors convert into it with `?`:
//!
//! ```text
//! BindError (top-level wrapper)
//! ├── ConversionError - a value has no Variant mapping, or the wrong kind
//! ├── ListError       - malformed list membership requests
//! └── (inline)        - unknown parameter/attribute/method, read-only, ordering
//! ```
//!
//! Message wording is part of the external contract: callers match on
//! strings such as `Parameter 'k' is read-only`.

use thiserror::Error;

// ============================================================================
// Error Kinds
// ============================================================================

/// Coarse classification of every [`BindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value has no valid Variant mapping, or maps to the wrong kind.
    Conversion,
    /// A keyword, parameter or method name is absent from the registry.
    UnknownParameter,
    /// A read or delete on a name that is neither a parameter nor a local field.
    UnknownAttribute,
    /// A write or delete on an immutable parameter.
    ReadOnly,
    /// Malformed list `add` or `remove` of an absent object.
    ListContract,
    /// Relational comparison on an object handle.
    UnsupportedOperation,
    /// A required method argument was not supplied.
    MissingArgument,
    /// A class tag is not registered or cannot be instantiated.
    UnknownClass,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Conversion => "conversion error",
            ErrorKind::UnknownParameter => "unknown parameter",
            ErrorKind::UnknownAttribute => "unknown attribute",
            ErrorKind::ReadOnly => "read-only",
            ErrorKind::ListContract => "list contract error",
            ErrorKind::UnsupportedOperation => "unsupported operation",
            ErrorKind::MissingArgument => "missing argument",
            ErrorKind::UnknownClass => "unknown class",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors converting a value into a Variant, or a Variant into a typed argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// No conversion rule exists for the source type.
    #[error("No conversion from type '{from}' to '{to}'")]
    NoConversion { from: String, to: String },

    /// The value converted, but to a kind the target does not accept.
    #[error("Provided argument of type '{actual}' is not convertible to '{expected}'")]
    KindMismatch { actual: String, expected: String },

    /// An integer does not fit the target integer type.
    #[error("Provided argument of value '{value}' is not convertible to '{target}'")]
    IntegerOverflow { value: i64, target: &'static str },

    /// A sequence has the wrong number of elements for a fixed-size target.
    #[error("Provided sequence of length {actual} is not convertible to '{expected}'")]
    LengthMismatch { actual: usize, expected: String },

    /// Parameter accessors were handed core state of another type.
    #[error("Core state is not convertible to '{expected}'")]
    WrongState { expected: &'static str },

    /// An object was passed as an argument to its own method.
    #[error("Object '{class}' cannot be passed as an argument to itself")]
    SelfReference { class: String },
}

impl ConversionError {
    /// Shorthand for [`ConversionError::KindMismatch`].
    pub fn mismatch(actual: impl Into<String>, expected: impl Into<String>) -> Self {
        ConversionError::KindMismatch {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    /// Shorthand for [`ConversionError::NoConversion`].
    pub fn no_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        ConversionError::NoConversion {
            from: from.into(),
            to: to.into(),
        }
    }
}

// ============================================================================
// List Errors
// ============================================================================

/// Errors from object list membership operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListError {
    /// `add` was called with a bad mix of positional and keyword arguments.
    #[error("{reason}")]
    Malformed { reason: String },

    /// `remove` was called with an object the list does not hold.
    #[error("Object '{class}' not found in list")]
    NotFound { class: String },

    /// The object is already held by this list.
    #[error("Object '{class}' is already in the list")]
    Duplicate { class: String },

    /// The object's class is outside the list's family.
    #[error("List of '{expected}' cannot hold an object of type '{actual}'")]
    IncompatibleClass { expected: String, actual: String },

    /// The object is held by another list and shared membership is disabled.
    #[error("Object '{class}' already belongs to another list")]
    AlreadyMember { class: String },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any failure surfaced by the binding layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { class: String, name: String },

    #[error("Object '{class}' has no attribute '{name}'")]
    UnknownAttribute { class: String, name: String },

    #[error("Parameter '{name}' is read-only")]
    ReadOnly { class: String, name: String },

    #[error("Object '{class}' has no method '{name}'")]
    UnknownMethod { class: String, name: String },

    #[error("Missing argument '{name}' for method '{method}'")]
    MissingArgument { method: String, name: String },

    #[error("Unknown class '{name}'")]
    UnknownClass { name: String },

    #[error("Class '{class}' is abstract and cannot be constructed")]
    NotConstructible { class: String },

    #[error(transparent)]
    List(#[from] ListError),

    #[error("'{op}' not supported between instances of '{lhs}' and '{rhs}'")]
    UnsupportedOperation {
        op: &'static str,
        lhs: String,
        rhs: String,
    },
}

impl BindError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindError::Conversion(_) => ErrorKind::Conversion,
            BindError::UnknownParameter { .. } | BindError::UnknownMethod { .. } => {
                ErrorKind::UnknownParameter
            }
            BindError::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            BindError::ReadOnly { .. } => ErrorKind::ReadOnly,
            BindError::MissingArgument { .. } => ErrorKind::MissingArgument,
            BindError::UnknownClass { .. } | BindError::NotConstructible { .. } => {
                ErrorKind::UnknownClass
            }
            BindError::List(_) => ErrorKind::ListContract,
            BindError::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
        }
    }

    pub fn unknown_parameter(class: impl Into<String>, name: impl Into<String>) -> Self {
        BindError::UnknownParameter {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn unknown_attribute(class: impl Into<String>, name: impl Into<String>) -> Self {
        BindError::UnknownAttribute {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn read_only(class: impl Into<String>, name: impl Into<String>) -> Self {
        BindError::ReadOnly {
            class: class.into(),
            name: name.into(),
        }
    }
}

/// Result alias used across the binding layer.
pub type BindResult<T> = Result<T, BindError>;
