//! Registration errors.

use bindery_core::ConversionError;
use thiserror::Error;

/// Errors raised while installing modules into a [`ClassRegistry`](crate::ClassRegistry).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A class with this qualified tag already exists.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    /// Two classes in different namespaces share a script-visible name.
    #[error("class name '{name}' is ambiguous between '{first}' and '{second}'")]
    AmbiguousName {
        name: String,
        first: String,
        second: String,
    },

    /// The declared base class is not registered.
    #[error("unknown base class '{base}' for '{class}'")]
    UnknownBase { class: String, base: String },

    #[error("duplicate parameter: '{name}' in class '{class}'")]
    DuplicateParameter { class: String, name: String },

    #[error("duplicate method: '{name}' in class '{class}'")]
    DuplicateMethod { class: String, name: String },

    /// A descriptor's accessors operate on another core state type.
    #[error("parameter '{name}' of class '{class}' operates on '{state}', not '{expected}'")]
    StateMismatch {
        class: String,
        name: String,
        state: String,
        expected: String,
    },

    /// A list's default member is unknown, abstract or outside its family.
    #[error("default member '{member}' of list '{list}' is not a constructible '{family}'")]
    InvalidDefaultMember {
        list: String,
        member: String,
        family: String,
    },

    /// A default, explicit or read from fresh state, does not convert to the
    /// parameter's setter type.
    #[error("invalid default for parameter '{name}' in class '{class}': {source}")]
    InvalidDefault {
        class: String,
        name: String,
        #[source]
        source: ConversionError,
    },
}
