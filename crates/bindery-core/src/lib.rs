//! Core types for the bindery binding layer.
//!
//! This crate holds everything a core object model needs to be driven from a
//! dynamic caller:
//!
//! - [`Variant`]: the closed value type crossing the boundary
//! - [`FromVariant`]/[`IntoVariant`]: typed extraction and wrapping
//! - [`ClassEntry`], [`ParameterDescriptor`], [`MethodEntry`]: per-class
//!   parameter registry and method table
//! - [`ObjectHandle`]: identity-bearing handle with validated get/set/call
//! - [`ObjectList`]: identity-keyed, family-constrained list of handles
//! - [`BindError`]: the unified error taxonomy
//!
//! # Architecture
//!
//! ```text
//! caller value -> Variant -> ParameterDescriptor::validate -> core state
//!                                      ^
//!                       ClassEntry (frozen in a registry)
//! ```

mod args;
mod class_hash;
mod convert;
mod entries;
mod error;
mod kinds;
mod list;
mod object;
mod ops;
mod variant;

pub use args::CallArgs;
pub use class_hash::ClassHash;
pub use convert::{FromVariant, IntoVariant};
pub use entries::{ClassEntry, Family, MethodEntry, ParameterDescriptor};
pub use error::{BindError, BindResult, ConversionError, ErrorKind, ListError};
pub use kinds::{KeyKind, KindSet, VariantKind};
pub use list::{ListHooks, ObjectList};
pub use object::{ObjectHandle, ObjectId};
pub use ops::{Comparison, RelOp};
pub use variant::{MapKey, Variant, VariantMap};
