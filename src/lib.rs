//! Reflective parameter binding between a dynamic scripting layer and typed
//! core objects.
//!
//! Core classes register named parameters with typed getters and setters
//! (see [`bindery_registry::ClassBuilder`]). Scripts hold [`ScriptObject`]
//! proxies and read, write and delete attributes by name; every value crosses
//! the boundary as a [`Variant`] and is checked against the parameter's
//! declared kind before the core object sees it.
//!
//! ```
//! use bindery::{kwargs, Context, Value};
//!
//! let ctx = Context::with_default_modules().unwrap();
//! let sphere = ctx.create("Sphere", kwargs! { "radius" => 2 }).unwrap();
//! assert_eq!(sphere.get_attr("radius").unwrap(), Value::Float(2.0));
//!
//! let err = sphere.set_attr("radius", 3.0).unwrap_err();
//! assert_eq!(err.to_string(), "Parameter 'radius' is read-only");
//! ```

mod context;
mod convert;
mod proxy;
mod script_list;
mod value;

pub use context::{Context, ContextBuilder, ContextError, Options};
pub use convert::{from_variant, to_variant};
pub use proxy::{Accessor, ProxyClass, ScriptObject};
pub use script_list::ScriptObjectList;
pub use value::{Kwargs, Value};

pub use bindery_core::{
    BindError, BindResult, CallArgs, ClassHash, Comparison, ConversionError, ErrorKind, KeyKind,
    ListError, ObjectHandle, ObjectId, RelOp, Variant, VariantKind,
};
pub use bindery_registry::{ClassBuilder, ClassRegistry, Module, RegistrationError};

/// Build [`Kwargs`] from `name => value` pairs.
///
/// ```
/// use bindery::{kwargs, Value};
///
/// let args = kwargs! { "dist" => 2.5, "normal" => [0, 0, 1] };
/// assert_eq!(args[0], ("dist".to_string(), Value::Float(2.5)));
/// ```
#[macro_export]
macro_rules! kwargs {
    () => {
        $crate::Kwargs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        vec![$(($name.to_string(), $crate::Value::from($value))),+]
    };
}
