//! Method entries.
//!
//! Methods are dispatched by name with keyword arguments. Each entry declares
//! the keyword names it understands; anything else is rejected before the
//! method body runs.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::args::CallArgs;
use crate::convert::IntoVariant;
use crate::error::{BindError, BindResult};
use crate::variant::Variant;

type MethodFn = Rc<dyn Fn(&mut dyn Any, &CallArgs) -> BindResult<Variant>>;

/// A named method on a registered class.
#[derive(Clone)]
pub struct MethodEntry {
    name: String,
    params: Vec<String>,
    func: MethodFn,
}

impl MethodEntry {
    /// Create a method over core state of type `T`.
    pub fn new<T, R>(
        name: impl Into<String>,
        params: &[&str],
        func: impl Fn(&mut T, &CallArgs) -> BindResult<R> + 'static,
    ) -> Self
    where
        T: 'static,
        R: IntoVariant,
    {
        let name = name.into();
        let owner = name.clone();
        let func: MethodFn = Rc::new(move |state: &mut dyn Any, args: &CallArgs| {
            let state = state
                .downcast_mut::<T>()
                .ok_or_else(|| BindError::UnknownMethod {
                    class: std::any::type_name::<T>().to_string(),
                    name: owner.clone(),
                })?;
            func(state, args).map(IntoVariant::into_variant)
        });
        Self {
            name,
            params: params.iter().map(|p| p.to_string()).collect(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared keyword names.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn accepts_keyword(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }

    pub(crate) fn invoke(&self, state: &mut dyn Any, args: &CallArgs) -> BindResult<Variant> {
        (self.func)(state, args)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
