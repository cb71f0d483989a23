//! Script-facing object proxies.
//!
//! A [`ScriptObject`] wraps one [`ObjectHandle`] together with an open store
//! of proxy-local fields. Attribute access resolves in three tiers:
//!
//! 1. registered core parameters, through the handle
//! 2. computed [`Accessor`]s declared on the [`ProxyClass`]
//! 3. proxy-local fields
//!
//! A name in the class's parameter registry is never shadowed by the lower
//! tiers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;

use bindery_core::{
    BindError, BindResult, CallArgs, Comparison, ObjectHandle, RelOp, Variant,
};

use crate::context::Context;
use crate::convert::{from_variant, to_variant};
use crate::value::{Kwargs, Value};

type Getter = Rc<dyn Fn(&ScriptObject) -> BindResult<Value>>;
type Setter = Rc<dyn Fn(&ScriptObject, Value) -> BindResult<()>>;
type Deleter = Rc<dyn Fn(&ScriptObject) -> BindResult<()>>;

// ============================================================================
// Accessors
// ============================================================================

/// A computed attribute: a getter with optional setter and deleter.
#[derive(Clone)]
pub struct Accessor {
    get: Getter,
    set: Option<Setter>,
    delete: Option<Deleter>,
}

impl Accessor {
    /// A read-only computed attribute.
    pub fn new(get: impl Fn(&ScriptObject) -> BindResult<Value> + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: None,
            delete: None,
        }
    }

    pub fn setter(mut self, set: impl Fn(&ScriptObject, Value) -> BindResult<()> + 'static) -> Self {
        self.set = Some(Rc::new(set));
        self
    }

    pub fn deleter(mut self, delete: impl Fn(&ScriptObject) -> BindResult<()> + 'static) -> Self {
        self.delete = Some(Rc::new(delete));
        self
    }

    /// An attribute stored in the proxy-local field `slot`.
    ///
    /// Reads return the slot (`None` until set), writes store into it and
    /// deletes put `None` back. Pair with [`ProxyClass::slot`] so the field
    /// exists from construction.
    pub fn slot(slot: &str) -> Self {
        let (get_slot, set_slot, del_slot) = (slot.to_string(), slot.to_string(), slot.to_string());
        Accessor::new(move |object| Ok(object.local(&get_slot).unwrap_or_default()))
            .setter(move |object, value| {
                object.set_local(&set_slot, value);
                Ok(())
            })
            .deleter(move |object| {
                object.set_local(&del_slot, Value::None);
                Ok(())
            })
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("settable", &self.set.is_some())
            .field("deletable", &self.delete.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Proxy classes
// ============================================================================

/// Script-side class wrapping a registered core class.
///
/// Every registered core class gets a plain proxy class of the same name.
/// Custom proxy classes add computed accessors and initial local fields,
/// like a scripting subclass would.
#[derive(Debug, Clone)]
pub struct ProxyClass {
    name: String,
    core_class: String,
    accessors: FxHashMap<String, Accessor>,
    slots: Vec<(String, Value)>,
}

impl ProxyClass {
    /// A proxy class called `name` over the registered class `core_class`.
    pub fn new(name: impl Into<String>, core_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core_class: core_class.into(),
            accessors: FxHashMap::default(),
            slots: Vec::new(),
        }
    }

    /// The plain proxy for a core class.
    pub(crate) fn plain(core_class: &str) -> Self {
        Self::new(core_class, core_class)
    }

    /// Declare a computed attribute.
    pub fn accessor(mut self, name: impl Into<String>, accessor: Accessor) -> Self {
        self.accessors.insert(name.into(), accessor);
        self
    }

    /// Declare a local field initialised at construction.
    pub fn slot(mut self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
        self.slots.push((name.into(), initial.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn core_class(&self) -> &str {
        &self.core_class
    }

    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    pub(crate) fn initial_locals(&self) -> FxHashMap<String, Value> {
        self.slots.iter().cloned().collect()
    }
}

// ============================================================================
// Script objects
// ============================================================================

pub(crate) struct ObjectInner {
    handle: ObjectHandle,
    class: Rc<ProxyClass>,
    locals: RefCell<FxHashMap<String, Value>>,
    context: Context,
}

/// A core object as seen from the scripting side.
///
/// Clones share the same proxy, including its local fields.
#[derive(Clone)]
pub struct ScriptObject(pub(crate) Rc<ObjectInner>);

impl ScriptObject {
    pub(crate) fn new(handle: ObjectHandle, class: Rc<ProxyClass>, context: Context) -> Self {
        let locals = RefCell::new(class.initial_locals());
        ScriptObject(Rc::new(ObjectInner {
            handle,
            class,
            locals,
            context,
        }))
    }

    pub fn handle(&self) -> &ObjectHandle {
        &self.0.handle
    }

    /// Script-visible class name (the proxy class).
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    pub fn proxy_class(&self) -> &ProxyClass {
        &self.0.class
    }

    /// Name of the registered core class.
    pub fn core_class_name(&self) -> &str {
        self.0.handle.class_name()
    }

    pub fn context(&self) -> &Context {
        &self.0.context
    }

    fn is_parameter(&self, name: &str) -> bool {
        self.0.handle.class().has_parameter(name)
    }

    fn convert(&self, value: &Value) -> BindResult<Variant> {
        Ok(to_variant(value, self.0.context.options())?)
    }

    fn unknown_attribute(&self, name: &str) -> BindError {
        BindError::unknown_attribute(self.class_name(), name)
    }

    // === Attributes ===

    /// Read an attribute.
    pub fn get_attr(&self, name: &str) -> BindResult<Value> {
        if self.is_parameter(name) {
            let variant = self.0.handle.get(name)?;
            return Ok(from_variant(variant, &self.0.context));
        }
        if let Some(accessor) = self.0.class.accessors.get(name) {
            trace!("{}.{}: computed get", self.class_name(), name);
            return (accessor.get)(self);
        }
        self.local(name).ok_or_else(|| self.unknown_attribute(name))
    }

    /// Write an attribute.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> BindResult<()> {
        let value = value.into();
        if self.is_parameter(name) {
            let variant = self.convert(&value)?;
            return self.0.handle.set(name, variant);
        }
        if let Some(accessor) = self.0.class.accessors.get(name) {
            trace!("{}.{}: computed set", self.class_name(), name);
            let set = accessor
                .set
                .as_ref()
                .ok_or_else(|| BindError::read_only(self.class_name(), name))?;
            return set(self, value);
        }
        self.set_local(name, value);
        Ok(())
    }

    /// Delete an attribute. Parameters are reset to their default; local
    /// fields are removed.
    pub fn del_attr(&self, name: &str) -> BindResult<()> {
        if self.is_parameter(name) {
            return self.0.handle.reset(name);
        }
        if let Some(accessor) = self.0.class.accessors.get(name) {
            trace!("{}.{}: computed delete", self.class_name(), name);
            let delete = accessor
                .delete
                .as_ref()
                .ok_or_else(|| BindError::read_only(self.class_name(), name))?;
            return delete(self);
        }
        self.0
            .locals
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| self.unknown_attribute(name))
    }

    /// Whether `get_attr(name)` succeeds. Computed attributes are evaluated.
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_ok()
    }

    // === Local fields ===

    pub fn local(&self, name: &str) -> Option<Value> {
        self.0.locals.borrow().get(name).cloned()
    }

    pub fn set_local(&self, name: &str, value: Value) {
        self.0.locals.borrow_mut().insert(name.to_string(), value);
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.0.locals.borrow().contains_key(name)
    }

    /// Local field names, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.0.locals.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    // === Parameters and methods ===

    /// Every core parameter, in registration order.
    pub fn get_params(&self) -> BindResult<Vec<(String, Value)>> {
        Ok(self
            .0
            .handle
            .params()?
            .into_iter()
            .map(|(name, variant)| (name, from_variant(variant, &self.0.context)))
            .collect())
    }

    /// Set several core parameters; all are converted and validated first.
    pub fn set_params(&self, kwargs: Kwargs) -> BindResult<()> {
        let batch = kwargs
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.convert(value)?)))
            .collect::<BindResult<Vec<_>>>()?;
        self.0.handle.set_params(batch)
    }

    /// Call a core method with keyword arguments.
    pub fn call_method(&self, method: &str, kwargs: Kwargs) -> BindResult<Value> {
        let args = kwargs
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.convert(value)?)))
            .collect::<BindResult<CallArgs>>()?;
        let result = self.0.handle.call(method, args)?;
        Ok(from_variant(result, &self.0.context))
    }

    // === Comparison ===

    /// Identity equality; `false` for any non-object.
    pub fn equals(&self, other: &Value) -> bool {
        matches!(other, Value::Object(o) if o.handle().same_identity(self.handle()))
    }

    pub fn not_equals(&self, other: &Value) -> bool {
        !self.equals(other)
    }

    /// Three-way comparison. Always [`Comparison::Unsupported`].
    pub fn compare(&self, other: &Value) -> Comparison {
        match other {
            Value::Object(o) => self.0.handle.compare(&Variant::Object(o.handle().clone())),
            _ => self.0.handle.compare(&Variant::None),
        }
    }

    /// Evaluate a relational operator, failing when the operands are unordered.
    pub fn try_compare(&self, op: RelOp, other: &Value) -> BindResult<bool> {
        self.compare(other)
            .evaluate(op)
            .ok_or_else(|| BindError::UnsupportedOperation {
                op: op.as_str(),
                lhs: self.class_name().to_string(),
                rhs: other.type_name().to_string(),
            })
    }
}

impl PartialEq for ScriptObject {
    fn eq(&self, other: &Self) -> bool {
        self.handle().same_identity(other.handle())
    }
}

impl fmt::Debug for ScriptObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptObject")
            .field("class", &self.class_name())
            .field("handle", &self.0.handle)
            .field("locals", &self.local_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kwargs;
    use bindery_core::ErrorKind;

    fn context() -> Context {
        Context::builder()
            .modules(bindery_modules::all())
            .proxy_class(
                ProxyClass::new("SphereWithProperties", "Sphere")
                    .slot("_mass", Value::None)
                    .accessor("mass", Accessor::slot("_mass")),
            )
            .proxy_class(
                ProxyClass::new("LabelledWall", "Wall")
                    .accessor("label", Accessor::new(|_| Ok(Value::from("wall")))),
            )
            .proxy_class(ProxyClass::new("DenseSphere", "Sphere").accessor(
                "density",
                Accessor::new(|object| {
                    object.local("_density").ok_or_else(|| BindError::UnknownAttribute {
                        class: object.class_name().to_string(),
                        name: "density".to_string(),
                    })
                }),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn parameters_resolve_through_handle() {
        let ctx = context();
        let sphere = ctx.create("Sphere", kwargs! { "radius" => 2 }).unwrap();
        assert_eq!(sphere.get_attr("radius"), Ok(Value::Float(2.0)));
        sphere.set_attr("center", [1, 2, 3]).unwrap();
        assert_eq!(
            sphere.get_attr("center"),
            Ok(Value::from([1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn local_fields_never_shadow_parameters() {
        let ctx = context();
        let sphere = ctx.create("Sphere", kwargs! {}).unwrap();
        sphere.set_local("direction", Value::from("ignored"));
        assert_eq!(sphere.get_attr("direction"), Ok(Value::Float(1.0)));
    }

    #[test]
    fn computed_accessor_uses_its_slot() {
        let ctx = context();
        let obj = ctx.create("SphereWithProperties", kwargs! { "radius" => 1 }).unwrap();
        assert!(obj.has_attr("mass"));
        assert!(obj.has_attr("_mass"));
        assert!(obj.has_attr("radius"));
        assert!(!obj.has_attr("density"));

        obj.set_attr("mass", 5.0).unwrap();
        assert_eq!(obj.get_attr("_mass"), Ok(Value::Float(5.0)));
        obj.del_attr("mass").unwrap();
        assert_eq!(obj.get_attr("mass"), Ok(Value::None));
        assert!(obj.contains_local("_mass"));
    }

    #[test]
    fn failing_accessor_is_not_an_attribute() {
        let ctx = context();
        let sphere = ctx.create("DenseSphere", kwargs! {}).unwrap();
        assert_eq!(
            sphere.get_attr("density").unwrap_err().kind(),
            ErrorKind::UnknownAttribute
        );
        assert!(!sphere.has_attr("density"));

        sphere.set_local("_density", Value::Float(7.8));
        assert!(sphere.has_attr("density"));
        assert_eq!(sphere.get_attr("density"), Ok(Value::Float(7.8)));
    }

    #[test]
    fn accessor_without_setter_is_read_only() {
        let ctx = context();
        let wall = ctx.create("LabelledWall", kwargs! {}).unwrap();
        assert_eq!(wall.get_attr("label"), Ok(Value::from("wall")));
        assert_eq!(wall.set_attr("label", "x").unwrap_err().kind(), ErrorKind::ReadOnly);
        assert_eq!(wall.del_attr("label").unwrap_err().kind(), ErrorKind::ReadOnly);
    }

    #[test]
    fn comparisons() {
        let ctx = context();
        let a = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
        let b = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
        assert!(a.equals(&Value::from(&a)));
        assert!(a.not_equals(&Value::from(&b)));
        assert!(!a.equals(&Value::Int(5)));
        assert_eq!(a.compare(&Value::from(&a)), Comparison::Unsupported);

        let err = a.try_compare(RelOp::Gt, &Value::Int(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'>' not supported between instances of 'ShapeBasedConstraint' and 'int'"
        );
    }

    #[test]
    fn call_method_converts_and_wraps() {
        let ctx = context();
        let wall = ctx.create("Wall", kwargs! { "dist" => 1 }).unwrap();
        assert_eq!(
            wall.call_method("calc_distance", kwargs! { "position" => [3, 0, 0] }),
            Ok(Value::Float(2.0))
        );
        let err = wall
            .call_method("calc_distance", kwargs! { "position" => Value::Opaque("module".into()) })
            .unwrap_err();
        assert_eq!(err.to_string(), "No conversion from type 'module' to 'Variant'");
    }
}
