//! Object identities and handles.
//!
//! An [`ObjectHandle`] is a shared, identity-bearing reference to one live core
//! object. Its state is only reachable through the class's parameter registry
//! (`get`/`set`/`reset`) and method table (`call`). Cloning a handle shares the
//! object; equality compares identity, never state.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

use crate::args::CallArgs;
use crate::class_hash::ClassHash;
use crate::entries::ClassEntry;
use crate::error::{BindError, BindResult, ConversionError};
use crate::ops::Comparison;
use crate::variant::Variant;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

struct ObjectCell {
    id: ObjectId,
    class: Rc<ClassEntry>,
    state: RefCell<Box<dyn Any>>,
    /// Number of object lists currently holding this object.
    memberships: Cell<usize>,
}

/// Shared handle to a core object.
#[derive(Clone)]
pub struct ObjectHandle(Rc<ObjectCell>);

impl ObjectHandle {
    pub(crate) fn new(class: Rc<ClassEntry>, state: Box<dyn Any>) -> Self {
        ObjectHandle(Rc::new(ObjectCell {
            id: ObjectId::next(),
            class,
            state: RefCell::new(state),
            memberships: Cell::new(0),
        }))
    }

    // === Identity ===

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    pub fn class(&self) -> &Rc<ClassEntry> {
        &self.0.class
    }

    /// Unqualified class name, as exposed to scripts.
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    pub fn qualified_name(&self) -> &str {
        self.0.class.qualified_name()
    }

    pub fn class_hash(&self) -> ClassHash {
        self.0.class.class_hash()
    }

    /// Whether this object's class is `family` or derives from it.
    pub fn is_a(&self, family: ClassHash) -> bool {
        self.0.class.is_a(family)
    }

    pub fn same_identity(&self, other: &ObjectHandle) -> bool {
        self.id() == other.id()
    }

    /// Ordering is never defined for handles, whatever the other operand.
    pub fn compare(&self, _other: &Variant) -> Comparison {
        Comparison::Unsupported
    }

    // === Parameters ===

    /// Read a registered parameter.
    pub fn get(&self, name: &str) -> BindResult<Variant> {
        let descriptor = self
            .0
            .class
            .parameter(name)
            .ok_or_else(|| BindError::unknown_attribute(self.class_name(), name))?;
        let value = descriptor.read(&**self.0.state.borrow())?;
        trace!("get {}.{} -> {}", self.class_name(), name, value.type_label());
        Ok(value)
    }

    /// Validate and write a registered parameter.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn set(&self, name: &str, value: Variant) -> BindResult<()> {
        let descriptor = self
            .0
            .class
            .parameter(name)
            .ok_or_else(|| BindError::unknown_parameter(self.class_name(), name))?;
        if descriptor.is_read_only() {
            return Err(BindError::read_only(self.class_name(), name));
        }
        descriptor.validate(Some(self.id()), &value)?;
        trace!("set {}.{} <- {}", self.class_name(), name, value.type_label());
        let mut state = self.0.state.borrow_mut();
        descriptor.write(&mut **state, &value)?;
        Ok(())
    }

    /// Restore a parameter to its registered default.
    ///
    /// The default is written without validation, so a parameter whose
    /// default is `None` can be reset even though assigning `None` is
    /// rejected. Registration guarantees the setter accepts it.
    pub fn reset(&self, name: &str) -> BindResult<()> {
        let descriptor = self
            .0
            .class
            .parameter(name)
            .ok_or_else(|| BindError::unknown_attribute(self.class_name(), name))?;
        if descriptor.is_read_only() {
            return Err(BindError::read_only(self.class_name(), name));
        }
        let default = descriptor.default_value().cloned().unwrap_or_default();
        trace!("reset {}.{}", self.class_name(), name);
        let mut state = self.0.state.borrow_mut();
        descriptor.write(&mut **state, &default)?;
        Ok(())
    }

    /// Snapshot of every parameter, in registration order.
    pub fn params(&self) -> BindResult<Vec<(String, Variant)>> {
        let state = self.0.state.borrow();
        self.0
            .class
            .parameters()
            .iter()
            .map(|d| Ok((d.name().to_string(), d.read(&**state)?)))
            .collect()
    }

    /// Set several parameters at once. Nothing is written unless every entry
    /// is valid.
    pub fn set_params(&self, batch: impl IntoIterator<Item = (String, Variant)>) -> BindResult<()> {
        let mut validated = Vec::new();
        for (name, value) in batch {
            let descriptor = self
                .0
                .class
                .parameter(&name)
                .ok_or_else(|| BindError::unknown_parameter(self.class_name(), &name))?;
            if descriptor.is_read_only() {
                return Err(BindError::read_only(self.class_name(), &name));
            }
            descriptor.validate(Some(self.id()), &value)?;
            validated.push((descriptor, value));
        }

        let mut state = self.0.state.borrow_mut();
        for (descriptor, value) in &validated {
            descriptor.write(&mut **state, value)?;
        }
        Ok(())
    }

    // === Methods ===

    /// Dispatch a method by name.
    pub fn call(&self, method: &str, mut args: CallArgs) -> BindResult<Variant> {
        let entry = self
            .0
            .class
            .method(method)
            .ok_or_else(|| BindError::UnknownMethod {
                class: self.class_name().to_string(),
                name: method.to_string(),
            })?;

        for (name, value) in args.iter() {
            if !entry.accepts_keyword(name) {
                return Err(BindError::unknown_parameter(self.class_name(), name));
            }
            if let Variant::Object(handle) = value
                && handle.same_identity(self)
            {
                return Err(ConversionError::SelfReference {
                    class: self.class_name().to_string(),
                }
                .into());
            }
        }

        args.set_method(method);
        trace!("call {}.{}({} arg(s))", self.class_name(), method, args.len());
        let mut state = self.0.state.borrow_mut();
        entry.invoke(&mut **state, &args)
    }

    // === Typed access ===

    /// Borrow the core state as `T`. `None` if the object holds another type.
    pub fn with_state<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.0.state.borrow();
        state.downcast_ref::<T>().map(f)
    }

    pub fn with_state_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.0.state.borrow_mut();
        state.downcast_mut::<T>().map(f)
    }

    // === List membership ===

    /// How many object lists currently hold this object.
    pub fn list_memberships(&self) -> usize {
        self.0.memberships.get()
    }

    pub(crate) fn enter_list(&self) {
        self.0.memberships.set(self.0.memberships.get() + 1);
    }

    pub(crate) fn leave_list(&self) {
        self.0.memberships.set(self.0.memberships.get().saturating_sub(1));
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for ObjectHandle {}

impl Hash for ObjectHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("id", &self.id())
            .field("class", &self.qualified_name())
            .finish()
    }
}
