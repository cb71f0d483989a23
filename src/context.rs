//! The binding context.
//!
//! A `Context` owns the frozen class registry, the proxy classes layered on
//! top of it and the conversion [`Options`]. It is the entry point for
//! constructing objects from keyword arguments.
//!
//! # Example
//!
//! ```
//! use bindery::{kwargs, Context, Value};
//!
//! let ctx = Context::with_default_modules().unwrap();
//! let wall = ctx.create("Wall", kwargs! { "normal" => [-1, 0, 0] }).unwrap();
//! let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
//! constraint.set_attr("shape", &wall).unwrap();
//! assert_eq!(constraint.get_attr("shape").unwrap(), Value::from(&wall));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use rustc_hash::FxHashMap;
use thiserror::Error;

use bindery_core::{
    BindError, BindResult, ConversionError, KeyKind, ObjectHandle, ObjectId, ObjectList, Variant,
};
use bindery_registry::{ClassRegistry, Module, RegistrationError};

use crate::convert::{from_variant, to_variant};
use crate::proxy::{ObjectInner, ProxyClass, ScriptObject};
use crate::script_list::ScriptObjectList;
use crate::value::{Kwargs, Value};

// ============================================================================
// Options
// ============================================================================

/// Behaviour switches for a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Whether an object held by one list may be added to another.
    /// Within one list, duplicates are always rejected. Applied to every
    /// list the context constructs, whichever way its `add` is reached.
    pub shared_list_membership: bool,
    /// Key kind given to an empty dictionary.
    pub empty_map_keys: KeyKind,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            shared_list_membership: true,
            empty_map_keys: KeyKind::Int,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors building a context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// A module failed to install.
    #[error("failed to install module: {0}")]
    Registration(#[from] RegistrationError),

    /// A proxy class wraps a class that is not registered.
    #[error("proxy class '{proxy}' wraps unknown class '{class}'")]
    UnknownCoreClass { proxy: String, class: String },

    /// A proxy class name is taken by another proxy or a registered class.
    #[error("duplicate proxy class: {0}")]
    DuplicateProxy(String),
}

// ============================================================================
// Context
// ============================================================================

struct ContextInner {
    registry: ClassRegistry,
    /// Custom proxy classes by script-visible name.
    proxies: FxHashMap<String, Rc<ProxyClass>>,
    /// Plain proxies, created on first use per core class.
    plain: RefCell<FxHashMap<String, Rc<ProxyClass>>>,
    /// Live proxies by object identity, so a handle read back from a
    /// parameter comes back as the same proxy.
    live: RefCell<FxHashMap<ObjectId, Weak<ObjectInner>>>,
    options: Options,
}

/// Shared binding context. Cloning is cheap and shares everything.
#[derive(Clone)]
pub struct Context(Rc<ContextInner>);

impl Context {
    /// Create a context with no classes.
    pub fn new() -> Self {
        Self::from_parts(ClassRegistry::new(), FxHashMap::default(), Options::default())
    }

    /// Create a context with every module from `bindery-modules` installed.
    ///
    /// # Errors
    ///
    /// Returns an error if any default module fails to install.
    pub fn with_default_modules() -> Result<Self, ContextError> {
        Self::builder().modules(bindery_modules::all()).build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    fn from_parts(
        registry: ClassRegistry,
        proxies: FxHashMap<String, Rc<ProxyClass>>,
        options: Options,
    ) -> Self {
        Context(Rc::new(ContextInner {
            registry,
            proxies,
            plain: RefCell::new(FxHashMap::default()),
            live: RefCell::new(FxHashMap::default()),
            options,
        }))
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.0.registry
    }

    pub fn options(&self) -> &Options {
        &self.0.options
    }

    pub fn proxy_class(&self, name: &str) -> Option<&ProxyClass> {
        self.0.proxies.get(name).map(|p| p.as_ref())
    }

    // === Construction ===

    /// Construct an object of a proxy or core class from keyword arguments.
    ///
    /// Every value is converted before any name is checked, then the whole
    /// set is validated before the object exists.
    pub fn create(&self, class: &str, kwargs: Kwargs) -> BindResult<ScriptObject> {
        let proxy = self.resolve_proxy(class)?;
        let params = self.convert_kwargs(&kwargs)?;
        let handle = self.0.registry.instantiate(proxy.core_class(), params)?;
        let exclusive = !self.0.options.shared_list_membership;
        handle.with_state_mut(|list: &mut ObjectList| list.set_exclusive_membership(exclusive));
        debug!("created {} ({})", proxy.name(), handle.id());
        Ok(self.register(handle, proxy))
    }

    /// Construct a list class and wrap it with its list verbs.
    pub fn list(&self, class: &str) -> BindResult<ScriptObjectList> {
        ScriptObjectList::new(self.create(class, Kwargs::new())?)
    }

    /// Wrap a handle, reusing its live proxy if there is one.
    pub fn wrap(&self, handle: ObjectHandle) -> ScriptObject {
        if let Some(inner) = self.0.live.borrow().get(&handle.id()).and_then(Weak::upgrade) {
            return ScriptObject(inner);
        }
        let proxy = self.plain_proxy(handle.class_name());
        self.register(handle, proxy)
    }

    fn register(&self, handle: ObjectHandle, proxy: Rc<ProxyClass>) -> ScriptObject {
        let id = handle.id();
        let object = ScriptObject::new(handle, proxy, self.clone());
        let mut live = self.0.live.borrow_mut();
        live.retain(|_, weak| weak.strong_count() > 0);
        live.insert(id, Rc::downgrade(&object.0));
        object
    }

    fn resolve_proxy(&self, class: &str) -> BindResult<Rc<ProxyClass>> {
        if let Some(proxy) = self.0.proxies.get(class) {
            return Ok(Rc::clone(proxy));
        }
        let entry = self
            .0
            .registry
            .get(class)
            .ok_or_else(|| BindError::UnknownClass {
                name: class.to_string(),
            })?;
        Ok(self.plain_proxy(entry.name()))
    }

    fn plain_proxy(&self, core_class: &str) -> Rc<ProxyClass> {
        Rc::clone(
            self.0
                .plain
                .borrow_mut()
                .entry(core_class.to_string())
                .or_insert_with(|| Rc::new(ProxyClass::plain(core_class))),
        )
    }

    // === Conversion ===

    pub fn to_variant(&self, value: &Value) -> Result<Variant, ConversionError> {
        to_variant(value, &self.0.options)
    }

    pub fn from_variant(&self, variant: Variant) -> Value {
        from_variant(variant, self)
    }

    pub(crate) fn convert_kwargs(&self, kwargs: &Kwargs) -> BindResult<Vec<(String, Variant)>> {
        kwargs
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.to_variant(value)?)))
            .collect()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects modules, proxy classes and options, then freezes them into a
/// [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
    modules: Vec<Module>,
    proxies: Vec<ProxyClass>,
    options: Options,
}

impl ContextBuilder {
    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn modules(mut self, modules: impl IntoIterator<Item = Module>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn proxy_class(mut self, proxy: ProxyClass) -> Self {
        self.proxies.push(proxy);
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Install every module and check every proxy class.
    ///
    /// # Errors
    ///
    /// Fails if a module does not install, or a proxy class wraps an unknown
    /// class or reuses a taken name.
    pub fn build(self) -> Result<Context, ContextError> {
        let mut registry = ClassRegistry::new();
        for module in self.modules {
            registry.install(module)?;
        }

        let mut proxies = FxHashMap::default();
        for proxy in self.proxies {
            if !registry.contains(proxy.core_class()) {
                return Err(ContextError::UnknownCoreClass {
                    proxy: proxy.name().to_string(),
                    class: proxy.core_class().to_string(),
                });
            }
            if registry.contains(proxy.name()) || proxies.contains_key(proxy.name()) {
                return Err(ContextError::DuplicateProxy(proxy.name().to_string()));
            }
            proxies.insert(proxy.name().to_string(), Rc::new(proxy));
        }

        debug!(
            "context ready: {} class(es), {} proxy class(es)",
            registry.len(),
            proxies.len()
        );
        Ok(Context::from_parts(registry, proxies, self.options))
    }
}
