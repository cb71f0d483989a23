//! Class entries.
//!
//! A [`ClassEntry`] is the per-class static description consumed by the
//! binding layer: its parameter registry, method table, lineage and the
//! factory producing fresh core state. Entries are immutable once the
//! registry that owns them has been built.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use log::debug;
use rustc_hash::FxHashMap;

use crate::class_hash::ClassHash;
use crate::error::{BindError, BindResult, ConversionError};
use crate::object::ObjectHandle;
use crate::variant::Variant;

use super::parameter::short_name;
use super::{MethodEntry, ParameterDescriptor};

type Factory = Rc<dyn Fn() -> Box<dyn Any>>;

/// Registry entry for a class.
#[derive(Clone)]
pub struct ClassEntry {
    name: String,
    qualified_name: String,
    class_hash: ClassHash,
    /// This class followed by its ancestors, nearest first.
    lineage: Vec<ClassHash>,
    parameters: Vec<ParameterDescriptor>,
    parameter_index: FxHashMap<String, usize>,
    methods: FxHashMap<String, MethodEntry>,
    factory: Option<Factory>,
}

impl ClassEntry {
    /// Create an entry for a qualified class tag such as `Shapes::Wall`.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let class_hash = ClassHash::from_name(&qualified_name);
        Self {
            name: short_name(&qualified_name).to_string(),
            qualified_name,
            class_hash,
            lineage: vec![class_hash],
            parameters: Vec::new(),
            parameter_index: FxHashMap::default(),
            methods: FxHashMap::default(),
            factory: None,
        }
    }

    // === Builder Methods ===

    /// Derive from a base class given the base's own lineage.
    pub fn with_base_lineage(mut self, base_lineage: &[ClassHash]) -> Self {
        self.lineage.truncate(1);
        self.lineage.extend_from_slice(base_lineage);
        self
    }

    /// Add a parameter. A repeated name replaces the earlier descriptor.
    pub fn with_parameter(mut self, descriptor: ParameterDescriptor) -> Self {
        match self.parameter_index.get(descriptor.name()) {
            Some(&index) => self.parameters[index] = descriptor,
            None => {
                self.parameter_index
                    .insert(descriptor.name().to_string(), self.parameters.len());
                self.parameters.push(descriptor);
            }
        }
        self
    }

    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.insert(method.name().to_string(), method);
        self
    }

    /// Make the class constructible from a factory of fresh core state.
    pub fn with_factory<T: 'static>(mut self, factory: impl Fn() -> T + 'static) -> Self {
        self.factory = Some(Rc::new(move || Box::new(factory()) as Box<dyn Any>));
        self
    }

    /// Resolve every parameter default.
    ///
    /// Parameters without an explicit default take the value a freshly
    /// constructed instance reports. Returns the offending parameter name if
    /// a default does not convert to its setter type, or if a descriptor
    /// cannot read the factory's state.
    pub fn finalize(&mut self) -> Result<(), (String, ConversionError)> {
        let fresh = self.factory.as_ref().map(|factory| factory());
        for descriptor in &mut self.parameters {
            descriptor
                .resolve_default(fresh.as_deref())
                .map_err(|err| (descriptor.name().to_string(), err))?;
        }
        Ok(())
    }

    // === Queries ===

    /// Unqualified name exposed to scripts.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn class_hash(&self) -> ClassHash {
        self.class_hash
    }

    pub fn lineage(&self) -> &[ClassHash] {
        &self.lineage
    }

    /// Whether this class is `family` or derives from it.
    pub fn is_a(&self, family: ClassHash) -> bool {
        self.lineage.contains(&family)
    }

    /// Abstract classes have no factory.
    pub fn is_abstract(&self) -> bool {
        self.factory.is_none()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameter_index.get(name).map(|&i| &self.parameters[i])
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_index.contains_key(name)
    }

    /// Parameters in registration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodEntry> {
        self.methods.values()
    }

    // === Construction ===

    /// Construct a new instance from keyword parameters.
    ///
    /// Every keyword is validated before the factory runs, so a failed
    /// construction leaves nothing behind. Read-only parameters may be set here.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn instantiate(
        self: &Rc<Self>,
        params: impl IntoIterator<Item = (String, Variant)>,
    ) -> BindResult<ObjectHandle> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| BindError::NotConstructible {
                class: self.name.clone(),
            })?;

        let mut validated = Vec::new();
        for (name, value) in params {
            let descriptor = self
                .parameter(&name)
                .ok_or_else(|| BindError::unknown_parameter(&self.name, &name))?;
            descriptor.validate(None, &value)?;
            validated.push((descriptor, value));
        }

        let mut state = factory();
        for (descriptor, value) in &validated {
            descriptor.write(state.as_mut(), value)?;
        }

        let handle = ObjectHandle::new(Rc::clone(self), state);
        debug!(
            "constructed {} {} with {} parameter(s)",
            self.qualified_name,
            handle.id(),
            validated.len()
        );
        Ok(handle)
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEntry")
            .field("qualified_name", &self.qualified_name)
            .field("class_hash", &self.class_hash)
            .field("lineage", &self.lineage)
            .field("parameters", &self.parameters)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("abstract", &self.is_abstract())
            .finish()
    }
}
