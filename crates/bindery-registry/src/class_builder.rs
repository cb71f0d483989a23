//! ClassBuilder for registering core classes with the binding layer.
//!
//! ClassBuilder provides a fluent API for describing one class: its base,
//! its whitelisted parameters, its methods and the factory producing fresh
//! core state.
//!
//! # Example
//!
//! ```
//! use bindery_registry::{ClassBuilder, ClassRegistry, Module};
//!
//! #[derive(Default)]
//! struct Wall {
//!     dist: f64,
//! }
//!
//! let module = Module::in_namespace("Shapes")
//!     .class(ClassBuilder::abstract_class("Shape"))
//!     .class(
//!         ClassBuilder::<Wall>::new("Wall")
//!             .base("Shape")
//!             .parameter("dist", |w: &Wall| w.dist, |w: &mut Wall, d: f64| w.dist = d),
//!     );
//!
//! let mut registry = ClassRegistry::new();
//! registry.install(module).unwrap();
//! assert!(registry.get("Wall").is_some());
//! ```

use std::any::type_name;
use std::marker::PhantomData;
use std::rc::Rc;

use bindery_core::{
    BindResult, CallArgs, ClassEntry, FromVariant, IntoVariant, ListHooks, MethodEntry,
    ObjectList, ParameterDescriptor,
};

use crate::RegistrationError;
use crate::module::{ClassDecl, qualify};

type Factory<T> = Rc<dyn Fn(&str) -> T>;

/// Builder for one registered class over core state `T`.
///
/// Classes without a factory are abstract: they exist as family tags for
/// subclasses and object-valued parameters, but cannot be constructed.
pub struct ClassBuilder<T = ()> {
    /// Class name, relative to the module namespace unless qualified
    name: String,
    /// Base class name, resolved the same way
    base: Option<String>,

    // === Type members ===

    parameters: Vec<ParameterDescriptor>,
    methods: Vec<MethodEntry>,
    /// Receives the module namespace so list factories can qualify names
    factory: Option<Factory<T>>,
    /// Family and default member of a list class, checked at install
    list_family: Option<String>,
    default_member: Option<String>,

    /// Problems found while building, reported at install
    errors: Vec<RegistrationError>,
    _marker: PhantomData<fn() -> T>,
}

impl ClassBuilder<()> {
    /// Start an abstract class.
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::empty(name.into())
    }
}

impl<T: Default + 'static> ClassBuilder<T> {
    /// Start a class constructed from `T::default()`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::empty(name.into()).factory(T::default)
    }
}

impl ClassBuilder<ObjectList> {
    /// Start an object list class holding members of `family`.
    ///
    /// The list verbs `add`, `remove`, `clear`, `size` and `get_elements` are
    /// registered as methods.
    pub fn object_list(name: impl Into<String>, family: impl Into<String>) -> Self {
        let family = family.into();
        let mut builder = Self::empty(name.into());
        builder.list_family = Some(family.clone());
        builder.factory = Some(Rc::new(move |ns: &str| ObjectList::new(qualify(ns, &family))));
        for method in ObjectList::methods() {
            builder = builder.method_entry(method);
        }
        builder
    }

    /// Class constructed when members are added from keyword arguments.
    ///
    /// Install fails unless `member` is a constructible class of the list's
    /// family.
    pub fn default_member(mut self, member: impl Into<String>) -> Self {
        let member = member.into();
        self.default_member = Some(member.clone());
        if let Some(inner) = self.factory.take() {
            self.factory = Some(Rc::new(move |ns: &str| {
                inner(ns).with_default_member(qualify(ns, &member))
            }));
        }
        self
    }

    /// Attach membership hooks. `hooks` runs once per constructed list.
    pub fn hooks<H: ListHooks + 'static>(mut self, hooks: impl Fn() -> H + 'static) -> Self {
        if let Some(inner) = self.factory.take() {
            self.factory = Some(Rc::new(move |ns: &str| inner(ns).with_hooks(hooks())));
        }
        self
    }
}

impl<T: 'static> ClassBuilder<T> {
    fn empty(name: String) -> Self {
        Self {
            name,
            base: None,
            parameters: Vec::new(),
            methods: Vec::new(),
            factory: None,
            list_family: None,
            default_member: None,
            errors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Derive from a registered base class.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Replace the factory producing fresh core state.
    pub fn factory(mut self, factory: impl Fn() -> T + 'static) -> Self {
        self.factory = Some(Rc::new(move |_: &str| factory()));
        self
    }

    // === Parameters ===

    /// Register a read/write parameter.
    pub fn parameter<G, S>(
        self,
        name: &str,
        getter: impl Fn(&T) -> G + 'static,
        setter: impl Fn(&mut T, S) + 'static,
    ) -> Self
    where
        G: IntoVariant,
        S: FromVariant,
    {
        self.descriptor(ParameterDescriptor::new(name, getter, setter))
    }

    /// Register a parameter that can only be set at construction.
    pub fn read_only<G, S>(
        self,
        name: &str,
        getter: impl Fn(&T) -> G + 'static,
        setter: impl Fn(&mut T, S) + 'static,
    ) -> Self
    where
        G: IntoVariant,
        S: FromVariant,
    {
        self.descriptor(ParameterDescriptor::new(name, getter, setter).read_only())
    }

    /// Register a fully configured descriptor (family, default, nullable).
    ///
    /// The descriptor's accessors must operate on `T`.
    pub fn descriptor(mut self, descriptor: ParameterDescriptor) -> Self {
        if !descriptor.is_for::<T>() {
            self.errors.push(RegistrationError::StateMismatch {
                class: self.name.clone(),
                name: descriptor.name().to_string(),
                state: descriptor.state_type_name().to_string(),
                expected: type_name::<T>().to_string(),
            });
        } else if self.parameters.iter().any(|p| p.name() == descriptor.name()) {
            self.errors.push(RegistrationError::DuplicateParameter {
                class: self.name.clone(),
                name: descriptor.name().to_string(),
            });
        } else {
            self.parameters.push(descriptor);
        }
        self
    }

    // === Methods ===

    /// Register a method taking the declared keyword arguments.
    pub fn method<R: IntoVariant>(
        self,
        name: &str,
        params: &[&str],
        func: impl Fn(&mut T, &CallArgs) -> BindResult<R> + 'static,
    ) -> Self {
        self.method_entry(MethodEntry::new(name, params, func))
    }

    fn method_entry(mut self, method: MethodEntry) -> Self {
        if self.methods.iter().any(|m| m.name() == method.name()) {
            self.errors.push(RegistrationError::DuplicateMethod {
                class: self.name.clone(),
                name: method.name().to_string(),
            });
        } else {
            self.methods.push(method);
        }
        self
    }

    /// Resolve names against `namespace` and produce a declaration.
    pub(crate) fn into_decl(self, namespace: &str) -> ClassDecl {
        let qualified = qualify(namespace, &self.name);
        let mut entry = ClassEntry::new(qualified);
        for descriptor in self.parameters {
            entry = entry.with_parameter(descriptor);
        }
        for method in self.methods {
            entry = entry.with_method(method);
        }
        if let Some(factory) = self.factory {
            let namespace = namespace.to_string();
            entry = entry.with_factory(move || factory(&namespace));
        }
        let default_member = self
            .default_member
            .zip(self.list_family)
            .map(|(member, family)| (qualify(namespace, &member), qualify(namespace, &family)));
        ClassDecl {
            entry,
            base: self.base.map(|base| qualify(namespace, &base)),
            default_member,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::{KindSet, Variant};

    #[derive(Default)]
    struct Sphere {
        radius: f64,
        center: [f64; 3],
    }

    #[test]
    fn builder_collects_members() {
        let decl = ClassBuilder::<Sphere>::new("Sphere")
            .base("Shape")
            .parameter("radius", |s: &Sphere| s.radius, |s: &mut Sphere, r: f64| s.radius = r)
            .read_only("center", |s: &Sphere| s.center, |s: &mut Sphere, c: [f64; 3]| s.center = c)
            .method("volume", &[], |s: &mut Sphere, _: &CallArgs| {
                Ok(4.0 / 3.0 * std::f64::consts::PI * s.radius.powi(3))
            })
            .into_decl("Shapes");

        assert_eq!(decl.entry.qualified_name(), "Shapes::Sphere");
        assert_eq!(decl.base.as_deref(), Some("Shapes::Shape"));
        assert!(decl.errors.is_empty());
        assert!(!decl.entry.is_abstract());
        assert!(decl.entry.parameter("center").unwrap().is_read_only());
        assert_eq!(decl.entry.parameter("radius").unwrap().accepts(), KindSet::NUMBER);
        assert!(decl.entry.has_method("volume"));
    }

    #[test]
    fn qualified_base_is_kept() {
        let decl = ClassBuilder::abstract_class("Constraint")
            .base("Shapes::Shape")
            .into_decl("Constraints");
        assert_eq!(decl.base.as_deref(), Some("Shapes::Shape"));
        assert!(decl.entry.is_abstract());
    }

    #[test]
    fn duplicates_are_recorded() {
        let decl = ClassBuilder::<Sphere>::new("Sphere")
            .parameter("radius", |s: &Sphere| s.radius, |s: &mut Sphere, r: f64| s.radius = r)
            .parameter("radius", |s: &Sphere| s.radius, |s: &mut Sphere, r: f64| s.radius = r)
            .method("volume", &[], |_: &mut Sphere, _: &CallArgs| Ok(()))
            .method("volume", &[], |_: &mut Sphere, _: &CallArgs| Ok(()))
            .into_decl("Shapes");
        assert_eq!(
            decl.errors,
            vec![
                RegistrationError::DuplicateParameter {
                    class: "Sphere".into(),
                    name: "radius".into()
                },
                RegistrationError::DuplicateMethod {
                    class: "Sphere".into(),
                    name: "volume".into()
                },
            ]
        );
    }

    #[test]
    fn descriptor_over_other_state_is_recorded() {
        #[derive(Default)]
        struct Wall {
            dist: f64,
        }

        let decl = ClassBuilder::<Sphere>::new("Sphere")
            .descriptor(ParameterDescriptor::new(
                "dist",
                |w: &Wall| w.dist,
                |w: &mut Wall, d: f64| w.dist = d,
            ))
            .into_decl("Shapes");
        assert!(decl.entry.parameter("dist").is_none());
        assert!(matches!(
            &decl.errors[..],
            [RegistrationError::StateMismatch { class, name, state, expected }]
                if class == "Sphere"
                    && name == "dist"
                    && state.ends_with("Wall")
                    && expected.ends_with("Sphere")
        ));
    }

    #[test]
    fn object_list_registers_verbs_and_qualifies_family() {
        let decl = ClassBuilder::object_list("Shapes", "Shape")
            .default_member("Wall")
            .into_decl("Shapes");
        assert_eq!(
            decl.default_member,
            Some(("Shapes::Wall".to_string(), "Shapes::Shape".to_string()))
        );
        for verb in ["add", "remove", "clear", "size", "get_elements"] {
            assert!(decl.entry.has_method(verb), "missing {verb}");
        }

        let entry = Rc::new(decl.entry);
        let list = entry.instantiate(Vec::new()).unwrap();
        let family = list.with_state(|l: &ObjectList| {
            (
                l.family().qualified_name.clone(),
                l.default_member().map(str::to_string),
            )
        });
        assert_eq!(
            family,
            Some(("Shapes::Shape".to_string(), Some("Shapes::Wall".to_string())))
        );
        assert_eq!(list.call("size", CallArgs::new()), Ok(Variant::Int(0)));
    }
}
