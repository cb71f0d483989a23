//! Parameter descriptors.
//!
//! A [`ParameterDescriptor`] whitelists one named attribute of a class: what
//! Variant kinds it accepts, whether it is read-only after construction, its
//! default, and the type-erased accessors into core state.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::rc::Rc;

use crate::class_hash::ClassHash;
use crate::convert::{FromVariant, IntoVariant};
use crate::error::ConversionError;
use crate::kinds::KindSet;
use crate::object::ObjectId;
use crate::variant::Variant;

type Getter = Rc<dyn Fn(&dyn Any) -> Result<Variant, ConversionError>>;
type Setter = Rc<dyn Fn(&mut dyn Any, &Variant) -> Result<(), ConversionError>>;
type Checker = Rc<dyn Fn(&Variant) -> Result<(), ConversionError>>;

/// The class family an object-valued parameter accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    /// Hash of the family's base class.
    pub hash: ClassHash,
    /// Qualified tag of the family's base class.
    pub qualified_name: String,
}

impl Family {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        Self {
            hash: ClassHash::from_name(&qualified_name),
            qualified_name,
        }
    }

    /// Unqualified class name (`Shape` for `Shapes::Shape`).
    pub fn short_name(&self) -> &str {
        short_name(&self.qualified_name)
    }
}

fn wrong_state<T: 'static>() -> ConversionError {
    ConversionError::WrongState {
        expected: type_name::<T>(),
    }
}

/// Last `::` segment of a qualified tag.
pub(crate) fn short_name(qualified: &str) -> &str {
    qualified.rsplit("::").next().unwrap_or(qualified)
}

/// Registry description of one named parameter.
#[derive(Clone)]
pub struct ParameterDescriptor {
    name: String,
    accepts: KindSet,
    expected: String,
    family: Option<Family>,
    read_only: bool,
    default: Option<Variant>,
    state_type: TypeId,
    state_name: &'static str,
    getter: Getter,
    setter: Setter,
    checker: Checker,
}

impl ParameterDescriptor {
    /// Describe a parameter backed by core state of type `T`.
    ///
    /// Accepted kinds come from the setter type `S`. The default, read back
    /// through the getter, is written through the setter on reset, so it must
    /// convert to `S`: an object parameter that starts out empty needs an
    /// `Option<ObjectHandle>` setter. `None` is still refused on assignment
    /// unless [`nullable`](Self::nullable) is called.
    pub fn new<T, G, S>(
        name: impl Into<String>,
        getter: impl Fn(&T) -> G + 'static,
        setter: impl Fn(&mut T, S) + 'static,
    ) -> Self
    where
        T: 'static,
        G: IntoVariant,
        S: FromVariant,
    {
        let getter: Getter = Rc::new(move |state: &dyn Any| {
            state
                .downcast_ref::<T>()
                .map(|s| getter(s).into_variant())
                .ok_or_else(wrong_state::<T>)
        });
        let setter: Setter = Rc::new(move |state: &mut dyn Any, value: &Variant| {
            let s = state.downcast_mut::<T>().ok_or_else(wrong_state::<T>)?;
            setter(s, S::from_variant(value)?);
            Ok(())
        });
        let checker: Checker = Rc::new(|value: &Variant| S::from_variant(value).map(|_| ()));

        Self {
            name: name.into(),
            accepts: S::accepted_kinds() - KindSet::NONE,
            expected: S::type_label(),
            family: None,
            read_only: false,
            default: None,
            state_type: TypeId::of::<T>(),
            state_name: type_name::<T>(),
            getter,
            setter,
            checker,
        }
    }

    // === Builder Methods ===

    /// Reject writes after construction.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Accept `Variant::None`.
    pub fn nullable(mut self) -> Self {
        self.accepts |= KindSet::NONE;
        self
    }

    /// Use an explicit default instead of the freshly constructed state's value.
    pub fn with_default(mut self, value: impl IntoVariant) -> Self {
        self.default = Some(value.into_variant());
        self
    }

    /// Restrict object values to a class family.
    pub fn of_family(mut self, qualified_name: impl Into<String>) -> Self {
        let family = Family::new(qualified_name);
        self.expected = format!("ObjectHandle<{}>", family.short_name());
        self.family = Some(family);
        self
    }

    // === Queries ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts(&self) -> KindSet {
        self.accepts
    }

    /// Label of the expected type in mismatch messages.
    pub fn expected_label(&self) -> &str {
        &self.expected
    }

    pub fn family(&self) -> Option<&Family> {
        self.family.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_nullable(&self) -> bool {
        self.accepts.contains(KindSet::NONE)
    }

    /// Whether the accessors operate on core state of type `T`.
    pub fn is_for<T: 'static>(&self) -> bool {
        self.state_type == TypeId::of::<T>()
    }

    /// Name of the core state type the accessors operate on.
    pub fn state_type_name(&self) -> &'static str {
        self.state_name
    }

    /// The registered default, once resolved at class registration.
    pub fn default_value(&self) -> Option<&Variant> {
        self.default.as_ref()
    }

    // === Operations ===

    /// Check `value` against this descriptor without touching core state.
    ///
    /// `owner` is the object being configured; it may not be assigned to itself.
    pub fn validate(&self, owner: Option<ObjectId>, value: &Variant) -> Result<(), ConversionError> {
        let mismatch = || ConversionError::mismatch(value.type_label(), self.expected.clone());

        if !self.accepts.accepts(value.kind()) {
            return Err(mismatch());
        }
        if let Variant::Object(handle) = value {
            if owner == Some(handle.id()) {
                return Err(mismatch());
            }
            if let Some(family) = &self.family
                && !handle.is_a(family.hash)
            {
                return Err(mismatch());
            }
        }
        (self.checker)(value)
    }

    /// Read the current value from core state.
    ///
    /// Fails if `state` is not the type this descriptor was built for.
    pub fn read(&self, state: &dyn Any) -> Result<Variant, ConversionError> {
        (self.getter)(state)
    }

    /// Write a value into core state. Callers validate first.
    pub fn write(&self, state: &mut dyn Any, value: &Variant) -> Result<(), ConversionError> {
        (self.setter)(state, value)
    }

    /// Fill in the default from a freshly constructed state unless an
    /// explicit one was given.
    ///
    /// Whichever default results must convert to the setter type, since
    /// reset writes it back through the setter.
    pub(crate) fn resolve_default(&mut self, fresh: Option<&dyn Any>) -> Result<(), ConversionError> {
        let default = match (&self.default, fresh) {
            (Some(default), _) => default.clone(),
            (None, Some(state)) => self.read(state)?,
            (None, None) => return Ok(()),
        };
        (self.checker)(&default)?;
        self.default = Some(default);
        Ok(())
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("accepts", &self.accepts)
            .field("expected", &self.expected)
            .field("family", &self.family)
            .field("read_only", &self.read_only)
            .field("default", &self.default)
            .field("state", &self.state_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Bond {
        k: f64,
        label: String,
    }

    fn stiffness() -> ParameterDescriptor {
        ParameterDescriptor::new("k", |b: &Bond| b.k, |b: &mut Bond, k: f64| b.k = k)
    }

    #[test]
    fn kinds_come_from_setter_type() {
        let desc = stiffness();
        assert_eq!(desc.accepts(), KindSet::NUMBER);
        assert_eq!(desc.expected_label(), "double");
        assert!(!desc.is_nullable());
        assert!(!desc.is_read_only());
    }

    #[test]
    fn validate_rejects_wrong_kind() {
        let desc = stiffness();
        assert_eq!(desc.validate(None, &Variant::Float(1.0)), Ok(()));
        assert_eq!(
            desc.validate(None, &Variant::from("stiff")),
            Err(ConversionError::mismatch("string", "double"))
        );
        assert_eq!(
            desc.validate(None, &Variant::None),
            Err(ConversionError::mismatch("None", "double"))
        );
    }

    #[test]
    fn read_and_write_reach_core_state() {
        let desc = ParameterDescriptor::new(
            "label",
            |b: &Bond| b.label.clone(),
            |b: &mut Bond, label: String| b.label = label,
        );
        let mut state: Box<dyn Any> = Box::new(Bond::default());
        desc.write(state.as_mut(), &Variant::from("harmonic")).unwrap();
        assert_eq!(desc.read(state.as_ref()), Ok(Variant::from("harmonic")));
    }

    #[test]
    fn foreign_state_is_an_error() {
        struct Other;

        let desc = stiffness();
        assert!(desc.is_for::<Bond>());
        assert!(!desc.is_for::<Other>());

        let mut state: Box<dyn Any> = Box::new(Other);
        let expected = Err(ConversionError::WrongState {
            expected: desc.state_type_name(),
        });
        assert_eq!(desc.write(state.as_mut(), &Variant::Float(1.0)), expected);
        assert_eq!(desc.read(state.as_ref()).map(|_| ()), expected);

        let mut desc = stiffness();
        assert_eq!(desc.resolve_default(Some(&Other)), expected);
        assert_eq!(desc.default_value(), None);
    }

    #[test]
    fn default_resolves_from_fresh_state() {
        let mut desc = stiffness();
        let fresh = Bond {
            k: 3.0,
            ..Default::default()
        };
        desc.resolve_default(Some(&fresh)).unwrap();
        assert_eq!(desc.default_value(), Some(&Variant::Float(3.0)));
    }

    #[test]
    fn explicit_default_is_checked() {
        let mut desc = stiffness().with_default("soft");
        assert!(desc.resolve_default(None).is_err());

        let mut desc = stiffness().with_default(2.0);
        assert_eq!(desc.resolve_default(None), Ok(()));
        assert_eq!(desc.default_value(), Some(&Variant::Float(2.0)));

        let mut desc = stiffness().with_default(Variant::None);
        assert_eq!(
            desc.resolve_default(None),
            Err(ConversionError::mismatch("None", "double"))
        );
    }

    #[test]
    fn empty_default_needs_optional_setter() {
        #[derive(Default)]
        struct Link {
            target: Option<String>,
        }

        let mut strict = ParameterDescriptor::new(
            "target",
            |l: &Link| l.target.clone(),
            |l: &mut Link, t: String| l.target = Some(t),
        );
        assert!(strict.resolve_default(Some(&Link::default())).is_err());

        let mut optional = ParameterDescriptor::new(
            "target",
            |l: &Link| l.target.clone(),
            |l: &mut Link, t: Option<String>| l.target = t,
        );
        assert_eq!(optional.resolve_default(Some(&Link::default())), Ok(()));
        assert_eq!(optional.default_value(), Some(&Variant::None));
        assert!(!optional.is_nullable());
    }

    #[test]
    fn family_changes_expected_label() {
        let desc = stiffness().of_family("Shapes::Shape");
        assert_eq!(desc.expected_label(), "ObjectHandle<Shape>");
        assert_eq!(desc.family().map(Family::short_name), Some("Shape"));
    }
}
