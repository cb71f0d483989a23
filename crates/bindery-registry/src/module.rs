//! Modules: namespaced bundles of class declarations.

use bindery_core::ClassEntry;

use crate::{ClassBuilder, RegistrationError};

/// Qualify `name` with `namespace` unless it already carries one.
pub(crate) fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() || name.contains("::") {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    }
}

/// A class ready to be installed: its entry, unresolved base and any
/// problems found while it was built.
#[derive(Debug)]
pub struct ClassDecl {
    pub(crate) entry: ClassEntry,
    /// Qualified base tag.
    pub(crate) base: Option<String>,
    /// Qualified default member and family of a list class.
    pub(crate) default_member: Option<(String, String)>,
    pub(crate) errors: Vec<RegistrationError>,
}

impl ClassDecl {
    pub fn qualified_name(&self) -> &str {
        self.entry.qualified_name()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }
}

/// A namespace of classes, installed into a registry as one unit.
#[derive(Debug, Default)]
pub struct Module {
    namespace: String,
    classes: Vec<ClassDecl>,
}

impl Module {
    /// Create a module in the root namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a module whose classes live under `namespace`.
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            classes: Vec::new(),
        }
    }

    /// Add a class. Bases must be added (or already installed) first.
    pub fn class<T: 'static>(mut self, builder: ClassBuilder<T>) -> Self {
        self.classes.push(builder.into_decl(&self.namespace));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn classes(&self) -> &[ClassDecl] {
        &self.classes
    }

    pub(crate) fn into_classes(self) -> Vec<ClassDecl> {
        self.classes
    }
}
