//! ClassRegistry - the frozen class-tag to entry map.
//!
//! Classes are looked up by qualified tag (`Shapes::Wall`), by the short name
//! scripts use (`Wall`) or by [`ClassHash`]. Entries are shared as
//! `Rc<ClassEntry>` so every handle keeps its class alive.
//!
//! # Lifecycle
//!
//! The registry is populated by [`install`](ClassRegistry::install) before any
//! object is constructed. Each install is all-or-nothing: a module with one
//! bad class leaves the registry untouched.

use std::rc::Rc;

use log::debug;
use rustc_hash::FxHashMap;

use bindery_core::{BindError, BindResult, ClassEntry, ClassHash, ObjectHandle, Variant};

use crate::{Module, RegistrationError};

/// Registry of every installed class.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Entries by hash (primary storage).
    classes: FxHashMap<ClassHash, Rc<ClassEntry>>,
    /// Qualified tag -> hash.
    by_name: FxHashMap<String, ClassHash>,
    /// Short name -> hash.
    by_short_name: FxHashMap<String, ClassHash>,
    /// Installation order.
    order: Vec<ClassHash>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Installation
    // ==========================================================================

    /// Install every class of `module`.
    pub fn install(&mut self, module: Module) -> Result<(), RegistrationError> {
        let namespace = module.namespace().to_string();
        let mut staged: Vec<Rc<ClassEntry>> = Vec::new();
        let mut default_members = Vec::new();

        for decl in module.into_classes() {
            if let Some(err) = decl.errors.into_iter().next() {
                return Err(err);
            }

            let mut entry = decl.entry;
            let qualified = entry.qualified_name().to_string();
            let hash = entry.class_hash();
            if self.classes.contains_key(&hash) || staged.iter().any(|e| e.class_hash() == hash) {
                return Err(RegistrationError::DuplicateClass(qualified));
            }
            self.check_short_name(&entry, &staged)?;

            if let Some(base) = decl.base {
                let base_hash = ClassHash::from_name(&base);
                let lineage = self
                    .classes
                    .get(&base_hash)
                    .or_else(|| staged.iter().find(|e| e.class_hash() == base_hash))
                    .map(|e| e.lineage().to_vec())
                    .ok_or_else(|| RegistrationError::UnknownBase {
                        class: qualified.clone(),
                        base,
                    })?;
                entry = entry.with_base_lineage(&lineage);
            }

            entry
                .finalize()
                .map_err(|(name, source)| RegistrationError::InvalidDefault {
                    class: qualified.clone(),
                    name,
                    source,
                })?;
            if let Some((member, family)) = decl.default_member {
                default_members.push((qualified, member, family));
            }
            staged.push(Rc::new(entry));
        }

        for (list, member, family) in default_members {
            self.check_default_member(&staged, list, member, family)?;
        }

        debug!("installing {} class(es) from '{}'", staged.len(), namespace);
        for entry in staged {
            let hash = entry.class_hash();
            debug!(
                "registered {} ({} parameter(s), {} method(s){})",
                entry.qualified_name(),
                entry.parameters().len(),
                entry.methods().count(),
                if entry.is_abstract() { ", abstract" } else { "" }
            );
            self.by_name.insert(entry.qualified_name().to_string(), hash);
            self.by_short_name.insert(entry.name().to_string(), hash);
            self.order.push(hash);
            self.classes.insert(hash, entry);
        }
        Ok(())
    }

    /// A list's default member must be a constructible class of its family,
    /// installed earlier or anywhere in the same module.
    fn check_default_member(
        &self,
        staged: &[Rc<ClassEntry>],
        list: String,
        member: String,
        family: String,
    ) -> Result<(), RegistrationError> {
        let hash = ClassHash::from_name(&member);
        let valid = self
            .classes
            .get(&hash)
            .or_else(|| staged.iter().find(|e| e.class_hash() == hash))
            .is_some_and(|entry| {
                !entry.is_abstract() && entry.is_a(ClassHash::from_name(&family))
            });
        if valid {
            Ok(())
        } else {
            Err(RegistrationError::InvalidDefaultMember {
                list,
                member,
                family,
            })
        }
    }

    fn check_short_name(
        &self,
        entry: &ClassEntry,
        staged: &[Rc<ClassEntry>],
    ) -> Result<(), RegistrationError> {
        let clash = self
            .by_short_name
            .get(entry.name())
            .and_then(|hash| self.classes.get(hash))
            .or_else(|| staged.iter().find(|e| e.name() == entry.name()));
        match clash {
            Some(other) => Err(RegistrationError::AmbiguousName {
                name: entry.name().to_string(),
                first: other.qualified_name().to_string(),
                second: entry.qualified_name().to_string(),
            }),
            None => Ok(()),
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look up a class by qualified tag or short name.
    pub fn get(&self, name: &str) -> Option<&Rc<ClassEntry>> {
        self.by_name
            .get(name)
            .or_else(|| self.by_short_name.get(name))
            .and_then(|hash| self.classes.get(hash))
    }

    pub fn get_by_hash(&self, hash: ClassHash) -> Option<&Rc<ClassEntry>> {
        self.classes.get(&hash)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Entries in installation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<ClassEntry>> {
        self.order.iter().filter_map(|hash| self.classes.get(hash))
    }

    /// Classes deriving from `family` (including itself), in installation order.
    pub fn family(&self, family: ClassHash) -> impl Iterator<Item = &Rc<ClassEntry>> {
        self.iter().filter(move |entry| entry.is_a(family))
    }

    // ==========================================================================
    // Construction
    // ==========================================================================

    /// Construct an instance of the named class.
    pub fn instantiate(
        &self,
        name: &str,
        params: impl IntoIterator<Item = (String, Variant)>,
    ) -> BindResult<ObjectHandle> {
        let entry = self.get(name).ok_or_else(|| BindError::UnknownClass {
            name: name.to_string(),
        })?;
        entry.instantiate(params)
    }
}
