//! Identity-keyed object lists.
//!
//! An [`ObjectList`] holds handles of one class family in insertion order.
//! Membership is by identity: the same object cannot appear twice, and
//! removal needs the exact handle. A list is itself the core state of a
//! registered class, so its verbs are dispatched through
//! [`ObjectHandle::call`] like any other method (see [`ObjectList::methods`]).

use std::fmt;

use log::debug;

use crate::args::CallArgs;
use crate::entries::{Family, MethodEntry};
use crate::error::ListError;
use crate::object::ObjectHandle;

/// Observer of list membership, used by the core container that owns a list.
pub trait ListHooks {
    fn on_add(&mut self, _object: &ObjectHandle) {}

    fn on_remove(&mut self, _object: &ObjectHandle) {}
}

/// Ordered collection of handles belonging to one class family.
pub struct ObjectList {
    family: Family,
    default_member: Option<String>,
    elements: Vec<ObjectHandle>,
    hooks: Option<Box<dyn ListHooks>>,
    exclusive: bool,
}

impl ObjectList {
    /// Create an empty list accepting `family` and its subclasses.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: Family::new(family),
            default_member: None,
            elements: Vec::new(),
            hooks: None,
            exclusive: false,
        }
    }

    /// Class constructed when members are added from keyword arguments.
    pub fn with_default_member(mut self, qualified_name: impl Into<String>) -> Self {
        self.default_member = Some(qualified_name.into());
        self
    }

    pub fn with_hooks(mut self, hooks: impl ListHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// Refuse objects that already belong to some other list.
    pub fn with_exclusive_membership(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn set_exclusive_membership(&mut self, exclusive: bool) {
        self.exclusive = exclusive;
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    pub fn default_member(&self) -> Option<&str> {
        self.default_member.as_deref()
    }

    /// Append an object of the list's family.
    pub fn add(&mut self, object: ObjectHandle) -> Result<ObjectHandle, ListError> {
        if !object.is_a(self.family.hash) {
            return Err(ListError::IncompatibleClass {
                expected: self.family.short_name().to_string(),
                actual: object.class_name().to_string(),
            });
        }
        if self.contains(&object) {
            return Err(ListError::Duplicate {
                class: object.class_name().to_string(),
            });
        }
        if self.exclusive && object.list_memberships() > 0 {
            return Err(ListError::AlreadyMember {
                class: object.class_name().to_string(),
            });
        }

        object.enter_list();
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_add(&object);
        }
        debug!(
            "{} list: added {} {}",
            self.family.short_name(),
            object.class_name(),
            object.id()
        );
        self.elements.push(object.clone());
        Ok(object)
    }

    /// Remove the entry with the same identity. Order of the rest is kept.
    pub fn remove(&mut self, object: &ObjectHandle) -> Result<ObjectHandle, ListError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.same_identity(object))
            .ok_or_else(|| ListError::NotFound {
                class: object.class_name().to_string(),
            })?;

        let removed = self.elements.remove(index);
        removed.leave_list();
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_remove(&removed);
        }
        debug!(
            "{} list: removed {} {}",
            self.family.short_name(),
            removed.class_name(),
            removed.id()
        );
        Ok(removed)
    }

    /// Remove every element. No-op on an empty list.
    pub fn clear(&mut self) {
        for object in self.elements.drain(..) {
            object.leave_list();
            if let Some(hooks) = self.hooks.as_mut() {
                hooks.on_remove(&object);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, object: &ObjectHandle) -> bool {
        self.elements.iter().any(|e| e.same_identity(object))
    }

    pub fn get(&self, index: usize) -> Option<&ObjectHandle> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.elements.iter()
    }

    /// The elements in insertion order.
    pub fn elements(&self) -> &[ObjectHandle] {
        &self.elements
    }

    /// Script-visible list verbs: `add`, `remove`, `clear`, `size` and
    /// `get_elements`.
    pub fn methods() -> Vec<MethodEntry> {
        vec![
            MethodEntry::new("add", &["object"], |list: &mut ObjectList, args: &CallArgs| {
                let object = args.get::<ObjectHandle>("object")?;
                Ok(list.add(object)?)
            }),
            MethodEntry::new(
                "remove",
                &["object"],
                |list: &mut ObjectList, args: &CallArgs| {
                    let object = args.get::<ObjectHandle>("object")?;
                    list.remove(&object)?;
                    Ok(())
                },
            ),
            MethodEntry::new("clear", &[], |list: &mut ObjectList, _: &CallArgs| {
                list.clear();
                Ok(())
            }),
            MethodEntry::new("size", &[], |list: &mut ObjectList, _: &CallArgs| {
                Ok(list.len() as i64)
            }),
            MethodEntry::new("get_elements", &[], |list: &mut ObjectList, _: &CallArgs| {
                Ok(list.elements.clone())
            }),
        ]
    }
}

impl Drop for ObjectList {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for ObjectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectList")
            .field("family", &self.family.qualified_name)
            .field("default_member", &self.default_member)
            .field("elements", &self.elements)
            .field("hooks", &self.hooks.is_some())
            .field("exclusive", &self.exclusive)
            .finish()
    }
}
