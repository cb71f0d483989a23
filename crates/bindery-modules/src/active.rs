//! Active object sets fed by list membership hooks.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use bindery_core::{ListHooks, ObjectHandle, ObjectId};

/// The set of objects a core container currently acts on.
///
/// Cloning shares the set. Installed as [`ListHooks`] on a list class, an
/// object is active while at least one list feeding the set holds it.
/// Entries count memberships, so removing an object from one of two lists
/// keeps it active.
#[derive(Debug, Clone, Default)]
pub struct ActiveObjects {
    entries: Rc<RefCell<Vec<(ObjectId, usize)>>>,
}

impl ActiveObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, object: &ObjectHandle) -> bool {
        self.memberships(object) > 0
    }

    /// Number of feeding lists currently holding `object`.
    pub fn memberships(&self, object: &ObjectHandle) -> usize {
        self.entries
            .borrow()
            .iter()
            .find(|(id, _)| *id == object.id())
            .map_or(0, |(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Active identities in activation order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.entries.borrow().iter().map(|(id, _)| *id).collect()
    }
}

impl ListHooks for ActiveObjects {
    fn on_add(&mut self, object: &ObjectHandle) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(id, _)| *id == object.id()) {
            Some((_, count)) => *count += 1,
            None => {
                trace!("activate {} {}", object.class_name(), object.id());
                entries.push((object.id(), 1));
            }
        }
    }

    fn on_remove(&mut self, object: &ObjectHandle) {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|(id, _)| *id == object.id()) else {
            return;
        };
        entries[index].1 -= 1;
        if entries[index].1 == 0 {
            trace!("deactivate {} {}", object.class_name(), object.id());
            entries.remove(index);
        }
    }
}
