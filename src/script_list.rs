//! Script-facing wrapper around an object list.
//!
//! The list itself lives in the core as an [`ObjectList`]; this wrapper adds
//! the calling convention scripts use. `add` takes either one ready-made
//! object, or keyword arguments from which the list's default member class
//! is constructed.

use bindery_core::{BindError, BindResult, CallArgs, ListError, ObjectList};

use crate::proxy::ScriptObject;
use crate::value::{Kwargs, Value};

/// An object list as seen from a script.
#[derive(Debug, Clone)]
pub struct ScriptObjectList {
    object: ScriptObject,
}

struct ListInfo {
    family: String,
    default_member: Option<String>,
}

impl ScriptObjectList {
    /// Wrap an object whose core state is an [`ObjectList`].
    pub fn new(object: ScriptObject) -> BindResult<Self> {
        if object.handle().with_state(|_: &ObjectList| ()).is_none() {
            return Err(ListError::Malformed {
                reason: format!("Object '{}' is not an object list", object.class_name()),
            }
            .into());
        }
        Ok(Self { object })
    }

    /// The proxy of the list object itself.
    pub fn object(&self) -> &ScriptObject {
        &self.object
    }

    fn info(&self) -> ListInfo {
        self.object
            .handle()
            .with_state(|list: &ObjectList| ListInfo {
                family: list.family().short_name().to_string(),
                default_member: list.default_member().map(str::to_string),
            })
            .unwrap_or(ListInfo {
                family: String::new(),
                default_member: None,
            })
    }

    /// Add one object, or construct the default member from `kwargs` and add
    /// that. Returns the added object.
    pub fn add(&self, args: &[Value], kwargs: Kwargs) -> BindResult<ScriptObject> {
        let info = self.info();
        let context = self.object.context();

        let object = match (args, &info.default_member) {
            ([Value::Object(object)], _) if kwargs.is_empty() => object.clone(),
            ([], Some(default_member)) => context.create(default_member, kwargs)?,
            _ => return Err(malformed(&info)),
        };

        self.object
            .handle()
            .call("add", CallArgs::new().with("object", object.handle().clone()))?;
        Ok(object)
    }

    /// Remove an object by identity.
    pub fn remove(&self, object: &ScriptObject) -> BindResult<()> {
        self.object
            .handle()
            .call("remove", CallArgs::new().with("object", object.handle().clone()))?;
        Ok(())
    }

    pub fn clear(&self) -> BindResult<()> {
        self.object.handle().call("clear", CallArgs::new())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.object
            .handle()
            .with_state(|list: &ObjectList| list.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, object: &ScriptObject) -> bool {
        self.object
            .handle()
            .with_state(|list: &ObjectList| list.contains(object.handle()))
            .unwrap_or(false)
    }

    /// The members in insertion order, as proxies.
    pub fn elements(&self) -> Vec<ScriptObject> {
        let handles = self
            .object
            .handle()
            .with_state(|list: &ObjectList| list.elements().to_vec())
            .unwrap_or_default();
        let context = self.object.context();
        handles.into_iter().map(|handle| context.wrap(handle)).collect()
    }
}

fn malformed(info: &ListInfo) -> BindError {
    let reason = match &info.default_member {
        Some(default_member) => format!(
            "Either a {} object or key-value pairs for the parameters of a {} object need to be passed.",
            info.family,
            default_member.rsplit("::").next().unwrap_or(default_member)
        ),
        None => format!("A {} object needs to be passed.", info.family),
    };
    ListError::Malformed { reason }.into()
}
