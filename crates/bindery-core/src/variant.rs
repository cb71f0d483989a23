//! The closed value type that crosses the scripting/core boundary.
//!
//! A [`Variant`] carries exactly one of a fixed set of kinds. Scripting-side
//! values are classified into a Variant before they reach core logic, and
//! core results leave as Variants. Variants are built transiently at each
//! crossing and never persisted.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConversionError;
use crate::kinds::{KeyKind, VariantKind};
use crate::object::ObjectHandle;

/// A tagged value of one [`VariantKind`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// Absence of a value. Only accepted where a parameter explicitly allows it.
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered, possibly heterogeneous, sequence of Variants.
    Sequence(Vec<Variant>),
    /// Mapping with a single fixed key kind.
    Map(VariantMap),
    /// Reference to a core object.
    Object(ObjectHandle),
}

impl Variant {
    /// The kind tag of this value.
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::None => VariantKind::None,
            Variant::Bool(_) => VariantKind::Bool,
            Variant::Int(_) => VariantKind::Int,
            Variant::Float(_) => VariantKind::Float,
            Variant::String(_) => VariantKind::String,
            Variant::Sequence(_) => VariantKind::Sequence,
            Variant::Map(_) => VariantKind::Map,
            Variant::Object(_) => VariantKind::Object,
        }
    }

    /// Core-side type label used in mismatch messages.
    ///
    /// Handles report their class: `ObjectHandle<Wall>`.
    pub fn type_label(&self) -> String {
        match self {
            Variant::Map(map) => map.type_label(),
            Variant::Object(handle) => format!("ObjectHandle<{}>", handle.class_name()),
            other => other.kind().as_str().to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Variant::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Variant::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Variant::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Variant]> {
        match self {
            Variant::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&VariantMap> {
        match self {
            Variant::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Variant::Object(handle) => Some(handle),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Float(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(items: Vec<Variant>) -> Self {
        Variant::Sequence(items)
    }
}

impl From<VariantMap> for Variant {
    fn from(map: VariantMap) -> Self {
        Variant::Map(map)
    }
}

impl From<ObjectHandle> for Variant {
    fn from(handle: ObjectHandle) -> Self {
        Variant::Object(handle)
    }
}

// ============================================================================
// Maps
// ============================================================================

/// A key of a [`VariantMap`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Int(i64),
    String(String),
}

impl MapKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            MapKey::Int(_) => KeyKind::Int,
            MapKey::String(_) => KeyKind::String,
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(v) => write!(f, "{}", v),
            MapKey::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for MapKey {
    fn from(v: i64) -> Self {
        MapKey::Int(v)
    }
}

impl From<&str> for MapKey {
    fn from(v: &str) -> Self {
        MapKey::String(v.to_string())
    }
}

/// A mapping whose key kind is fixed when the map is created.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantMap {
    Int(BTreeMap<i64, Variant>),
    String(BTreeMap<String, Variant>),
}

impl VariantMap {
    /// Create an empty map keyed by `key_kind`.
    pub fn new(key_kind: KeyKind) -> Self {
        match key_kind {
            KeyKind::Int => VariantMap::Int(BTreeMap::new()),
            KeyKind::String => VariantMap::String(BTreeMap::new()),
        }
    }

    pub fn key_kind(&self) -> KeyKind {
        match self {
            VariantMap::Int(_) => KeyKind::Int,
            VariantMap::String(_) => KeyKind::String,
        }
    }

    /// `Map<int, Variant>` or `Map<string, Variant>`.
    pub fn type_label(&self) -> String {
        format!("Map<{}, Variant>", self.key_kind())
    }

    pub fn len(&self) -> usize {
        match self {
            VariantMap::Int(m) => m.len(),
            VariantMap::String(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an entry. Fails if the key kind differs from the map's.
    pub fn insert(
        &mut self,
        key: MapKey,
        value: Variant,
    ) -> Result<Option<Variant>, ConversionError> {
        match (self, key) {
            (VariantMap::Int(m), MapKey::Int(k)) => Ok(m.insert(k, value)),
            (VariantMap::String(m), MapKey::String(k)) => Ok(m.insert(k, value)),
            (map, key) => Err(ConversionError::mismatch(
                key.kind().as_str(),
                map.key_kind().as_str(),
            )),
        }
    }

    pub fn get(&self, key: &MapKey) -> Option<&Variant> {
        match (self, key) {
            (VariantMap::Int(m), MapKey::Int(k)) => m.get(k),
            (VariantMap::String(m), MapKey::String(k)) => m.get(k),
            _ => None,
        }
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (MapKey, &Variant)> + '_> {
        match self {
            VariantMap::Int(m) => Box::new(m.iter().map(|(k, v)| (MapKey::Int(*k), v))),
            VariantMap::String(m) => {
                Box::new(m.iter().map(|(k, v)| (MapKey::String(k.clone()), v)))
            }
        }
    }
}

impl Default for VariantMap {
    fn default() -> Self {
        Self::new(KeyKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_labels() {
        assert_eq!(Variant::None.kind(), VariantKind::None);
        assert_eq!(Variant::Int(5).type_label(), "int");
        assert_eq!(Variant::Float(1.0).type_label(), "double");
        assert_eq!(Variant::None.type_label(), "None");
        assert_eq!(
            Variant::Map(VariantMap::new(KeyKind::String)).type_label(),
            "Map<string, Variant>"
        );
    }

    #[test]
    fn accessors_do_not_coerce() {
        assert_eq!(Variant::Int(3).as_int(), Some(3));
        assert_eq!(Variant::Int(3).as_float(), None);
        assert_eq!(Variant::Float(3.0).as_int(), None);
        assert_eq!(Variant::from("x").as_str(), Some("x"));
        assert_eq!(Variant::Bool(true).as_str(), None);
    }

    #[test]
    fn map_rejects_foreign_key_kind() {
        let mut map = VariantMap::new(KeyKind::Int);
        assert_eq!(map.insert(MapKey::Int(1), Variant::Int(2)), Ok(None));
        let err = map
            .insert(MapKey::from("a"), Variant::Int(3))
            .unwrap_err();
        assert_eq!(err, ConversionError::mismatch("string", "int"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn map_iterates_in_key_order() {
        let mut map = VariantMap::new(KeyKind::String);
        map.insert("b".into(), Variant::Int(2)).unwrap();
        map.insert("a".into(), Variant::Int(1)).unwrap();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![MapKey::from("a"), MapKey::from("b")]);
        assert_eq!(map.get(&MapKey::from("b")), Some(&Variant::Int(2)));
        assert_eq!(map.get(&MapKey::Int(0)), None);
    }

    #[test]
    fn sequence_equality_is_structural() {
        let a = Variant::from(vec![Variant::Int(1), Variant::from("x")]);
        let b = Variant::from(vec![Variant::Int(1), Variant::from("x")]);
        assert_eq!(a, b);
        assert_ne!(a, Variant::from(vec![Variant::Float(1.0), Variant::from("x")]));
    }
}
