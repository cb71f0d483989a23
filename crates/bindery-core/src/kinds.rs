//! Variant kind tags and kind sets.
//!
//! Every [`Variant`](crate::Variant) carries exactly one [`VariantKind`].
//! Parameters describe what they accept as a [`KindSet`], and mappings fix
//! their key type to one [`KeyKind`].

use std::fmt;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The closed set of kinds a [`Variant`](crate::Variant) can take.
///
/// The discriminant doubles as the bit index inside a [`KindSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum VariantKind {
    None = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Sequence = 5,
    Map = 6,
    Object = 7,
}

impl VariantKind {
    /// Every kind, in discriminant order.
    pub const ALL: [VariantKind; 8] = [
        VariantKind::None,
        VariantKind::Bool,
        VariantKind::Int,
        VariantKind::Float,
        VariantKind::String,
        VariantKind::Sequence,
        VariantKind::Map,
        VariantKind::Object,
    ];

    /// Core-side name used in conversion messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::None => "None",
            VariantKind::Bool => "bool",
            VariantKind::Int => "int",
            VariantKind::Float => "double",
            VariantKind::String => "string",
            VariantKind::Sequence => "Sequence",
            VariantKind::Map => "Map",
            VariantKind::Object => "ObjectHandle",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of accepted [`VariantKind`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u8 {
        const NONE = 1 << 0;
        const BOOL = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const SEQUENCE = 1 << 5;
        const MAP = 1 << 6;
        const OBJECT = 1 << 7;
        /// Integers and floats.
        const NUMBER = Self::INT.bits() | Self::FLOAT.bits();
    }
}

impl KindSet {
    /// The set containing only `kind`.
    #[inline]
    pub fn of(kind: VariantKind) -> Self {
        Self::from_bits_retain(1 << u8::from(kind))
    }

    /// Check whether `kind` is a member of this set.
    #[inline]
    pub fn accepts(self, kind: VariantKind) -> bool {
        self.contains(Self::of(kind))
    }

    /// Iterate the member kinds in discriminant order.
    pub fn kinds(self) -> impl Iterator<Item = VariantKind> {
        (0..8u8)
            .filter(move |bit| self.bits() & (1 << bit) != 0)
            .filter_map(|bit| VariantKind::try_from(bit).ok())
    }

    /// Render the set as `int|double`.
    pub fn describe(self) -> String {
        let names: Vec<&str> = self.kinds().map(|kind| kind.as_str()).collect();
        if names.is_empty() {
            "nothing".to_string()
        } else {
            names.join("|")
        }
    }
}

impl From<VariantKind> for KindSet {
    fn from(kind: VariantKind) -> Self {
        Self::of(kind)
    }
}

/// Key type of a Variant mapping. Only integers and strings may key a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum KeyKind {
    #[default]
    Int = 0,
    String = 1,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Int => "int",
            KeyKind::String => "string",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
