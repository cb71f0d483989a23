//! Deterministic hash-based class identity.
//!
//! [`ClassHash`] identifies a registered class by its qualified tag
//! (for example `Shapes::Wall`). The hash is computed from the name alone, so
//! a parameter can name the class family it accepts before that family has
//! been registered, and two registrations of the same tag always collide.
//!
//! # Examples
//!
//! ```
//! use bindery_core::ClassHash;
//!
//! let wall = ClassHash::from_name("Shapes::Wall");
//! assert_eq!(wall, ClassHash::from_name("Shapes::Wall"));
//! assert_ne!(wall, ClassHash::from_name("Shapes::Sphere"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into every class hash.
const CLASS_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a registered class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ClassHash(pub u64);

impl ClassHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: ClassHash = ClassHash(0);

    /// Create a class hash from a qualified class tag.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        ClassHash(CLASS_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ClassHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassHash({:#018x})", self.0)
    }
}

impl fmt::Display for ClassHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<&str> for ClassHash {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}
