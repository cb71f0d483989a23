//! Core object families exposed through the binding layer.
//!
//! Each module provides a function returning a [`Module`] that can be
//! installed into a registry:
//!
//! - **shapes** - `Shape`, `Wall`, `Sphere`
//! - **constraints** - `Constraint`, `ShapeBasedConstraint`, magnetic fields
//!   and the `Constraints` list
//! - **interactions** - `BondedInteraction`, `HarmonicBond`
//! - **magnetic** - `MagneticConstraint`, `MagnetizationDynamics` and the
//!   `MagneticConstraints` list
//!
//! The types here only store their parameters; they carry no physics.
//!
//! # Usage
//!
//! ```
//! use bindery_registry::ClassRegistry;
//!
//! let mut registry = ClassRegistry::new();
//! for module in bindery_modules::all() {
//!     registry.install(module).unwrap();
//! }
//! assert!(registry.contains("ShapeBasedConstraint"));
//! ```

pub mod active;
pub mod constraints;
pub mod interactions;
pub mod magnetic;
pub mod shapes;

pub use active::ActiveObjects;

use bindery_registry::Module;

/// Every module, in dependency order.
pub fn all() -> Vec<Module> {
    vec![
        shapes::module(),
        constraints::module(),
        interactions::module(),
        magnetic::module(),
    ]
}
