//! Magnetic constraints and their list.

use bindery_registry::{ClassBuilder, Module};

use crate::ActiveObjects;

/// Prescribed change of the dipole moment per step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnetizationDynamics {
    pub dm: [f64; 3],
}

/// Creates the magnetic constraints module with a private active set.
pub fn module() -> Module {
    module_with(ActiveObjects::new())
}

/// Creates the magnetic constraints module reporting membership to `active`.
///
/// The list has no default member, so it only accepts existing objects.
pub fn module_with(active: ActiveObjects) -> Module {
    Module::in_namespace("MagneticConstraints")
        .class(ClassBuilder::abstract_class("MagneticConstraint"))
        .class(
            ClassBuilder::<MagnetizationDynamics>::new("MagnetizationDynamics")
                .base("MagneticConstraint")
                .parameter(
                    "dm",
                    |m: &MagnetizationDynamics| m.dm,
                    |m: &mut MagnetizationDynamics, dm: [f64; 3]| m.dm = dm,
                ),
        )
        .class(
            ClassBuilder::object_list("MagneticConstraints", "MagneticConstraint")
                .hooks(move || active.clone()),
        )
}
