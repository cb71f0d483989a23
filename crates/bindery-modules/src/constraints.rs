//! Constraints - objects that act on every particle while listed.
//!
//! A constraint only takes effect while it is held by the `Constraints`
//! list. The list's hooks feed an [`ActiveObjects`] set standing in for the
//! core container.

use bindery_core::{CallArgs, ObjectHandle, ParameterDescriptor};
use bindery_registry::{ClassBuilder, Module};

use crate::ActiveObjects;

/// A constraint defined by a shape.
#[derive(Debug, Clone, Default)]
pub struct ShapeBasedConstraint {
    pub shape: Option<ObjectHandle>,
    pub penetrable: bool,
    pub only_positive: bool,
    pub particle_type: i32,
}

/// A spatially constant magnetic field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomogeneousMagneticField {
    pub h: [f64; 3],
}

/// A field oscillating as `H0 cos(omega t)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlternatingMagneticField {
    pub h0: [f64; 3],
    pub omega: f64,
}

impl AlternatingMagneticField {
    pub fn field_at(&self, time: f64) -> [f64; 3] {
        let scale = (self.omega * time).cos();
        self.h0.map(|h| h * scale)
    }
}

/// Barnett effect coupling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarnettField {
    pub gamma_e: f64,
}

/// Creates the constraints module with a private active set.
pub fn module() -> Module {
    module_with(ActiveObjects::new())
}

/// Creates the constraints module reporting membership to `active`.
pub fn module_with(active: ActiveObjects) -> Module {
    Module::in_namespace("Constraints")
        .class(ClassBuilder::abstract_class("Constraint"))
        .class(
            ClassBuilder::<ShapeBasedConstraint>::new("ShapeBasedConstraint")
                .base("Constraint")
                .descriptor(
                    ParameterDescriptor::new(
                        "shape",
                        |c: &ShapeBasedConstraint| c.shape.clone(),
                        |c: &mut ShapeBasedConstraint, shape: Option<ObjectHandle>| {
                            c.shape = shape
                        },
                    )
                    .of_family("Shapes::Shape"),
                )
                .parameter(
                    "penetrable",
                    |c: &ShapeBasedConstraint| c.penetrable,
                    |c: &mut ShapeBasedConstraint, v: bool| c.penetrable = v,
                )
                .parameter(
                    "only_positive",
                    |c: &ShapeBasedConstraint| c.only_positive,
                    |c: &mut ShapeBasedConstraint, v: bool| c.only_positive = v,
                )
                .parameter(
                    "particle_type",
                    |c: &ShapeBasedConstraint| c.particle_type,
                    |c: &mut ShapeBasedConstraint, t: i32| c.particle_type = t,
                ),
        )
        .class(
            ClassBuilder::<HomogeneousMagneticField>::new("HomogeneousMagneticField")
                .base("Constraint")
                .parameter(
                    "H",
                    |f: &HomogeneousMagneticField| f.h,
                    |f: &mut HomogeneousMagneticField, h: [f64; 3]| f.h = h,
                ),
        )
        .class(
            ClassBuilder::<AlternatingMagneticField>::new("AlternatingMagneticField")
                .base("Constraint")
                .parameter(
                    "H0",
                    |f: &AlternatingMagneticField| f.h0,
                    |f: &mut AlternatingMagneticField, h: [f64; 3]| f.h0 = h,
                )
                .parameter(
                    "omega",
                    |f: &AlternatingMagneticField| f.omega,
                    |f: &mut AlternatingMagneticField, w: f64| f.omega = w,
                )
                .method(
                    "field_at",
                    &["time"],
                    |f: &mut AlternatingMagneticField, args: &CallArgs| {
                        Ok(f.field_at(args.get("time")?))
                    },
                ),
        )
        .class(
            ClassBuilder::<BarnettField>::new("BarnettField")
                .base("Constraint")
                .parameter(
                    "gamma_e",
                    |f: &BarnettField| f.gamma_e,
                    |f: &mut BarnettField, g: f64| f.gamma_e = g,
                ),
        )
        .class(
            ClassBuilder::object_list("Constraints", "Constraint")
                .default_member("ShapeBasedConstraint")
                .hooks(move || active.clone()),
        )
}
