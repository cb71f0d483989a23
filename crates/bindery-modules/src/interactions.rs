//! Interactions - bonded potentials whose parameters are fixed at construction.

use bindery_registry::{ClassBuilder, Module};

/// Harmonic bond `k/2 (r - r_0)^2`, cut off at `r_cut` (`-1` disables).
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicBond {
    pub k: f64,
    pub r_0: f64,
    pub r_cut: f64,
}

impl Default for HarmonicBond {
    fn default() -> Self {
        Self {
            k: 0.0,
            r_0: 0.0,
            r_cut: -1.0,
        }
    }
}

/// Creates the interactions module.
pub fn module() -> Module {
    Module::in_namespace("Interactions")
        .class(ClassBuilder::abstract_class("BondedInteraction"))
        .class(
            ClassBuilder::<HarmonicBond>::new("HarmonicBond")
                .base("BondedInteraction")
                .read_only("k", |b: &HarmonicBond| b.k, |b: &mut HarmonicBond, k: f64| b.k = k)
                .read_only("r_0", |b: &HarmonicBond| b.r_0, |b: &mut HarmonicBond, r: f64| {
                    b.r_0 = r
                })
                .read_only("r_cut", |b: &HarmonicBond| b.r_cut, |b: &mut HarmonicBond, r: f64| {
                    b.r_cut = r
                }),
        )
}
