//! Shapes - geometric payloads referenced by shape-based constraints.

use bindery_core::CallArgs;
use bindery_registry::{ClassBuilder, Module};

/// An infinite plane `normal . x = dist`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub normal: [f64; 3],
    pub dist: f64,
}

impl Default for Wall {
    fn default() -> Self {
        Self {
            normal: [1.0, 0.0, 0.0],
            dist: 0.0,
        }
    }
}

impl Wall {
    /// Signed distance from the plane.
    pub fn distance(&self, position: [f64; 3]) -> f64 {
        dot(self.normal, position) - self.dist
    }
}

/// A sphere; `direction` is `1` for outside-facing and `-1` for inside-facing.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
    pub direction: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: 1.0,
            direction: 1.0,
        }
    }
}

impl Sphere {
    pub fn distance(&self, position: [f64; 3]) -> f64 {
        let d: [f64; 3] = std::array::from_fn(|i| position[i] - self.center[i]);
        self.direction * (dot(d, d).sqrt() - self.radius)
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Creates the shapes module.
pub fn module() -> Module {
    Module::in_namespace("Shapes")
        .class(ClassBuilder::abstract_class("Shape"))
        .class(
            ClassBuilder::<Wall>::new("Wall")
                .base("Shape")
                .parameter("normal", |w: &Wall| w.normal, |w: &mut Wall, n: [f64; 3]| {
                    w.normal = n
                })
                .parameter("dist", |w: &Wall| w.dist, |w: &mut Wall, d: f64| w.dist = d)
                .method("calc_distance", &["position"], |w: &mut Wall, args: &CallArgs| {
                    Ok(w.distance(args.get("position")?))
                }),
        )
        .class(
            ClassBuilder::<Sphere>::new("Sphere")
                .base("Shape")
                .parameter("center", |s: &Sphere| s.center, |s: &mut Sphere, c: [f64; 3]| {
                    s.center = c
                })
                .read_only("radius", |s: &Sphere| s.radius, |s: &mut Sphere, r: f64| {
                    s.radius = r
                })
                .parameter("direction", |s: &Sphere| s.direction, |s: &mut Sphere, d: f64| {
                    s.direction = d
                })
                .method("calc_distance", &["position"], |s: &mut Sphere, args: &CallArgs| {
                    Ok(s.distance(args.get("position")?))
                }),
        )
}
