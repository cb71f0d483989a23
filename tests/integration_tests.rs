//! End-to-end behaviour of the binding layer, driven through a `Context`
//! with the bundled core modules installed.

use bindery::{
    Accessor, BindError, Context, ErrorKind, ListError, Options, ProxyClass, RelOp, Value, kwargs,
};

fn context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();
    Context::with_default_modules().unwrap()
}

fn opaque(name: &str) -> Value {
    Value::Opaque(name.to_string())
}

// ============================================================================
// Construction and conversion
// ============================================================================

#[test]
fn test_wall_assigned_to_constraint_shape() {
    let ctx = context();
    let wall = ctx.create("Wall", kwargs! { "normal" => [-1, 0, 0] }).unwrap();
    let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();

    constraint.set_attr("shape", &wall).unwrap();

    let shape = constraint.get_attr("shape").unwrap();
    let shape = shape.as_object().unwrap();
    assert_eq!(shape.class_name(), "Wall");
    assert_eq!(shape, &wall);
    assert_eq!(shape.get_attr("normal"), Ok(Value::from([-1, 0, 0])));
}

#[test]
fn test_shape_passed_at_construction() {
    let ctx = context();
    let sphere = ctx.create("Sphere", kwargs! { "radius" => 3.5 }).unwrap();
    let constraint = ctx
        .create("ShapeBasedConstraint", kwargs! { "shape" => &sphere, "particle_type" => 1 })
        .unwrap();

    let shape = constraint.get_attr("shape").unwrap();
    assert_eq!(
        shape.as_object().unwrap().get_attr("radius"),
        Ok(Value::Float(3.5))
    );
}

#[test]
fn test_keyword_round_trip() {
    let ctx = context();
    let cases = [
        ("Wall", "dist", Value::Int(2)),
        ("Wall", "normal", Value::from([0.0, 1.0, 0.0])),
        ("Sphere", "center", Value::from([1, 2, 3])),
        ("Sphere", "direction", Value::Float(-1.0)),
        ("ShapeBasedConstraint", "penetrable", Value::Bool(true)),
        ("ShapeBasedConstraint", "particle_type", Value::Int(7)),
        ("HomogeneousMagneticField", "H", Value::from([0.5, 0.0, 1.0])),
        ("HarmonicBond", "k", Value::Float(1.0)),
        ("HarmonicBond", "r_cut", Value::Float(2.5)),
        ("MagnetizationDynamics", "dm", Value::from([0, 0, 1])),
    ];

    for (class, key, value) in cases {
        let object = ctx.create(class, vec![(key.to_string(), value.clone())]).unwrap();
        assert_eq!(object.get_attr(key), Ok(value), "{class}.{key}");
    }
}

#[test]
fn test_float_keyed_map_is_rejected() {
    let ctx = context();
    let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
    let err = constraint
        .set_attr("shape", Value::Dict(vec![(Value::Float(5.0), Value::Int(2))]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(
        err.to_string(),
        "No conversion from type 'dict_item([(float, int)])' to 'Variant[Map<int|string, Variant>]'"
    );
}

#[test]
fn test_unknown_constructor_keyword() {
    let ctx = context();
    let err = ctx
        .create("Wall", kwargs! { "unknown_param" => 0 })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownParameter);
    assert_eq!(err.to_string(), "Unknown parameter 'unknown_param'");
}

#[test]
fn test_unconvertible_values_fail_everywhere() {
    let ctx = context();
    let message = "No conversion from type 'module' to 'Variant'";

    let err = ctx
        .create("ShapeBasedConstraint", kwargs! { "shape" => opaque("module") })
        .unwrap_err();
    assert_eq!(err.to_string(), message);

    let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
    let err = constraint
        .set_params(kwargs! { "particle_type" => opaque("module") })
        .unwrap_err();
    assert_eq!(err.to_string(), message);

    let err = constraint
        .call_method("unknown", kwargs! { "x" => opaque("module") })
        .unwrap_err();
    assert_eq!(err.to_string(), message);

    let err = constraint.call_method("unknown", kwargs! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownParameter);
}

#[test]
fn test_shape_kind_mismatches() {
    let ctx = context();
    let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();

    let cases = [
        (Value::Int(5), "int"),
        (Value::None, "None"),
        (Value::from(&constraint), "ObjectHandle<ShapeBasedConstraint>"),
    ];
    for (value, actual) in cases {
        let err = constraint.set_attr("shape", value).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Provided argument of type '{actual}' is not convertible to 'ObjectHandle<Shape>'")
        );
    }
    assert_eq!(constraint.get_attr("shape"), Ok(Value::None));
}

#[test]
fn test_object_as_method_argument_to_itself() {
    let ctx = context();
    let wall = ctx.create("Wall", kwargs! {}).unwrap();
    let err = wall
        .call_method("calc_distance", kwargs! { "position" => &wall })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

// ============================================================================
// Read-only and unknown attributes
// ============================================================================

#[test]
fn test_read_only_parameters() {
    let ctx = context();
    let bond = ctx
        .create("HarmonicBond", kwargs! { "k" => 5.0, "r_0" => 1.0 })
        .unwrap();

    let err = bond.set_attr("k", 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadOnly);
    assert_eq!(err.to_string(), "Parameter 'k' is read-only");

    for name in ["k", "r_0", "r_cut"] {
        let err = bond.del_attr(name).unwrap_err();
        assert_eq!(err.to_string(), format!("Parameter '{name}' is read-only"));
        assert!(bond.get_attr(name).is_ok());
    }
    assert_eq!(bond.get_attr("k"), Ok(Value::Float(5.0)));

    let sphere = ctx.create("Sphere", kwargs! { "radius" => 2 }).unwrap();
    let err = sphere.del_attr("radius").unwrap_err();
    assert_eq!(err.to_string(), "Parameter 'radius' is read-only");
}

#[test]
fn test_unknown_attribute() {
    let ctx = context();
    let bond = ctx.create("HarmonicBond", kwargs! {}).unwrap();
    let err = bond.get_attr("unknown").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
    assert_eq!(err.to_string(), "Object 'HarmonicBond' has no attribute 'unknown'");

    let err = bond.del_attr("unknown").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_delete_resets_parameter_to_default() {
    let ctx = context();
    let wall = ctx
        .create("Wall", kwargs! { "dist" => 5, "normal" => [0, 0, 1] })
        .unwrap();

    wall.del_attr("dist").unwrap();
    wall.del_attr("normal").unwrap();
    assert_eq!(wall.get_attr("dist"), Ok(Value::Float(0.0)));
    assert_eq!(wall.get_attr("normal"), Ok(Value::from([1, 0, 0])));
    assert!(wall.has_attr("dist"));

    let constraint = ctx
        .create("ShapeBasedConstraint", kwargs! { "shape" => &wall })
        .unwrap();
    constraint.del_attr("shape").unwrap();
    assert_eq!(constraint.get_attr("shape"), Ok(Value::None));
}

#[test]
fn test_delete_removes_local_field() {
    let ctx = context();
    let wall = ctx.create("Wall", kwargs! {}).unwrap();
    wall.set_attr("note", "left wall").unwrap();
    assert_eq!(wall.get_attr("note"), Ok(Value::from("left wall")));

    wall.del_attr("note").unwrap();
    let err = wall.get_attr("note").unwrap_err();
    assert_eq!(err.to_string(), "Object 'Wall' has no attribute 'note'");
}

#[test]
fn test_computed_accessor_slot_is_independent() {
    let _ = env_logger::builder().is_test(true).try_init();
    let ctx = Context::builder()
        .modules(bindery_modules::all())
        .proxy_class(
            ProxyClass::new("SphereWithProperties", "Sphere")
                .slot("_mass", Value::None)
                .accessor("mass", Accessor::slot("_mass")),
        )
        .build()
        .unwrap();

    let obj = ctx
        .create("SphereWithProperties", kwargs! { "center" => [1, 1, 1] })
        .unwrap();
    assert_eq!(obj.class_name(), "SphereWithProperties");
    assert_eq!(obj.core_class_name(), "Sphere");
    assert_eq!(obj.get_attr("mass"), Ok(Value::None));

    obj.set_attr("mass", 2.0).unwrap();
    obj.set_attr("direction", -1).unwrap();
    obj.del_attr("direction").unwrap();
    assert_eq!(obj.get_attr("mass"), Ok(Value::Float(2.0)));
    assert_eq!(obj.get_attr("direction"), Ok(Value::Float(1.0)));

    obj.del_attr("mass").unwrap();
    assert_eq!(obj.get_attr("mass"), Ok(Value::None));
    assert_eq!(obj.get_attr("center"), Ok(Value::from([1, 1, 1])));
}

// ============================================================================
// Bulk parameters and methods
// ============================================================================

#[test]
fn test_get_and_set_params() {
    let ctx = context();
    let wall = ctx.create("Wall", kwargs! {}).unwrap();
    assert_eq!(
        wall.get_params(),
        Ok(vec![
            ("normal".to_string(), Value::from([1, 0, 0])),
            ("dist".to_string(), Value::Float(0.0)),
        ])
    );

    wall.set_params(kwargs! { "dist" => 1.5, "normal" => [0, 1, 0] }).unwrap();
    assert_eq!(wall.get_attr("dist"), Ok(Value::Float(1.5)));

    let err = wall
        .set_params(kwargs! { "dist" => 3, "normal" => "up" })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(wall.get_attr("dist"), Ok(Value::Float(1.5)));
}

#[test]
fn test_method_call() {
    let ctx = context();
    let sphere = ctx.create("Sphere", kwargs! { "radius" => 1 }).unwrap();
    assert_eq!(
        sphere.call_method("calc_distance", kwargs! { "position" => [3, 0, 0] }),
        Ok(Value::Float(2.0))
    );
    let err = sphere
        .call_method("calc_distance", kwargs! { "where" => [3, 0, 0] })
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown parameter 'where'");
}

// ============================================================================
// Identity and comparison
// ============================================================================

#[test]
fn test_equality_is_identity() {
    let ctx = context();
    let a = ctx.create("Wall", kwargs! {}).unwrap();
    let b = ctx.create("Wall", kwargs! {}).unwrap();

    assert!(a.equals(&Value::from(&a)));
    assert!(!a.equals(&Value::from(&b)));
    assert!(a.not_equals(&Value::from(&b)));
    assert!(!a.equals(&Value::Int(1)));
    assert!(!a.equals(&Value::None));
    assert_ne!(Value::from(&a), Value::from(&b));
}

#[test]
fn test_relational_operators_are_unsupported() {
    let ctx = context();
    let a = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();
    let b = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();

    for op in RelOp::ALL {
        for other in [Value::from(&b), Value::from(&a), Value::Int(5)] {
            let err = a.try_compare(op, &other).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
            assert_eq!(
                err.to_string(),
                format!(
                    "'{}' not supported between instances of 'ShapeBasedConstraint' and '{}'",
                    op,
                    other.type_name()
                )
            );
        }
    }
}

// ============================================================================
// Object lists
// ============================================================================

#[test]
fn test_list_remove_then_clear() {
    let ctx = context();
    let constraints = ctx.list("Constraints").unwrap();
    let wall = ctx.create("Wall", kwargs! {}).unwrap();
    let constraint = constraints.add(&[], kwargs! { "shape" => &wall }).unwrap();
    assert_eq!(constraints.len(), 1);

    constraints.remove(&constraint).unwrap();
    assert!(constraints.is_empty());
    constraints.clear().unwrap();
    assert!(constraints.is_empty());

    let err = constraints.remove(&constraint).unwrap_err();
    assert_eq!(err.to_string(), "Object 'ShapeBasedConstraint' not found in list");
}

#[test]
fn test_list_clear_is_idempotent() {
    let ctx = context();
    let constraints = ctx.list("Constraints").unwrap();
    constraints.clear().unwrap();
    assert!(constraints.is_empty());
    constraints.clear().unwrap();
    assert!(constraints.is_empty());
}

#[test]
fn test_list_add_rejects_mixed_arguments() {
    let ctx = context();
    let constraints = ctx.list("Constraints").unwrap();
    let wall = ctx.create("Wall", kwargs! {}).unwrap();
    let constraint = ctx.create("ShapeBasedConstraint", kwargs! {}).unwrap();

    let err = constraints
        .add(&[Value::from(&constraint)], kwargs! { "shape" => &wall })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListContract);

    let err = constraints.add(&[Value::Int(3)], kwargs! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListContract);
    assert!(constraints.is_empty());
}

#[test]
fn test_list_order_is_stable() {
    let ctx = context();
    let constraints = ctx.list("Constraints").unwrap();
    let members: Vec<_> = ["HomogeneousMagneticField", "BarnettField", "AlternatingMagneticField"]
        .into_iter()
        .map(|class| {
            let object = ctx.create(class, kwargs! {}).unwrap();
            constraints.add(&[Value::from(&object)], kwargs! {}).unwrap()
        })
        .collect();

    constraints.remove(&members[1]).unwrap();
    let names: Vec<_> = constraints
        .elements()
        .iter()
        .map(|o| o.class_name().to_string())
        .collect();
    assert_eq!(names, vec!["HomogeneousMagneticField", "AlternatingMagneticField"]);
}

#[test]
fn test_list_membership_sharing() {
    let ctx = context();
    let first = ctx.list("Constraints").unwrap();
    let second = ctx.list("Constraints").unwrap();
    let field = ctx.create("BarnettField", kwargs! {}).unwrap();

    first.add(&[Value::from(&field)], kwargs! {}).unwrap();
    second.add(&[Value::from(&field)], kwargs! {}).unwrap();
    assert_eq!(field.handle().list_memberships(), 2);

    let err = first.add(&[Value::from(&field)], kwargs! {}).unwrap_err();
    assert!(matches!(err, BindError::List(ListError::Duplicate { .. })));

    let exclusive = Context::builder()
        .modules(bindery_modules::all())
        .options(Options {
            shared_list_membership: false,
            ..Options::default()
        })
        .build()
        .unwrap();
    let first = exclusive.list("Constraints").unwrap();
    let second = exclusive.list("Constraints").unwrap();
    let field = exclusive.create("BarnettField", kwargs! {}).unwrap();
    first.add(&[Value::from(&field)], kwargs! {}).unwrap();
    let err = second.add(&[Value::from(&field)], kwargs! {}).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Object 'BarnettField' already belongs to another list"
    );

    let third = exclusive.list("Constraints").unwrap();
    let err = third
        .object()
        .call_method("add", kwargs! { "object" => &field })
        .unwrap_err();
    assert!(matches!(err, BindError::List(ListError::AlreadyMember { .. })));
    assert!(third.is_empty());
}

#[test]
fn test_list_elements_reuse_live_proxies() {
    let ctx = context();
    let constraints = ctx.list("Constraints").unwrap();
    let field = ctx.create("HomogeneousMagneticField", kwargs! {}).unwrap();
    field.set_local("tag", Value::from("outer"));
    constraints.add(&[Value::from(&field)], kwargs! {}).unwrap();

    let elements = constraints.elements();
    assert_eq!(elements[0].local("tag"), Some(Value::from("outer")));
}
