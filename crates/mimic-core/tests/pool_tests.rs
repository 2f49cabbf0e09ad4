// Class pool tests: registration, realization and JSON round trips

use mimic_core::ast::*;
use mimic_core::class::*;
use mimic_core::error::{ClassModelError, Error, RuntimeError};
use mimic_core::{ClassPool, Result};
use pretty_assertions::assert_eq;

#[test]
fn test_make_class_twice_fails() -> Result<()> {
    let pool = ClassPool::new();
    pool.make_class("Src")?;
    match pool.make_class("Src") {
        Err(Error::Model(ClassModelError::DuplicateClass { name })) => assert_eq!(name, "Src"),
        other => panic!("expected DuplicateClass, got {:?}", other.map(|h| h.name())),
    }
    assert_eq!(pool.names(), vec![Ident::new("Src")]);
    Ok(())
}

#[test]
fn test_realize_resolves_interfaces() -> Result<()> {
    let pool = ClassPool::new();
    pool.make_interface("Able")?;
    let class = pool.make_class("Dst")?;
    class.with_class_mut(|c| c.add_interface(InterfaceRef::new("Able")))?;

    let realized = pool.realize(&class)?;
    assert!(realized.implements("Able"));
    assert_eq!(realized.interfaces(), vec![Ident::new("Able")]);
    assert!(class.with_class(ClassDefinition::is_frozen));
    Ok(())
}

#[test]
fn test_realize_rejects_unknown_and_non_interfaces() -> Result<()> {
    let pool = ClassPool::new();
    pool.make_class("Plain")?;

    let missing = pool.make_class("A")?;
    missing.with_class_mut(|c| c.add_interface(InterfaceRef::new("Nowhere")))?;
    assert!(matches!(
        pool.realize(&missing),
        Err(Error::Model(ClassModelError::UnresolvedType { .. }))
    ));
    // a failed realization leaves the definition editable
    assert!(!missing.with_class(ClassDefinition::is_frozen));

    let wrong = pool.make_class("B")?;
    wrong.with_class_mut(|c| c.add_interface(InterfaceRef::new("Plain")))?;
    assert!(matches!(
        pool.realize(&wrong),
        Err(Error::Model(ClassModelError::NotAnInterface { .. }))
    ));
    Ok(())
}

#[test]
fn test_failed_static_initializer_leaves_definition_editable() -> Result<()> {
    let pool = ClassPool::new();
    let class = pool.make_class("Statics")?;
    class.with_class_mut(|c| -> std::result::Result<(), ClassModelError> {
        c.add_field(FieldDescriptor::new("x", Ty::Int))?;
        // a static initializer has no instance to read `x` from
        c.add_field(
            FieldDescriptor::new("s", Ty::Int)
                .with_modifiers(Modifiers::public().with_static())
                .with_initializer(Expr::field("x")),
        )
    })?;

    assert!(matches!(
        pool.realize(&class),
        Err(Error::Runtime(RuntimeError::NoReceiver { .. }))
    ));
    assert!(!class.with_class(ClassDefinition::is_frozen));
    class.with_class_mut(|c| c.add_field(FieldDescriptor::new("late", Ty::Int)))?;
    Ok(())
}

#[test]
fn test_realize_rejects_unresolved_signature_types() -> Result<()> {
    let pool = ClassPool::new();
    let class = pool.make_class("Holder")?;
    class.with_class_mut(|c| c.add_field(FieldDescriptor::new("peer", Ty::object("Ghost"))))?;
    assert!(matches!(
        pool.realize(&class),
        Err(Error::Model(ClassModelError::UnresolvedType { name, .. })) if name == "Ghost"
    ));
    Ok(())
}

#[test]
fn test_frozen_after_realize() -> Result<()> {
    let pool = ClassPool::new();
    let class = pool.make_class("Dst")?;
    pool.realize(&class)?;
    let err = class
        .with_class_mut(|c| c.add_field(FieldDescriptor::new("late", Ty::Int)))
        .unwrap_err();
    assert!(matches!(err, ClassModelError::Frozen { .. }));
    Ok(())
}

#[test]
fn test_json_round_trip_preserves_members() -> Result<()> {
    let pool = ClassPool::new();
    pool.make_interface("Able")?;
    let src = pool.make_class("Src")?;
    src.with_class_mut(|c| -> std::result::Result<(), ClassModelError> {
        c.add_interface(InterfaceRef::new("Able"))?;
        c.add_field(FieldDescriptor::new("foo", Ty::Int).with_initializer(Expr::int(7)))?;
        c.add_constructor(ConstructorDescriptor::default_with(Body::new(vec![
            Stmt::assign("foo", Expr::int(2)),
        ])))?;
        c.add_method(MethodDescriptor::new(
            "foo",
            vec![],
            Ty::Bool,
            Body::new(vec![Stmt::ret(Expr::bool(true))]),
        ))
    })?;

    let text = pool.to_json()?;
    let loaded = ClassPool::from_json(&text)?;
    assert_eq!(loaded.names(), pool.names());
    assert_eq!(loaded.require("Src")?.snapshot(), src.snapshot());
    Ok(())
}

#[test]
fn test_from_json_validates_bodies() {
    let text = r#"[
        {
            "name": "Broken",
            "constructors": [
                { "sig": [], "body": { "stmts": [ { "assign": { "field": "foo", "value": { "value": { "int": 2 } } } } ] } }
            ]
        }
    ]"#;
    match ClassPool::from_json(text) {
        Err(Error::Model(ClassModelError::UnknownField { field, .. })) => assert_eq!(field, "foo"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("body referencing an undeclared field was accepted"),
    }
}

#[test]
fn test_interfaces_cannot_be_instantiated() -> Result<()> {
    let pool = ClassPool::new();
    let iface = pool.make_interface("Able")?;
    let realized = pool.realize(&iface)?;
    assert!(matches!(
        realized.instantiate(vec![]),
        Err(Error::Runtime(RuntimeError::AbstractInstantiation { .. }))
    ));
    Ok(())
}
