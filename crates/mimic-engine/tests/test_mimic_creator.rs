// MimicCreator tests
// Each test builds a fresh pool with a source and a destination class,
// mimics some part of the source and checks the destination both
// structurally and by running the realized class.

use mimic_core::ast::*;
use mimic_core::class::*;
use mimic_core::error::ClassModelError;
use mimic_core::{ClassHandle, ClassPool};
use mimic_engine::{MimicCreator, MimicError, MimicPhase, PhaseReport};
use pretty_assertions::assert_eq;

type TestResult = Result<(), Box<dyn std::error::Error>>;

struct Fixture {
    pool: ClassPool,
    src: ClassHandle,
    dst: ClassHandle,
    creator: MimicCreator,
}

fn setup() -> Fixture {
    let pool = ClassPool::new();
    let src = pool.make_class("Src").unwrap();
    let dst = pool.make_class("Dst").unwrap();
    Fixture {
        pool,
        src,
        dst,
        creator: MimicCreator::new(),
    }
}

fn foo_field() -> FieldDescriptor {
    FieldDescriptor::new("foo", Ty::Int)
}

/// `public Src() { foo = 2; }`
fn foo_constructor() -> ConstructorDescriptor {
    ConstructorDescriptor::default_with(Body::new(vec![Stmt::assign("foo", Expr::int(2))]))
}

/// `public boolean foo() { return true; }`
fn foo_method() -> MethodDescriptor {
    MethodDescriptor::new(
        "foo",
        vec![],
        Ty::Bool,
        Body::new(vec![Stmt::ret(Expr::bool(true))]),
    )
}

fn with_everything(fx: &Fixture) -> Result<(), ClassModelError> {
    fx.pool.make_interface("Able").unwrap();
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_interface(InterfaceRef::new("Able"))?;
        c.add_field(foo_field())?;
        c.add_constructor(foo_constructor())?;
        c.add_method(foo_method())
    })
}

#[test]
fn test_mimic_interfaces() -> TestResult {
    let fx = setup();
    fx.pool.make_interface("Able")?;
    fx.pool.make_interface("Comparable")?;
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_interface(InterfaceRef::new("Able"))?;
        c.add_interface(InterfaceRef::new("Comparable"))
    })?;

    fx.creator.mimic_interfaces(&fx.src, &fx.dst)?;

    let names = fx
        .dst
        .with_class(|c| c.interfaces().iter().map(|i| i.name.clone()).collect::<Vec<_>>());
    assert_eq!(names, vec![Ident::new("Able"), Ident::new("Comparable")]);
    let realized = fx.pool.realize(&fx.dst)?;
    assert!(realized.implements("Able"));
    Ok(())
}

#[test]
fn test_mimic_interfaces_keeps_existing_ones_first() -> TestResult {
    let fx = setup();
    fx.pool.make_interface("Able")?;
    fx.pool.make_interface("Other")?;
    fx.src
        .with_class_mut(|c| c.add_interface(InterfaceRef::new("Able")))?;
    fx.dst.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_interface(InterfaceRef::new("Other"))?;
        c.add_interface(InterfaceRef::new("Able"))
    })?;

    fx.creator.mimic_interfaces(&fx.src, &fx.dst)?;

    assert_eq!(
        fx.dst.with_class(|c| c.interfaces().to_vec()),
        vec![InterfaceRef::new("Other"), InterfaceRef::new("Able")]
    );
    Ok(())
}

#[test]
fn test_mimic_fields() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_field(foo_field()))?;

    fx.creator.mimic_fields(&fx.src, &fx.dst)?;

    let field = fx.dst.with_class(|c| c.get_field("foo").cloned());
    assert_eq!(field, Some(foo_field()));
    let realized = fx.pool.realize(&fx.dst)?;
    let instance = realized.instantiate(vec![])?;
    assert_eq!(instance.field("foo"), Some(&Value::Int(0)));
    Ok(())
}

#[test]
fn test_mimic_fields_copies_initializers_and_modifiers() -> TestResult {
    let fx = setup();
    let shared = FieldDescriptor::new("shared", Ty::Str)
        .with_modifiers(Modifiers::private().with_static().with_final())
        .with_initializer(Expr::value(Value::string("hi")));
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_field(foo_field().with_initializer(Expr::int(9)))?;
        c.add_field(shared.clone())
    })?;

    fx.creator.mimic_fields(&fx.src, &fx.dst)?;

    assert_eq!(fx.dst.with_class(|c| c.get_field("shared").cloned()), Some(shared));
    let realized = fx.pool.realize(&fx.dst)?;
    assert_eq!(realized.get_static("shared")?, Value::string("hi"));
    assert_eq!(realized.instantiate(vec![])?.field("foo"), Some(&Value::Int(9)));
    Ok(())
}

#[test]
fn test_existing_field_is_skipped_not_overwritten() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_field(foo_field()))?;
    fx.dst
        .with_class_mut(|c| c.add_field(FieldDescriptor::new("foo", Ty::Bool)))?;

    fx.creator.mimic_fields(&fx.src, &fx.dst)?;

    let fields = fx.dst.with_class(|c| c.fields().to_vec());
    assert_eq!(fields, vec![FieldDescriptor::new("foo", Ty::Bool)]);
    Ok(())
}

#[test]
fn test_existing_constructor_is_skipped_not_overwritten() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_field(foo_field())?;
        c.add_constructor(foo_constructor())
    })?;
    // `public Dst() { foo = 5; }`
    fx.dst.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_field(foo_field())?;
        c.add_constructor(ConstructorDescriptor::default_with(Body::new(vec![
            Stmt::assign("foo", Expr::int(5)),
        ])))
    })?;

    let report = fx.creator.mimic_class_report(&fx.src, &fx.dst)?;

    assert_eq!(report.constructors, PhaseReport { added: 0, skipped: 1 });
    assert_eq!(fx.dst.with_class(|c| c.constructors().len()), 1);
    let realized = fx.pool.realize(&fx.dst)?;
    assert_eq!(realized.instantiate(vec![])?.field("foo"), Some(&Value::Int(5)));
    Ok(())
}

#[test]
fn test_existing_method_is_skipped_not_overwritten() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_method(foo_method()))?;
    // `public int foo() { return 1; }`: same key, different return type
    let existing = MethodDescriptor::new(
        "foo",
        vec![],
        Ty::Int,
        Body::new(vec![Stmt::ret(Expr::int(1))]),
    );
    fx.dst
        .with_class_mut(|c| c.add_method(existing.clone()))?;

    fx.creator.mimic_methods(&fx.src, &fx.dst)?;

    assert_eq!(fx.dst.with_class(|c| c.methods().to_vec()), vec![existing]);
    let realized = fx.pool.realize(&fx.dst)?;
    let mut instance = realized.instantiate(vec![])?;
    assert_eq!(realized.invoke(&mut instance, "foo", vec![])?, Value::Int(1));
    Ok(())
}

#[test]
fn test_mimic_constructors() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_field(foo_field())?;
        c.add_constructor(foo_constructor())
    })?;

    fx.creator.mimic_fields(&fx.src, &fx.dst)?;
    fx.creator.mimic_constructors(&fx.src, &fx.dst)?;

    assert!(fx.dst.with_class(|c| c.get_constructor(&[]).is_some()));
    let realized = fx.pool.realize(&fx.dst)?;
    let instance = realized.instantiate(vec![])?;
    assert_eq!(realized.get_field(&instance, "foo")?, Value::Int(2));
    Ok(())
}

#[test]
fn test_mimic_methods() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_method(foo_method()))?;

    fx.creator.mimic_methods(&fx.src, &fx.dst)?;

    let method = fx.dst.with_class(|c| c.get_declared_method("foo", &[]).cloned());
    assert_eq!(method.map(|m| m.ret_ty), Some(Ty::Bool));
    let realized = fx.pool.realize(&fx.dst)?;
    let mut instance = realized.instantiate(vec![])?;
    assert_eq!(realized.invoke(&mut instance, "foo", vec![])?, Value::Bool(true));
    Ok(())
}

#[test]
fn test_copies_are_owned_by_destination() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_method(foo_method()))?;
    fx.creator.mimic_methods(&fx.src, &fx.dst)?;

    // realizing the source must not freeze the destination, and vice versa
    fx.pool.realize(&fx.src)?;
    fx.dst.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_method(MethodDescriptor::new("bar", vec![], Ty::Void, Body::empty()))
    })?;
    assert_eq!(fx.src.with_class(|c| c.methods().len()), 1);
    assert_eq!(fx.dst.with_class(|c| c.methods().len()), 2);
    Ok(())
}

#[test]
fn test_mimic_class() -> TestResult {
    let fx = setup();
    with_everything(&fx)?;

    fx.creator.mimic_class(&fx.src, &fx.dst)?;

    let realized = fx.pool.realize(&fx.dst)?;
    assert_eq!(realized.interfaces(), vec![Ident::new("Able")]);
    let mut instance = realized.instantiate(vec![])?;
    assert_eq!(instance.field("foo"), Some(&Value::Int(2)));
    assert_eq!(realized.invoke(&mut instance, "foo", vec![])?, Value::Bool(true));
    Ok(())
}

#[test]
fn test_mimic_class_twice_is_idempotent() -> TestResult {
    let fx = setup();
    with_everything(&fx)?;

    let first = fx.creator.mimic_class_report(&fx.src, &fx.dst)?;
    let after_first = fx.dst.snapshot();
    let second = fx.creator.mimic_class_report(&fx.src, &fx.dst)?;

    assert_eq!(first.added(), 4);
    assert!(second.is_noop());
    assert_eq!(second.skipped(), 4);
    assert_eq!(second.interfaces, PhaseReport { added: 0, skipped: 1 });
    assert_eq!(fx.dst.snapshot(), after_first);
    Ok(())
}

#[test]
fn test_mimic_class_again_after_realize_is_a_noop() -> TestResult {
    let fx = setup();
    with_everything(&fx)?;
    fx.creator.mimic_class(&fx.src, &fx.dst)?;
    fx.pool.realize(&fx.dst)?;
    let before = fx.dst.snapshot();

    let report = fx.creator.mimic_class_report(&fx.src, &fx.dst)?;

    assert!(report.is_noop());
    assert_eq!(report.interfaces, PhaseReport { added: 0, skipped: 1 });
    assert_eq!(fx.dst.snapshot(), before);
    Ok(())
}

#[test]
fn test_void_field_is_a_mimic_failure() -> TestResult {
    let fx = setup();
    // deserialized directly, so the void field was never checked
    let malformed: ClassDefinition = serde_json::from_str(
        r#"{ "name": "Hollow", "fields": [ { "name": "nothing", "ty": "void" } ] }"#,
    )?;
    let src = fx.pool.insert(malformed)?;

    let err = fx.creator.mimic_fields(&src, &fx.dst).unwrap_err();

    assert_eq!(err.phase, MimicPhase::Fields);
    assert_eq!(err.member, MemberKey::Field(Ident::new("nothing")));
    assert!(matches!(err.cause, ClassModelError::VoidType { .. }));
    assert!(fx.dst.with_class(|c| c.fields().is_empty()));
    Ok(())
}

#[test]
fn test_mimic_onto_itself_is_a_noop() -> TestResult {
    let fx = setup();
    with_everything(&fx)?;
    let before = fx.src.snapshot();

    let report = fx.creator.mimic_class_report(&fx.src, &fx.src)?;

    assert!(report.is_noop());
    assert_eq!(fx.src.snapshot(), before);
    Ok(())
}

#[test]
fn test_constructors_before_fields_fails() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| -> Result<(), ClassModelError> {
        c.add_field(foo_field())?;
        c.add_constructor(foo_constructor())
    })?;

    let err = fx
        .creator
        .mimic_constructors(&fx.src, &fx.dst)
        .unwrap_err();
    assert_eq!(
        err,
        MimicError {
            phase: MimicPhase::Constructors,
            source_class: Ident::new("Src"),
            destination: Ident::new("Dst"),
            member: MemberKey::Constructor(Signature::empty()),
            cause: ClassModelError::UnknownField {
                class: Ident::new("Dst"),
                field: Ident::new("foo"),
            },
        }
    );
    assert!(fx.dst.with_class(|c| c.constructors().is_empty()));

    fx.creator.mimic_fields(&fx.src, &fx.dst)?;
    fx.creator.mimic_constructors(&fx.src, &fx.dst)?;
    assert_eq!(fx.dst.with_class(|c| c.constructors().len()), 1);
    Ok(())
}

#[test]
fn test_frozen_destination_fails() -> TestResult {
    let fx = setup();
    fx.src.with_class_mut(|c| c.add_field(foo_field()))?;
    fx.pool.realize(&fx.dst)?;

    let err = fx.creator.mimic_class(&fx.src, &fx.dst).unwrap_err();
    assert_eq!(err.phase, MimicPhase::Fields);
    assert!(matches!(err.cause, ClassModelError::Frozen { .. }));
    assert!(std::error::Error::source(&err).is_some());
    Ok(())
}

#[test]
fn test_failure_keeps_earlier_phases() -> TestResult {
    let fx = setup();
    fx.pool.make_interface("Able")?;
    // deserialized directly, so the method reading `bar` was never checked
    let malformed: ClassDefinition = serde_json::from_str(
        r#"{
            "name": "Malformed",
            "interfaces": [ { "name": "Able" } ],
            "fields": [ { "name": "foo", "ty": "int" } ],
            "constructors": [ { "sig": [], "body": { "stmts": [] } } ],
            "methods": [
                {
                    "name": "bar",
                    "sig": [],
                    "ret_ty": "int",
                    "body": { "stmts": [ { "return": { "field": "bar" } } ] }
                }
            ]
        }"#,
    )?;
    let src = fx.pool.insert(malformed)?;

    let err = fx.creator.mimic_class(&src, &fx.dst).unwrap_err();

    assert_eq!(err.phase, MimicPhase::Methods);
    assert!(matches!(err.cause, ClassModelError::UnknownField { ref field, .. } if field == "bar"));
    fx.dst.with_class(|c| {
        assert_eq!(c.interfaces().len(), 1);
        assert_eq!(c.fields().len(), 1);
        assert_eq!(c.constructors().len(), 1);
        assert!(c.methods().is_empty());
    });
    Ok(())
}
