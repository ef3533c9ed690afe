//! Integration tests for the argument binder.
//!
//! These tests exercise:
//! - The validation pipeline order (first failing check wins)
//! - The uniform/varying qualifier rule and effective-varying analysis
//! - Immutable template nodes and mutability promotion
//! - Non-transactional bulk binding semantics

use std::sync::Arc;

use lume_common::{Semantic, Tag};
use lume_scene::{BindError, FunctionCall, FunctionDefinition, InMemoryStore};
use lume_types::{Expr, ExprKind, ExprList, Ty, TypeList, Value};

// ── Helpers ────────────────────────────────────────────────────────────

/// Parameter list of the worked example: `f(a: uniform float, b: varying float)`.
fn example_params() -> TypeList {
    let mut params = TypeList::new();
    params.add("a", Ty::float().uniform());
    params.add("b", Ty::float().varying());
    params
}

/// Default arguments: float literals for both parameters.
fn example_args() -> ExprList {
    let mut args = ExprList::new();
    args.add("a", Expr::Constant(Value::Float(0.0)));
    args.add("b", Expr::Constant(Value::Float(0.0)));
    args
}

/// A call node for the worked example definition.
fn example_call(immutable: bool) -> FunctionCall {
    FunctionCall::new(
        Tag(1),
        Tag(2),
        0,
        Semantic::Call,
        "::test::f",
        immutable,
        example_params(),
        Ty::color(),
        example_args(),
        Arc::new(ExprList::new()),
    )
    .expect("example call node must construct")
}

fn empty_store() -> InMemoryStore {
    InMemoryStore::new()
}

// ── Construction invariants ────────────────────────────────────────────

/// Every declared parameter needs an initial argument.
#[test]
fn construction_rejects_missing_argument() {
    let mut args = ExprList::new();
    args.add("a", Expr::Constant(Value::Float(0.0)));
    let err = FunctionCall::new(
        Tag(1),
        Tag(2),
        0,
        Semantic::Call,
        "::test::f",
        false,
        example_params(),
        Ty::color(),
        args,
        Arc::new(ExprList::new()),
    )
    .unwrap_err();
    assert_eq!(err, BindError::MissingArgument { parameter: "b".into() });
}

/// Arguments for undeclared parameters are rejected at construction.
#[test]
fn construction_rejects_unknown_argument() {
    let mut args = example_args();
    args.add("c", Expr::Constant(Value::Float(0.0)));
    let err = FunctionCall::new(
        Tag(1),
        Tag(2),
        0,
        Semantic::Call,
        "::test::f",
        false,
        example_params(),
        Ty::color(),
        args,
        Arc::new(ExprList::new()),
    )
    .unwrap_err();
    assert_eq!(err, BindError::UnknownParameter { parameter: "c".into() });
}

// ── The validation pipeline ────────────────────────────────────────────

/// Constant float literals bind to both parameters of the worked example.
#[test]
fn bind_constants_succeeds() {
    let store = empty_store();
    let mut call = example_call(false);
    call.set_argument(&store, 0, &Expr::Constant(Value::Float(1.5))).unwrap();
    call.set_argument_by_name(&store, "b", &Expr::Constant(Value::Float(2.5)))
        .unwrap();
    assert_eq!(call.argument("a"), Some(&Expr::Constant(Value::Float(1.5))));
    assert_eq!(call.argument("b"), Some(&Expr::Constant(Value::Float(2.5))));
}

/// A structurally incompatible argument is rejected with the parameter's
/// expected and found types.
#[test]
fn bind_rejects_type_mismatch() {
    let store = empty_store();
    let mut call = example_call(false);
    let err = call
        .set_argument(&store, 0, &Expr::Constant(Value::Int(1)))
        .unwrap_err();
    assert_eq!(
        err,
        BindError::TypeMismatch {
            parameter: "a".into(),
            expected: Ty::float().uniform(),
            found: Ty::int(),
        }
    );
    insta::assert_snapshot!(err.to_string(), @"type mismatch on parameter `a`: expected `uniform float`, found `int`");
    // The failed bind leaves the node unchanged.
    assert_eq!(call.argument("a"), Some(&Expr::Constant(Value::Float(0.0))));
}

/// Unknown names and out-of-range indices never mutate the node.
#[test]
fn bind_rejects_unknown_parameter() {
    let store = empty_store();
    let mut call = example_call(false);
    let arg = Expr::Constant(Value::Float(1.0));
    assert_eq!(
        call.set_argument_by_name(&store, "c", &arg).unwrap_err(),
        BindError::UnknownParameter { parameter: "c".into() }
    );
    assert_eq!(
        call.set_argument(&store, 5, &arg).unwrap_err(),
        BindError::UnknownParameter { parameter: "5".into() }
    );
}

/// Binding to an immutable template always fails, regardless of argument.
#[test]
fn bind_rejects_immutable_node() {
    let store = empty_store();
    let mut call = example_call(true);
    let err = call
        .set_argument(&store, 1, &Expr::Constant(Value::Float(1.0)))
        .unwrap_err();
    assert_eq!(err, BindError::ImmutableNode);
}

/// The type check precedes the mutability check: an immutable node with an
/// incompatible argument reports the mismatch, not the immutability.
#[test]
fn type_check_precedes_immutability_check() {
    let store = empty_store();
    let mut call = example_call(true);
    let err = call
        .set_argument(&store, 0, &Expr::Constant(Value::Int(1)))
        .unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { .. }));
}

/// A statically varying argument cannot flow into the uniform parameter.
#[test]
fn bind_rejects_varying_into_uniform() {
    let store = empty_store();
    let mut call = example_call(false);
    let varying_call = Expr::Call { node: Tag(9), ty: Ty::float().varying() };
    let err = call.set_argument(&store, 0, &varying_call).unwrap_err();
    assert_eq!(err, BindError::VaryingIntoUniform { parameter: "a".into() });
    // The varying parameter accepts the same expression.
    let mut call = example_call(false);
    call.set_argument(&store, 1, &varying_call).unwrap();
}

/// Only constants and calls are accepted as bound arguments.
#[test]
fn bind_rejects_parameter_expression() {
    let store = empty_store();
    let mut call = example_call(false);
    let err = call
        .set_argument(&store, 1, &Expr::Parameter { index: 0, ty: Ty::float() })
        .unwrap_err();
    assert_eq!(
        err,
        BindError::UnsupportedExpressionKind {
            parameter: "b".into(),
            kind: ExprKind::Parameter,
        }
    );
}

/// A nested call with an unqualified return type is effectively varying as
/// soon as one of its own arguments is, and is rejected for a uniform
/// parameter.
#[test]
fn bind_rejects_effectively_varying_argument() {
    let mut store = empty_store();
    let mut inner_params = TypeList::new();
    inner_params.add("x", Ty::float().varying());
    let mut inner_args = ExprList::new();
    inner_args.add("x", Expr::Call { node: Tag(99), ty: Ty::float().varying() });
    let inner = FunctionCall::new(
        Tag(1),
        Tag(2),
        0,
        Semantic::Call,
        "::test::g",
        false,
        inner_params,
        Ty::float(),
        inner_args,
        Arc::new(ExprList::new()),
    )
    .unwrap();
    let inner_tag = store.insert_call(inner);

    let mut call = example_call(false);
    let err = call
        .set_argument(&store, 0, &Expr::Call { node: inner_tag, ty: Ty::float() })
        .unwrap_err();
    assert_eq!(err, BindError::EffectivelyVarying { parameter: "a".into() });

    // The same nested call binds to the varying parameter.
    let mut call = example_call(false);
    call.set_argument(&store, 1, &Expr::Call { node: inner_tag, ty: Ty::float() })
        .unwrap();
}

/// A nested call with a uniform static return type passes the effective
/// analysis without store traversal.
#[test]
fn uniform_static_type_is_never_effectively_varying() {
    let store = empty_store();
    let mut call = example_call(false);
    call.set_argument(&store, 0, &Expr::Call { node: Tag(7), ty: Ty::float().uniform() })
        .unwrap();
}

// ── Bulk binding ───────────────────────────────────────────────────────

/// `set_arguments` is not transactional: the entries before the failing
/// one stay bound, the rest are untouched.
#[test]
fn set_arguments_applies_prefix_on_failure() {
    let store = empty_store();
    let mut call = example_call(false);
    let mut bulk = ExprList::new();
    bulk.add("a", Expr::Constant(Value::Float(3.0)));
    bulk.add("b", Expr::Constant(Value::Int(4)));
    let err = call.set_arguments(&store, &bulk).unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { .. }));
    assert_eq!(call.argument("a"), Some(&Expr::Constant(Value::Float(3.0))));
    assert_eq!(call.argument("b"), Some(&Expr::Constant(Value::Float(0.0))));
}

/// A fully valid bulk bind replaces every entry.
#[test]
fn set_arguments_binds_all_entries() {
    let store = empty_store();
    let mut call = example_call(false);
    let mut bulk = ExprList::new();
    bulk.add("a", Expr::Constant(Value::Float(3.0)));
    bulk.add("b", Expr::Constant(Value::Float(4.0)));
    call.set_arguments(&store, &bulk).unwrap();
    assert_eq!(call.argument("b"), Some(&Expr::Constant(Value::Float(4.0))));
}

// ── Mutability promotion ───────────────────────────────────────────────

/// Promotion resolves the owner module from the definition and clears the
/// immutability flag; promoting again is a no-op.
#[test]
fn make_mutable_resolves_module_and_is_idempotent() {
    let mut store = empty_store();
    let module_tag = store.reserve_tag();
    let definition_tag = store.insert_definition(FunctionDefinition {
        module: module_tag,
        name: "::test::f".into(),
        semantic: Semantic::Call,
        function_index: 0,
        parameter_types: example_params(),
        return_type: Ty::color(),
    });

    let mut call = FunctionCall::new(
        Tag::INVALID,
        definition_tag,
        0,
        Semantic::Call,
        "::test::f",
        true,
        example_params(),
        Ty::color(),
        example_args(),
        Arc::new(ExprList::new()),
    )
    .unwrap();

    call.make_mutable(&store);
    assert!(!call.is_immutable());
    assert_eq!(call.module(), module_tag);

    call.make_mutable(&store);
    assert_eq!(call.module(), module_tag);

    // The promoted node accepts bindings.
    call.set_argument(&store, 0, &Expr::Constant(Value::Float(1.0))).unwrap();
}

// ── Copy semantics ─────────────────────────────────────────────────────

/// A clone gets independent arguments but shares the guard-condition list.
#[test]
fn clone_deep_copies_arguments_and_shares_guards() {
    let store = empty_store();
    let mut guards = ExprList::new();
    guards.add("a", Expr::Parameter { index: 1, ty: Ty::float().varying() });
    let guards = Arc::new(guards);

    let mut call = FunctionCall::new(
        Tag(1),
        Tag(2),
        0,
        Semantic::Call,
        "::test::f",
        false,
        example_params(),
        Ty::color(),
        example_args(),
        Arc::clone(&guards),
    )
    .unwrap();

    let copy = call.clone();
    assert!(Arc::ptr_eq(copy.enable_if_conditions(), &guards));

    call.set_argument(&store, 0, &Expr::Constant(Value::Float(7.0))).unwrap();
    assert_eq!(copy.argument("a"), Some(&Expr::Constant(Value::Float(0.0))));
}

// ── Diagnostics ────────────────────────────────────────────────────────

/// The dump format lists every persisted field.
#[test]
fn describe_lists_node_state() {
    let call = example_call(false);
    assert_eq!(
        call.describe(),
        "module tag: #1\n\
         definition tag: #2\n\
         definition name: \"::test::f\"\n\
         immutable: false\n\
         arguments: a = 0, b = 0\n\
         enable_if conditions: <empty>"
    );
}

/// The journal classification is fixed.
#[test]
fn journal_flags_report_shader_attribute_change() {
    use lume_common::JournalType;
    let call = example_call(false);
    assert!(call
        .journal_flags()
        .contains(JournalType::CHANGE_SHADER_ATTRIBUTE));
}

/// `swap` exchanges the full state of two nodes.
#[test]
fn swap_exchanges_state() {
    let mut a = example_call(false);
    let mut b = example_call(true);
    a.swap(&mut b);
    assert!(a.is_immutable());
    assert!(!b.is_immutable());
}
