//! The graph lowering engine.
//!
//! Turns a fully bound call node into a compiled function for either the
//! switch/root context or the environment context. Argument conversion is
//! the system's only cycle-detection point: a reference cycle in the
//! argument graph surfaces here as [`LowerError::ConversionFailed`], never
//! at bind time.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::error;

use lume_common::{Semantic, Tag};
use lume_scene::{FunctionCall, Transaction};
use lume_types::{Expr, StructTy, Ty, TyKind, Value};

use crate::config::JitConfig;
use crate::dag::{CallArgument, DagNodeId, LambdaContext, LambdaFunction};
use crate::generator::{
    CodeGenerator, CompiledFunction, TransactionResolver, OPTION_ENABLE_RO_SEGMENT,
    OPTION_FAST_MATH, OPTION_OPT_LEVEL, OPTION_USE_BITANGENT,
};

/// The single struct return type accepted by the legacy two-field shim.
pub const LEGACY_TEXTURE_RETURN: &str = "::base::texture_return";

/// Scene-to-shading unit conversion parameters threaded through argument
/// conversion for unit-aware intrinsics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pub meters_per_scene_unit: f32,
    pub wavelength_min: f32,
    pub wavelength_max: f32,
}

impl Default for UnitScale {
    fn default() -> Self {
        UnitScale {
            meters_per_scene_unit: 1.0,
            wavelength_min: 380.0,
            wavelength_max: 780.0,
        }
    }
}

/// Why lowering/compilation failed. No partial output is ever produced.
///
/// Callers may map these to integers for logging, but the codes carry no
/// magnitude ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    /// No code generator backend is available.
    NoCodeGenerator,
    /// The definition's return type is neither `color` nor the recognized
    /// legacy two-field shape.
    UnsupportedReturnType { ty: Ty },
    /// An argument could not be converted into a DAG node: a type
    /// mismatch, an unresolvable reference, or a cycle in the argument
    /// graph.
    ConversionFailed { call: String },
    /// The backend did not produce a compiled function.
    CompileFailed,
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::NoCodeGenerator => write!(f, "no JIT code generator available"),
            LowerError::UnsupportedReturnType { ty } => {
                write!(f, "unsupported return type for lowering: {ty}")
            }
            LowerError::ConversionFailed { call } => {
                write!(f, "failed to convert arguments of call to {call}")
            }
            LowerError::CompileFailed => write!(f, "code generator failed to compile"),
        }
    }
}

impl std::error::Error for LowerError {}

/// Lower `call` into a DAG and compile it for `context`.
///
/// The accepted return shapes form a narrow allow-list: a plain `color`,
/// or the historical two-field aggregate `(color, float)` declared as
/// [`LEGACY_TEXTURE_RETURN`], whose first field is extracted after the
/// call so environment/displacement functions still receive a bare color.
///
/// # Panics
///
/// Panics if the call's definition, owning module, or function index do
/// not resolve; a node handed to lowering with dangling links violates the
/// call-node contract.
pub fn lower_and_compile(
    call: &FunctionCall,
    txn: &dyn Transaction,
    generator: Option<&mut dyn CodeGenerator>,
    context: LambdaContext,
    config: &JitConfig,
    units: UnitScale,
) -> Result<CompiledFunction, LowerError> {
    let Some(generator) = generator else {
        return Err(LowerError::NoCodeGenerator);
    };

    // Return-shape gate; checked before anything is compiled.
    let definition = txn
        .function_definition(call.definition())
        .expect("definition of a lowered call node must exist in the store");
    let return_type = &definition.return_type;
    let legacy_struct = check_return_shape(return_type)?;

    let module = txn
        .module(call.module())
        .expect("owner module of a lowered call node must exist in the store");
    let function = module
        .code_dag
        .function(call.function_index())
        .expect("function index of a lowered call node must be in its module's code DAG");

    let mut lambda = LambdaFunction::new(context);

    let options = generator.options();
    options.set(OPTION_ENABLE_RO_SEGMENT, "true");
    options.set(OPTION_USE_BITANGENT, "true");
    if let Some(level) = config.jit_opt_level {
        options.set(OPTION_OPT_LEVEL, level.to_string());
    }
    if let Some(fast_math) = config.jit_fast_math {
        options.set(OPTION_FAST_MATH, if fast_math { "true" } else { "false" });
    }

    // Convert every bound argument into a DAG node, in parameter order.
    let mut arguments = Vec::with_capacity(function.parameters.len());
    let mut path = FxHashSet::default();
    for (parameter_name, _) in function.parameters.iter() {
        let converted = call
            .argument(parameter_name)
            .and_then(|argument| expr_to_dag(txn, &mut lambda, argument, &units, &mut path));
        let Some(node) = converted else {
            error!(
                call = call.definition_name(),
                "type mismatch, unresolvable reference, or cycle in the graph rooted at the call"
            );
            return Err(LowerError::ConversionFailed {
                call: call.definition_name().to_string(),
            });
        };
        arguments.push(CallArgument { name: parameter_name.to_string(), node });
    }

    let mut result = lambda.create_call(
        &function.name,
        definition.semantic,
        arguments,
        return_type.clone(),
    );

    // Legacy two-field result: extract the leading color field so the
    // compiled contract still yields a bare color.
    if let Some(s) = legacy_struct {
        let (field_name, field_ty) = &s.fields[0];
        let select_name = format!("{}.{}({})", s.name, field_name, s.name);
        result = lambda.create_call(
            select_name,
            Semantic::FieldAccess,
            vec![CallArgument { name: "s".into(), node: result }],
            field_ty.clone(),
        );
    }

    match context {
        LambdaContext::Switch => {
            let slot = lambda.store_root_expr(result);
            debug_assert_eq!(slot, 0);
        }
        LambdaContext::Environment => lambda.set_body(result),
    }

    let resolver = TransactionResolver::new(txn);
    let compiled = match context {
        LambdaContext::Switch => generator.compile_switch_function(&lambda, &resolver),
        LambdaContext::Environment => generator.compile_environment(&lambda, &resolver),
    };
    compiled.ok_or(LowerError::CompileFailed)
}

/// Validate the return type against the accepted shapes.
///
/// Returns the struct type when the legacy shim applies, `None` for a
/// plain color. This is a deliberate allow-list on (field count, field
/// kinds, declared name), not structural typing: an unrelated two-field
/// struct must not slip through.
fn check_return_shape(return_type: &Ty) -> Result<Option<&StructTy>, LowerError> {
    match &return_type.kind {
        TyKind::Color => Ok(None),
        TyKind::Struct(s)
            if s.name == LEGACY_TEXTURE_RETURN
                && s.fields.len() == 2
                && matches!(s.fields[0].1.kind, TyKind::Color)
                && matches!(s.fields[1].1.kind, TyKind::Float) =>
        {
            Ok(Some(s))
        }
        _ => Err(LowerError::UnsupportedReturnType { ty: return_type.clone() }),
    }
}

/// Convert one bound expression into a DAG node.
///
/// `path` holds the call tags on the current traversal path; revisiting
/// one means the argument graph cycles through this expression, which is a
/// conversion failure. Tags are removed again on the way out, so diamond
/// sharing converts fine.
fn expr_to_dag(
    txn: &dyn Transaction,
    lambda: &mut LambdaFunction,
    expr: &Expr,
    units: &UnitScale,
    path: &mut FxHashSet<Tag>,
) -> Option<DagNodeId> {
    match expr {
        Expr::Constant(value) => Some(lambda.create_constant(value.clone())),
        Expr::Call { node, .. } => {
            if !path.insert(*node) {
                return None;
            }
            let nested = txn.function_call(*node);
            let converted = nested.and_then(|call| call_to_dag(txn, lambda, call, units, path));
            path.remove(node);
            converted
        }
        Expr::Parameter { .. } => None,
    }
}

/// Convert a nested call node into a DAG call node.
fn call_to_dag(
    txn: &dyn Transaction,
    lambda: &mut LambdaFunction,
    call: &FunctionCall,
    units: &UnitScale,
    path: &mut FxHashSet<Tag>,
) -> Option<DagNodeId> {
    // Unit-aware state intrinsics fold to constants from the scene's unit
    // conversion parameters.
    if call.semantic() == Semantic::Intrinsic {
        let folded = match call.definition_name() {
            "::state::meters_per_scene_unit" => Some(units.meters_per_scene_unit),
            "::state::wavelength_min" => Some(units.wavelength_min),
            "::state::wavelength_max" => Some(units.wavelength_max),
            _ => None,
        };
        if let Some(value) = folded {
            return Some(lambda.create_constant(Value::Float(value as f64)));
        }
    }

    let mut arguments = Vec::with_capacity(call.parameter_count());
    for (name, expr) in call.arguments().iter() {
        let node = expr_to_dag(txn, lambda, expr, units, path)?;
        arguments.push(CallArgument { name: name.to_string(), node });
    }
    Some(lambda.create_call(
        call.definition_name(),
        call.semantic(),
        arguments,
        call.return_type().clone(),
    ))
}
