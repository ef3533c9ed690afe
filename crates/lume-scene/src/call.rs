//! The call node and its argument binder.
//!
//! A [`FunctionCall`] records which definition it invokes, a snapshot of
//! the definition's parameter and return types taken at construction, the
//! bound argument expressions, and the shared enable-if guard conditions.
//! Copies get independent arguments but share the guard list, which is
//! never mutated.

use std::fmt::Write as _;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use lume_common::{JournalType, Semantic, Tag};
use lume_types::{is_compatible, Expr, ExprList, Ty, TypeList};

use crate::error::BindError;
use crate::store::Transaction;

/// A bound invocation of a callable definition.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    module: Tag,
    definition: Tag,
    function_index: u32,
    semantic: Semantic,
    definition_name: String,
    immutable: bool,
    parameter_types: TypeList,
    return_type: Ty,
    arguments: ExprList,
    enable_if_conditions: Arc<ExprList>,
}

impl Clone for FunctionCall {
    fn clone(&self) -> Self {
        FunctionCall {
            module: self.module,
            definition: self.definition,
            function_index: self.function_index,
            semantic: self.semantic,
            definition_name: self.definition_name.clone(),
            immutable: self.immutable,
            parameter_types: self.parameter_types.clone(),
            return_type: self.return_type.clone(),
            // Arguments are deep-cloned; the copy shares nothing.
            arguments: self.arguments.clone(),
            // Guard conditions are never mutated and stay shared.
            enable_if_conditions: Arc::clone(&self.enable_if_conditions),
        }
    }
}

impl FunctionCall {
    /// Construct a call node from a definition's metadata.
    ///
    /// `arguments` must supply an expression for every declared parameter
    /// and nothing else; violations surface as
    /// [`BindError::MissingArgument`] / [`BindError::UnknownParameter`].
    /// Argument types are not validated here; the external factory
    /// guarantees defaults match their parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        module: Tag,
        definition: Tag,
        function_index: u32,
        semantic: Semantic,
        definition_name: impl Into<String>,
        immutable: bool,
        parameter_types: TypeList,
        return_type: Ty,
        arguments: ExprList,
        enable_if_conditions: Arc<ExprList>,
    ) -> Result<Self, BindError> {
        for (name, _) in parameter_types.iter() {
            if arguments.get_by_name(name).is_none() {
                return Err(BindError::MissingArgument { parameter: name.to_string() });
            }
        }
        for (name, _) in arguments.iter() {
            if parameter_types.get_by_name(name).is_none() {
                return Err(BindError::UnknownParameter { parameter: name.to_string() });
            }
        }
        Ok(FunctionCall {
            module,
            definition,
            function_index,
            semantic,
            definition_name: definition_name.into(),
            immutable,
            parameter_types,
            return_type,
            arguments,
            enable_if_conditions,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Tag of the invoked definition.
    pub fn definition(&self) -> Tag {
        debug_assert!(self.definition.is_valid());
        self.definition
    }

    /// Tag of the owning module; invalid for free-standing default
    /// templates that have not been promoted yet.
    pub fn module(&self) -> Tag {
        self.module
    }

    pub fn function_index(&self) -> u32 {
        self.function_index
    }

    pub fn semantic(&self) -> Semantic {
        self.semantic
    }

    /// Fully qualified name of the invoked definition, fixed at
    /// construction. Used for diagnostics and DAG node naming.
    pub fn definition_name(&self) -> &str {
        &self.definition_name
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn return_type(&self) -> &Ty {
        &self.return_type
    }

    pub fn parameter_types(&self) -> &TypeList {
        &self.parameter_types
    }

    pub fn parameter_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn parameter_name(&self, index: usize) -> Option<&str> {
        self.arguments.name(index)
    }

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.arguments.index(name)
    }

    pub fn arguments(&self) -> &ExprList {
        &self.arguments
    }

    /// The bound argument for a parameter name.
    pub fn argument(&self, name: &str) -> Option<&Expr> {
        self.arguments.get_by_name(name)
    }

    pub fn enable_if_conditions(&self) -> &Arc<ExprList> {
        &self.enable_if_conditions
    }

    /// The definition's declared return type, resolved through the store.
    pub fn compiled_return_type<'a>(&self, txn: &'a dyn Transaction) -> Option<&'a Ty> {
        txn.function_definition(self.definition)
            .map(|def| &def.return_type)
    }

    /// The definition's declared parameter type at `index`, resolved
    /// through the store.
    pub fn compiled_parameter_type<'a>(
        &self,
        txn: &'a dyn Transaction,
        index: usize,
    ) -> Option<&'a Ty> {
        txn.function_definition(self.definition)
            .and_then(|def| def.parameter_types.get(index))
    }

    // ── Argument binding ────────────────────────────────────────────────

    /// Bind `argument` to the parameter slot at `index`.
    ///
    /// The validation pipeline runs in a fixed order and the first failing
    /// check wins; on failure the node is left unchanged. On success the
    /// expression is deep-cloned into the slot, severing aliasing with the
    /// caller's copy.
    pub fn set_argument(
        &mut self,
        txn: &dyn Transaction,
        index: usize,
        argument: &Expr,
    ) -> Result<(), BindError> {
        let expected = match self.parameter_types.get(index) {
            Some(ty) => ty,
            None => {
                return Err(BindError::UnknownParameter { parameter: index.to_string() });
            }
        };
        let parameter = || {
            self.parameter_types
                .name(index)
                .unwrap_or_default()
                .to_string()
        };

        let actual = argument.ty();
        if !is_compatible(&actual, expected) {
            return Err(BindError::TypeMismatch {
                parameter: parameter(),
                expected: expected.clone(),
                found: actual,
            });
        }
        if self.immutable {
            return Err(BindError::ImmutableNode);
        }
        if actual.is_varying() && expected.is_uniform() {
            return Err(BindError::VaryingIntoUniform { parameter: parameter() });
        }
        if !matches!(argument, Expr::Constant(_) | Expr::Call { .. }) {
            return Err(BindError::UnsupportedExpressionKind {
                parameter: parameter(),
                kind: argument.kind(),
            });
        }
        if expected.is_uniform()
            && effectively_varying(txn, argument, &mut FxHashSet::default())
        {
            return Err(BindError::EffectivelyVarying { parameter: parameter() });
        }

        self.arguments.set(index, argument.clone());
        Ok(())
    }

    /// Bind `argument` to the parameter named `name`.
    pub fn set_argument_by_name(
        &mut self,
        txn: &dyn Transaction,
        name: &str,
        argument: &Expr,
    ) -> Result<(), BindError> {
        let index = self
            .parameter_index(name)
            .ok_or_else(|| BindError::UnknownParameter { parameter: name.to_string() })?;
        self.set_argument(txn, index, argument)
    }

    /// Bind every entry of `arguments` in list order.
    ///
    /// Not transactional: binding stops at the first failure and earlier
    /// entries remain bound.
    pub fn set_arguments(
        &mut self,
        txn: &dyn Transaction,
        arguments: &ExprList,
    ) -> Result<(), BindError> {
        for (name, argument) in arguments.iter() {
            self.set_argument_by_name(txn, name, argument)?;
        }
        Ok(())
    }

    // ── Mutability promotion ────────────────────────────────────────────

    /// Promote an immutable default template to an editable call instance.
    ///
    /// Default templates owned by their module do not keep a module
    /// reference; it is resolved here from the definition. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if the module must be resolved and the definition is not in
    /// the store; a node promoted without a valid definition is a
    /// programming error, not a recoverable condition.
    pub fn make_mutable(&mut self, txn: &dyn Transaction) {
        if !self.module.is_valid() {
            let definition = txn
                .function_definition(self.definition)
                .expect("definition of a promoted call node must exist in the store");
            self.module = definition.module;
            debug_assert!(self.module.is_valid());
        }
        self.immutable = false;
    }

    // ── Store integration ───────────────────────────────────────────────

    /// Collect the tags of every store element this node references.
    ///
    /// Immutable default templates are owned by their module; reporting the
    /// module tag for them would create a reference cycle in the store's
    /// dependency graph, so it is included only for mutable nodes. Nested
    /// references held by referenced nodes are the store's job: it invokes
    /// the collector per element.
    pub fn collect_references(&self, result: &mut FxHashSet<Tag>) {
        if !self.immutable {
            debug_assert!(self.module.is_valid());
            result.insert(self.module);
        }
        collect_expr_references(&self.arguments, result);
        collect_expr_references(&self.enable_if_conditions, result);
    }

    /// Journal classification reported to the store whenever arguments are
    /// rebound.
    pub fn journal_flags(&self) -> JournalType {
        JournalType::CHANGE_SHADER_ATTRIBUTE
    }

    /// Exchange the full state of two nodes.
    pub fn swap(&mut self, other: &mut FunctionCall) {
        std::mem::swap(self, other);
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    /// Human-readable description of the node's state.
    pub fn describe(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "module tag: {}", self.module);
        let _ = writeln!(s, "definition tag: {}", self.definition);
        let _ = writeln!(s, "definition name: {:?}", self.definition_name);
        let _ = writeln!(s, "immutable: {}", self.immutable);
        let _ = writeln!(s, "arguments: {}", describe_list(&self.arguments));
        let _ = write!(
            s,
            "enable_if conditions: {}",
            describe_list(&self.enable_if_conditions)
        );
        s
    }

    /// Log the node's state at info level.
    pub fn dump(&self) {
        info!("{}", self.describe());
    }
}

fn describe_list(list: &ExprList) -> String {
    if list.is_empty() {
        return "<empty>".to_string();
    }
    let entries: Vec<String> = list
        .iter()
        .map(|(name, expr)| format!("{name} = {expr}"))
        .collect();
    entries.join(", ")
}

fn collect_expr_references(list: &ExprList, result: &mut FxHashSet<Tag>) {
    for (_, expr) in list.iter() {
        if let Expr::Call { node, .. } = expr {
            result.insert(*node);
        }
    }
}

/// Whether an expression's effective return behavior is varying.
///
/// A nested call may return a varying result even if its static type is
/// unqualified: with an auto-qualified return type the result is varying as
/// soon as any of its own arguments is. `visited` keeps the recursion
/// bounded on transiently cyclic argument graphs; cycles themselves are
/// only rejected at lowering time.
fn effectively_varying(txn: &dyn Transaction, expr: &Expr, visited: &mut FxHashSet<Tag>) -> bool {
    match expr {
        Expr::Constant(_) => false,
        Expr::Parameter { ty, .. } => ty.is_varying(),
        Expr::Call { node, ty } => {
            if ty.is_varying() {
                return true;
            }
            if ty.is_uniform() {
                return false;
            }
            if !visited.insert(*node) {
                return false;
            }
            let Some(call) = txn.function_call(*node) else {
                return false;
            };
            if call.return_type().is_varying() {
                return true;
            }
            if call.return_type().is_uniform() {
                return false;
            }
            call.arguments()
                .iter()
                .any(|(_, argument)| effectively_varying(txn, argument, visited))
        }
    }
}
