//! Argument expressions.
//!
//! An [`Expr`] is a closed tagged variant: a constant value, a reference to
//! a nested call node in the store, or a reference to a parameter slot.
//! Only constants and calls are legal bound arguments; parameter references
//! appear in enable-if guard conditions and are rejected by the binder.
//! Nested calls are weak [`Tag`] links resolved through the store, never
//! owned, so the argument graph can only cycle transiently.

use std::fmt;

use serde::{Deserialize, Serialize};

use lume_common::Tag;

use crate::ty::Ty;
use crate::value::Value;

/// An expression bound as a call argument or used in a guard condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A constant value.
    Constant(Value),
    /// A reference to another call node in the store. The static result
    /// type is recorded on the expression, as the referenced node is only
    /// resolvable through a transaction.
    Call { node: Tag, ty: Ty },
    /// A reference to a parameter slot of the enclosing definition.
    Parameter { index: usize, ty: Ty },
}

impl Expr {
    /// The static type of this expression.
    pub fn ty(&self) -> Ty {
        match self {
            Expr::Constant(value) => value.ty(),
            Expr::Call { ty, .. } => ty.clone(),
            Expr::Parameter { ty, .. } => ty.clone(),
        }
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Constant(_) => ExprKind::Constant,
            Expr::Call { .. } => ExprKind::Call,
            Expr::Parameter { .. } => ExprKind::Parameter,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Call { node, ty } => write!(f, "call {node}: {ty}"),
            Expr::Parameter { index, ty } => write!(f, "param {index}: {ty}"),
        }
    }
}

/// The discriminant of an [`Expr`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Constant,
    Call,
    Parameter,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Constant => write!(f, "constant"),
            ExprKind::Call => write!(f, "call"),
            ExprKind::Parameter => write!(f, "parameter"),
        }
    }
}

// ── Ordered named expression list ───────────────────────────────────────

/// An ordered mapping from name to expression.
///
/// Keys are unique; insertion order defines positional access. Cloning the
/// list clones every expression, so a clone shares nothing with the
/// original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExprList {
    entries: Vec<(String, Expr)>,
}

impl ExprList {
    pub fn new() -> Self {
        ExprList { entries: Vec::new() }
    }

    /// Append a named expression. Returns `false` (list unchanged) if the
    /// name is already present.
    pub fn add(&mut self, name: impl Into<String>, expr: Expr) -> bool {
        let name = name.into();
        if self.index(&name).is_some() {
            return false;
        }
        self.entries.push((name, expr));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expression at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&Expr> {
        self.entries.get(index).map(|(_, expr)| expr)
    }

    /// Expression under `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Expr> {
        self.index(name).map(|i| &self.entries[i].1)
    }

    /// Name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(name, _)| name.as_str())
    }

    /// Position of `name` in insertion order.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Replace the expression in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; callers resolve the slot first.
    pub fn set(&mut self, index: usize, expr: Expr) {
        self.entries[index].1 = expr;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|(n, expr)| (n.as_str(), expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_static_types() {
        let constant = Expr::Constant(Value::Float(2.0));
        assert_eq!(constant.ty(), Ty::float());
        assert_eq!(constant.kind(), ExprKind::Constant);

        let call = Expr::Call { node: Tag(3), ty: Ty::color().varying() };
        assert_eq!(call.ty(), Ty::color().varying());
        assert_eq!(call.kind(), ExprKind::Call);
    }

    #[test]
    fn expr_list_slot_replacement() {
        let mut list = ExprList::new();
        list.add("a", Expr::Constant(Value::Int(1)));
        list.add("b", Expr::Constant(Value::Int(2)));
        assert!(!list.add("b", Expr::Constant(Value::Int(3))));

        list.set(0, Expr::Constant(Value::Int(9)));
        assert_eq!(list.get(0), Some(&Expr::Constant(Value::Int(9))));
        assert_eq!(list.get_by_name("b"), Some(&Expr::Constant(Value::Int(2))));
        assert_eq!(list.index("a"), Some(0));
    }

    #[test]
    fn expr_list_clone_is_independent() {
        let mut list = ExprList::new();
        list.add("a", Expr::Constant(Value::Int(1)));
        let copy = list.clone();
        list.set(0, Expr::Constant(Value::Int(5)));
        assert_eq!(copy.get(0), Some(&Expr::Constant(Value::Int(1))));
    }
}
