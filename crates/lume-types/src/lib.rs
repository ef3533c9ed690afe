//! Type, value, and expression representation for the Lume shading graph.
//!
//! Defines the shading types with their uniform/varying qualifier lattice
//! ([`Ty`]), the structural compatibility predicate used by argument
//! binding ([`is_compatible`]), constant values ([`Value`]), argument
//! expressions ([`Expr`]), and the ordered named lists ([`TypeList`],
//! [`ExprList`]) that call nodes are built from.

pub mod expr;
pub mod ty;
pub mod value;

pub use expr::{Expr, ExprKind, ExprList};
pub use ty::{is_compatible, Qualifier, StructTy, Ty, TyKind, TypeList};
pub use value::Value;
