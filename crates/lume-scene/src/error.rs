//! Argument binding errors.
//!
//! All binding errors are locally recoverable: the binder leaves the node
//! unchanged and returns the specific reason, which callers surface to the
//! user.

use std::fmt;

use lume_types::{ExprKind, Ty};

/// Why an argument could not be bound.
#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    /// No expression was supplied for a declared parameter.
    MissingArgument { parameter: String },
    /// The name or index does not resolve to a declared parameter.
    UnknownParameter { parameter: String },
    /// The argument's type is structurally incompatible with the parameter.
    TypeMismatch {
        parameter: String,
        expected: Ty,
        found: Ty,
    },
    /// The node is an immutable default template; promote it first.
    ImmutableNode,
    /// A varying argument cannot flow into a uniform parameter.
    VaryingIntoUniform { parameter: String },
    /// Only constants and nested calls may be bound as arguments.
    UnsupportedExpressionKind { parameter: String, kind: ExprKind },
    /// The argument's effective return behavior is varying although the
    /// parameter is uniform.
    EffectivelyVarying { parameter: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::MissingArgument { parameter } => {
                write!(f, "no argument supplied for parameter `{parameter}`")
            }
            BindError::UnknownParameter { parameter } => {
                write!(f, "unknown parameter `{parameter}`")
            }
            BindError::TypeMismatch {
                parameter,
                expected,
                found,
            } => {
                write!(
                    f,
                    "type mismatch on parameter `{parameter}`: expected `{expected}`, found `{found}`"
                )
            }
            BindError::ImmutableNode => {
                write!(f, "cannot bind arguments of an immutable call node")
            }
            BindError::VaryingIntoUniform { parameter } => {
                write!(
                    f,
                    "varying argument cannot be bound to uniform parameter `{parameter}`"
                )
            }
            BindError::UnsupportedExpressionKind { parameter, kind } => {
                write!(
                    f,
                    "{kind} expression cannot be bound to parameter `{parameter}`; only constants and calls are accepted"
                )
            }
            BindError::EffectivelyVarying { parameter } => {
                write!(
                    f,
                    "argument for uniform parameter `{parameter}` is effectively varying"
                )
            }
        }
    }
}

impl std::error::Error for BindError {}
