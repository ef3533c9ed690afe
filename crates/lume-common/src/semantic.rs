//! Semantic classification of invoked operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of operation a call invokes.
///
/// The lowering engine uses this to choose code paths: intrinsics may be
/// folded, field accesses select a struct member, ordinary calls become DAG
/// call nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semantic {
    /// No known classification.
    #[default]
    Unknown,
    /// An ordinary call of a user-defined function.
    Call,
    /// A struct field access.
    FieldAccess,
    /// A built-in intrinsic.
    Intrinsic,
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantic::Unknown => write!(f, "unknown"),
            Semantic::Call => write!(f, "call"),
            Semantic::FieldAccess => write!(f, "field access"),
            Semantic::Intrinsic => write!(f, "intrinsic"),
        }
    }
}
