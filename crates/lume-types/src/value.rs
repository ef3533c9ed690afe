//! Constant values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ty::Ty;

/// A constant shading value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// An RGB color triple.
    Color([f32; 3]),
}

impl Value {
    /// The static type of this value. Literal constants carry no qualifier.
    pub fn ty(&self) -> Ty {
        match self {
            Value::Bool(_) => Ty::bool(),
            Value::Int(_) => Ty::int(),
            Value::Float(_) => Ty::float(),
            Value::String(_) => Ty::string(),
            Value::Color(_) => Ty::color(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Color([r, g, b]) => write!(f, "color({r}, {g}, {b})"),
        }
    }
}
