//! Shading types and the compatibility predicate.
//!
//! A [`Ty`] pairs a structural [`TyKind`] with a [`Qualifier`] from the
//! uniform/varying lattice. Argument binding checks the structure with
//! [`is_compatible`] and the qualifier flow separately: varying values may
//! never flow into uniform-qualified slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The uniform/varying qualifier lattice.
///
/// `Uniform` values are constant across an evaluation batch, `Varying`
/// values may differ per instance, `Auto` leaves the decision to the
/// context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    /// No explicit qualifier; derived from use.
    #[default]
    Auto,
    /// Constant across an evaluation batch.
    Uniform,
    /// May differ per evaluation instance.
    Varying,
}

/// A struct type: a declared name plus ordered named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructTy {
    pub name: String,
    pub fields: Vec<(String, Ty)>,
}

impl StructTy {
    pub fn new(name: impl Into<String>, fields: Vec<(String, Ty)>) -> Self {
        StructTy { name: name.into(), fields }
    }
}

/// The structural part of a shading type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TyKind {
    Bool,
    Int,
    Float,
    String,
    /// A spectral/RGB color.
    Color,
    /// A named aggregate with ordered fields.
    Struct(StructTy),
}

impl fmt::Display for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TyKind::Bool => write!(f, "bool"),
            TyKind::Int => write!(f, "int"),
            TyKind::Float => write!(f, "float"),
            TyKind::String => write!(f, "string"),
            TyKind::Color => write!(f, "color"),
            TyKind::Struct(s) => write!(f, "{}", s.name),
        }
    }
}

/// A shading type: structure plus qualifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ty {
    pub kind: TyKind,
    pub qualifier: Qualifier,
}

impl Ty {
    pub fn new(kind: TyKind) -> Ty {
        Ty { kind, qualifier: Qualifier::Auto }
    }

    /// Create a `bool` type.
    pub fn bool() -> Ty {
        Ty::new(TyKind::Bool)
    }

    /// Create an `int` type.
    pub fn int() -> Ty {
        Ty::new(TyKind::Int)
    }

    /// Create a `float` type.
    pub fn float() -> Ty {
        Ty::new(TyKind::Float)
    }

    /// Create a `string` type.
    pub fn string() -> Ty {
        Ty::new(TyKind::String)
    }

    /// Create a `color` type.
    pub fn color() -> Ty {
        Ty::new(TyKind::Color)
    }

    /// Create a named struct type.
    pub fn struct_ty(name: impl Into<String>, fields: Vec<(String, Ty)>) -> Ty {
        Ty::new(TyKind::Struct(StructTy::new(name, fields)))
    }

    /// Mark this type uniform.
    pub fn uniform(mut self) -> Ty {
        self.qualifier = Qualifier::Uniform;
        self
    }

    /// Mark this type varying.
    pub fn varying(mut self) -> Ty {
        self.qualifier = Qualifier::Varying;
        self
    }

    pub fn is_uniform(&self) -> bool {
        self.qualifier == Qualifier::Uniform
    }

    pub fn is_varying(&self) -> bool {
        self.qualifier == Qualifier::Varying
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Qualifier::Auto => write!(f, "{}", self.kind),
            Qualifier::Uniform => write!(f, "uniform {}", self.kind),
            Qualifier::Varying => write!(f, "varying {}", self.kind),
        }
    }
}

/// Whether an argument of type `actual` may be bound to a slot of type
/// `expected`.
///
/// Pure and side-effect-free. Compares structure only; qualifiers are
/// ignored at every nesting level since qualifier flow is a separate check
/// in the binder.
pub fn is_compatible(actual: &Ty, expected: &Ty) -> bool {
    kinds_match(&actual.kind, &expected.kind)
}

fn kinds_match(actual: &TyKind, expected: &TyKind) -> bool {
    match (actual, expected) {
        (TyKind::Bool, TyKind::Bool)
        | (TyKind::Int, TyKind::Int)
        | (TyKind::Float, TyKind::Float)
        | (TyKind::String, TyKind::String)
        | (TyKind::Color, TyKind::Color) => true,
        (TyKind::Struct(a), TyKind::Struct(e)) => {
            a.name == e.name
                && a.fields.len() == e.fields.len()
                && a.fields
                    .iter()
                    .zip(&e.fields)
                    .all(|((an, at), (en, et))| an == en && kinds_match(&at.kind, &et.kind))
        }
        _ => false,
    }
}

// ── Ordered named type list ─────────────────────────────────────────────

/// An ordered mapping from parameter name to declared type.
///
/// Keys are unique; insertion order defines parameter order for positional
/// access. Parameter lists are small, so name lookup is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeList {
    entries: Vec<(String, Ty)>,
}

impl TypeList {
    pub fn new() -> Self {
        TypeList { entries: Vec::new() }
    }

    /// Append a named type. Returns `false` (list unchanged) if the name is
    /// already present.
    pub fn add(&mut self, name: impl Into<String>, ty: Ty) -> bool {
        let name = name.into();
        if self.index(&name).is_some() {
            return false;
        }
        self.entries.push((name, ty));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&Ty> {
        self.entries.get(index).map(|(_, ty)| ty)
    }

    /// Type under `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Ty> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Ty)> {
        self.entries.iter().map(|(n, ty)| (n.as_str(), ty))
    }
}
