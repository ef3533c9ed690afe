//! The external code generator surface.
//!
//! The JIT backend is an external collaborator; the lowering engine only
//! needs string-keyed option configuration, two compile entry points, and a
//! name-resolution adapter bound to the current transaction.

use rustc_hash::FxHashMap;

use lume_common::Tag;
use lume_scene::Transaction;

use crate::dag::LambdaFunction;

/// Option key: place constant data in a read-only segment.
pub const OPTION_ENABLE_RO_SEGMENT: &str = "jit_enable_ro_segment";
/// Option key: derive bitangents in generated code.
pub const OPTION_USE_BITANGENT: &str = "jit_use_bitangent";
/// Option key: backend optimization level.
pub const OPTION_OPT_LEVEL: &str = "jit_opt_level";
/// Option key: allow fast-math transformations.
pub const OPTION_FAST_MATH: &str = "jit_fast_math";

/// String-keyed code generator options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: FxHashMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Handle to a function produced by a code generator backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    name: String,
}

impl CompiledFunction {
    pub fn new(name: impl Into<String>) -> Self {
        CompiledFunction { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolves fully qualified call names to store tags during compilation.
pub trait CallResolver {
    fn resolve(&self, name: &str) -> Option<Tag>;
}

/// A [`CallResolver`] bound to a store transaction.
pub struct TransactionResolver<'a> {
    txn: &'a dyn Transaction,
}

impl<'a> TransactionResolver<'a> {
    pub fn new(txn: &'a dyn Transaction) -> Self {
        TransactionResolver { txn }
    }
}

impl CallResolver for TransactionResolver<'_> {
    fn resolve(&self, name: &str) -> Option<Tag> {
        self.txn.definition_by_name(name)
    }
}

/// The JIT code generator backend.
///
/// Both compile entry points return `None` when the backend cannot produce
/// a function; the lowering engine maps that to
/// [`LowerError::CompileFailed`](crate::lower::LowerError::CompileFailed).
pub trait CodeGenerator {
    /// Mutable access to the generator's option set.
    fn options(&mut self) -> &mut Options;

    /// Compile a lambda function as a switch function (root slots).
    fn compile_switch_function(
        &mut self,
        lambda: &LambdaFunction,
        resolver: &dyn CallResolver,
    ) -> Option<CompiledFunction>;

    /// Compile a lambda function as an environment function (single body).
    fn compile_environment(
        &mut self,
        lambda: &LambdaFunction,
        resolver: &dyn CallResolver,
    ) -> Option<CompiledFunction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_set_and_get() {
        let mut options = Options::new();
        options.set(OPTION_OPT_LEVEL, "2");
        assert_eq!(options.get(OPTION_OPT_LEVEL), Some("2"));
        assert_eq!(options.get(OPTION_FAST_MATH), None);
    }
}
