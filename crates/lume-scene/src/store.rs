//! The store surface consumed by call nodes.
//!
//! The scene store itself is an external collaborator; this module defines
//! the transaction-scoped resolver interface the core needs, the registry
//! records it resolves ([`FunctionDefinition`], [`Module`] with its
//! [`CodeDag`]), and a minimal in-memory implementation used by tests and
//! tools.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use lume_common::{Semantic, StoreError, Tag};
use lume_types::{Ty, TypeList};

use crate::call::FunctionCall;

/// Transaction-scoped, read-only access to the scene store.
///
/// All lookups are weak: a `None` result means the tag does not resolve in
/// this transaction. The core holds no ambient store state; every operation
/// that needs shared data takes a `&dyn Transaction`.
pub trait Transaction {
    /// Resolve a call node by tag.
    fn function_call(&self, tag: Tag) -> Option<&FunctionCall>;

    /// Resolve a function definition by tag.
    fn function_definition(&self, tag: Tag) -> Option<&FunctionDefinition>;

    /// Resolve a module by tag.
    fn module(&self, tag: Tag) -> Option<&Module>;

    /// Look up a definition tag by fully qualified name.
    fn definition_by_name(&self, name: &str) -> Option<Tag>;

    /// Like [`Transaction::function_definition`], for callers that need an
    /// error value.
    fn require_function_definition(&self, tag: Tag) -> Result<&FunctionDefinition, StoreError> {
        self.function_definition(tag).ok_or(StoreError::NotFound(tag))
    }

    /// Like [`Transaction::module`], for callers that need an error value.
    fn require_module(&self, tag: Tag) -> Result<&Module, StoreError> {
        self.module(tag).ok_or(StoreError::NotFound(tag))
    }
}

/// A callable definition as recorded by the definition registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// The module that owns this definition.
    pub module: Tag,
    /// Fully qualified name, e.g. `"::base::file_texture"`.
    pub name: String,
    pub semantic: Semantic,
    /// Position of this function in the owning module's code DAG.
    pub function_index: u32,
    pub parameter_types: TypeList,
    pub return_type: Ty,
}

/// One function entry in a module's compiled intermediate form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagFunction {
    /// Fully qualified name used for DAG call nodes.
    pub name: String,
    pub parameters: TypeList,
    pub return_type: Ty,
}

/// A module's compiled intermediate form: its function table, indexed by
/// `function_index`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeDag {
    functions: Vec<DagFunction>,
}

impl CodeDag {
    pub fn new() -> Self {
        CodeDag { functions: Vec::new() }
    }

    /// Append a function entry and return its index.
    pub fn add_function(&mut self, function: DagFunction) -> u32 {
        self.functions.push(function);
        (self.functions.len() - 1) as u32
    }

    pub fn function(&self, index: u32) -> Option<&DagFunction> {
        self.functions.get(index as usize)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// A module as seen by the lowering engine: a name and its code DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub code_dag: CodeDag,
}

// ── In-memory store ─────────────────────────────────────────────────────

/// A minimal in-memory store implementing [`Transaction`].
///
/// This is a reference implementation for tests and tools; the production
/// store lives outside this crate and only has to satisfy the trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    calls: FxHashMap<Tag, FunctionCall>,
    definitions: FxHashMap<Tag, FunctionDefinition>,
    modules: FxHashMap<Tag, Module>,
    next: u32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Allocate a fresh tag without storing anything under it yet. Used to
    /// build mutually referencing nodes.
    pub fn reserve_tag(&mut self) -> Tag {
        self.next += 1;
        Tag(self.next)
    }

    pub fn insert_call(&mut self, call: FunctionCall) -> Tag {
        let tag = self.reserve_tag();
        self.calls.insert(tag, call);
        tag
    }

    /// Store a call node under a previously reserved tag.
    pub fn insert_call_at(&mut self, tag: Tag, call: FunctionCall) {
        self.calls.insert(tag, call);
    }

    pub fn insert_definition(&mut self, definition: FunctionDefinition) -> Tag {
        let tag = self.reserve_tag();
        self.definitions.insert(tag, definition);
        tag
    }

    pub fn insert_module(&mut self, module: Module) -> Tag {
        let tag = self.reserve_tag();
        self.modules.insert(tag, module);
        tag
    }

    /// Mutable access to a stored call node, e.g. for rebinding arguments.
    pub fn call_mut(&mut self, tag: Tag) -> Option<&mut FunctionCall> {
        self.calls.get_mut(&tag)
    }
}

impl Transaction for InMemoryStore {
    fn function_call(&self, tag: Tag) -> Option<&FunctionCall> {
        self.calls.get(&tag)
    }

    fn function_definition(&self, tag: Tag) -> Option<&FunctionDefinition> {
        self.definitions.get(&tag)
    }

    fn module(&self, tag: Tag) -> Option<&Module> {
        self.modules.get(&tag)
    }

    fn definition_by_name(&self, name: &str) -> Option<Tag> {
        self.definitions
            .iter()
            .find(|(_, def)| def.name == name)
            .map(|(tag, _)| *tag)
    }
}
