//! Call nodes, argument binding, and persistence for the Lume shading graph.
//!
//! A [`FunctionCall`] is the persisted record "invoke definition D with
//! these bound arguments". This crate owns the node itself, the argument
//! binder with its validation pipeline, mutability promotion, the byte
//! codec used by the store, and the dependency collector that feeds the
//! store's reference counting and change journal.

pub mod call;
pub mod error;
pub mod serial;
pub mod store;

pub use call::FunctionCall;
pub use error::BindError;
pub use serial::{deserialize, serialize, CodecError};
pub use store::{CodeDag, DagFunction, FunctionDefinition, InMemoryStore, Module, Transaction};
