//! Shared leaf types for the Lume shading graph.
//!
//! Provides the opaque store identifier [`Tag`], the change-journal
//! classification [`JournalType`], the [`Semantic`] tag of an invoked
//! operation, and the store-level [`StoreError`].

pub mod error;
pub mod journal;
pub mod semantic;
pub mod tag;

pub use error::StoreError;
pub use journal::JournalType;
pub use semantic::Semantic;
pub use tag::Tag;
