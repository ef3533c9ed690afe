//! Store-level errors.

use std::fmt;

use crate::tag::Tag;

/// Error returned by store lookups that require the element to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No element is stored under the given tag.
    NotFound(Tag),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(tag) => write!(f, "no store element under tag {tag}"),
        }
    }
}

impl std::error::Error for StoreError {}
