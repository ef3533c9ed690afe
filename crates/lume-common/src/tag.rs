//! Opaque store identifiers.
//!
//! Every element in the scene store is addressed by a [`Tag`]. Tags are
//! weak links: holding one never implies ownership, and resolving one may
//! fail if the referenced element has been removed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for an element in the scene store.
///
/// `Tag(0)` is reserved as the invalid tag. Elements that have not yet been
/// associated with a store entry (e.g. the owner module of a free-standing
/// default-argument template) carry [`Tag::INVALID`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub u32);

impl Tag {
    /// The reserved invalid tag.
    pub const INVALID: Tag = Tag(0);

    /// Whether this tag refers to a store element at all.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
