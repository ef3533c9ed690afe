//! Change-journal classifications.
//!
//! The store's change-notification mechanism asks every element which class
//! of change its mutations belong to. Call nodes always report
//! [`JournalType::CHANGE_SHADER_ATTRIBUTE`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A bit set of change classifications consumed by the store's journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalType(pub u32);

impl JournalType {
    /// No change recorded.
    pub const NONE: JournalType = JournalType(0);
    /// A shader or material attribute changed (arguments rebound).
    pub const CHANGE_SHADER_ATTRIBUTE: JournalType = JournalType(1 << 0);

    /// Whether all bits of `other` are set in `self`.
    pub fn contains(self, other: JournalType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for JournalType {
    type Output = JournalType;

    fn bitor(self, rhs: JournalType) -> JournalType {
        JournalType(self.0 | rhs.0)
    }
}

impl fmt::Display for JournalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "journal({:#x})", self.0)
    }
}
