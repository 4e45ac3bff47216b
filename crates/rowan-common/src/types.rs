//! Record identifiers.

use serde::{Deserialize, Serialize};

/// Record identifier: the slot a record occupies in the record heap.
///
/// RIDs are assigned sequentially from 0 and are never reused, including
/// after the record they name is logically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rid(pub u64);

impl Rid {
    /// Creates a RID from a heap slot index.
    #[inline]
    pub fn from_slot(slot: usize) -> Self {
        Rid(slot as u64)
    }

    /// Returns the heap slot index this RID names.
    #[inline]
    pub fn as_slot(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Rid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rid:{}", self.0)
    }
}
