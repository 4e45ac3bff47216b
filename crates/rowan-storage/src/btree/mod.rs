//! In-memory B+ tree index.
//!
//! [`OrderedIndex`] is a generic ordered map used for both the unique primary
//! key index and the non-unique secondary key index of the storage engine.
//!
//! ## Layout
//!
//! Nodes live in a Vec-backed arena and reference each other by [`NodeId`]:
//!
//! ```text
//!                 [ Internal: k0 | k1 ]
//!                /         |          \
//!   [ Leaf: <k0 ] -> [ Leaf: k0..k1 ] -> [ Leaf: >=k1 ] -> None
//! ```
//!
//! - Internal nodes hold separator keys and `keys.len() + 1` children.
//! - Leaves hold sorted `(key, value)` entries and a `next_leaf` link, so a
//!   range scan descends once and then walks the leaf chain.
//! - Overfull leaves and internal nodes split in half; a root split grows the
//!   tree by one level.
//! - Erase removes from the leaf only. Nodes are never merged, and emptied
//!   leaves stay linked in the chain.

mod arena;
pub mod index;
pub mod types;

pub use index::{Iter, OrderedIndex};
pub use types::{DeleteResult, NodeId};
