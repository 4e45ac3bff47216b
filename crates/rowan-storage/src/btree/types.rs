//! Node and result types for the B+Tree index.

/// Index of a node inside a `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Result of an erase operation indicating whether rebalancing may be needed.
///
/// The tree never merges or redistributes nodes; `Underfull` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResult {
    /// Key was deleted and the leaf has sufficient entries.
    Ok,
    /// Key was deleted but the leaf is now below `MIN_FILL_FACTOR`.
    Underfull,
    /// Key was not found. Nothing changed.
    NotFound,
}

impl DeleteResult {
    /// Returns true if a key was removed.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        !matches!(self, DeleteResult::NotFound)
    }
}

/// Leaf node: sorted entries plus a link to the next leaf for range scans.
#[derive(Debug)]
pub(crate) struct LeafNode<K, V> {
    pub(crate) entries: Vec<(K, V)>,
    pub(crate) next_leaf: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_leaf: None,
        }
    }
}

/// Internal node.
///
/// `children.len() == keys.len() + 1`. Every key reachable through
/// `children[i]` is `>= keys[i - 1]` and `< keys[i]`.
#[derive(Debug)]
pub(crate) struct InternalNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Internal(InternalNode<K>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_result_is_deleted() {
        assert!(DeleteResult::Ok.is_deleted());
        assert!(DeleteResult::Underfull.is_deleted());
        assert!(!DeleteResult::NotFound.is_deleted());
    }

    #[test]
    fn test_new_leaf_is_empty() {
        let leaf: LeafNode<i64, u64> = LeafNode::new();
        assert!(leaf.entries.is_empty());
        assert!(leaf.next_leaf.is_none());
    }
}
