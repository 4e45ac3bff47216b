//! Arena allocation for B+Tree nodes.

use super::types::{Node, NodeId};

/// Vec-backed arena for B+Tree nodes.
///
/// Nodes are allocated sequentially and addressed by `NodeId`, which maps
/// directly to a Vec index. Nodes are never freed: deletes leave emptied
/// leaves in place, so every id handed out stays valid for the arena's life.
pub(crate) struct NodeArena<K, V> {
    nodes: Vec<Node<K, V>>,
}

impl<K, V> NodeArena<K, V> {
    /// Creates an empty arena.
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Stores `node` and returns its id.
    #[inline]
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
