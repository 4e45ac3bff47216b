//! Arena-backed generic B+Tree index.

use super::arena::NodeArena;
use super::types::{DeleteResult, InternalNode, LeafNode, Node, NodeId};
use rowan_common::{IndexConfig, Result};
use std::cell::Cell;
use std::cmp::Ordering;
use std::ops::ControlFlow;

/// Ordered map from `K` to `V` backed by a B+Tree.
///
/// Each key maps to exactly one value. Every key-vs-key comparison made by a
/// lookup, insert, erase or range scan bumps an instrumentation counter that
/// callers read with [`comparisons`](Self::comparisons) and zero with
/// [`reset_metrics`](Self::reset_metrics).
///
/// The counter lives in a `Cell` so read paths can take `&self`; the index is
/// therefore not `Sync`.
pub struct OrderedIndex<K, V> {
    /// Node storage.
    arena: NodeArena<K, V>,
    /// Root node (a leaf while height == 1).
    root: NodeId,
    /// Tree height (1 = just root as leaf).
    height: usize,
    /// Number of live entries.
    len: usize,
    config: IndexConfig,
    comparisons: Cell<u64>,
}

impl<K: Ord + Clone, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Creates an empty index with default node capacities.
    pub fn new() -> Self {
        Self::build(IndexConfig::default())
    }

    /// Creates an empty index after validating `config`.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: IndexConfig) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.allocate(Node::Leaf(LeafNode::new()));
        Self {
            arena,
            root,
            height: 1,
            len: 0,
            config,
            comparisons: Cell::new(0),
        }
    }

    /// Returns the number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the tree height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of nodes allocated, including emptied leaves.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Key comparisons performed since the last [`reset_metrics`](Self::reset_metrics).
    #[inline]
    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    /// Zeroes the comparison counter.
    #[inline]
    pub fn reset_metrics(&self) {
        self.comparisons.set(0);
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Returns the value stored under `key`.
    pub fn find(&self, key: &K) -> Option<&V> {
        let leaf_id = self.descend(key, None);
        let leaf = self.leaf(leaf_id);
        match self.search_leaf(leaf, key) {
            Ok(pos) => Some(&leaf.entries[pos].1),
            Err(_) => None,
        }
    }

    /// Returns a mutable handle to the value stored under `key`.
    ///
    /// Counts comparisons exactly like [`find`](Self::find).
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf_id = self.descend(key, None);
        let pos = self.search_leaf(self.leaf(leaf_id), key).ok()?;
        Some(&mut self.leaf_mut(leaf_id).entries[pos].1)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Calls `visitor` for every entry with `lo <= key <= hi`, in ascending
    /// key order. An inverted range (`lo > hi`) visits nothing.
    pub fn range_apply<'a, F>(&'a self, lo: &K, hi: &K, mut visitor: F)
    where
        F: FnMut(&'a K, &'a V),
    {
        if self.compare(lo, hi) == Ordering::Greater {
            return;
        }

        self.scan_from(lo, |k, v| {
            if self.compare(k, hi) == Ordering::Greater {
                return ControlFlow::Break(());
            }
            visitor(k, v);
            ControlFlow::Continue(())
        });
    }

    /// Calls `visitor` for every entry with `key >= lo`, in ascending key
    /// order, until the visitor breaks.
    pub fn scan_from<'a, F>(&'a self, lo: &K, mut visitor: F)
    where
        F: FnMut(&'a K, &'a V) -> ControlFlow<()>,
    {
        let start_leaf = self.descend(lo, None);
        let mut start = self
            .leaf(start_leaf)
            .entries
            .partition_point(|(k, _)| self.compare(k, lo) == Ordering::Less);
        let mut current = Some(start_leaf);

        // Leaves to the right of the start leaf only hold keys >= lo.
        while let Some(id) = current {
            let leaf = self.leaf(id);
            for (k, v) in &leaf.entries[start..] {
                if visitor(k, v).is_break() {
                    return;
                }
            }
            start = 0;
            current = leaf.next_leaf;
        }
    }

    /// Collects every entry in `[lo, hi]` in ascending key order.
    pub fn range_collect(&self, lo: &K, hi: &K) -> Vec<(&K, &V)> {
        let mut results = Vec::new();
        self.range_apply(lo, hi, |k, v| results.push((k, v)));
        results
    }

    /// Iterates every entry in ascending key order. Does not count comparisons.
    ///
    /// Erase never reclaims leaves, so the walk visits every leaf ever
    /// allocated. Its cost follows the number of keys ever inserted, not
    /// [`len`](Self::len).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            index: self,
            leaf: Some(self.leftmost_leaf()),
            pos: 0,
        }
    }

    /// Returns the smallest key, if any.
    ///
    /// Skips leaves emptied by erase. Does not count comparisons.
    pub fn first_key(&self) -> Option<&K> {
        self.edge_key(self.root, false)
    }

    /// Returns the largest key, if any.
    ///
    /// Skips leaves emptied by erase. Does not count comparisons.
    pub fn last_key(&self) -> Option<&K> {
        self.edge_key(self.root, true)
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Inserts `key` with `value`.
    ///
    /// If the key already exists its value is overwritten and the previous
    /// value returned; the entry count does not change. The index never
    /// rejects a duplicate, so callers that need uniqueness must check first.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Vec::with_capacity(self.height);
        let leaf_id = self.descend(&key, Some(&mut path));

        match self.search_leaf(self.leaf(leaf_id), &key) {
            Ok(pos) => {
                let slot = &mut self.leaf_mut(leaf_id).entries[pos].1;
                Some(std::mem::replace(slot, value))
            }
            Err(pos) => {
                let leaf_capacity = self.config.leaf_capacity;
                let leaf = self.leaf_mut(leaf_id);
                leaf.entries.insert(pos, (key, value));
                let overflow = leaf.entries.len() > leaf_capacity;
                self.len += 1;

                if overflow {
                    self.split_leaf(leaf_id, path);
                }
                None
            }
        }
    }

    /// Removes `key` if present.
    ///
    /// Nodes are never merged. A non-root leaf that drops below the minimum
    /// fill factor is reported as [`DeleteResult::Underfull`].
    pub fn erase(&mut self, key: &K) -> DeleteResult {
        let leaf_id = self.descend(key, None);
        let Ok(pos) = self.search_leaf(self.leaf(leaf_id), key) else {
            return DeleteResult::NotFound;
        };

        let min_entries = self.config.min_leaf_entries();
        let is_root = leaf_id == self.root;
        let leaf = self.leaf_mut(leaf_id);
        leaf.entries.remove(pos);
        let remaining = leaf.entries.len();
        self.len -= 1;

        if !is_root && remaining < min_entries {
            DeleteResult::Underfull
        } else {
            DeleteResult::Ok
        }
    }

    /// Splits an overfull leaf and pushes the new separator upward.
    fn split_leaf(&mut self, leaf_id: NodeId, path: Vec<(NodeId, usize)>) {
        let leaf = self.leaf_mut(leaf_id);
        let split_point = leaf.entries.len() / 2;
        let right_entries = leaf.entries.split_off(split_point);
        let next_leaf = leaf.next_leaf;

        // First key of the new right leaf
        let separator = right_entries[0].0.clone();

        let right_id = self.arena.allocate(Node::Leaf(LeafNode {
            entries: right_entries,
            next_leaf,
        }));
        self.leaf_mut(leaf_id).next_leaf = Some(right_id);

        self.propagate_split(separator, leaf_id, right_id, path);
    }

    /// Inserts `separator`/`right` into each ancestor on `path`, splitting
    /// internal nodes as needed and growing a new root if the old one splits.
    fn propagate_split(
        &mut self,
        mut separator: K,
        mut left: NodeId,
        mut right: NodeId,
        mut path: Vec<(NodeId, usize)>,
    ) {
        let internal_capacity = self.config.internal_capacity;

        while let Some((parent_id, slot)) = path.pop() {
            let parent = self.internal_mut(parent_id);
            parent.keys.insert(slot, separator);
            parent.children.insert(slot + 1, right);

            if parent.keys.len() <= internal_capacity {
                return;
            }

            let mid = parent.keys.len() / 2;
            let right_keys = parent.keys.split_off(mid + 1);
            let right_children = parent.children.split_off(mid + 1);
            separator = parent.keys.remove(mid);

            left = parent_id;
            right = self.arena.allocate(Node::Internal(InternalNode {
                keys: right_keys,
                children: right_children,
            }));
        }

        let new_root = self.arena.allocate(Node::Internal(InternalNode {
            keys: vec![separator],
            children: vec![left, right],
        }));
        self.root = new_root;
        self.height += 1;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.comparisons.set(self.comparisons.get() + 1);
        a.cmp(b)
    }

    /// Walks from the root to the leaf responsible for `key`, optionally
    /// recording each internal node and the child slot taken.
    fn descend(&self, key: &K, mut path: Option<&mut Vec<(NodeId, usize)>>) -> NodeId {
        let mut current = self.root;
        loop {
            match self.arena.get(current) {
                Node::Leaf(_) => return current,
                Node::Internal(node) => {
                    // Child slot = number of separators <= key
                    let slot = node
                        .keys
                        .partition_point(|sep| self.compare(sep, key) != Ordering::Greater);
                    if let Some(path) = path.as_deref_mut() {
                        path.push((current, slot));
                    }
                    current = node.children[slot];
                }
            }
        }
    }

    #[inline]
    fn search_leaf(&self, leaf: &LeafNode<K, V>, key: &K) -> std::result::Result<usize, usize> {
        leaf.entries.binary_search_by(|(k, _)| self.compare(k, key))
    }

    /// First (or last, when `from_right`) key stored under `id`, trying
    /// children outward-in so empty subtrees are passed over.
    fn edge_key(&self, id: NodeId, from_right: bool) -> Option<&K> {
        match self.arena.get(id) {
            Node::Leaf(leaf) => {
                let entry = if from_right {
                    leaf.entries.last()
                } else {
                    leaf.entries.first()
                };
                entry.map(|(k, _)| k)
            }
            Node::Internal(node) => {
                if from_right {
                    node.children.iter().rev().find_map(|&c| self.edge_key(c, true))
                } else {
                    node.children.iter().find_map(|&c| self.edge_key(c, false))
                }
            }
        }
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Internal(node) = self.arena.get(current) {
            current = node.children[0];
        }
        current
    }

    fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self.arena.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("node {id:?} is not a leaf"),
        }
    }

    fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self.arena.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("node {id:?} is not a leaf"),
        }
    }

    fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        match self.arena.get_mut(id) {
            Node::Internal(node) => node,
            Node::Leaf(_) => unreachable!("node {id:?} is not an internal node"),
        }
    }
}

/// Ascending iterator over an [`OrderedIndex`], following the leaf chain.
pub struct Iter<'a, K, V> {
    index: &'a OrderedIndex<K, V>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K: Ord + Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        while let Some(id) = self.leaf {
            let leaf = index.leaf(id);
            if let Some((k, v)) = leaf.entries.get(self.pos) {
                self.pos += 1;
                return Some((k, v));
            }
            self.leaf = leaf.next_leaf;
            self.pos = 0;
        }
        None
    }
}
