//! Arena-backed AVL tree: an ordered map with logarithmic lookup and insertion.
//!
//! Nodes live in a generational arena and link to their children by index.
//! There are no parent links: insertion and removal recurse down the tree and
//! each call returns the (possibly rotated) root of its subtree, which the
//! caller stores back into its own child slot.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Handle to a node of an [`AvlTree`].
///
/// A position is a plain value; all navigation goes through the tree's accessor
/// methods. Positions are invalidated by any mutation of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(Index);

/// Tree node in the arena.
#[derive(Debug, Clone)]
struct AvlNode<K, V> {
    key: K,
    value: V,
    /// Height of the subtree rooted here; a leaf has height 1
    height: usize,
    left: Option<Index>,
    right: Option<Index>,
}

impl<K, V> AvlNode<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }
}

/// Self-balancing binary search tree keyed by `K`.
///
/// Keys are unique and kept in ascending `Ord` order. For every node the
/// heights of its two subtrees differ by at most one.
#[derive(Debug, Clone)]
pub struct AvlTree<K, V> {
    arena: Arena<AvlNode<K, V>>,
    root: Option<Index>,
}

impl<K: Ord, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    /// Insert `value` under `key`.
    ///
    /// An existing key keeps its node and gets the new value; the previous value
    /// is returned. A new key becomes a leaf and every ancestor is rebalanced on
    /// the way back up.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, previous) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        previous
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        removed
    }

    /// Descend from the root to the node holding `key`.
    pub fn lookup<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(Position(idx)),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).and_then(|pos| self.value(pos))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).is_some()
    }

    pub fn root(&self) -> Option<Position> {
        self.root.map(Position)
    }

    pub fn left(&self, pos: Position) -> Option<Position> {
        self.arena.get(pos.0).and_then(|node| node.left).map(Position)
    }

    pub fn right(&self, pos: Position) -> Option<Position> {
        self.arena.get(pos.0).and_then(|node| node.right).map(Position)
    }

    pub fn key(&self, pos: Position) -> Option<&K> {
        self.arena.get(pos.0).map(|node| &node.key)
    }

    pub fn value(&self, pos: Position) -> Option<&V> {
        self.arena.get(pos.0).map(|node| &node.value)
    }

    /// Stored height of the subtree rooted at `pos`.
    pub fn height_of(&self, pos: Position) -> Option<usize> {
        self.arena.get(pos.0).map(|node| node.height)
    }

    /// In-order iterator over `(key, value)` pairs.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    // ------------------------------------------------------------
    // insertion and removal
    // ------------------------------------------------------------

    fn insert_at(&mut self, node: Option<Index>, key: K, value: V) -> (Index, Option<V>) {
        let Some(idx) = node else {
            return (self.arena.insert(AvlNode::leaf(key, value)), None);
        };

        match key.cmp(&self.arena[idx].key) {
            Ordering::Equal => {
                let previous = mem::replace(&mut self.arena[idx].value, value);
                return (idx, Some(previous));
            }
            Ordering::Less => {
                let left = self.arena[idx].left;
                let (child, previous) = self.insert_at(left, key, value);
                self.arena[idx].left = Some(child);
                if previous.is_some() {
                    return (idx, previous);
                }
            }
            Ordering::Greater => {
                let right = self.arena[idx].right;
                let (child, previous) = self.insert_at(right, key, value);
                self.arena[idx].right = Some(child);
                if previous.is_some() {
                    return (idx, previous);
                }
            }
        }

        (self.rebalance(idx), None)
    }

    fn remove_at<Q>(&mut self, node: Option<Index>, key: &Q) -> (Option<Index>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(idx) = node else {
            return (None, None);
        };

        match key.cmp(self.arena[idx].key.borrow()) {
            Ordering::Less => {
                let left = self.arena[idx].left;
                let (child, removed) = self.remove_at(left, key);
                self.arena[idx].left = child;
                if removed.is_none() {
                    return (Some(idx), None);
                }
                (Some(self.rebalance(idx)), removed)
            }
            Ordering::Greater => {
                let right = self.arena[idx].right;
                let (child, removed) = self.remove_at(right, key);
                self.arena[idx].right = child;
                if removed.is_none() {
                    return (Some(idx), None);
                }
                (Some(self.rebalance(idx)), removed)
            }
            Ordering::Equal => {
                let Some(removed) = self.arena.remove(idx) else {
                    return (None, None);
                };
                let replacement = match (removed.left, removed.right) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        // in-order successor takes the removed node's place
                        let (rest, successor) = self.detach_min(right);
                        self.arena[successor].left = Some(left);
                        self.arena[successor].right = rest;
                        Some(self.rebalance(successor))
                    }
                };
                (replacement, Some(removed.value))
            }
        }
    }

    /// Unlink the leftmost node of the subtree at `idx`.
    /// Returns the rebalanced remainder of the subtree and the detached node.
    fn detach_min(&mut self, idx: Index) -> (Option<Index>, Index) {
        match self.arena[idx].left {
            None => (self.arena[idx].right.take(), idx),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.arena[idx].left = rest;
                (Some(self.rebalance(idx)), min)
            }
        }
    }

    // ------------------------------------------------------------
    // balancing
    // ------------------------------------------------------------

    fn subtree_height(&self, node: Option<Index>) -> usize {
        node.and_then(|idx| self.arena.get(idx))
            .map_or(0, |node| node.height)
    }

    fn balance_of(&self, node: &AvlNode<K, V>) -> isize {
        self.subtree_height(node.left) as isize - self.subtree_height(node.right) as isize
    }

    fn update_height(&mut self, idx: Index) {
        let node = &self.arena[idx];
        let height = 1 + self
            .subtree_height(node.left)
            .max(self.subtree_height(node.right));
        self.arena[idx].height = height;
    }

    /// Refresh the height at `idx` and restore the AVL invariant there.
    /// Returns the index now rooting this subtree.
    fn rebalance(&mut self, idx: Index) -> Index {
        self.update_height(idx);
        let balance = self.balance_of(&self.arena[idx]);

        if balance > 1 {
            if let Some(left) = self.arena[idx].left {
                if self.balance_of(&self.arena[left]) < 0 {
                    // left-right
                    let child = self.rotate_left(left);
                    self.arena[idx].left = Some(child);
                }
            }
            // left-left
            return self.rotate_right(idx);
        }

        if balance < -1 {
            if let Some(right) = self.arena[idx].right {
                if self.balance_of(&self.arena[right]) > 0 {
                    // right-left
                    let child = self.rotate_right(right);
                    self.arena[idx].right = Some(child);
                }
            }
            // right-right
            return self.rotate_left(idx);
        }

        idx
    }

    ///```text
    ///       y            x
    ///      / \          / \
    ///     x   c  ==>   a   y
    ///    / \              / \
    ///   a   b            b   c
    ///```
    fn rotate_right(&mut self, y: Index) -> Index {
        let Some(x) = self.arena[y].left else {
            return y;
        };
        self.arena[y].left = self.arena[x].right;
        self.arena[x].right = Some(y);
        self.update_height(y);
        self.update_height(x);
        x
    }

    ///```text
    ///     x                y
    ///    / \              / \
    ///   a   y     ==>    x   c
    ///      / \          / \
    ///     b   c        a   b
    ///```
    fn rotate_left(&mut self, x: Index) -> Index {
        let Some(y) = self.arena[x].right else {
            return x;
        };
        self.arena[x].right = self.arena[y].left;
        self.arena[y].left = Some(x);
        self.update_height(x);
        self.update_height(y);
        y
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}

/// In-order iterator; the stack holds the path of nodes whose left side is done.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<AvlNode<K, V>>,
    stack: Vec<Index>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(tree: &'a AvlTree<K, V>) -> Self {
        let mut iter = Self {
            arena: &tree.arena,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<Index>) {
        while let Some(idx) = node {
            self.stack.push(idx);
            node = self.arena.get(idx).and_then(|n| n.left);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let idx = self.stack.pop()?;
        let node = arena.get(idx)?;
        self.push_left_spine(node.right);
        Some((&node.key, &node.value))
    }
}
