//! Height-balanced (AVL) binary search tree that reports every structural change.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; the parent link is
//! a plain handle, so there are no reference cycles to reason about. Heights are not
//! cached, they are recomputed on demand by [`AvlTree::height`] and
//! [`AvlTree::balance_factor`].

mod insert;
mod node;
mod remove;
mod rotate;

use std::fmt::Debug;

use log::trace;

pub use node::{Node, NodeId, Side};
use node::Arena;

use crate::error::InvariantViolation;
use crate::step::{Shape, ShapeNode, Step, StepKind, StepSink};

// PROVE: a tree of height h holds at least F(h+2) - 1 nodes (F = fibonacci),
//        so h < 1.45 log₂(n+2)

pub struct AvlTree<K> {
    arena: Arena<K>,
    root: Option<NodeId>,
    len: usize,
}

/// Numbers the steps of one operation and forwards them to a sink.
struct Emitter<'s, S: ?Sized> {
    sink: &'s mut S,
    next: usize,
}

impl<'s, S: ?Sized> Emitter<'s, S> {
    fn new(sink: &'s mut S) -> Self {
        Self { sink, next: 0 }
    }
}

impl<K> AvlTree<K> {
    pub fn new() -> Self {
        Self { arena: Arena::new(), root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.arena[id].key)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.get(id)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        node::height(&self.arena, self.root)
    }

    /// `height(left) - height(right)` of the node behind `id`, 0 for `None`.
    pub fn balance_factor(&self, id: Option<NodeId>) -> isize {
        node::balance_factor(&self.arena, id)
    }

    /// In-order (ascending) iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter { tree: self, stack: Vec::new(), cur: self.root }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    /// Points whatever referred to `old` (its parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let p = &mut self.arena[p];
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    p.right = new;
                }
            }
        }
    }

    fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        if let Some((na, nb)) = self.arena.pair_mut(a, b) {
            std::mem::swap(&mut na.key, &mut nb.key);
        }
    }
}

impl<K: Clone> AvlTree<K> {
    /// Complete snapshot of the current shape, nodes in pre-order.
    pub fn shape(&self) -> Shape<K> {
        let mut nodes: Vec<ShapeNode<K>> = Vec::with_capacity(self.len);
        // (node, depth, slot, index of parent in `nodes`, side under that parent)
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 0, 0u64, None, Side::Left));
        }

        while let Some((id, depth, slot, parent, side)) = stack.pop() {
            let node = &self.arena[id];
            let here = nodes.len();
            nodes.push(ShapeNode { key: node.key.clone(), depth, slot, parent, left: None, right: None });
            if let Some(p) = parent {
                match side {
                    Side::Left => nodes[p].left = Some(here),
                    Side::Right => nodes[p].right = Some(here),
                }
            }
            // right pushed first so the left subtree is listed first
            if let Some(r) = node.right {
                stack.push((r, depth + 1, slot * 2 + 1, Some(here), Side::Right));
            }
            if let Some(l) = node.left {
                stack.push((l, depth + 1, slot * 2, Some(here), Side::Left));
            }
        }

        Shape { nodes }
    }

    /// Deep copy: same keys and shape, freshly allocated nodes, nothing shared.
    ///
    /// This is a plain clone and emits no steps.
    pub fn copy(&self) -> Self {
        let mut arena = Arena::with_capacity(self.len);
        let root = self.copy_subtree(self.root, None, &mut arena);
        Self { arena, root, len: self.len }
    }

    fn copy_subtree(&self, src: Option<NodeId>, parent: Option<NodeId>, dst: &mut Arena<K>) -> Option<NodeId> {
        let original = &self.arena[src?];
        let id = dst.alloc(Node::new(original.key.clone(), parent));
        let left = self.copy_subtree(original.left, Some(id), dst);
        let right = self.copy_subtree(original.right, Some(id), dst);
        dst[id].left = left;
        dst[id].right = right;
        Some(id)
    }
}

impl<K: Ord + Clone + Debug> AvlTree<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn find(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.arena[id];
            cur = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Records the current shape as the next step of the running operation.
    fn emit<S: StepSink<K> + ?Sized>(&self, out: &mut Emitter<'_, S>, kind: StepKind<K>) {
        trace!("step {}: {kind:?}", out.next);
        let step = Step { index: out.next, kind, shape: self.shape() };
        out.next += 1;
        out.sink.emit(step);
    }

    /// Walks the whole tree and reports the first broken invariant, if any.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(root) = self.root {
            if self.arena[root].parent.is_some() {
                return Err(InvariantViolation::RootHasParent);
            }
        }

        let mut reachable = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            reachable += 1;
            let factor = self.balance_factor(Some(id));
            if factor.abs() > 1 {
                return Err(InvariantViolation::Unbalanced { depth, factor });
            }
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                if self.arena[child].parent != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink { depth: depth + 1 });
                }
                stack.push((child, depth + 1));
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::LengthMismatch { reported: self.len, reachable });
        }

        let keys: Vec<&K> = self.iter().collect();
        if let Some(position) = keys.windows(2).position(|w| w[0] >= w[1]) {
            return Err(InvariantViolation::Unordered { position: position + 1 });
        }
        Ok(())
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K: Debug> Debug for AvlTree<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Two trees are equal when they hold the same keys in the same shape.
impl<K: PartialEq> PartialEq for AvlTree<K> {
    fn eq(&self, other: &Self) -> bool {
        fn same<K: PartialEq>(a: &AvlTree<K>, x: Option<NodeId>, b: &AvlTree<K>, y: Option<NodeId>) -> bool {
            match (x, y) {
                (None, None) => true,
                (Some(x), Some(y)) => {
                    let (nx, ny) = (&a.arena[x], &b.arena[y]);
                    nx.key == ny.key && same(a, nx.left, b, ny.left) && same(a, nx.right, b, ny.right)
                }
                _ => false,
            }
        }
        self.len == other.len && same(self, self.root, other, other.root)
    }
}

impl<K: Eq> Eq for AvlTree<K> {}

pub struct Iter<'a, K> {
    tree: &'a AvlTree<K>,
    stack: Vec<NodeId>,
    cur: Option<NodeId>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.tree;
        while let Some(id) = self.cur {
            self.stack.push(id);
            self.cur = tree.arena[id].left;
        }
        let id = self.stack.pop()?;
        let node = &tree.arena[id];
        self.cur = node.right;
        Some(&node.key)
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &str) -> AvlTree<char> {
        let mut tree = AvlTree::new();
        for key in keys.chars() {
            tree.insert(key, &mut ()).unwrap();
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree = AvlTree::<char>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root_key(), None);
        assert!(tree.shape().is_empty());
        assert!(tree.check_invariants().is_ok());
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn shape_lists_slots_in_preorder() {
        let tree = tree_of("DBFACEG");
        let shape = tree.shape();
        let keys: String = shape.nodes.iter().map(|n| n.key).collect();
        assert_eq!(keys, "DBACFEG");
        let slots: Vec<_> = shape.nodes.iter().map(|n| (n.depth, n.slot)).collect();
        assert_eq!(slots, vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (2, 2), (2, 3)]);
        assert_eq!(shape.nodes[4].parent, Some(0));
        assert_eq!(shape.nodes[0].right, Some(4));
    }

    #[test]
    fn copy_is_independent() {
        let mut original = tree_of("MFTBHPW");
        let mut copy = original.copy();
        assert_eq!(original, copy);
        assert_eq!(copy.shape(), original.shape());
        copy.check_invariants().unwrap();

        copy.remove(&'M', &mut ()).unwrap();
        copy.insert('A', &mut ()).unwrap();
        assert!(original.contains(&'M'));
        assert!(!original.contains(&'A'));
        assert_ne!(original, copy);

        original.remove(&'B', &mut ()).unwrap();
        assert!(copy.contains(&'B'));
    }

    #[test]
    fn copy_compacts_freed_slots() {
        let mut tree = tree_of("ABCDEFG");
        for key in "ACEG".chars() {
            tree.remove(&key, &mut ()).unwrap();
        }
        let copy = tree.copy();
        let max = copy.shape().nodes.len();
        assert_eq!(max, 3);
        assert!(copy.root().is_some_and(|r| r.index() < max));
        copy.check_invariants().unwrap();
    }

    #[test]
    fn find_and_iter() {
        let tree = tree_of("QWERTY");
        assert_eq!(tree.iter().collect::<String>(), "EQRTWY");
        let id = tree.find(&'R').unwrap();
        assert_eq!(tree.node(id).map(|n| *n.key()), Some('R'));
        assert!(tree.find(&'Z').is_none());
        assert_eq!(format!("{tree:?}"), "{'E', 'Q', 'R', 'T', 'W', 'Y'}");
    }

    #[test]
    fn invariant_checker_catches_corruption() {
        let mut tree = tree_of("BAC");
        let root = tree.root().unwrap();
        let left = tree.arena[root].left.unwrap();
        tree.arena[left].parent = None;
        assert_eq!(tree.check_invariants(), Err(InvariantViolation::BrokenParentLink { depth: 1 }));

        let mut tree = tree_of("BAC");
        let root = tree.root().unwrap();
        let (l, r) = (tree.arena[root].left.unwrap(), tree.arena[root].right.unwrap());
        tree.swap_keys(l, r);
        assert!(matches!(tree.check_invariants(), Err(InvariantViolation::Unordered { .. })));

        let mut tree = tree_of("BAC");
        tree.len = 4;
        assert!(matches!(tree.check_invariants(), Err(InvariantViolation::LengthMismatch { .. })));
    }
}
