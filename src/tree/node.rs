use std::fmt;

/// Handle to a node slot inside an [`AvlTree`](super::AvlTree) arena.
///
/// Handles are only meaningful for the tree that produced them, and a handle to a
/// removed node may be handed out again by a later insertion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One stored key.
///
/// `left` and `right` are the owning edges of the tree (a node is freed exactly when
/// it is unlinked from its parent), `parent` is only a back-reference used while
/// rotating and is never followed to free anything.
#[derive(Debug, Clone)]
pub struct Node<K> {
    pub(super) key: K,
    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl<K> Node<K> {
    pub(super) fn new(key: K, parent: Option<NodeId>) -> Self {
        Self { key, left: None, right: None, parent }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(super) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Slot storage for nodes. Freed slots are recycled before the vector grows.
#[derive(Debug, Clone)]
pub(super) struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
}

impl<K> Arena<K> {
    pub(super) fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new() }
    }

    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), free: Vec::new() }
    }

    pub(super) fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(super) fn free(&mut self, id: NodeId) -> Option<Node<K>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(node)
    }

    pub(super) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Mutable access to two distinct live nodes at once.
    pub(super) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> Option<(&mut Node<K>, &mut Node<K>)> {
        if a == b { return None }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_node = head.get_mut(lo)?.as_mut()?;
        let hi_node = tail.get_mut(0)?.as_mut()?;
        if a.0 < b.0 {
            Some((lo_node, hi_node))
        } else {
            Some((hi_node, lo_node))
        }
    }
}

impl<K> std::ops::Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.slots[id.0] {
            Some(ref node) => node,
            None => panic!("dangling node handle {id:?}"),
        }
    }
}

impl<K> std::ops::IndexMut<NodeId> for Arena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots[id.0] {
            Some(ref mut node) => node,
            None => panic!("dangling node handle {id:?}"),
        }
    }
}

/// Height of the subtree rooted at `node`; an absent node has height 0.
///
/// Recomputed from scratch on every call, nothing is cached on the nodes.
pub(super) fn height<K>(arena: &Arena<K>, node: Option<NodeId>) -> usize {
    match node {
        None => 0,
        Some(id) => {
            let n = &arena[id];
            1 + height(arena, n.left).max(height(arena, n.right))
        }
    }
}

/// `height(left) - height(right)`; an absent node is balanced.
pub(super) fn balance_factor<K>(arena: &Arena<K>, node: Option<NodeId>) -> isize {
    match node {
        None => 0,
        Some(id) => {
            let n = &arena[id];
            height(arena, n.left) as isize - height(arena, n.right) as isize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new('A', None));
        let b = arena.alloc(Node::new('B', Some(a)));
        assert_eq!(arena.free(a).map(|n| n.key), Some('A'));
        assert!(arena.get(a).is_none());
        assert!(arena.free(a).is_none());

        let c = arena.alloc(Node::new('C', None));
        assert_eq!(c, a);
        assert_eq!(arena[b].parent, Some(a));
    }

    #[test]
    fn pair_mut_rejects_aliasing() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, None));
        let b = arena.alloc(Node::new(2, None));
        assert!(arena.pair_mut(a, a).is_none());

        let (nb, na) = arena.pair_mut(b, a).unwrap();
        std::mem::swap(&mut nb.key, &mut na.key);
        assert_eq!(arena[a].key, 2);
        assert_eq!(arena[b].key, 1);
    }

    #[test]
    fn height_and_balance_of_a_chain() {
        let mut arena = Arena::new();
        assert_eq!(height(&arena, None), 0);
        assert_eq!(balance_factor(&arena, None), 0);

        let a = arena.alloc(Node::new(1, None));
        let b = arena.alloc(Node::new(2, Some(a)));
        let c = arena.alloc(Node::new(3, Some(b)));
        arena[a].right = Some(b);
        arena[b].right = Some(c);

        assert_eq!(height(&arena, Some(a)), 3);
        assert_eq!(balance_factor(&arena, Some(a)), -2);
        assert_eq!(balance_factor(&arena, Some(b)), -1);
        assert_eq!(balance_factor(&arena, Some(c)), 0);
    }
}
