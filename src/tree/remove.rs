use std::cmp::Ordering;
use std::fmt::Debug;

use log::debug;

use super::{AvlTree, Emitter, NodeId};
use crate::error::TreeError;
use crate::step::{StepKind, StepSink};

impl<K: Ord + Clone + Debug> AvlTree<K> {
    /// Removes `key`, or fails with [`TreeError::KeyNotFound`] leaving the tree as is.
    ///
    /// Nodes with children are never relinked: their key is swapped downwards (with
    /// the only child, or with the in-order successor) until it sits in a node that
    /// can simply be detached. So after a removal a given [`NodeId`] may hold a
    /// different key than before.
    pub fn remove<S: StepSink<K> + ?Sized>(&mut self, key: &K, sink: &mut S) -> Result<(), TreeError<K>> {
        debug!("remove {key:?}");
        let mut out = Emitter::new(sink);
        let root = self.root;
        self.remove_below(root, key, &mut out)
    }

    fn remove_below<S: StepSink<K> + ?Sized>(&mut self, node: Option<NodeId>, key: &K, out: &mut Emitter<'_, S>) -> Result<(), TreeError<K>> {
        let Some(id) = node else {
            return Err(TreeError::KeyNotFound(key.clone()));
        };

        match key.cmp(&self.arena[id].key) {
            Ordering::Less => self.remove_below(self.arena[id].left, key, out)?,
            Ordering::Greater => self.remove_below(self.arena[id].right, key, out)?,
            Ordering::Equal => self.remove_here(id, out)?,
        }

        // a detached leaf has nothing left to balance
        if self.arena.get(id).is_some() {
            self.rebalance(id, out);
        }
        Ok(())
    }

    fn remove_here<S: StepSink<K> + ?Sized>(&mut self, id: NodeId, out: &mut Emitter<'_, S>) -> Result<(), TreeError<K>> {
        let node = &self.arena[id];
        match (node.left, node.right) {
            (None, None) => {
                self.detach(id, out);
                Ok(())
            }
            (Some(child), None) | (None, Some(child)) => {
                self.swap_with(id, child, out);
                self.detach(child, out);
                Ok(())
            }
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let key = self.arena[id].key.clone();
                self.swap_with(id, successor, out);
                // the key now sits where the successor was, at the far left of `right`
                self.remove_below(Some(right), &key, out)
            }
        }
    }

    /// Swaps the keys of `node` and `other` and emits the resulting shape.
    fn swap_with<S: StepSink<K> + ?Sized>(&mut self, node: NodeId, other: NodeId, out: &mut Emitter<'_, S>) {
        self.swap_keys(node, other);
        let kind = StepKind::Swapped {
            removing: self.arena[other].key.clone(),
            replacement: self.arena[node].key.clone(),
        };
        self.emit(out, kind);
    }

    /// Unlinks the leaf `id` from its parent (or empties the tree) and frees it.
    fn detach<S: StepSink<K> + ?Sized>(&mut self, id: NodeId, out: &mut Emitter<'_, S>) {
        // an only child of a balanced node is always a leaf
        debug_assert!(self.arena[id].is_leaf(), "detaching a node with children");

        let parent = self.arena[id].parent;
        self.replace_child(parent, id, None);
        if let Some(node) = self.arena.free(id) {
            self.len -= 1;
            self.emit(out, StepKind::Detached { key: node.key });
        }
    }
}
