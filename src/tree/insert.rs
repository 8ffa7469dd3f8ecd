use std::cmp::Ordering;
use std::fmt::Debug;

use log::debug;

use super::{AvlTree, Emitter, Node, NodeId, Side};
use crate::error::TreeError;
use crate::step::{StepKind, StepSink};

impl<K: Ord + Clone + Debug> AvlTree<K> {
    /// Inserts `key`, emitting one step for the new node and one per rotation.
    ///
    /// A key that is already present is rejected with [`TreeError::DuplicateKey`]
    /// before anything changes.
    pub fn insert<S: StepSink<K> + ?Sized>(&mut self, key: K, sink: &mut S) -> Result<(), TreeError<K>> {
        debug!("insert {key:?}");
        let mut out = Emitter::new(sink);
        match self.root {
            None => {
                let id = self.arena.alloc(Node::new(key.clone(), None));
                self.root = Some(id);
                self.len += 1;
                self.emit(&mut out, StepKind::Placed { key });
                Ok(())
            }
            Some(root) => self.insert_below(root, key, &mut out),
        }
    }

    fn insert_below<S: StepSink<K> + ?Sized>(&mut self, node: NodeId, key: K, out: &mut Emitter<'_, S>) -> Result<(), TreeError<K>> {
        let side = match key.cmp(&self.arena[node].key) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Err(TreeError::DuplicateKey(key)),
        };

        match self.arena[node].child(side) {
            Some(child) => self.insert_below(child, key, out)?,
            None => {
                let id = self.arena.alloc(Node::new(key.clone(), Some(node)));
                *self.arena[node].child_mut(side) = Some(id);
                self.len += 1;
                self.emit(out, StepKind::Placed { key });
            }
        }

        // unwinding the recursion visits every ancestor, nearest first
        self.rebalance(node, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::step::{Step, StepKind};
    use crate::AvlTree;

    #[test]
    fn first_key_becomes_root() {
        let mut tree = AvlTree::new();
        let mut steps: Vec<Step<char>> = Vec::new();
        tree.insert('M', &mut steps).unwrap();
        assert_eq!(tree.root_key(), Some(&'M'));
        assert_eq!(tree.len(), 1);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].index, 0);
        assert_eq!(steps[0].kind, StepKind::Placed { key: 'M' });
        assert_eq!(steps[0].shape.len(), 1);
    }

    #[test]
    fn duplicate_is_rejected_without_steps() {
        let mut tree = AvlTree::new();
        tree.insert('A', &mut ()).unwrap();
        let before = tree.shape();

        let mut steps: Vec<Step<char>> = Vec::new();
        assert_eq!(tree.insert('A', &mut steps), Err(TreeError::DuplicateKey('A')));
        assert!(steps.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.shape(), before);
    }

    #[test]
    fn deep_duplicate_is_rejected() {
        let mut tree = AvlTree::new();
        for key in "HDLBFJN".chars() {
            tree.insert(key, &mut ()).unwrap();
        }
        let before = tree.copy();
        assert_eq!(tree.insert('F', &mut ()), Err(TreeError::DuplicateKey('F')));
        assert_eq!(tree, before);
    }

    #[test]
    fn step_indices_count_up_per_operation() {
        let mut tree = AvlTree::new();
        for key in "AB".chars() {
            tree.insert(key, &mut ()).unwrap();
        }
        let mut steps = Vec::new();
        tree.insert('C', &mut steps).unwrap();
        let indices: Vec<usize> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
        // the placement snapshot still shows the unbalanced chain
        assert_eq!(steps[0].shape.height(), 3);
        assert_eq!(steps[1].shape.height(), 2);
    }

    #[test]
    fn alphabet_stays_balanced() {
        let mut tree = AvlTree::new();
        for key in 'A'..='Z' {
            tree.insert(key, &mut ()).unwrap();
            tree.check_invariants().unwrap();
        }
        assert_eq!(tree.len(), 26);
        // 26 nodes fit in height 5 (31 slots) and AVL allows at most 6
        assert!(tree.height() <= 6);
        assert_eq!(tree.iter().copied().collect::<String>(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }

    #[test]
    fn integer_keys() {
        let mut tree = AvlTree::new();
        for key in [50, 20, 80, 10, 30, 25] {
            tree.insert(key, &mut ()).unwrap();
        }
        // 25 unbalances 50 through its left child 20 which leans right
        assert_eq!(tree.root_key(), Some(&30));
        tree.check_invariants().unwrap();
    }
}
