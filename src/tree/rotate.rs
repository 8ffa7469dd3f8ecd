use std::fmt::Debug;

use log::{debug, warn};

use super::{AvlTree, Emitter, NodeId, Side};
use crate::step::{StepKind, StepSink};

impl<K: Ord + Clone + Debug> AvlTree<K> {
    /// Restores `|bf| <= 1` at `node`, assuming both of its subtrees already satisfy it.
    ///
    /// The inner child is only rotated first when it leans strictly towards the inside;
    /// an inner child with balance factor 0 gets the single rotation.
    pub(super) fn rebalance<S: StepSink<K> + ?Sized>(&mut self, node: NodeId, out: &mut Emitter<'_, S>) {
        let bf = self.balance_factor(Some(node));
        if bf > 1 {
            let left = self.arena[node].left;
            if self.balance_factor(left) < 0 {
                if let Some(left) = left {
                    self.rotate(left, Side::Left, out);
                }
            }
            self.rotate(node, Side::Right, out);
        } else if bf < -1 {
            let right = self.arena[node].right;
            if self.balance_factor(right) > 0 {
                if let Some(right) = right {
                    self.rotate(right, Side::Right, out);
                }
            }
            self.rotate(node, Side::Left, out);
        }
    }

    /// Single rotation of `x` towards `dir`.
    ///
    /// A left rotation lifts `x.right` (call it `y`) into `x`'s place, hangs `x` off
    /// `y.left` and moves `y`'s old left subtree to `x.right`. A right rotation is the
    /// mirror image. Emits one step; heights are left for the caller to worry about.
    pub(super) fn rotate<S: StepSink<K> + ?Sized>(&mut self, x: NodeId, dir: Side, out: &mut Emitter<'_, S>) {
        let (up, down) = match dir {
            Side::Left => (Side::Right, Side::Left),
            Side::Right => (Side::Left, Side::Right),
        };

        let Some(y) = self.arena[x].child(up) else {
            warn!("cannot rotate {dir:?} around {:?}: no {up:?} child", self.arena[x].key);
            return
        };

        // y's inner subtree changes sides
        let inner = self.arena[y].child(down);
        *self.arena[x].child_mut(up) = inner;
        if let Some(b) = inner {
            self.arena[b].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        *self.arena[y].child_mut(down) = Some(x);
        self.arena[x].parent = Some(y);

        let pivot = self.arena[x].key.clone();
        debug!("rotated {dir:?} around {pivot:?}");
        let kind = match dir {
            Side::Left => StepKind::RotatedLeft { pivot },
            Side::Right => StepKind::RotatedRight { pivot },
        };
        self.emit(out, kind);
    }
}
