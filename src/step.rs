//! Observable steps of a tree mutation.
//!
//! Every atomic structural change (placing a node, swapping two keys, detaching a
//! leaf, one single rotation) produces exactly one [`Step`], carrying a complete
//! [`Shape`] of the tree right after the change. The tree itself never waits; the
//! steps are handed to a [`StepSink`] in order and pacing is left to whoever
//! consumes them (see [`crate::sequencer`]).

use serde::Serialize;

/// What happened in a single atomic change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind<K> {
    /// A new node holding `key` was created in an empty slot.
    Placed { key: K },
    /// Two nodes exchanged keys; `removing` now sits where `replacement` used to.
    Swapped { removing: K, replacement: K },
    /// The node holding `key` was unlinked and freed.
    Detached { key: K },
    /// Left rotation around the node that held `pivot`.
    RotatedLeft { pivot: K },
    /// Right rotation around the node that held `pivot`.
    RotatedRight { pivot: K },
}

impl<K: std::fmt::Display> std::fmt::Display for StepKind<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Placed { key } => write!(f, "placed {key}"),
            StepKind::Swapped { removing, replacement } => write!(f, "swapped {removing} with {replacement}"),
            StepKind::Detached { key } => write!(f, "detached {key}"),
            StepKind::RotatedLeft { pivot } => write!(f, "rotated left around {pivot}"),
            StepKind::RotatedRight { pivot } => write!(f, "rotated right around {pivot}"),
        }
    }
}

/// One node of a [`Shape`].
///
/// `slot` is the position inside the node's level when the tree is viewed as a
/// complete binary tree: the root is slot 0 and the children of slot `i` are `2i`
/// and `2i + 1`. `parent`, `left` and `right` index into [`Shape::nodes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeNode<K> {
    pub key: K,
    pub depth: usize,
    pub slot: u64,
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// Full snapshot of a tree, nodes listed in pre-order (the root first, if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape<K> {
    pub nodes: Vec<ShapeNode<K>>,
}

impl<K> Shape<K> {
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&ShapeNode<K>> {
        self.nodes.first()
    }

    pub fn left_of(&self, node: &ShapeNode<K>) -> Option<&ShapeNode<K>> {
        node.left.map(|i| &self.nodes[i])
    }

    pub fn right_of(&self, node: &ShapeNode<K>) -> Option<&ShapeNode<K>> {
        node.right.map(|i| &self.nodes[i])
    }

    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    /// Keys in order (left subtree, node, right subtree).
    pub fn in_order(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cur = if self.nodes.is_empty() { None } else { Some(0) };
        while cur.is_some() || !stack.is_empty() {
            while let Some(i) = cur {
                stack.push(i);
                cur = self.nodes[i].left;
            }
            if let Some(i) = stack.pop() {
                out.push(&self.nodes[i].key);
                cur = self.nodes[i].right;
            }
        }
        out
    }
}

impl<K: std::fmt::Display> Shape<K> {
    /// Sideways rendering: right subtree above, left subtree below, one node per line.
    pub fn to_text(&self) -> String {
        fn go<K: std::fmt::Display>(shape: &Shape<K>, i: usize, out: &mut String) {
            let node = &shape.nodes[i];
            if let Some(r) = node.right { go(shape, r, out) }
            for _ in 0..node.depth { out.push_str("    ") }
            out.push_str(&node.key.to_string());
            out.push('\n');
            if let Some(l) = node.left { go(shape, l, out) }
        }

        let mut out = String::new();
        if self.nodes.is_empty() {
            out.push_str("(empty)\n");
        } else {
            go(self, 0, &mut out);
        }
        out
    }
}

/// A snapshot emitted right after one atomic change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step<K> {
    /// Position of this step within its operation, starting at 0.
    pub index: usize,
    #[serde(flatten)]
    pub kind: StepKind<K>,
    pub shape: Shape<K>,
}

/// Receives steps in the order the tree produces them.
pub trait StepSink<K> {
    fn emit(&mut self, step: Step<K>);
}

impl<K> StepSink<K> for Vec<Step<K>> {
    fn emit(&mut self, step: Step<K>) {
        self.push(step);
    }
}

/// Discards every step.
impl<K> StepSink<K> for () {
    fn emit(&mut self, _step: Step<K>) {}
}

impl<K, S: StepSink<K> + ?Sized> StepSink<K> for &mut S {
    fn emit(&mut self, step: Step<K>) {
        (**self).emit(step)
    }
}
