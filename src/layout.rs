//! Screen geometry for a [`Shape`].
//!
//! Each level is split into `2^depth + 1` equal gaps and a node sits on the
//! boundary matching its slot, so a node always lies between its children.

use serde::Serialize;

use crate::step::Shape;

/// Vertical distance between two levels.
pub const LEVEL_SPACING: f64 = 150.0;
/// Distance from the top edge to the root's centre.
pub const TOP_OFFSET: f64 = 90.0;
pub const NODE_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode<K> {
    pub key: K,
    /// Centre of the node.
    pub x: f64,
    pub y: f64,
}

/// A line from a parent's centre to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub length: f64,
    /// Clockwise from the positive x axis, in degrees (y grows downwards).
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout<K> {
    /// Same order as [`Shape::nodes`].
    pub nodes: Vec<PlacedNode<K>>,
    pub edges: Vec<Edge>,
}

pub fn layout<K: Clone>(shape: &Shape<K>, width: f64) -> Layout<K> {
    let nodes: Vec<PlacedNode<K>> = shape.nodes.iter()
        .map(|n| {
            let spacing = width / (2f64.powi(n.depth as i32) + 1.0);
            PlacedNode {
                key: n.key.clone(),
                x: (n.slot as f64 + 1.0) * spacing,
                y: TOP_OFFSET + n.depth as f64 * LEVEL_SPACING,
            }
        })
        .collect();

    let edges = shape.nodes.iter().enumerate()
        .filter_map(|(to, n)| {
            let from = n.parent?;
            let (dx, dy) = (nodes[to].x - nodes[from].x, nodes[to].y - nodes[from].y);
            Some(Edge { from, to, length: dx.hypot(dy), angle: dy.atan2(dx).to_degrees() })
        })
        .collect();

    Layout { nodes, edges }
}

impl<K> PlacedNode<K> {
    /// Top-left corner of the node's bounding box.
    pub fn corner(&self) -> (f64, f64) {
        (self.x - NODE_RADIUS, self.y - NODE_RADIUS)
    }
}
