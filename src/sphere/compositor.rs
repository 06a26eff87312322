// Depth compositor.
//
// Per frame: rotate and project every node, sort back-to-front (painter's
// order, larger z first), derive opacities, and resolve edge endpoints from
// the projected nodes by index. Nothing here is cached between frames.

use std::cmp::Ordering;

use super::clock::Angles;
use super::geometry::{project, rotate, spherical_to_cartesian, Projection};
use super::distribution::SphereNode;
use crate::model::Edge;

/// Node opacity floor and range.
const NODE_OPACITY_BASE: f64 = 0.4;
const NODE_OPACITY_RANGE: f64 = 0.6;
/// Labels fade faster than nodes.
const LABEL_OPACITY_BASE: f64 = 0.3;
const LABEL_OPACITY_RANGE: f64 = 0.7;
/// Label distance below the node center at scale 1.
const LABEL_OFFSET: f64 = 48.0;
const EDGE_OPACITY_BASE: f64 = 0.05;
const EDGE_OPACITY_RANGE: f64 = 0.15;

/// One node in screen space for the current frame only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedNode {
    pub index: usize,
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
    pub z: f64,
}

impl ProjectedNode {
    /// Clamped to 1.0: nodes in front of the center plane have scale > 1.
    pub fn opacity(&self) -> f64 {
        (NODE_OPACITY_BASE + self.scale * NODE_OPACITY_RANGE).clamp(NODE_OPACITY_BASE, 1.0)
    }

    pub fn label_opacity(&self) -> f64 {
        (LABEL_OPACITY_BASE + self.scale * LABEL_OPACITY_RANGE).clamp(LABEL_OPACITY_BASE, 1.0)
    }

    pub fn label_y(&self) -> f64 {
        self.screen_y + LABEL_OFFSET * self.scale
    }
}

/// Screen-space line for one static edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeSegment {
    /// Position in the static edge array.
    pub slot: usize,
    pub from_index: usize,
    pub to_index: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub opacity: f64,
}

/// Everything the presentation side needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub angles: Angles,
    /// Farthest first.
    pub nodes: Vec<ProjectedNode>,
    pub edges: Vec<EdgeSegment>,
}

/// Project all nodes for the given angles, farthest first.
pub fn compose(nodes: &[SphereNode], angles: Angles, proj: &Projection) -> Vec<ProjectedNode> {
    let projected = nodes
        .iter()
        .map(|node| {
            let p = spherical_to_cartesian(node.theta, node.phi, node.r);
            let s = project(rotate(p, angles.spin, angles.tilt), proj);
            ProjectedNode {
                index: node.index,
                screen_x: s.screen_x,
                screen_y: s.screen_y,
                scale: s.scale,
                z: s.z,
            }
        })
        .collect();
    depth_sort(projected)
}

/// Stable sort by descending z: equal depths keep their input order.
/// `-0.0` and `0.0` count as equal.
pub fn depth_sort(mut nodes: Vec<ProjectedNode>) -> Vec<ProjectedNode> {
    nodes.sort_by(|a, b| b.z.partial_cmp(&a.z).unwrap_or(Ordering::Equal));
    nodes
}

/// Resolve edge endpoints against this frame's projection.
/// Edges whose endpoints are missing from `projected` are skipped.
pub fn compose_edges(edges: &[Edge], projected: &[ProjectedNode]) -> Vec<EdgeSegment> {
    let size = projected.iter().map(|p| p.index + 1).max().unwrap_or(0);
    let mut by_index: Vec<Option<&ProjectedNode>> = vec![None; size];
    for p in projected {
        by_index[p.index] = Some(p);
    }
    let lookup = |i: usize| by_index.get(i).copied().flatten();

    edges
        .iter()
        .enumerate()
        .filter_map(|(slot, edge)| {
            let a = lookup(edge.from_index)?;
            let b = lookup(edge.to_index)?;
            let avg_scale = (a.scale + b.scale) / 2.0;
            Some(EdgeSegment {
                slot,
                from_index: edge.from_index,
                to_index: edge.to_index,
                x1: a.screen_x,
                y1: a.screen_y,
                x2: b.screen_x,
                y2: b.screen_y,
                opacity: EDGE_OPACITY_BASE + avg_scale * EDGE_OPACITY_RANGE,
            })
        })
        .collect()
}

pub fn compose_frame(
    nodes: &[SphereNode],
    edges: &[Edge],
    angles: Angles,
    proj: &Projection,
) -> Frame {
    let projected = compose(nodes, angles, proj);
    let segments = compose_edges(edges, &projected);
    Frame { angles, nodes: projected, edges: segments }
}
