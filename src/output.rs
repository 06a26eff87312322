//! Output types for JavaScript consumers.
//!
//! A `FrameOutput` is a composed frame flattened to JSON, for pages that
//! draw the sphere themselves (canvas, SVG) instead of binding a container.

use serde::Serialize;

use crate::sphere::compositor::Frame;

/// A node ready to draw, already carrying its derived styles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub z: f64,
    pub opacity: f64,
    pub label_y: f64,
    pub label_opacity: f64,
}

/// A relationship line between two projected nodes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOutput {
    pub from_index: usize,
    pub to_index: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub opacity: f64,
}

/// One frame, nodes in paint order (farthest first)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub spin_angle: f64,
    pub tilt_angle: f64,
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
}

impl From<&Frame> for FrameOutput {
    fn from(frame: &Frame) -> Self {
        let nodes = frame.nodes.iter().map(|p| NodeOutput {
            index: p.index,
            x: p.screen_x,
            y: p.screen_y,
            scale: p.scale,
            z: p.z,
            opacity: p.opacity(),
            label_y: p.label_y(),
            label_opacity: p.label_opacity(),
        }).collect();

        let edges = frame.edges.iter().map(|s| EdgeOutput {
            from_index: s.from_index,
            to_index: s.to_index,
            x1: s.x1,
            y1: s.y1,
            x2: s.x2,
            y2: s.y2,
            opacity: s.opacity,
        }).collect();

        Self {
            spin_angle: frame.angles.spin,
            tilt_angle: frame.angles.tilt,
            nodes,
            edges,
        }
    }
}

/// Error object returned in place of a frame
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    pub error: String,
}
