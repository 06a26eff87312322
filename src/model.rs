//! Static data the sphere is built from.
//!
//! The service dataset and the edge list arrive as JSON from the page. Both
//! are checked once against the node count and never change afterwards.

use serde::{Deserialize, Serialize};

use crate::error::SphereError;
use crate::sphere::distribution::{distribute, SphereNode};
use crate::sphere::SphereConfig;

/// A directed relationship between two service categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_index: usize,
    pub to_index: usize,
}

/// One service category. Only its position in the list matters to the engine;
/// the content is for the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub sub_services: Vec<String>,
}

pub fn parse_edges(json: &str) -> Result<Vec<Edge>, SphereError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_services(json: &str) -> Result<Vec<ServiceCategory>, SphereError> {
    Ok(serde_json::from_str(json)?)
}

/// Check every edge against `node_count`.
pub fn validate_edges(edges: &[Edge], node_count: usize) -> Result<(), SphereError> {
    for (slot, e) in edges.iter().enumerate() {
        if e.from_index == e.to_index {
            return Err(SphereError::SelfLoop { slot, index: e.from_index });
        }
        if e.from_index >= node_count || e.to_index >= node_count {
            return Err(SphereError::EdgeOutOfRange {
                slot,
                from: e.from_index,
                to: e.to_index,
                count: node_count,
            });
        }
    }
    Ok(())
}

/// Validated nodes, edges and services for one sphere.
#[derive(Debug, Clone)]
pub struct SphereModel {
    nodes: Vec<SphereNode>,
    edges: Vec<Edge>,
    services: Vec<ServiceCategory>,
}

impl SphereModel {
    /// Lay out `cfg.node_count` nodes and attach the edges and services.
    /// `services` may be empty when no dataset is attached; otherwise it must
    /// have exactly one entry per node.
    pub fn new(
        cfg: &SphereConfig,
        edges: Vec<Edge>,
        services: Vec<ServiceCategory>,
    ) -> Result<Self, SphereError> {
        cfg.validate()?;
        validate_edges(&edges, cfg.node_count)?;
        if !services.is_empty() && services.len() != cfg.node_count {
            return Err(SphereError::ServiceCountMismatch {
                expected: cfg.node_count,
                found: services.len(),
            });
        }

        Ok(Self {
            nodes: distribute(cfg.node_count, cfg.sphere_radius),
            edges,
            services,
        })
    }

    pub fn nodes(&self) -> &[SphereNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn service(&self, index: usize) -> Option<&ServiceCategory> {
        self.services.get(index)
    }
}
