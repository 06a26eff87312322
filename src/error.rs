//! Error types for the sphere engine.
//!
//! Pure math never fails; everything here comes from configuration,
//! decoding the page's data, or binding to the host document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SphereError {
    #[error("sphere radius {radius} must be non-negative and smaller than camera distance {camera_distance}")]
    RadiusOutsideCamera { radius: f64, camera_distance: f64 },

    #[error("rotation period must be positive and finite, got {0}")]
    InvalidPeriod(f64),

    #[error("node count must be at least 1")]
    NoNodes,

    #[error("edge {slot} connects node {index} to itself")]
    SelfLoop { slot: usize, index: usize },

    #[error("edge {slot} ({from} -> {to}) references a node outside 0..{count}")]
    EdgeOutOfRange { slot: usize, from: usize, to: usize, count: usize },

    #[error("expected {expected} service categories, found {found}")]
    ServiceCountMismatch { expected: usize, found: usize },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not schedule frame: {0}")]
    Schedule(String),

    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// Reasons a container could not be bound. All of them abort `start` quietly.
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("no element matches `{0}`")]
    Missing(String),

    #[error("expected {expected} {what} elements, found {found}")]
    CountMismatch { what: &'static str, expected: usize, found: usize },

    #[error("{what} element has data-index `{value}`, expected a number below {count}")]
    BadIndex { what: &'static str, value: String, count: usize },

    #[error("two {what} elements share data-index {index}")]
    DuplicateIndex { what: &'static str, index: usize },

    #[error("only some {what} elements carry data-index")]
    PartialIndex { what: &'static str },

    #[error("host error: {0}")]
    Host(String),
}
