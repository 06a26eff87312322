// Sphere engine: fixed nodes on a rotating sphere, projected each frame.
//
// Pipeline per frame:
//   timestamp -> clock (spin, tilt) -> rotate -> project -> depth sort -> edges
//
// Submodules:
// - geometry: spherical coordinates, rotation, perspective projection
// - distribution: golden-angle spiral node layout (run once)
// - clock: angles from wall-clock time
// - compositor: projection, painter's order, opacities, edge endpoints
//
// Output:
// - Frame with back-to-front nodes and edge segments. Never cached.

pub mod geometry;
pub mod distribution;
pub mod clock;
pub mod compositor;

use crate::error::SphereError;
use crate::model::SphereModel;
use clock::AnimationClock;
use compositor::{compose_frame, Frame};
use geometry::Projection;

#[derive(Debug, Clone, PartialEq)]
pub struct SphereConfig {
    /// Must stay below `camera_distance` or near nodes invert.
    pub sphere_radius: f64,
    pub camera_distance: f64,
    /// Viewport center in container pixels.
    pub center_x: f64,
    pub center_y: f64,
    /// One full spin (and one tilt swing) per period.
    pub period_ms: f64,
    pub node_count: usize,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 220.0,
            camera_distance: 600.0,
            center_x: 300.0,
            center_y: 300.0,
            period_ms: 30000.0,
            node_count: 7,
        }
    }
}

impl SphereConfig {
    pub fn validate(&self) -> Result<(), SphereError> {
        if !(self.sphere_radius >= 0.0 && self.sphere_radius < self.camera_distance) {
            return Err(SphereError::RadiusOutsideCamera {
                radius: self.sphere_radius,
                camera_distance: self.camera_distance,
            });
        }
        if !(self.period_ms.is_finite() && self.period_ms > 0.0) {
            return Err(SphereError::InvalidPeriod(self.period_ms));
        }
        if self.node_count == 0 {
            return Err(SphereError::NoNodes);
        }
        Ok(())
    }

    pub fn projection(&self) -> Projection {
        Projection {
            camera_distance: self.camera_distance,
            center_x: self.center_x,
            center_y: self.center_y,
        }
    }
}

/// Static model plus the clock and camera that animate it.
#[derive(Debug, Clone)]
pub struct SphereScene {
    model: SphereModel,
    clock: AnimationClock,
    projection: Projection,
}

impl SphereScene {
    pub fn new(cfg: &SphereConfig, model: SphereModel) -> Self {
        Self {
            model,
            clock: AnimationClock::new(cfg.period_ms),
            projection: cfg.projection(),
        }
    }

    pub fn model(&self) -> &SphereModel {
        &self.model
    }

    pub fn frame(&self, timestamp_ms: f64) -> Frame {
        let angles = self.clock.tick(timestamp_ms);
        compose_frame(self.model.nodes(), self.model.edges(), angles, &self.projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use std::f64::consts::FRAC_PI_2;

    fn scene() -> SphereScene {
        let cfg = SphereConfig::default();
        let edges = vec![Edge { from_index: 0, to_index: 1 }, Edge { from_index: 5, to_index: 2 }];
        let model = SphereModel::new(&cfg, edges, vec![]).unwrap();
        SphereScene::new(&cfg, model)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SphereConfig::default().validate().is_ok());
    }

    #[test]
    fn test_radius_must_fit_inside_camera() {
        let cfg = SphereConfig { sphere_radius: 600.0, ..SphereConfig::default() };
        assert!(matches!(cfg.validate(), Err(SphereError::RadiusOutsideCamera { .. })));

        let cfg = SphereConfig { sphere_radius: -1.0, ..SphereConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_period_and_count_checked() {
        let cfg = SphereConfig { period_ms: 0.0, ..SphereConfig::default() };
        assert!(matches!(cfg.validate(), Err(SphereError::InvalidPeriod(_))));

        let cfg = SphereConfig { period_ms: f64::NAN, ..SphereConfig::default() };
        assert!(matches!(cfg.validate(), Err(SphereError::InvalidPeriod(_))));

        let cfg = SphereConfig { node_count: 0, ..SphereConfig::default() };
        assert!(matches!(cfg.validate(), Err(SphereError::NoNodes)));
    }

    #[test]
    fn test_quarter_period_golden_frame() {
        // n=7, radius 220, camera 600, center (300, 300), period 30s.
        let frame = scene().frame(7500.0);
        assert!((frame.angles.spin - FRAC_PI_2).abs() < 1e-12);
        assert!((frame.angles.tilt - 2.221441469079183).abs() < 1e-12);

        let node0 = frame.nodes.iter().find(|p| p.index == 0).unwrap();
        assert!((node0.screen_x - 209.3515787151578).abs() < 1e-6);
        assert!((node0.screen_y - 391.36866880263824).abs() < 1e-6);
        assert!((node0.scale - 0.7999519989078735).abs() < 1e-9);
        assert!((node0.z - 150.04500372415356).abs() < 1e-6);
    }

    #[test]
    fn test_quarter_period_paint_order() {
        let frame = scene().frame(7500.0);
        let order: Vec<usize> = frame.nodes.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![1, 0, 3, 4, 2, 6, 5]);
        assert_eq!(frame.edges.len(), 2);
    }

    #[test]
    fn test_frame_repeats_each_period() {
        let s = scene();
        assert_eq!(s.frame(1234.0), s.frame(1234.0 + 30000.0 * 3.0));
    }
}
