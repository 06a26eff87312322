// Geometry kernel: spherical coordinates, rotation and perspective projection.
//
// Conventions:
// - y is up, z grows away from the viewer (larger z = farther from the camera)
// - spin rotates about the vertical axis, tilt about the horizontal axis
// - screen y grows downward, so projection flips the vertical axis
//
// All functions are pure and allocation-free.

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Camera and viewport parameters for `project`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub camera_distance: f64,
    pub center_x: f64,
    pub center_y: f64,
}

/// A projected point in screen space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
    /// Rotated depth, kept for sorting.
    pub z: f64,
}

pub fn spherical_to_cartesian(theta: f64, phi: f64, r: f64) -> Point3 {
    Point3 {
        x: r * phi.cos() * theta.sin(),
        y: r * phi.sin(),
        z: r * phi.cos() * theta.cos(),
    }
}

/// Spin about the vertical axis, then tilt about the horizontal axis.
///
/// The tilt step uses the depth produced by the spin step. Swapping the
/// order moves the tilt axis with the spin and changes the picture.
pub fn rotate(p: Point3, spin: f64, tilt: f64) -> Point3 {
    let (sin_s, cos_s) = spin.sin_cos();
    let x = p.x * cos_s - p.z * sin_s;
    let z = p.x * sin_s + p.z * cos_s;

    let (sin_t, cos_t) = tilt.sin_cos();
    let y = p.y * cos_t - z * sin_t;
    let z = p.y * sin_t + z * cos_t;

    Point3 { x, y, z }
}

/// Perspective divide. Not guarded against `camera_distance + z <= 0`;
/// `SphereConfig::validate` keeps the radius inside the camera distance.
pub fn project(p: Point3, proj: &Projection) -> ScreenPoint {
    let depth = proj.camera_distance + p.z;
    let scale = proj.camera_distance / depth;
    ScreenPoint {
        screen_x: proj.center_x + p.x * scale,
        screen_y: proj.center_y - p.y * scale,
        scale,
        z: p.z,
    }
}
