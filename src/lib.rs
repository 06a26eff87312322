pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod render;
pub mod sphere;
pub mod wasm;

pub use error::{BindingError, SphereError};
pub use model::{Edge, ServiceCategory, SphereModel};
pub use render::{FrameScheduler, LoopState, RenderLoop, SceneSurface};
pub use sphere::clock::{Angles, AnimationClock};
pub use sphere::compositor::{compose, compose_edges, compose_frame, EdgeSegment, Frame, ProjectedNode};
pub use sphere::distribution::{distribute, SphereNode};
pub use sphere::geometry::{project, rotate, spherical_to_cartesian, Point3, Projection, ScreenPoint};
pub use sphere::{SphereConfig, SphereScene};
