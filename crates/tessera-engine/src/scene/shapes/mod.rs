//! Shape-specific recording helpers, implemented on `DrawList`.

pub mod mesh;
pub mod polygon;

pub use mesh::{MeshDraw, RenderMode};
pub use polygon::{point_quad, POINT_SIZE};
