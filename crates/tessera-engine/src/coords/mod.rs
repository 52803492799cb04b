//! Coordinate types shared across the renderer, geometry and viewport layers.
//!
//! Two spaces are in play:
//! - surface space: physical pixels, origin top-left, +Y down (pointer input)
//! - clip space: origin at the center, +Y up, visible domain roughly `[-1, 1]`
//!
//! Scene geometry lives in clip space; view matrices are applied in the shaders.

mod point;
mod viewport;

pub use point::Point;
pub use viewport::Viewport;
