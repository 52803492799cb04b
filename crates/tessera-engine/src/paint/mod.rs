//! Paint model shared between the scene and renderers.
//!
//! Only solid colors exist; every primitive is drawn with a single `u_color`.

pub mod color;

pub use color::Color;
