//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands over one shared vertex array
//! - preserve insertion order, which is paint order
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod canvas;
mod cmd;
mod list;

pub mod shapes;

pub use canvas::Canvas;
pub use cmd::{DrawCmd, PrimitiveFamily, Topology};
pub use list::DrawList;
pub use shapes::{MeshDraw, RenderMode};
