//! GPU rendering subsystem.
//!
//! The renderer consumes `scene` draw streams and issues GPU commands via wgpu.
//! It owns its GPU resources (programs, pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in scene units; `u_matrix` maps it to clip space.
//! - Colors are premultiplied.

mod ctx;
mod primitive;

pub use ctx::{RenderCtx, RenderTarget};
pub use primitive::PrimitiveRenderer;
