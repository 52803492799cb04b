//! Shader programs: WGSL compilation, reflection and GPU layout.
//!
//! A program is a vertex/fragment pair exposing three handles:
//! `a_position` (vertex input, `vec2<f32>`), `u_matrix` (`mat3x3<f32>`) and
//! `u_color` (premultiplied `vec4<f32>`), both uniforms in `@group(0)`.

mod error;
mod program;
mod reflect;
pub mod sources;

pub use error::{BuildError, HandleKind, Stage};
pub use program::{ShaderProgram, COLOR_UNIFORM_SIZE, MATRIX_UNIFORM_SIZE};
pub use reflect::{
    ProgramBuilder, ProgramLayout, UniformHandle, COLOR_UNIFORM, MATRIX_UNIFORM, POSITION_ATTRIBUTE,
};
