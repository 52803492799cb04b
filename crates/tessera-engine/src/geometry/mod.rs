//! CPU-side geometry: affine transforms, coordinate normalization, and mesh
//! index validation.
//!
//! Everything here is pure and independent of the GPU.

mod error;
mod mesh;
mod normalize;
mod transform;

pub use error::{GeometryError, IndexIntegrityError, InvalidIndex};
pub use mesh::{validate_triangles, Mesh, ValidatedTriangles};
pub use normalize::{normalize, Normalizer, NORMALIZE_MARGIN};
pub use transform::Mat3;
