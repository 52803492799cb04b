//! Triangulation collaborators behind one `triangulate(points) -> mesh`
//! contract: the HTTP service and a natively compiled module.

mod earclip;
mod native;
mod response;
mod service;

use std::fmt;

use tessera_engine::paint::Color;
use thiserror::Error;

pub use earclip::EarclipModule;
pub use native::{IndexCollection, NativeModule, NativeTriangulator, PointCollection, Release, Scoped};
pub use response::{decode, MeshResponse};
pub use service::ServiceTriangulator;

/// Which collaborator produced a mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Method {
    Service,
    Native,
}

impl Method {
    /// Display color of meshes produced by this method.
    pub fn color(self) -> Color {
        match self {
            Method::Service => Color::from_straight(0.8, 0.2, 1.0, 1.0),
            Method::Native => Color::GREEN,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Service => "service",
            Method::Native => "native",
        })
    }
}

/// Mesh as returned by a triangulator, in the coordinates it was given.
///
/// `vertices` is `None` when the indices refer to the submitted points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    pub indices: Vec<u32>,
    pub vertices: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("service answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed triangulation response: {0}")]
    Malformed(String),

    #[error("native triangulation failed: {0}")]
    Native(String),

    #[error("{0} triangulation is not available")]
    Unavailable(Method),
}

pub trait Triangulator {
    fn method(&self) -> Method;

    fn triangulate(&self, points: &[[f64; 2]]) -> Result<RawMesh, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_the_method() {
        assert_eq!(
            TransportError::Unavailable(Method::Service).to_string(),
            "service triangulation is not available"
        );
    }

    #[test]
    fn methods_have_distinct_colors() {
        assert_ne!(Method::Service.color(), Method::Native.color());
        assert_eq!(Method::Service.color().a, 1.0);
    }
}
