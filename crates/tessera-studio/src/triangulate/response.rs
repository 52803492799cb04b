use serde::Deserialize;

use super::{RawMesh, TransportError};

/// Accepted response bodies of `POST /triangulate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MeshResponse {
    /// Indices into the submitted points, three per triangle.
    Flat(Vec<u32>),
    /// Index triples into the submitted points.
    Triples(Vec<[u32; 3]>),
    /// New vertices (in submitted coordinates) plus indices into them.
    Structured {
        vertices: Vec<[f64; 2]>,
        indices: Vec<u32>,
    },
}

impl From<MeshResponse> for RawMesh {
    fn from(r: MeshResponse) -> Self {
        match r {
            MeshResponse::Flat(indices) => RawMesh { indices, vertices: None },
            MeshResponse::Triples(tris) => RawMesh {
                indices: tris.into_iter().flatten().collect(),
                vertices: None,
            },
            MeshResponse::Structured { vertices, indices } => RawMesh {
                indices,
                vertices: Some(vertices),
            },
        }
    }
}

/// Decodes a response body. Index bounds are checked later, at draw time.
pub fn decode(body: &str) -> Result<RawMesh, TransportError> {
    let response: MeshResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Malformed(e.to_string()))?;
    Ok(response.into())
}
