use thiserror::Error;

/// Geometry rejected before it reaches the renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("cannot normalize an empty point set")]
    Empty,

    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    /// Zero extent on at least one axis; the fit scale would be infinite.
    #[error("degenerate geometry: bounding box is {width} x {height}")]
    Degenerate { width: f64, height: f64 },
}

/// A mesh index that does not name a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidIndex {
    /// Triangle ordinal within the mesh.
    pub triangle: usize,
    pub index: u32,
}

/// Mesh data that referenced vertices out of range.
///
/// Recoverable: the renderer drew every valid triangle and skipped the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{skipped} of {triangles} triangles skipped{}{}",
    first_detail(.first, .vertex_count),
    dangling_detail(.dangling)
)]
pub struct IndexIntegrityError {
    /// Triangles skipped because an index was out of range.
    pub skipped: usize,
    /// Complete triangles in the mesh (valid + skipped).
    pub triangles: usize,
    pub vertex_count: usize,
    /// First offending index, if any triangle was skipped.
    pub first: Option<InvalidIndex>,
    /// Trailing indices that do not form a full triangle.
    pub dangling: usize,
}

fn first_detail(first: &Option<InvalidIndex>, vertex_count: &usize) -> String {
    match first {
        Some(f) => format!(
            ": index {} in triangle {} is out of range for {vertex_count} vertices",
            f.index, f.triangle
        ),
        None => String::new(),
    }
}

fn dangling_detail(dangling: &usize) -> String {
    if *dangling > 0 {
        format!(" ({dangling} trailing indices ignored)")
    } else {
        String::new()
    }
}
