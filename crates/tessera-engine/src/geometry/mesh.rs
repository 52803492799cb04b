use crate::coords::Point;

use super::{IndexIntegrityError, InvalidIndex};

/// Triangle mesh produced by a triangulator.
///
/// `indices` are consumed three at a time. When `vertices` is `None` the
/// indices refer to whatever point sequence the caller pairs the mesh with
/// (normally the polygon on screen).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub indices: Vec<u32>,
    pub vertices: Option<Vec<Point>>,
}

impl Mesh {
    /// Mesh whose indices refer to an external point sequence.
    #[inline]
    pub fn from_indices(indices: Vec<u32>) -> Self {
        Self { indices, vertices: None }
    }

    /// Mesh carrying its own vertex list.
    #[inline]
    pub fn with_vertices(vertices: Vec<Point>, indices: Vec<u32>) -> Self {
        Self { indices, vertices: Some(vertices) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// Number of complete index triples.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The vertex list the indices refer to: the mesh's own, or `fallback`.
    #[inline]
    pub fn resolve_vertices<'a>(&'a self, fallback: &'a [Point]) -> &'a [Point] {
        self.vertices.as_deref().unwrap_or(fallback)
    }
}

/// Index triples that passed bounds validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedTriangles {
    pub triangles: Vec<[u32; 3]>,
    /// `Some` when at least one triangle was skipped or indices were left over.
    pub integrity: Option<IndexIntegrityError>,
}

impl ValidatedTriangles {
    /// Distinct vertex indices in first-reference order.
    pub fn referenced_vertices(&self, vertex_count: usize) -> Vec<u32> {
        let mut seen = vec![false; vertex_count];
        let mut out = Vec::new();
        for &i in self.triangles.iter().flatten() {
            // Bounds were checked by `validate_triangles`.
            if let Some(flag) = seen.get_mut(i as usize) {
                if !*flag {
                    *flag = true;
                    out.push(i);
                }
            }
        }
        out
    }
}

/// Splits `indices` into triangles, keeping only those whose three indices are
/// all `< vertex_count`.
pub fn validate_triangles(indices: &[u32], vertex_count: usize) -> ValidatedTriangles {
    let chunks = indices.chunks_exact(3);
    let dangling = chunks.remainder().len();
    let total = indices.len() / 3;

    let mut triangles = Vec::with_capacity(total);
    let mut skipped = 0usize;
    let mut first = None;

    for (t, tri) in chunks.enumerate() {
        match tri.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&bad) => {
                skipped += 1;
                first.get_or_insert(InvalidIndex { triangle: t, index: bad });
            }
            None => triangles.push([tri[0], tri[1], tri[2]]),
        }
    }

    let integrity = (skipped > 0 || dangling > 0).then_some(IndexIntegrityError {
        skipped,
        triangles: total,
        vertex_count,
        first,
        dangling,
    });

    ValidatedTriangles { triangles, integrity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_valid() {
        let v = validate_triangles(&[0, 1, 2, 2, 3, 0], 4);
        assert_eq!(v.triangles, vec![[0, 1, 2], [2, 3, 0]]);
        assert!(v.integrity.is_none());
    }

    #[test]
    fn one_past_the_end_is_skipped() {
        let v = validate_triangles(&[0, 1, 2, 1, 2, 3], 3);
        assert_eq!(v.triangles, vec![[0, 1, 2]]);
        let err = v.integrity.expect("integrity error");
        assert_eq!(err.skipped, 1);
        assert_eq!(err.triangles, 2);
        assert_eq!(err.first, Some(InvalidIndex { triangle: 1, index: 3 }));
        assert_eq!(err.dangling, 0);
    }

    #[test]
    fn dangling_indices_are_reported() {
        let v = validate_triangles(&[0, 1, 2, 0], 3);
        assert_eq!(v.triangles.len(), 1);
        let err = v.integrity.unwrap();
        assert_eq!(err.skipped, 0);
        assert_eq!(err.dangling, 1);
        assert!(err.first.is_none());
    }

    #[test]
    fn empty_vertex_list_skips_everything() {
        let v = validate_triangles(&[0, 0, 0], 0);
        assert!(v.triangles.is_empty());
        assert_eq!(v.integrity.unwrap().skipped, 1);
    }

    #[test]
    fn huge_index_does_not_panic() {
        let v = validate_triangles(&[u32::MAX, 0, 1], 2);
        assert!(v.triangles.is_empty());
        assert_eq!(v.integrity.unwrap().first.unwrap().index, u32::MAX);
    }

    #[test]
    fn referenced_vertices_are_distinct_and_ordered() {
        let v = validate_triangles(&[2, 0, 1, 1, 3, 2], 5);
        assert_eq!(v.referenced_vertices(5), vec![2, 0, 1, 3]);
    }

    #[test]
    fn mesh_resolves_own_vertices_first() {
        let screen = [Point::new(0.0, 0.0)];
        let own = Mesh::with_vertices(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)], vec![]);
        assert_eq!(own.resolve_vertices(&screen).len(), 2);
        let bare = Mesh::from_indices(vec![0, 0, 0]);
        assert_eq!(bare.resolve_vertices(&screen), &screen);
        assert_eq!(bare.triangle_count(), 1);
    }

    #[test]
    fn integrity_message_names_the_offender() {
        let err = validate_triangles(&[0, 1, 5], 3).integrity.unwrap();
        assert_eq!(
            err.to_string(),
            "1 of 1 triangles skipped: index 5 in triangle 0 is out of range for 3 vertices"
        );
    }
}
