//! Ear-clipping module backed by `rgeometry`, linked into the binary.

use std::panic::{self, AssertUnwindSafe};

use rgeometry::algorithms::triangulation::earclip::earclip;
use rgeometry::data::{Point, Polygon};

use super::{IndexCollection, NativeModule, PointCollection, Release};

#[derive(Debug, Default)]
pub struct EarclipPoints(Vec<Point<f64, 2>>);

impl Release for EarclipPoints {
    fn release(&mut self) {
        self.0 = Vec::new();
    }
}

impl PointCollection for EarclipPoints {
    fn push_back(&mut self, x: f64, y: f64) {
        self.0.push(Point::new([x, y]));
    }
}

#[derive(Debug, Default)]
pub struct EarclipIndices(Vec<u32>);

impl Release for EarclipIndices {
    fn release(&mut self) {
        self.0 = Vec::new();
    }
}

impl IndexCollection for EarclipIndices {
    fn size(&self) -> usize {
        self.0.len()
    }

    fn get(&self, i: usize) -> Option<u32> {
        self.0.get(i).copied()
    }
}

/// Triangulates simple polygons in either winding.
///
/// Fewer than three points and repeated points are rejected up front.
/// A self-intersecting outline has no ear to clip; rgeometry panics on
/// it and the panic is reported as a module error.
#[derive(Debug, Default, Clone, Copy)]
pub struct EarclipModule;

impl NativeModule for EarclipModule {
    type Points = EarclipPoints;
    type Indices = EarclipIndices;

    fn new_points(&self) -> Result<EarclipPoints, String> {
        Ok(EarclipPoints::default())
    }

    fn triangulate(&self, points: &EarclipPoints) -> Result<EarclipIndices, String> {
        let pts = &points.0;
        if pts.len() < 3 {
            return Err(format!("need at least 3 points, got {}", pts.len()));
        }
        if let Some(i) = (1..pts.len()).find(|&i| pts[..i].contains(&pts[i])) {
            return Err(format!("point {i} repeats an earlier point"));
        }

        let polygon =
            Polygon::new(pts.clone()).map_err(|e| format!("invalid polygon: {e:?}"))?;

        let triangles = panic::catch_unwind(AssertUnwindSafe(|| {
            earclip(&polygon)
                .flat_map(|(a, b, c)| [a.usize(), b.usize(), c.usize()])
                .collect::<Vec<_>>()
        }))
        .map_err(|_| "ear clipping failed; is the outline self-intersecting?".to_string())?;

        let indices = triangles
            .into_iter()
            .map(|i| u32::try_from(i).map_err(|_| format!("vertex index {i} exceeds u32")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EarclipIndices(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::{Method, NativeTriangulator, TransportError, Triangulator};

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn triangle_area(points: &[[f64; 2]], tri: &[u32]) -> f64 {
        let [a, b, c] = [0, 1, 2].map(|k| points[tri[k] as usize]);
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
    }

    #[test]
    fn square_becomes_two_triangles() {
        let t = NativeTriangulator::new(EarclipModule);
        assert_eq!(t.method(), Method::Native);

        let mesh = t.triangulate(&SQUARE).unwrap();
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.indices.iter().all(|&i| i < 4));
        assert!(mesh.vertices.is_none());

        let area: f64 = mesh.indices.chunks(3).map(|t| triangle_area(&SQUARE, t)).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_outline_keeps_input_indices() {
        let mut cw = SQUARE;
        cw.reverse();
        let mesh = NativeTriangulator::new(EarclipModule).triangulate(&cw).unwrap();
        assert_eq!(mesh.indices.len(), 6);

        let area: f64 = mesh.indices.chunks(3).map(|t| triangle_area(&cw, t)).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn concave_outline_covers_its_area() {
        // L-shape, area 3.
        let l = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0], [1.0, 2.0], [0.0, 2.0]];
        let mesh = NativeTriangulator::new(EarclipModule).triangulate(&l).unwrap();
        assert_eq!(mesh.indices.len(), 12);

        let area: f64 = mesh.indices.chunks(3).map(|t| triangle_area(&l, t)).sum();
        assert!((area - 3.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_too_few_or_repeated_points() {
        let t = NativeTriangulator::new(EarclipModule);
        assert!(matches!(
            t.triangulate(&[[0.0, 0.0], [1.0, 0.0]]),
            Err(TransportError::Native(_))
        ));
        assert!(matches!(
            t.triangulate(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 0.0]]),
            Err(TransportError::Native(_))
        ));
    }
}
