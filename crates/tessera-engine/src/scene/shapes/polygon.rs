use crate::coords::Point;
use crate::geometry::Mat3;
use crate::paint::Color;
use crate::scene::{DrawList, Topology};

/// Edge length of the square marker drawn at each point, in scene units.
pub const POINT_SIZE: f32 = 0.03;

/// Two triangles covering the marker square centered on `p`.
pub fn point_quad(p: Point) -> [Point; 6] {
    let h = POINT_SIZE * 0.5;
    let (l, r, b, t) = (p.x - h, p.x + h, p.y - h, p.y + h);
    [
        Point::new(l, b),
        Point::new(r, b),
        Point::new(r, t),
        Point::new(l, b),
        Point::new(r, t),
        Point::new(l, t),
    ]
}

impl DrawList {
    /// Records a polyline through `points` followed by a marker at each point.
    ///
    /// With `closed` the outline returns to the first point. A single point
    /// draws only its marker; no points draws nothing.
    pub fn push_polygon(&mut self, points: &[Point], closed: bool, color: Color, matrix: &Mat3) {
        let Some(&first) = points.first() else { return };

        if points.len() > 1 {
            let outline = points.iter().copied().chain(closed.then_some(first));
            self.push(Topology::LineStrip, outline, color, matrix);
        }
        self.push_points(points, color, matrix);
    }

    /// Records one marker quad per point.
    pub fn push_points(&mut self, points: &[Point], color: Color, matrix: &Mat3) {
        self.push(
            Topology::TriangleList,
            points.iter().flat_map(|&p| point_quad(p)),
            color,
            matrix,
        );
    }
}
