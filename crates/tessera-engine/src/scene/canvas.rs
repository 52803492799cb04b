use crate::coords::Point;
use crate::geometry::{Mat3, Mesh};
use crate::paint::Color;

use super::{DrawList, MeshDraw, RenderMode};

/// Recording surface for polygon and mesh draws.
///
/// Implemented by [`DrawList`] and by the GPU-backed
/// [`PrimitiveRenderer`](crate::render::PrimitiveRenderer), so drawing code
/// can be exercised without a device.
pub trait Canvas {
    /// Drops recorded draws and schedules a clear to the background color.
    fn clear(&mut self);

    fn draw_polygon(&mut self, points: &[Point], closed: bool, color: Color, matrix: &Mat3);

    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
        mode: RenderMode,
    ) -> MeshDraw;
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        DrawList::clear(self);
    }

    fn draw_polygon(&mut self, points: &[Point], closed: bool, color: Color, matrix: &Mat3) {
        self.push_polygon(points, closed, color, matrix);
    }

    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        vertices: &[Point],
        matrix: &Mat3,
        color: Color,
        mode: RenderMode,
    ) -> MeshDraw {
        self.push_mesh(mesh, vertices, color, matrix, mode)
    }
}
