use crate::coords::Point;
use crate::geometry::Mat3;
use crate::paint::Color;

use super::{DrawCmd, Topology};

/// Recorded draw stream for a frame.
///
/// All draws share one vertex array; each [`DrawCmd`] names its range. The
/// renderer uploads the array once and replays the commands in insertion
/// order.
///
/// Performance characteristics:
/// - `push()` is amortized O(n) in the vertices pushed
/// - `clear()` keeps allocated capacity for reuse
#[derive(Debug, Default)]
pub struct DrawList {
    vertices: Vec<Point>,
    cmds: Vec<DrawCmd>,
    clear: Option<Color>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded draws and schedules a clear to [`Color::BACKGROUND`].
    ///
    /// Calling it twice is the same as calling it once.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.cmds.clear();
        self.clear = Some(Color::BACKGROUND);
    }

    /// Drops recorded draws without scheduling a clear.
    #[inline]
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.cmds.clear();
        self.clear = None;
    }

    /// Clear color for the next pass, if [`clear`](Self::clear) was called.
    #[inline]
    pub fn clear_color(&self) -> Option<Color> {
        self.clear
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Commands in insertion (paint) order.
    #[inline]
    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Appends `vertices` and records a draw over them.
    ///
    /// Returns `false` (recording nothing) if `vertices` yields nothing.
    pub fn push(
        &mut self,
        topology: Topology,
        vertices: impl IntoIterator<Item = Point>,
        color: Color,
        matrix: &Mat3,
    ) -> bool {
        let first = self.vertices.len();
        self.vertices.extend(vertices);
        let count = self.vertices.len() - first;
        if count == 0 {
            return false;
        }

        self.cmds.push(DrawCmd {
            topology,
            first_vertex: first as u32,
            vertex_count: count as u32,
            color,
            matrix: *matrix,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_contiguous() {
        let mut list = DrawList::new();
        let m = Mat3::identity();
        assert!(list.push(Topology::LineStrip, [Point::zero(); 3], Color::RED, &m));
        assert!(list.push(Topology::TriangleList, [Point::zero(); 6], Color::BLUE, &m));

        let cmds = list.cmds();
        assert_eq!(cmds[0].vertex_range(), 0..3);
        assert_eq!(cmds[1].vertex_range(), 3..9);
        assert_eq!(list.vertices().len(), 9);
    }

    #[test]
    fn empty_push_records_nothing() {
        let mut list = DrawList::new();
        assert!(!list.push(Topology::LineList, [], Color::RED, &Mat3::identity()));
        assert!(list.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut list = DrawList::new();
        list.push(Topology::LineList, [Point::zero(); 2], Color::RED, &Mat3::identity());
        list.clear();
        list.clear();
        assert!(list.is_empty());
        assert!(list.vertices().is_empty());
        assert_eq!(list.clear_color(), Some(Color::BACKGROUND));

        list.reset();
        assert_eq!(list.clear_color(), None);
    }
}
