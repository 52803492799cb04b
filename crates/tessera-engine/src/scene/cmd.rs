use crate::geometry::Mat3;
use crate::paint::Color;

/// Program family a draw is routed to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveFamily {
    Line,
    Triangle,
}

/// Primitive assembly of a recorded draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    LineList,
    LineStrip,
    TriangleList,
}

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::LineList, Topology::LineStrip, Topology::TriangleList];

    #[inline]
    pub fn family(self) -> PrimitiveFamily {
        match self {
            Topology::LineList | Topology::LineStrip => PrimitiveFamily::Line,
            Topology::TriangleList => PrimitiveFamily::Triangle,
        }
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
            Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// One draw call: a contiguous vertex range plus its uniforms.
///
/// Extending the scene:
/// - add a shape module under `scene::shapes::*`
/// - implement its push helpers on `DrawList` in that module
/// - record through [`DrawList::push`] so ranges stay contiguous
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCmd {
    pub topology: Topology,
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub color: Color,
    pub matrix: Mat3,
}

impl DrawCmd {
    #[inline]
    pub fn vertex_range(&self) -> std::ops::Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}
