use crate::coords::Point;
use crate::geometry::{validate_triangles, IndexIntegrityError, Mat3, Mesh, ValidatedTriangles};
use crate::paint::Color;
use crate::scene::{DrawList, Topology};

/// How a triangle mesh is drawn.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
    FilledWithWireframe,
}

impl RenderMode {
    /// Next mode in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            RenderMode::Filled => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::FilledWithWireframe,
            RenderMode::FilledWithWireframe => RenderMode::Filled,
        }
    }

    #[inline]
    fn fills(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWithWireframe)
    }

    #[inline]
    fn outlines(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWithWireframe)
    }
}

/// What a mesh draw actually recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDraw {
    /// Valid triangles drawn.
    pub triangles: usize,
    /// Wireframe segments drawn (three per triangle).
    pub segments: usize,
    /// Set when triangles were skipped or indices left over.
    pub integrity: Option<IndexIntegrityError>,
}

impl MeshDraw {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.integrity.is_none()
    }
}

impl DrawList {
    /// Records the valid triangles of `mesh` as one filled draw.
    ///
    /// Indices refer to the mesh's own vertices, or `fallback` when it has none.
    pub fn push_triangles(
        &mut self,
        mesh: &Mesh,
        fallback: &[Point],
        color: Color,
        matrix: &Mat3,
    ) -> MeshDraw {
        self.push_mesh(mesh, fallback, color, matrix, RenderMode::Filled)
    }

    /// Records three independent segments per valid triangle, then a marker
    /// at every referenced vertex.
    pub fn push_wireframe(
        &mut self,
        mesh: &Mesh,
        fallback: &[Point],
        color: Color,
        matrix: &Mat3,
    ) -> MeshDraw {
        self.push_mesh(mesh, fallback, color, matrix, RenderMode::Wireframe)
    }

    /// Records `mesh` according to `mode`. Triangles are validated once.
    ///
    /// Wireframe output is skipped entirely when the mesh or its vertex list
    /// is empty.
    pub fn push_mesh(
        &mut self,
        mesh: &Mesh,
        fallback: &[Point],
        color: Color,
        matrix: &Mat3,
        mode: RenderMode,
    ) -> MeshDraw {
        let vertices = mesh.resolve_vertices(fallback);
        if mode == RenderMode::Wireframe && (mesh.indices.is_empty() || vertices.is_empty()) {
            return MeshDraw::default();
        }

        let valid = validate_triangles(&mesh.indices, vertices.len());
        let mut report = MeshDraw {
            integrity: valid.integrity.clone(),
            ..MeshDraw::default()
        };

        if mode.fills() {
            let corners = valid.triangles.iter().flatten().map(|&i| vertices[i as usize]);
            self.push(Topology::TriangleList, corners, color, matrix);
            report.triangles = valid.triangles.len();
        }

        if mode.outlines() && !vertices.is_empty() {
            report.segments = self.push_edges(&valid, vertices, color, matrix);
            report.triangles = valid.triangles.len();
        }

        report
    }

    fn push_edges(
        &mut self,
        valid: &ValidatedTriangles,
        vertices: &[Point],
        color: Color,
        matrix: &Mat3,
    ) -> usize {
        let edges = valid.triangles.iter().flat_map(|&[a, b, c]| {
            let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            [a, b, b, c, c, a]
        });
        self.push(Topology::LineList, edges, color, matrix);

        let markers: Vec<Point> = valid
            .referenced_vertices(vertices.len())
            .into_iter()
            .map(|i| vertices[i as usize])
            .collect();
        self.push_points(&markers, color, matrix);

        valid.triangles.len() * 3
    }
}
