//! Studio session: the polygon being sketched or imported, the latest mesh,
//! and the two viewports that display them.
//!
//! Everything here is GPU-free. Drawing goes through [`Canvas`], so the
//! application hands in a `PrimitiveRenderer` and tests hand in a `DrawList`.

use std::path::Path;
use std::time::Duration;

use tessera_engine::coords::{Point, Viewport};
use tessera_engine::geometry::{GeometryError, Mat3, Mesh, Normalizer};
use tessera_engine::input::InputEvent;
use tessera_engine::paint::Color;
use tessera_engine::scene::{Canvas, RenderMode};
use tessera_engine::view::{ViewConfig, ViewportController};

use crate::events::{EventBus, StudioEvent, Subscription, ViewportId};
use crate::import;
use crate::triangulate::{Method, RawMesh, TransportError};

/// Clicking within this clip-space distance of the first point closes the
/// polygon.
pub const CLOSE_DISTANCE: f32 = 0.1;

/// Straight alpha of filled meshes.
pub const FILL_ALPHA: f32 = 0.35;

pub const DRAWING_COLOR: Color = Color::RED;
pub const FINISHED_COLOR: Color = Color::BLUE;
pub const REFERENCE_COLOR: Color = Color::GREEN;

/// Drawn in the output viewport, untransformed, until a mesh exists.
pub const REFERENCE_TRIANGLE: [Point; 3] = [
    Point::new(-0.9, -0.9),
    Point::new(0.9, -0.9),
    Point::new(0.0, 0.9),
];

#[derive(Debug, Clone, PartialEq)]
pub struct TriangulationResult {
    pub method: Method,
    pub mesh: Mesh,
    pub elapsed: Duration,
}

/// Effect of a click on the sketch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointOutcome {
    /// Started a new polygon; previous points and result were dropped.
    Started,
    Added,
    Closed,
}

/// Polygon and mesh state.
///
/// `epoch` changes whenever the polygon is replaced or cleared, so results
/// computed for an older polygon can be recognized and dropped.
#[derive(Debug, Default)]
pub struct Scene {
    points: Vec<Point>,
    /// Imported coordinates, before normalization.
    source_points: Option<Vec<[f64; 2]>>,
    normalizer: Option<Normalizer>,
    is_drawing: bool,
    result: Option<TriangulationResult>,
    epoch: u64,
}

impl Scene {
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn source_points(&self) -> Option<&[[f64; 2]]> {
        self.source_points.as_deref()
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// A finished polygon with enough points to triangulate.
    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.is_drawing && self.points.len() >= 3
    }

    #[inline]
    pub fn result(&self) -> Option<&TriangulationResult> {
        self.result.as_ref()
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Adds a sketched point in scene space.
    pub fn add_point(&mut self, p: Point) -> PointOutcome {
        if !self.is_drawing {
            self.replace(vec![p], None, None);
            self.is_drawing = true;
            return PointOutcome::Started;
        }

        if let Some(&first) = self.points.first() {
            if self.points.len() > 2 && p.distance(first) < CLOSE_DISTANCE {
                self.is_drawing = false;
                return PointOutcome::Closed;
            }
        }

        self.points.push(p);
        PointOutcome::Added
    }

    /// Closes the polygon being drawn. Needs at least three points.
    pub fn finish(&mut self) -> bool {
        if !self.is_drawing || self.points.len() < 3 {
            return false;
        }
        self.is_drawing = false;
        true
    }

    /// Replaces the polygon with `source`, normalized into clip space.
    ///
    /// On error the scene is left untouched.
    pub fn load(&mut self, source: Vec<[f64; 2]>) -> Result<usize, GeometryError> {
        let normalizer = Normalizer::fit(&source)?;
        let points = normalizer.apply_all(&source);
        let n = points.len();
        self.replace(points, Some(source), Some(normalizer));
        Ok(n)
    }

    /// Coordinates to send to a triangulator: the imported source when there
    /// is one, the on-screen points otherwise. `None` until the polygon is
    /// closed.
    pub fn triangulation_input(&self) -> Option<Vec<[f64; 2]>> {
        if !self.is_closed() {
            return None;
        }
        Some(match &self.source_points {
            Some(source) => source.clone(),
            None => self.points.iter().map(|p| p.to_f64()).collect(),
        })
    }

    /// Stores a mesh computed for the polygon of `epoch`.
    ///
    /// Returns `false`, dropping the mesh, if the polygon changed since.
    pub fn apply_result(&mut self, epoch: u64, method: Method, raw: RawMesh, elapsed: Duration) -> bool {
        if epoch != self.epoch {
            log::debug!("dropping {method} result for epoch {epoch}; scene is at {}", self.epoch);
            return false;
        }

        let vertices = raw.vertices.map(|vs| match &self.normalizer {
            Some(n) => n.apply_all(&vs),
            None => vs.iter().map(|&[x, y]| Point::new(x as f32, y as f32)).collect(),
        });

        self.result = Some(TriangulationResult {
            method,
            mesh: Mesh {
                indices: raw.indices,
                vertices,
            },
            elapsed,
        });
        true
    }

    pub fn reset(&mut self) {
        self.replace(Vec::new(), None, None);
    }

    fn replace(
        &mut self,
        points: Vec<Point>,
        source_points: Option<Vec<[f64; 2]>>,
        normalizer: Option<Normalizer>,
    ) {
        self.points = points;
        self.source_points = source_points;
        self.normalizer = normalizer;
        self.is_drawing = false;
        self.result = None;
        self.epoch += 1;
    }
}

/// Triangulation request captured from the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub epoch: u64,
    pub method: Method,
    pub points: Vec<[f64; 2]>,
}

/// Scene plus the two viewports and the notification bus.
pub struct Studio {
    scene: Scene,
    input_view: ViewportController,
    output_view: ViewportController,
    render_mode: RenderMode,
    bus: EventBus<StudioEvent>,
    /// Set once the current result's integrity problem has been reported.
    integrity_reported: bool,
}

impl Studio {
    pub fn new(view: ViewConfig) -> Self {
        Self {
            scene: Scene::default(),
            input_view: ViewportController::new(view.clone()),
            output_view: ViewportController::new(view),
            render_mode: RenderMode::default(),
            bus: EventBus::new(),
            integrity_reported: false,
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn view(&self, viewport: ViewportId) -> &ViewportController {
        match viewport {
            ViewportId::Input => &self.input_view,
            ViewportId::Output => &self.output_view,
        }
    }

    pub fn subscribe(&mut self, f: impl FnMut(&StudioEvent) + 'static) -> Subscription {
        self.bus.subscribe(f)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.bus.unsubscribe(subscription)
    }

    /// Primary click at surface position `(x, y)` of the input viewport.
    pub fn click(&mut self, x: f32, y: f32, surface: Viewport) -> PointOutcome {
        let p = self.input_view.surface_to_scene(x, y, surface);
        let outcome = self.scene.add_point(p);
        match outcome {
            PointOutcome::Started => {
                self.bus.emit(&StudioEvent::DrawingStarted);
                self.emit_points();
            }
            PointOutcome::Added => self.emit_points(),
            PointOutcome::Closed => self.emit_completed(),
        }
        outcome
    }

    pub fn finish(&mut self) -> bool {
        let closed = self.scene.finish();
        if closed {
            self.emit_completed();
        }
        closed
    }

    /// Imports the point file at `path`. Failures leave the scene unchanged.
    pub fn load_file(&mut self, path: &Path) -> bool {
        let loaded = import::read_points(path)
            .map_err(|e| e.to_string())
            .and_then(|source| self.scene.load(source).map_err(|e| e.to_string()));

        match loaded {
            Ok(points) => {
                log::info!("loaded {points} points from {}", path.display());
                self.bus.emit(&StudioEvent::FileLoaded {
                    path: path.to_path_buf(),
                    points,
                });
                self.emit_points();
                true
            }
            Err(message) => {
                log::error!("import of {} failed: {message}", path.display());
                self.bus.emit(&StudioEvent::FileError { message });
                false
            }
        }
    }

    /// Captures the closed polygon for `method`. `None` while no polygon is
    /// closed.
    pub fn begin_triangulation(&mut self, method: Method) -> Option<Job> {
        let Some(points) = self.scene.triangulation_input() else {
            log::info!("{method} triangulation needs a closed polygon");
            return None;
        };
        self.bus.emit(&StudioEvent::TriangulationStarted { method });
        Some(Job {
            epoch: self.scene.epoch(),
            method,
            points,
        })
    }

    /// Applies the outcome of `job`. Returns `true` when the output changed.
    pub fn finish_triangulation(
        &mut self,
        job: &Job,
        outcome: Result<RawMesh, TransportError>,
        elapsed: Duration,
    ) -> bool {
        let method = job.method;
        match outcome {
            Ok(raw) => {
                let triangles = raw.indices.len() / 3;
                if !self.scene.apply_result(job.epoch, method, raw, elapsed) {
                    return false;
                }
                self.integrity_reported = false;
                log::info!("{method} triangulation: {triangles} triangles in {elapsed:?}");
                self.bus.emit(&StudioEvent::TriangulationCompleted {
                    method,
                    triangles,
                    elapsed,
                });
                true
            }
            Err(error) => {
                log::error!("{method} triangulation failed: {error}");
                self.bus.emit(&StudioEvent::TriangulationFailed { method, error });
                false
            }
        }
    }

    /// Clears the scene and both views.
    pub fn reset(&mut self) {
        self.scene.reset();
        self.input_view.reset();
        self.output_view.reset();
        self.integrity_reported = false;
        self.bus.emit(&StudioEvent::Reset);
    }

    pub fn cycle_render_mode(&mut self) -> RenderMode {
        self.render_mode = self.render_mode.next();
        log::debug!("output render mode: {:?}", self.render_mode);
        self.render_mode
    }

    /// Feeds pan/zoom input to one viewport. Returns `true` if it needs a
    /// redraw.
    pub fn handle_view(&mut self, viewport: ViewportId, event: &InputEvent, surface: Viewport) -> bool {
        let controller = match viewport {
            ViewportId::Input => &mut self.input_view,
            ViewportId::Output => &mut self.output_view,
        };
        let Some(update) = controller.handle_event(event, surface) else {
            return false;
        };
        self.bus.emit(&StudioEvent::ViewUpdated { viewport, update });
        true
    }

    /// Records the sketch: red while drawing, blue once closed.
    pub fn draw_input(&self, canvas: &mut impl Canvas) {
        canvas.clear();
        let color = if self.scene.is_drawing() { DRAWING_COLOR } else { FINISHED_COLOR };
        canvas.draw_polygon(
            self.scene.points(),
            !self.scene.is_drawing(),
            color,
            self.input_view.matrix(),
        );
    }

    /// Records the mesh in the current render mode, or the reference
    /// triangle while there is none.
    pub fn draw_output(&mut self, canvas: &mut impl Canvas) {
        canvas.clear();

        let Some(result) = self.scene.result() else {
            canvas.draw_mesh(
                &Mesh::from_indices(vec![0, 1, 2]),
                &REFERENCE_TRIANGLE,
                &Mat3::IDENTITY,
                REFERENCE_COLOR,
                RenderMode::Wireframe,
            );
            return;
        };

        let matrix = self.output_view.matrix();
        let color = result.method.color();
        let points = self.scene.points();

        let mut draws = Vec::with_capacity(2);
        if matches!(self.render_mode, RenderMode::Filled | RenderMode::FilledWithWireframe) {
            draws.push(canvas.draw_mesh(
                &result.mesh,
                points,
                matrix,
                color.with_alpha(FILL_ALPHA),
                RenderMode::Filled,
            ));
        }
        if matches!(self.render_mode, RenderMode::Wireframe | RenderMode::FilledWithWireframe) {
            draws.push(canvas.draw_mesh(&result.mesh, points, matrix, color, RenderMode::Wireframe));
        }

        let problem = draws.into_iter().find_map(|d| d.integrity);
        if let Some(err) = problem {
            if !self.integrity_reported {
                self.integrity_reported = true;
                self.bus.emit(&StudioEvent::MeshIntegrity {
                    message: err.to_string(),
                });
            }
        }
    }

    fn emit_points(&mut self) {
        let points = self.scene.points().len();
        self.bus.emit(&StudioEvent::PointsUpdated { points });
    }

    fn emit_completed(&mut self) {
        let points = self.scene.points().len();
        log::debug!("polygon closed with {points} points");
        self.bus.emit(&StudioEvent::DrawingCompleted { points });
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("scene", &self.scene)
            .field("render_mode", &self.render_mode)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tessera_engine::input::{Modifiers, MouseWheelDelta};
    use tessera_engine::scene::{DrawList, Topology};

    const SURFACE: Viewport = Viewport::new(200.0, 200.0);

    fn assert_points_close(actual: &[Point], expected: &[Point]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.distance(*e) < 1e-5, "{a:?} != {e:?}");
        }
    }

    fn record_events(studio: &mut Studio) -> Rc<RefCell<Vec<StudioEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        studio.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    fn closed_square(scene: &mut Scene) {
        for p in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            scene.add_point(Point::new(p.0, p.1));
        }
        assert!(scene.finish());
    }

    #[test]
    fn click_near_first_point_closes() {
        let mut scene = Scene::default();
        assert_eq!(scene.add_point(Point::new(0.0, 0.0)), PointOutcome::Started);
        assert_eq!(scene.add_point(Point::new(0.5, 0.0)), PointOutcome::Added);
        // Two points: too few to close, so the click is a point.
        assert_eq!(scene.add_point(Point::new(0.05, 0.0)), PointOutcome::Added);
        assert_eq!(scene.add_point(Point::new(0.02, 0.02)), PointOutcome::Closed);

        assert_eq!(scene.points().len(), 3);
        assert!(scene.is_closed());
    }

    #[test]
    fn click_after_closing_starts_over() {
        let mut scene = Scene::default();
        closed_square(&mut scene);
        let job_epoch = scene.epoch();
        assert!(scene.apply_result(job_epoch, Method::Native, RawMesh::default(), Duration::ZERO));

        assert_eq!(scene.add_point(Point::new(0.3, 0.3)), PointOutcome::Started);
        assert_eq!(scene.points(), &[Point::new(0.3, 0.3)]);
        assert!(scene.result().is_none());
        assert!(scene.is_drawing());
    }

    #[test]
    fn finish_needs_three_points() {
        let mut scene = Scene::default();
        assert!(!scene.finish());
        scene.add_point(Point::new(0.0, 0.0));
        scene.add_point(Point::new(0.5, 0.0));
        assert!(!scene.finish());
        assert!(scene.triangulation_input().is_none());
    }

    #[test]
    fn load_normalizes_and_keeps_source() {
        let mut scene = Scene::default();
        let source = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        assert_eq!(scene.load(source.clone()), Ok(4));

        assert!(scene.is_closed());
        assert_points_close(&scene.points()[..1], &[Point::new(-0.9, -0.9)]);
        assert_eq!(scene.triangulation_input(), Some(source));
    }

    #[test]
    fn failed_load_leaves_scene_alone() {
        let mut scene = Scene::default();
        closed_square(&mut scene);
        let epoch = scene.epoch();

        let err = scene.load(vec![[1.0, 1.0], [2.0, 1.0]]).unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate { .. }));
        assert_eq!(scene.points().len(), 4);
        assert_eq!(scene.epoch(), epoch);
    }

    #[test]
    fn structured_vertices_follow_the_import_normalizer() {
        let mut scene = Scene::default();
        scene.load(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]).unwrap();

        let raw = RawMesh {
            indices: vec![0, 1, 2],
            vertices: Some(vec![[0.0, 0.0], [10.0, 0.0], [5.0, 5.0]]),
        };
        assert!(scene.apply_result(scene.epoch(), Method::Service, raw, Duration::ZERO));

        let mesh = &scene.result().unwrap().mesh;
        assert_points_close(
            mesh.vertices.as_deref().unwrap(),
            &[Point::new(-0.9, -0.9), Point::new(0.9, -0.9), Point::new(0.0, 0.0)],
        );
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut scene = Scene::default();
        closed_square(&mut scene);
        let epoch = scene.epoch();
        scene.reset();

        let raw = RawMesh { indices: vec![0, 1, 2], vertices: None };
        assert!(!scene.apply_result(epoch, Method::Service, raw, Duration::ZERO));
        assert!(scene.result().is_none());
    }

    #[test]
    fn click_maps_through_the_view() {
        let mut studio = Studio::new(ViewConfig::default());
        let zoom_in = InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        };
        assert!(studio.handle_view(ViewportId::Input, &zoom_in, SURFACE));

        // Right edge of the surface is clip x = 1, scene x = 1 / 1.1.
        studio.click(200.0, 100.0, SURFACE);
        let p = studio.scene().points()[0];
        assert!((p.x - 1.0 / 1.1).abs() < 1e-5, "{p:?}");
        assert!(p.y.abs() < 1e-5);
        assert_eq!(studio.view(ViewportId::Output).state().zoom(), 1.0);
    }

    #[test]
    fn triangulation_round_trip_emits_events() {
        let mut studio = Studio::new(ViewConfig::default());
        let seen = record_events(&mut studio);

        assert!(studio.begin_triangulation(Method::Native).is_none());

        for (x, y) in [(50.0, 150.0), (150.0, 150.0), (100.0, 50.0)] {
            studio.click(x, y, SURFACE);
        }
        assert!(studio.finish());

        let job = studio.begin_triangulation(Method::Native).unwrap();
        assert_eq!(job.points.len(), 3);
        let applied = studio.finish_triangulation(
            &job,
            Ok(RawMesh { indices: vec![0, 1, 2], vertices: None }),
            Duration::from_millis(3),
        );
        assert!(applied);

        let seen = seen.borrow();
        assert_eq!(seen[0], StudioEvent::DrawingStarted);
        assert!(seen.contains(&StudioEvent::DrawingCompleted { points: 3 }));
        assert!(seen.contains(&StudioEvent::TriangulationStarted { method: Method::Native }));
        assert_eq!(
            seen.last(),
            Some(&StudioEvent::TriangulationCompleted {
                method: Method::Native,
                triangles: 1,
                elapsed: Duration::from_millis(3),
            })
        );
    }

    #[test]
    fn failure_keeps_previous_result() {
        let mut studio = Studio::new(ViewConfig::default());
        for (x, y) in [(50.0, 150.0), (150.0, 150.0), (100.0, 50.0)] {
            studio.click(x, y, SURFACE);
        }
        studio.finish();

        let job = studio.begin_triangulation(Method::Native).unwrap();
        studio.finish_triangulation(&job, Ok(RawMesh { indices: vec![0, 1, 2], vertices: None }), Duration::ZERO);

        let job = studio.begin_triangulation(Method::Service).unwrap();
        let err = TransportError::Status { status: 503, body: String::new() };
        assert!(!studio.finish_triangulation(&job, Err(err), Duration::ZERO));
        assert_eq!(studio.scene().result().map(|r| r.method), Some(Method::Native));
    }

    #[test]
    fn reset_clears_scene_and_views() {
        let mut studio = Studio::new(ViewConfig::default());
        let seen = record_events(&mut studio);
        let zoom_out = InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: -1.0 },
            modifiers: Modifiers::default(),
        };
        studio.handle_view(ViewportId::Output, &zoom_out, SURFACE);
        studio.click(10.0, 10.0, SURFACE);

        studio.reset();
        assert!(studio.scene().points().is_empty());
        assert!(studio.scene().result().is_none());
        assert_eq!(studio.view(ViewportId::Output).state().zoom(), 1.0);
        assert_eq!(studio.view(ViewportId::Output).state().pan(), (0.0, 0.0));
        assert_eq!(seen.borrow().last(), Some(&StudioEvent::Reset));
    }

    #[test]
    fn output_shows_reference_triangle_without_result() {
        let mut studio = Studio::new(ViewConfig::default());
        let mut list = DrawList::new();
        studio.draw_output(&mut list);

        assert_eq!(list.clear_color(), Some(Color::BACKGROUND));
        let edges = &list.cmds()[0];
        assert_eq!(edges.topology, Topology::LineList);
        assert_eq!(edges.color, REFERENCE_COLOR);
        assert_eq!(edges.matrix, Mat3::IDENTITY);
        assert_eq!(edges.vertex_count, 6);
    }

    #[test]
    fn filled_with_wireframe_draws_fill_then_edges() {
        let mut studio = Studio::new(ViewConfig::default());
        for (x, y) in [(50.0, 150.0), (150.0, 150.0), (100.0, 50.0)] {
            studio.click(x, y, SURFACE);
        }
        studio.finish();
        let job = studio.begin_triangulation(Method::Service).unwrap();
        studio.finish_triangulation(&job, Ok(RawMesh { indices: vec![0, 1, 2], vertices: None }), Duration::ZERO);

        studio.cycle_render_mode();
        assert_eq!(studio.cycle_render_mode(), RenderMode::FilledWithWireframe);

        let mut list = DrawList::new();
        studio.draw_output(&mut list);
        let cmds = list.cmds();
        assert_eq!(cmds[0].topology, Topology::TriangleList);
        assert_eq!(cmds[0].color, Method::Service.color().with_alpha(FILL_ALPHA));
        assert_eq!(cmds[1].topology, Topology::LineList);
        assert_eq!(cmds[1].color, Method::Service.color());
    }

    #[test]
    fn integrity_problem_is_reported_once() {
        let mut studio = Studio::new(ViewConfig::default());
        let seen = record_events(&mut studio);
        for (x, y) in [(50.0, 150.0), (150.0, 150.0), (100.0, 50.0)] {
            studio.click(x, y, SURFACE);
        }
        studio.finish();
        let job = studio.begin_triangulation(Method::Service).unwrap();
        let raw = RawMesh { indices: vec![0, 1, 2, 0, 2, 3], vertices: None };
        studio.finish_triangulation(&job, Ok(raw), Duration::ZERO);

        let mut list = DrawList::new();
        studio.draw_output(&mut list);
        studio.draw_output(&mut list);

        let reports = seen
            .borrow()
            .iter()
            .filter(|e| matches!(e, StudioEvent::MeshIntegrity { .. }))
            .count();
        assert_eq!(reports, 1);
    }

    #[test]
    fn input_draw_colors_follow_drawing_state() {
        let mut studio = Studio::new(ViewConfig::default());
        let mut list = DrawList::new();

        studio.click(50.0, 150.0, SURFACE);
        studio.click(150.0, 150.0, SURFACE);
        studio.draw_input(&mut list);
        assert!(list.cmds().iter().all(|c| c.color == DRAWING_COLOR));

        studio.click(100.0, 50.0, SURFACE);
        studio.finish();
        studio.draw_input(&mut list);
        let outline = &list.cmds()[0];
        assert_eq!(outline.topology, Topology::LineStrip);
        assert_eq!(outline.color, FINISHED_COLOR);
        // Closed: the first point is repeated.
        assert_eq!(outline.vertex_count, 4);
    }

    #[test]
    fn finished_outline_is_closed_below_three_points() {
        let mut studio = Studio::new(ViewConfig::default());
        let mut list = DrawList::new();

        studio.scene.load(vec![[0.0, 0.0], [2.0, 1.0]]).unwrap();
        assert!(!studio.scene.is_drawing());
        studio.draw_input(&mut list);

        let outline = &list.cmds()[0];
        assert_eq!(outline.topology, Topology::LineStrip);
        assert_eq!(outline.color, FINISHED_COLOR);
        assert_eq!(outline.vertex_count, 3);
    }
}
