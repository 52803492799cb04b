use crate::coords::Point;
use crate::geometry::Mat3;

/// Inclusive bounds on the zoom factor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomLimits {
    min: f32,
    max: f32,
}

impl ZoomLimits {
    /// `None` unless `0 < min <= max` and both are finite.
    pub fn new(min: f32, max: f32) -> Option<Self> {
        (min > 0.0 && min <= max && max.is_finite()).then_some(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// Pan/zoom state of one viewport.
///
/// The matrix is recomputed by every mutator, so it always equals
/// `Mat3::pan_zoom(pan_x, pan_y, zoom)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    matrix: Mat3,
    /// Last pointer position while a pan drag is active.
    pan_origin: Option<(f32, f32)>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            matrix: Mat3::IDENTITY,
            pan_origin: None,
        }
    }
}

impl ViewState {
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    #[inline]
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    #[inline]
    pub fn is_panning(&self) -> bool {
        self.pan_origin.is_some()
    }

    /// Pointer position the next pan delta is measured from.
    #[inline]
    pub fn last_pointer(&self) -> Option<(f32, f32)> {
        self.pan_origin
    }

    /// Multiplies the zoom by `factor`, clamped to `limits`.
    ///
    /// Returns `false` and leaves the state unchanged if the result would not
    /// be a positive normal number.
    pub fn zoom_by(&mut self, factor: f32, limits: Option<ZoomLimits>) -> bool {
        let mut zoom = self.zoom * factor;
        if let Some(l) = limits {
            zoom = l.clamp(zoom);
        }
        if !zoom.is_normal() || zoom <= 0.0 || zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.update_matrix();
        true
    }

    /// Offsets the pan by `(dx, dy)` in clip units.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        self.update_matrix();
        true
    }

    pub fn begin_pan(&mut self, x: f32, y: f32) {
        self.pan_origin = Some((x, y));
    }

    /// Moves the pan origin to `(x, y)`, returning the previous one.
    pub fn track_pointer(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        self.pan_origin.replace((x, y))
    }

    pub fn end_pan(&mut self) {
        self.pan_origin = None;
    }

    /// Zoom 1, no pan, not panning.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Maps a clip-space point back into scene space.
    ///
    /// Falls back to the input when the matrix is not invertible.
    pub fn clip_to_scene(&self, p: Point) -> Point {
        self.matrix.inverse().map_or(p, |inv| inv.transform_point(p))
    }

    fn update_matrix(&mut self) {
        self.matrix = Mat3::pan_zoom(self.pan_x, self.pan_y, self.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn matrix_tracks_every_mutation() {
        let mut v = ViewState::default();
        v.zoom_by(2.0, None);
        v.pan_by(0.5, -0.25);
        assert_eq!(*v.matrix(), Mat3::pan_zoom(0.5, -0.25, 2.0));

        let p = v.matrix().transform_point(Point::new(1.0, 1.0));
        assert_close(p.x, 2.5);
        assert_close(p.y, 1.75);
    }

    #[test]
    fn limits_clamp_zoom() {
        let limits = ZoomLimits::new(0.5, 2.0);
        let mut v = ViewState::default();
        for _ in 0..20 {
            v.zoom_by(1.1, limits);
        }
        assert_close(v.zoom(), 2.0);
        assert!(!v.zoom_by(1.1, limits));
    }

    #[test]
    fn invalid_limits_are_rejected() {
        assert!(ZoomLimits::new(0.0, 1.0).is_none());
        assert!(ZoomLimits::new(2.0, 1.0).is_none());
        assert!(ZoomLimits::new(1.0, f32::INFINITY).is_none());
        assert!(ZoomLimits::new(1.0, 1.0).is_some());
    }

    #[test]
    fn zoom_never_collapses_to_zero() {
        let mut v = ViewState::default();
        assert!(!v.zoom_by(0.0, None));
        assert!(!v.zoom_by(f32::NAN, None));
        assert_eq!(v.zoom(), 1.0);
    }

    #[test]
    fn clip_to_scene_inverts_the_view() {
        let mut v = ViewState::default();
        v.zoom_by(4.0, None);
        v.pan_by(0.2, 0.1);
        let scene = Point::new(0.3, -0.7);
        let clip = v.matrix().transform_point(scene);
        let back = v.clip_to_scene(clip);
        assert_close(back.x, scene.x);
        assert_close(back.y, scene.y);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut v = ViewState::default();
        v.zoom_by(3.0, None);
        v.pan_by(1.0, 1.0);
        v.begin_pan(5.0, 5.0);
        v.reset();
        assert_eq!(v, ViewState::default());
        assert_eq!(*v.matrix(), Mat3::identity());
    }
}
