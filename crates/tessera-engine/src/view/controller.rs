use crate::coords::{Point, Viewport};
use crate::geometry::Mat3;
use crate::input::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

use super::{ViewState, ZoomLimits};

/// Wheel and drag behavior of a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Zoom factor for one wheel step away from the user.
    pub zoom_in: f32,
    /// Zoom factor for one wheel step toward the user.
    pub zoom_out: f32,
    /// `None` leaves zoom unbounded.
    pub zoom_limits: Option<ZoomLimits>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_in: 1.1,
            zoom_out: 0.9,
            zoom_limits: None,
        }
    }
}

/// Visible effect of an input event on the view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewUpdate {
    Zoomed { zoom: f32 },
    Panned { pan_x: f32, pan_y: f32 },
}

/// Drives one [`ViewState`] from pointer input.
///
/// - wheel: zoom by `zoom_out` (negative y) or `zoom_in` (positive y)
/// - secondary button drag: pan, tracking pointer deltas
/// - secondary release, pointer leaving, or focus loss: stop panning
///
/// Events this controller does not use (keys, primary button) pass through
/// untouched; the pan state never swallows them.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    state: ViewState,
    config: ViewConfig,
}

impl ViewportController {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            state: ViewState::default(),
            config,
        }
    }

    #[inline]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[inline]
    pub fn matrix(&self) -> &Mat3 {
        self.state.matrix()
    }

    #[inline]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Applies `event` for a surface of size `surface`.
    ///
    /// Returns `Some` when the matrix changed and the surface needs a redraw.
    pub fn handle_event(&mut self, event: &InputEvent, surface: Viewport) -> Option<ViewUpdate> {
        match event {
            InputEvent::MouseWheel { delta, .. } => {
                let y = delta.y();
                let factor = if y < 0.0 {
                    self.config.zoom_out
                } else if y > 0.0 {
                    self.config.zoom_in
                } else {
                    return None;
                };
                self.state
                    .zoom_by(factor, self.config.zoom_limits)
                    .then(|| ViewUpdate::Zoomed { zoom: self.state.zoom() })
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Right,
                state,
                x,
                y,
                ..
            }) => {
                match state {
                    MouseButtonState::Pressed => self.state.begin_pan(*x, *y),
                    MouseButtonState::Released => self.state.end_pan(),
                }
                None
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if !self.state.is_panning() {
                    return None;
                }
                let (last_x, last_y) = self.state.track_pointer(*x, *y)?;
                if !surface.is_valid() {
                    return None;
                }
                let dx = (x - last_x) / surface.width * 2.0;
                let dy = -(y - last_y) / surface.height * 2.0;
                self.state.pan_by(dx, dy).then(|| {
                    let (pan_x, pan_y) = self.state.pan();
                    ViewUpdate::Panned { pan_x, pan_y }
                })
            }

            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.state.end_pan();
                None
            }

            _ => None,
        }
    }

    /// Maps a surface position to clip space, ignoring the view.
    #[inline]
    pub fn surface_to_clip(&self, x: f32, y: f32, surface: Viewport) -> Point {
        surface.to_clip(x, y)
    }

    /// Maps a surface position to scene space, undoing pan and zoom.
    pub fn surface_to_scene(&self, x: f32, y: f32, surface: Viewport) -> Point {
        self.state.clip_to_scene(surface.to_clip(x, y))
    }
}
