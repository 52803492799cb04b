use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::input::InputEvent;
use crate::window::RuntimeCtx;

use super::ctx::{FrameCtx, InputCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Redraw the window the callback was about.
    Redraw,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Redraw is invalidation-based: a window is drawn only when a callback asks
/// for it (return [`AppControl::Redraw`] or call
/// [`RuntimeCtx::request_redraw`]) or when the platform requests it.
pub trait App {
    /// Called after a window and its GPU context were created.
    fn on_window_created(&mut self, window_id: WindowId, label: &str, runtime: &mut RuntimeCtx) {
        let _ = (window_id, label, runtime);
    }

    /// Called for raw window events, before runtime handling.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called for every translated input event.
    fn on_input(&mut self, ctx: &mut InputCtx<'_>, event: &InputEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called once per event-loop iteration, before the loop sleeps.
    fn on_idle(&mut self, runtime: &mut RuntimeCtx) {
        let _ = runtime;
    }

    /// Called when a window must be drawn.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
