use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, InputCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Stable name handed back to the app in `on_window_created`.
    pub label: String,
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub position: Option<LogicalPosition<f64>>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            label: "main".to_string(),
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(640.0, 640.0),
            position: None,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::CreateWindow(config));
    }

    pub fn set_title(&mut self, id: WindowId, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(id, title.into()));
    }

    pub fn request_redraw(&mut self, id: WindowId) {
        self.commands.push(Command::RequestRedraw(Some(id)));
    }

    pub fn request_redraw_all(&mut self) {
        self.commands.push(Command::RequestRedraw(None));
    }

    /// Wakes the loop again after `delay` even without platform events.
    ///
    /// Used to poll background work. The shortest request in an iteration wins.
    pub fn poll_after(&mut self, delay: Duration) {
        self.commands.push(Command::PollAfter(delay));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug)]
enum Command {
    CreateWindow(RuntimeConfig),
    SetTitle(WindowId, String),
    /// `None` redraws every window.
    RequestRedraw(Option<WindowId>),
    PollAfter(Duration),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens `initial` and runs until every window is closed or the app exits.
    ///
    /// Further windows are created through [`RuntimeCtx::create_window`].
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    label: String,
    input_state: InputState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: Option<RuntimeConfig>,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    wake_at: Option<Instant>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial: Some(initial),
            gpu_init,
            app,
            windows: HashMap::new(),
            wake_at: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let mut attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        if let Some(pos) = config.position {
            attrs = attrs.with_position(pos);
        }

        let window = event_loop
            .create_window(attrs)
            .with_context(|| format!("failed to create window `{}`", config.label))?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            label: config.label.clone(),
            input_state: InputState::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .with_context(|| format!("GPU initialization failed for window `{}`", config.label))?;

        entry.with_window(|w| w.request_redraw());
        self.windows.insert(id, entry);
        log::debug!("window `{}` created", config.label);

        let mut runtime_ctx = RuntimeCtx::default();
        self.app.on_window_created(id, &config.label, &mut runtime_ctx);
        self.apply_commands(event_loop, runtime_ctx);

        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if let Some(entry) = self.windows.remove(&id) {
            entry.with_label(|l| log::debug!("window `{l}` closed"));
        }
    }

    fn redraw(&self, id: Option<WindowId>) {
        match id {
            Some(id) => {
                if let Some(entry) = self.windows.get(&id) {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            None => {
                for entry in self.windows.values() {
                    entry.with_window(|w| w.request_redraw());
                }
            }
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CreateWindow(cfg) => {
                    if let Err(e) = self.create_window_entry(event_loop, cfg) {
                        log::error!("failed to create window: {e:#}");
                        self.request_exit();
                    }
                }
                Command::SetTitle(id, title) => {
                    if let Some(entry) = self.windows.get(&id) {
                        entry.with_window(|w| w.set_title(&title));
                    }
                }
                Command::RequestRedraw(id) => self.redraw(id),
                Command::PollAfter(delay) => {
                    let at = Instant::now() + delay;
                    self.wake_at = Some(self.wake_at.map_or(at, |prev| prev.min(at)));
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.windows.is_empty() && self.initial.is_none() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

fn apply_control(id: WindowId, control: AppControl, runtime_ctx: &mut RuntimeCtx) {
    match control {
        AppControl::Continue => {}
        AppControl::Redraw => runtime_ctx.request_redraw(id),
        AppControl::Exit => runtime_ctx.exit(),
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(initial) = self.initial.take() else { return };

        if let Err(e) = self.create_window_entry(event_loop, initial) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit();
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        self.app.on_idle(&mut runtime_ctx);
        if !runtime_ctx.is_empty() {
            self.apply_commands(event_loop, runtime_ctx);
        }

        match self.wake_at.take() {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        if app.on_window_event(window_id, &event) == AppControl::Exit {
            control = AppControl::Exit;
        }

        entry.with_mut(|fields| {
            let Some(ev) = translate_window_event(fields.input_state, &event) else {
                return;
            };
            fields.input_state.apply_event(&ev);

            let mut ctx = InputCtx {
                window: WindowCtx {
                    id: window_id,
                    label: fields.label,
                    window: fields.window,
                },
                input: fields.input_state,
                runtime: &mut runtime_ctx,
            };
            let c = app.on_input(&mut ctx, &ev);
            if control != AppControl::Exit {
                control = c;
            }
        });

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let app = &mut self.app;
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_mut(|fields| {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                label: fields.label,
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            input: fields.input_state,
                            runtime: &mut runtime_ctx,
                        };
                        let c = app.on_frame(&mut ctx);
                        // A frame asking for itself again would spin.
                        if c == AppControl::Exit {
                            control = c;
                        }
                    });
                }
            }

            _ => {}
        }

        apply_control(window_id, control, &mut runtime_ctx);
        self.apply_commands(event_loop, runtime_ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_buffered_in_order() {
        let mut ctx = RuntimeCtx::default();
        assert!(ctx.is_empty());
        ctx.poll_after(Duration::from_millis(16));
        ctx.request_redraw_all();
        ctx.exit();

        assert!(matches!(ctx.commands[0], Command::PollAfter(d) if d == Duration::from_millis(16)));
        assert!(matches!(ctx.commands[1], Command::RequestRedraw(None)));
        assert!(matches!(ctx.commands[2], Command::Exit));
    }

    #[test]
    fn default_config_is_labelled() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.label, "main");
        assert!(cfg.position.is_none());
    }
}
