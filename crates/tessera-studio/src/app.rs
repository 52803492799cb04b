//! Two-window studio application on top of the engine runtime.
//!
//! The input window carries the sketch and all commands; the output window
//! shows the mesh. Both pan and zoom independently.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::window::WindowId;

use tessera_engine::core::{App, AppControl, FrameCtx, InputCtx};
use tessera_engine::input::{InputEvent, Key, MouseButton, MouseButtonState, PointerButtonEvent};
use tessera_engine::render::PrimitiveRenderer;
use tessera_engine::view::ViewConfig;
use tessera_engine::window::{RuntimeConfig, RuntimeCtx};

use crate::events::ViewportId;
use crate::session::{Job, Studio};
use crate::triangulate::{Method, RawMesh, TransportError, Triangulator};

pub const INPUT_LABEL: &str = "input";
pub const OUTPUT_LABEL: &str = "output";

const TITLE: &str = "tessera";

/// Wake-up interval while service requests are in flight.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Configuration of the window that opens first.
pub fn input_window() -> RuntimeConfig {
    RuntimeConfig {
        label: INPUT_LABEL.to_string(),
        title: format!("{TITLE}: input"),
        initial_size: LogicalSize::new(640.0, 640.0),
        position: Some(LogicalPosition::new(40.0, 80.0)),
    }
}

fn output_window() -> RuntimeConfig {
    RuntimeConfig {
        label: OUTPUT_LABEL.to_string(),
        title: format!("{TITLE}: output"),
        initial_size: LogicalSize::new(640.0, 640.0),
        position: Some(LogicalPosition::new(700.0, 80.0)),
    }
}

/// User commands of the input window.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPoint { x: f32, y: f32 },
    Finish,
    Triangulate(Method),
    Reset,
    CycleRenderMode,
    Import(PathBuf),
    Exit,
}

impl Command {
    /// Maps an input event on `viewport` to a command.
    ///
    /// Only Escape works in the output window; everything else belongs to
    /// the input window.
    pub fn from_event(viewport: ViewportId, event: &InputEvent) -> Option<Command> {
        if event.is_key_press(Key::Escape) {
            return Some(Command::Exit);
        }
        if viewport != ViewportId::Input {
            return None;
        }

        match event {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x,
                y,
                ..
            }) => Some(Command::AddPoint { x: *x, y: *y }),
            InputEvent::FileDropped(path) => Some(Command::Import(path.clone())),
            InputEvent::Key { key, .. } if event.is_key_press(*key) => match key {
                Key::Enter => Some(Command::Finish),
                Key::T => Some(Command::Triangulate(Method::Service)),
                Key::N => Some(Command::Triangulate(Method::Native)),
                Key::R => Some(Command::Reset),
                Key::M => Some(Command::CycleRenderMode),
                _ => None,
            },
            _ => None,
        }
    }
}

struct ServiceReply {
    job: Job,
    outcome: Result<RawMesh, TransportError>,
    elapsed: Duration,
}

pub struct StudioApp {
    studio: Studio,

    service: Arc<dyn Triangulator + Send + Sync>,
    native: Box<dyn Triangulator>,
    replies_tx: Sender<ServiceReply>,
    replies_rx: Receiver<ServiceReply>,
    in_flight: usize,

    windows: HashMap<WindowId, ViewportId>,
    input_window: Option<WindowId>,
    renderers: HashMap<WindowId, PrimitiveRenderer>,
    /// Windows whose renderer failed to build; not retried.
    broken: HashSet<WindowId>,

    startup_file: Option<PathBuf>,
    /// Latest status line, written by the event-bus subscriber.
    status: Rc<RefCell<Option<String>>>,
}

impl StudioApp {
    pub fn new(
        view: ViewConfig,
        service: Arc<dyn Triangulator + Send + Sync>,
        native: Box<dyn Triangulator>,
        startup_file: Option<PathBuf>,
    ) -> Self {
        let mut studio = Studio::new(view);

        let status = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&status);
        studio.subscribe(move |event| {
            if let Some(message) = event.status() {
                *sink.borrow_mut() = Some(message);
            }
        });

        let (replies_tx, replies_rx) = mpsc::channel();

        Self {
            studio,
            service,
            native,
            replies_tx,
            replies_rx,
            in_flight: 0,
            windows: HashMap::new(),
            input_window: None,
            renderers: HashMap::new(),
            broken: HashSet::new(),
            startup_file,
            status,
        }
    }

    fn window_for(&self, viewport: ViewportId) -> Option<WindowId> {
        self.windows
            .iter()
            .find_map(|(id, v)| (*v == viewport).then_some(*id))
    }

    fn redraw(&self, viewport: ViewportId, runtime: &mut RuntimeCtx) {
        if let Some(id) = self.window_for(viewport) {
            runtime.request_redraw(id);
        }
    }

    /// Mirrors the latest status message into the input window title.
    fn flush_status(&self, runtime: &mut RuntimeCtx) {
        let Some(message) = self.status.borrow_mut().take() else { return };
        if let Some(id) = self.input_window {
            runtime.set_title(id, format!("{TITLE}: {message}"));
        }
    }

    fn execute(&mut self, command: Command, ctx: &mut InputCtx<'_>) -> AppControl {
        match command {
            Command::AddPoint { x, y } => {
                self.studio.click(x, y, ctx.surface());
                // A new drawing drops the previous mesh.
                ctx.runtime.request_redraw_all();
            }
            Command::Finish => {
                if self.studio.finish() {
                    return AppControl::Redraw;
                }
            }
            Command::Triangulate(method) => self.triangulate(method, ctx.runtime),
            Command::Reset => {
                self.studio.reset();
                ctx.runtime.request_redraw_all();
            }
            Command::CycleRenderMode => {
                self.studio.cycle_render_mode();
                self.redraw(ViewportId::Output, ctx.runtime);
            }
            Command::Import(path) => {
                if self.studio.load_file(&path) {
                    ctx.runtime.request_redraw_all();
                }
            }
            Command::Exit => return AppControl::Exit,
        }
        AppControl::Continue
    }

    fn triangulate(&mut self, method: Method, runtime: &mut RuntimeCtx) {
        let Some(job) = self.studio.begin_triangulation(method) else { return };

        match method {
            Method::Native => {
                let started = Instant::now();
                let outcome = self.native.triangulate(&job.points);
                if self.studio.finish_triangulation(&job, outcome, started.elapsed()) {
                    self.redraw(ViewportId::Output, runtime);
                }
            }
            Method::Service => self.spawn_service(job, runtime),
        }
    }

    fn spawn_service(&mut self, job: Job, runtime: &mut RuntimeCtx) {
        let service = Arc::clone(&self.service);
        let tx = self.replies_tx.clone();
        let fallback = job.clone();

        let spawned = thread::Builder::new()
            .name("tessera-service".into())
            .spawn(move || {
                let started = Instant::now();
                let outcome = service.triangulate(&job.points);
                // The receiver only goes away when the app shuts down.
                let _ = tx.send(ServiceReply {
                    job,
                    outcome,
                    elapsed: started.elapsed(),
                });
            });

        match spawned {
            Ok(_) => {
                self.in_flight += 1;
                runtime.poll_after(POLL_INTERVAL);
            }
            Err(e) => {
                log::error!("failed to start service worker: {e}");
                let outcome = Err(TransportError::Unavailable(Method::Service));
                self.studio.finish_triangulation(&fallback, outcome, Duration::ZERO);
            }
        }
    }

    fn drain_replies(&mut self, runtime: &mut RuntimeCtx) {
        loop {
            match self.replies_rx.try_recv() {
                Ok(reply) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if self.studio.finish_triangulation(&reply.job, reply.outcome, reply.elapsed) {
                        self.redraw(ViewportId::Output, runtime);
                    }
                }
                Err(TryRecvError::Empty) => break,
                // Unreachable while `replies_tx` is alive.
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn release_renderer(&mut self, id: WindowId) {
        if let Some(renderer) = self.renderers.remove(&id) {
            renderer.release();
        }
    }
}

impl App for StudioApp {
    fn on_window_created(&mut self, window_id: WindowId, label: &str, runtime: &mut RuntimeCtx) {
        let viewport = match label {
            INPUT_LABEL => ViewportId::Input,
            OUTPUT_LABEL => ViewportId::Output,
            other => {
                log::warn!("ignoring unknown window `{other}`");
                return;
            }
        };
        self.windows.insert(window_id, viewport);

        if viewport == ViewportId::Input {
            self.input_window = Some(window_id);
            runtime.create_window(output_window());

            if let Some(path) = self.startup_file.take() {
                self.studio.load_file(&path);
            }
            self.flush_status(runtime);
        }
        runtime.request_redraw(window_id);
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::CloseRequested => {
                self.release_renderer(window_id);
                self.windows.remove(&window_id);
                // The studio needs both viewports.
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_input(&mut self, ctx: &mut InputCtx<'_>, event: &InputEvent) -> AppControl {
        let Some(&viewport) = self.windows.get(&ctx.window.id) else {
            return AppControl::Continue;
        };

        let mut control = AppControl::Continue;
        if self.studio.handle_view(viewport, event, ctx.surface()) {
            control = AppControl::Redraw;
        }

        if let Some(command) = Command::from_event(viewport, event) {
            log::debug!("{viewport:?}: {command:?}");
            match self.execute(command, ctx) {
                AppControl::Continue => {}
                other => control = other,
            }
        }

        self.flush_status(ctx.runtime);
        control
    }

    fn on_idle(&mut self, runtime: &mut RuntimeCtx) {
        if self.in_flight == 0 {
            return;
        }
        self.drain_replies(runtime);
        if self.in_flight > 0 {
            runtime.poll_after(POLL_INTERVAL);
        }
        self.flush_status(runtime);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let id = ctx.window.id;
        let Some(&viewport) = self.windows.get(&id) else {
            return AppControl::Continue;
        };

        if !self.renderers.contains_key(&id) && !self.broken.contains(&id) {
            match PrimitiveRenderer::new(ctx.gpu.device(), ctx.gpu.surface_format()) {
                Ok(renderer) => {
                    self.renderers.insert(id, renderer);
                }
                Err(e) => {
                    log::error!("{}: renderer unavailable: {e}", ctx.window.label);
                    *self.status.borrow_mut() = Some(format!("renderer failed: {e}"));
                    self.broken.insert(id);
                }
            }
        }

        let control = match self.renderers.get_mut(&id) {
            Some(renderer) => {
                match viewport {
                    ViewportId::Input => self.studio.draw_input(renderer),
                    ViewportId::Output => self.studio.draw_output(renderer),
                }
                ctx.render(|rctx, target| renderer.render(rctx, target))
            }
            None => AppControl::Continue,
        };

        self.flush_status(ctx.runtime);
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::input::{KeyState, Modifiers};

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    fn click(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: 12.0,
            y: 34.0,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn input_window_commands() {
        let input = ViewportId::Input;
        assert_eq!(Command::from_event(input, &press(Key::Enter)), Some(Command::Finish));
        assert_eq!(
            Command::from_event(input, &press(Key::T)),
            Some(Command::Triangulate(Method::Service))
        );
        assert_eq!(
            Command::from_event(input, &press(Key::N)),
            Some(Command::Triangulate(Method::Native))
        );
        assert_eq!(Command::from_event(input, &press(Key::R)), Some(Command::Reset));
        assert_eq!(Command::from_event(input, &press(Key::M)), Some(Command::CycleRenderMode));
        assert_eq!(
            Command::from_event(input, &click(MouseButton::Left, MouseButtonState::Pressed)),
            Some(Command::AddPoint { x: 12.0, y: 34.0 })
        );
        assert_eq!(
            Command::from_event(input, &InputEvent::FileDropped(PathBuf::from("a.json"))),
            Some(Command::Import(PathBuf::from("a.json")))
        );
    }

    #[test]
    fn ignored_events() {
        let input = ViewportId::Input;
        assert_eq!(Command::from_event(input, &press(Key::A)), None);
        assert_eq!(
            Command::from_event(input, &click(MouseButton::Left, MouseButtonState::Released)),
            None
        );
        assert_eq!(
            Command::from_event(input, &click(MouseButton::Right, MouseButtonState::Pressed)),
            None
        );

        let repeat = InputEvent::Key {
            key: Key::T,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: true,
        };
        assert_eq!(Command::from_event(input, &repeat), None);
    }

    #[test]
    fn output_window_only_exits() {
        let output = ViewportId::Output;
        assert_eq!(Command::from_event(output, &press(Key::Escape)), Some(Command::Exit));
        assert_eq!(Command::from_event(output, &press(Key::T)), None);
        assert_eq!(
            Command::from_event(output, &click(MouseButton::Left, MouseButtonState::Pressed)),
            None
        );
        assert_eq!(Command::from_event(ViewportId::Input, &press(Key::Escape)), Some(Command::Exit));
    }

    #[test]
    fn window_configs_are_labelled() {
        assert_eq!(input_window().label, INPUT_LABEL);
        assert_eq!(output_window().label, OUTPUT_LABEL);
        assert_ne!(input_window().position, output_window().position);
    }
}
