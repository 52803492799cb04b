use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Surface settings shared by every window the runtime opens.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format if the surface offers one.
    ///
    /// The studio turns this off: its palette is authored in linear 0..1
    /// values and written to the surface as-is.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            frame_latency: 2,
        }
    }
}

/// Device, queue and swapchain of one window.
///
/// Input and output windows each get their own `Gpu`; nothing is shared
/// between them, so each `PrimitiveRenderer` builds its pipelines against
/// the device of the window it draws into.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// `false` while the window is minimized; the surface keeps its last
    /// non-empty configuration until the window comes back.
    drawable: bool,
}

/// One acquired swapchain image plus the encoder recording into it.
///
/// Must go back through [`Gpu::submit`] before the next frame is acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the frame loop does after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface reconfigured; the next redraw should succeed.
    Reconfigured,
    SkipFrame,
    /// Out of memory; the window cannot draw anymore.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn for_error(err: &SurfaceError) -> Self {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => Self::Reconfigured,
            SurfaceError::OutOfMemory => Self::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => Self::SkipFrame,
        }
    }
}

impl<'w> Gpu<'w> {
    /// Binds a new device and surface to `window`.
    ///
    /// Blocked on with `pollster` by the runtime when the window is created.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let caps = surface.get_capabilities(&adapter);
        let format =
            pick_format(&caps.formats, init.prefer_srgb).context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(&device, &config);

        Ok(Gpu {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            drawable: true,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Follows the window size. A zero-sized window (minimized) leaves the
    /// surface alone; wgpu rejects empty configurations.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.drawable = size.width > 0 && size.height > 0;
        if !self.drawable {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera frame"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Reacts to a failed [`Gpu::begin_frame`], reconfiguring a lost or
    /// outdated surface.
    pub fn recover(&mut self, err: &SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::for_error(err);
        if action == SurfaceErrorAction::Reconfigured && self.drawable {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}

/// With `prefer_srgb` the first sRGB format wins, otherwise the first linear
/// one. Falls back to whatever the surface lists first.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first())
        .copied()
}

/// Both studio windows are opaque.
fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}
