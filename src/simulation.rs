//! Simulation builder and runners.
//!
//! [`Simulation::run`] opens a window and drives the field once per redraw.
//! [`Simulation::render_snapshot`] steps the field headless and rasterises
//! the final frame.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::canvas::NullCanvas;
use crate::config::FieldConfig;
use crate::error::SimulationError;
use crate::events::{self, EventQueue, EventSender, FieldEvent};
use crate::field::{FrameStats, ParticleField};
use crate::gpu::GpuCanvas;
use crate::raster::RasterCanvas;
use crate::time::FrameClock;

/// How often the window host logs frame statistics.
const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// A particle field builder.
///
/// Use method chaining to configure, then call `.run()` to open a window.
pub struct Simulation {
    config: FieldConfig,
    title: String,
    window_size: (u32, u32),
    pointer: Option<(f32, f32)>,
}

impl Simulation {
    /// Create a new simulation with default settings.
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            title: "Ambient Field".to_string(),
            window_size: (1280, 720),
            pointer: None,
        }
    }

    /// Replace the field configuration.
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size (logical pixels) and the snapshot size.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Place the pointer before the first frame. Snapshots keep it there; the
    /// window replaces it as soon as the cursor moves.
    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = Some((x, y));
        self
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Step a field of the configured size `frames` times and rasterise the
    /// last frame.
    pub fn render_snapshot(&self, frames: u32) -> Result<RgbaImage, SimulationError> {
        Ok(self.render_canvas(frames)?.into_image())
    }

    /// [`render_snapshot`](Self::render_snapshot) and write the result as a PNG.
    pub fn save_snapshot(&self, path: impl AsRef<Path>, frames: u32) -> Result<(), SimulationError> {
        let path = path.as_ref();
        self.render_canvas(frames)?.save(path)?;
        info!(path = %path.display(), "snapshot written");
        Ok(())
    }

    fn render_canvas(&self, frames: u32) -> Result<RasterCanvas, SimulationError> {
        let (width, height) = self.window_size;
        let mut field = ParticleField::try_with_config(width, height, self.config.clone())?;
        if let Some((x, y)) = self.pointer {
            field.set_pointer(x, y);
        }

        for _ in 0..frames.saturating_sub(1) {
            field.advance_frame(&mut NullCanvas);
        }

        let mut canvas = RasterCanvas::with_background(width, height, self.config.background);
        let stats = if frames > 0 {
            field.advance_frame(&mut canvas)
        } else {
            field.draw(&mut canvas)
        };
        info!(
            frames,
            particles = stats.particles,
            connections = stats.connections,
            "snapshot rendered"
        );

        Ok(canvas)
    }

    /// Open a window and run until it is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    settings: Simulation,
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    field: Option<ParticleField>,
    sender: EventSender,
    queue: EventQueue,
    clock: FrameClock,
    last_stats: FrameStats,
    paused: bool,
    error: Option<SimulationError>,
}

impl App {
    fn new(settings: Simulation) -> Self {
        let (sender, queue) = events::channel();
        Self {
            settings,
            window: None,
            canvas: None,
            field: None,
            sender,
            queue,
            clock: FrameClock::with_interval(STATS_INTERVAL),
            last_stats: FrameStats::default(),
            paused: false,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let (width, height) = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let canvas = pollster::block_on(GpuCanvas::new(
            window.clone(),
            self.settings.config.background,
        ))?;

        let size = window.inner_size();
        let mut field = ParticleField::try_with_config(
            size.width,
            size.height,
            self.settings.config.clone(),
        )?;
        if let Some((x, y)) = self.settings.pointer {
            field.set_pointer(x, y);
        }
        self.field = Some(field);
        self.canvas = Some(canvas);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: SimulationError) {
        error!("{e}");
        self.error = Some(e);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(canvas), Some(field)) = (self.canvas.as_mut(), self.field.as_mut()) else {
            return;
        };

        self.queue.drain_into(field);
        if self.paused {
            field.draw(canvas);
        } else {
            self.last_stats = field.advance_frame(canvas);
        }

        match canvas.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                canvas.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("render error: {e:?}"),
        }

        if self.clock.tick() {
            debug!(
                fps = self.clock.fps(),
                frame = self.clock.frame(),
                particles = self.last_stats.particles,
                connections = self.last_stats.connections,
                "frame stats"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(field_event) = FieldEvent::from_window_event(&event) {
            self.sender.send(field_event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(canvas) = &mut self.canvas {
                    canvas.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::Space) => {
                        self.paused = !self.paused;
                        info!(paused = self.paused, "toggled pause");
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
