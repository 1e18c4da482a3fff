//! Simulation builder and windowed runner.
//!
//! [`Simulation`] configures a field and drives it full-window: one winit
//! event loop, one redraw per display refresh, update and render back to
//! back. Pointer and resize callbacks live and die with the event loop,
//! so teardown cannot leak listeners.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::SimulationError;
use crate::field::ParticleField;
use crate::gpu::GpuState;
use crate::mesh::FrameMesh;
use crate::pointer::PointerTracker;
use crate::time::FrameClock;
use crate::visuals::VisualConfig;

/// A particle field runner.
///
/// Use method chaining to configure, then call `.run()` to open the
/// window. `run` blocks until the window is closed.
///
/// ```ignore
/// Simulation::new()
///     .with_title("starfield")
///     .with_config(|c| c.max_particles = 200)
///     .run()?;
/// ```
pub struct Simulation {
    config: FieldConfig,
    visuals: VisualConfig,
    title: String,
}

impl Simulation {
    /// Create a simulation with default settings.
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            visuals: VisualConfig::default(),
            title: "driftfield".to_string(),
        }
    }

    /// Adjust the field configuration.
    pub fn with_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut FieldConfig),
    {
        f(&mut self.config);
        self
    }

    /// Adjust rendering options.
    pub fn with_visuals<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut VisualConfig),
    {
        f(&mut self.visuals);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config, self.visuals, self.title);
        event_loop.run_app(&mut app)?;

        // Window/GPU bring-up failures happen inside the event loop and
        // surface here.
        match app.error {
            Some(error) => Err(error),
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
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    field: Option<ParticleField>,
    pointer: PointerTracker,
    clock: FrameClock,
    mesh: FrameMesh,
    config: FieldConfig,
    visuals: VisualConfig,
    title: String,
    error: Option<SimulationError>,
}

impl App {
    fn new(config: FieldConfig, visuals: VisualConfig, title: String) -> Self {
        Self {
            window: None,
            gpu: None,
            field: None,
            pointer: PointerTracker::new(),
            clock: FrameClock::new(),
            mesh: FrameMesh::new(),
            config,
            visuals,
            title,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SimulationError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(error) => return self.fail(event_loop, error.into()),
        };
        self.window = Some(window.clone());

        let gpu = match pollster::block_on(GpuState::new(window.clone(), &self.visuals)) {
            Ok(gpu) => gpu,
            Err(error) => return self.fail(event_loop, error.into()),
        };
        self.gpu = Some(gpu);

        let size = window.inner_size();
        self.field = Some(ParticleField::new(
            self.config.clone(),
            size.width as f32,
            size.height as f32,
        ));

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.pointer.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                if let Some(field) = &mut self.field {
                    field.resize(size.width as f32, size.height as f32);
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(gpu), Some(field)) = (self.gpu.as_mut(), self.field.as_mut()) else {
                    return;
                };

                let now = self.clock.tick();
                let frame = self.pointer.take_frame();
                field.step(&frame, now);
                self.mesh.build(field, &self.visuals);

                match gpu.render(&self.mesh) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        let size = winit::dpi::PhysicalSize {
                            width: gpu.config.width,
                            height: gpu.config.height,
                        };
                        gpu.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("surface out of memory, shutting down");
                        event_loop.exit();
                    }
                    // Transient failure: drop this frame, the next redraw
                    // retries.
                    Err(error) => log::warn!("render error: {:?}", error),
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
