use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use log::{debug, error, info, trace};
use pixels::Pixels;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    window::Window,
};

use crate::{
    config::Config,
    field::FrameStats,
    pointer::PointerTracker,
    simulation::Simulation,
    vectors::Vector2D,
};

const FPS_REPORT_INTERVAL_MS: f64 = 500.;

/// Average frame rate since the first frame, reported at a fixed interval.
#[derive(Debug, Default)]
pub struct FpsCounter {
    first_update: Option<f64>,
    last_report: f64,
    frames: u64,
}

impl FpsCounter {
    /// Counts a frame at `now` ms; returns the rate when a report is due.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        self.frames += 1;
        let Some(first) = self.first_update else {
            self.first_update = Some(now);
            self.last_report = now;
            return None;
        };
        if now - self.last_report < FPS_REPORT_INTERVAL_MS || now <= first {
            return None;
        }
        self.last_report = now;
        Some(1000. * self.frames as f64 / (now - first))
    }
}

fn log_stats(frame: u64, stats: &FrameStats) {
    trace!("frame {frame}: {stats:?}");
}

/// Glue between a winit window, the `pixels` surface and the simulation.
/// Platform front ends own the window and forward events here.
pub struct Renderer<'a> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'a>>,
    simulation: Simulation,
    pointer: PointerTracker,
    window_size: (u32, u32),
    started: Instant,
    fps: FpsCounter,
}

impl<'a> Renderer<'a> {
    pub fn new(config: Config) -> Self {
        info!(
            "starting {}x{} field with {} particles, boundary {:?}",
            config.width, config.height, config.particle_count, config.boundary
        );
        let mut simulation = Simulation::new(config);
        simulation.subscribe(log_stats);

        Self {
            window: None,
            pixels: None,
            simulation,
            pointer: PointerTracker::default(),
            window_size: (config.width, config.height),
            started: Instant::now(),
            fps: FpsCounter::default(),
        }
    }

    /// Size the `pixels` buffer must be created with.
    pub fn buffer_size(&self) -> (u32, u32) {
        let config = self.simulation.config();
        (config.width, config.height)
    }

    pub fn init(&mut self, width: u32, height: u32, window: Arc<Window>, pixels: Pixels<'a>) {
        info!("window ready at {width}x{height}");
        self.window = Some(window);
        self.pixels = Some(pixels);
        self.window_size = (width.max(1), height.max(1));
        self.started = Instant::now();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.window_size = (width, height);
        if let Some(pixels) = self.pixels.as_mut() {
            if let Err(err) = pixels.resize_surface(width, height) {
                error!("resizing surface to {width}x{height}: {err}");
            }
        }
        debug!("resized to {width}x{height}");
    }

    /// Maps window pixels onto the simulation domain.
    fn to_domain(&self, position: PhysicalPosition<f64>) -> Vector2D {
        let (width, height) = self.simulation.config().extent();
        Vector2D::new(
            (position.x / self.window_size.0 as f64) as f32 * width,
            (position.y / self.window_size.1 as f64) as f32 * height,
        )
    }

    /// Feeds pointer events into the tracker. Returns `true` if consumed.
    pub fn handle_input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = self.to_domain(*position);
                self.pointer.moved(position);
            }
            WindowEvent::CursorLeft { .. } => self.pointer.left(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.pointer.set_pressed(*state == ElementState::Pressed),
            _ => return false,
        }
        true
    }

    /// Advances one frame and presents it. Returns `false` if presenting
    /// failed and the loop should stop.
    pub fn update_and_draw(&mut self) -> bool {
        let Some(pixels) = self.pixels.as_mut() else {
            return true;
        };

        let now = self.started.elapsed().as_secs_f64() * 1000.;
        let buffer = self.simulation.advance(now, self.pointer.snapshot());
        pixels.frame_mut().copy_from_slice(buffer);

        if let Some(fps) = self.fps.tick(now) {
            debug!("{fps:.0} fps");
        }

        if let Err(err) = pixels.render() {
            error!("pixels.render failed: {err}");
            return false;
        }
        true
    }

    pub fn window_event(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) {
        if self.handle_input(&event) {
            return;
        }
        match event {
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                self.request_redraw();
            }
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Some(window) = self.window.as_ref() {
                    window.pre_present_notify();
                }
                if !self.update_and_draw() {
                    event_loop.exit();
                    return;
                }
                self.request_redraw();
            }
            _ => (),
        }
    }

    pub fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
