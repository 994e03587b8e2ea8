use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use log::error;
use pixels::{Pixels, SurfaceTexture};
use swarm::{config::Config, renderer::Renderer};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

fn main() -> Result<(), EventLoopError> {
    env_logger::init();

    let mut config = Config::from_env();
    if config.seed.is_none() {
        config.seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_nanos() as u64);
    }

    let event_loop = EventLoop::new()?;

    // Redraws are requested back to back, Poll keeps the loop from sleeping
    // between them.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut NativeRenderer::new(config))
}

pub struct NativeRenderer<'a> {
    renderer: Renderer<'a>,
}

impl<'a> NativeRenderer<'a> {
    fn new(config: Config) -> Self {
        Self {
            renderer: Renderer::new(config),
        }
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let (buffer_width, buffer_height) = self.renderer.buffer_size();
        let attributes = Window::default_attributes()
            .with_title("swarm")
            .with_inner_size(LogicalSize::new(buffer_width, buffer_height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| format!("creating window: {err}"))?,
        );

        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, Arc::clone(&window));
        let pixels = Pixels::new(buffer_width, buffer_height, surface_texture)
            .map_err(|err| format!("creating pixels surface: {err}"))?;

        self.renderer
            .init(window_size.width, window_size.height, window, pixels);
        self.renderer.request_redraw();
        Ok(())
    }
}

impl<'a> ApplicationHandler for NativeRenderer<'a> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.create_surface(event_loop) {
            error!("{err}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.renderer.window_event(event_loop, event);
    }
}
