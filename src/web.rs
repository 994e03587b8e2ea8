use std::sync::Arc;

use log::{error, info};
use pixels::wgpu::{DeviceDescriptor, Features, Limits, PowerPreference, RequestAdapterOptions};
use pixels::{PixelsBuilder, SurfaceTexture, wgpu::Backends};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use winit::platform::web::WindowExtWebSys;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{config::Config, renderer::Renderer};

#[wasm_bindgen(start)]
pub fn start() {
    spawn_local(run());
}

#[wasm_bindgen]
pub async fn run() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("error initializing logger: {err}").into());
    }

    let config = Config {
        seed: Some(js_sys::Date::now() as u64),
        ..Config::default()
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("creating event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut renderer = WebRenderer {
        renderer: Renderer::new(config),
        window: None,
    };
    let (width, height) = renderer.renderer.buffer_size();

    #[allow(deprecated)]
    let window = match event_loop.create_window(
        Window::default_attributes().with_inner_size(LogicalSize::new(width, height)),
    ) {
        Ok(window) => Arc::new(window),
        Err(err) => {
            error!("creating window: {err}");
            return;
        }
    };

    // Attach winit canvas to body element
    let attached = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.body())
        .zip(window.canvas())
        .and_then(|(body, canvas)| body.append_child(&web_sys::Element::from(canvas)).ok());
    if attached.is_none() {
        error!("couldn't append canvas to document body");
        return;
    }

    let surface_texture = SurfaceTexture::new(width, height, Arc::clone(&window));
    let texture_format = pixels::wgpu::TextureFormat::Rgba8Unorm;

    let adapter_options = RequestAdapterOptions {
        power_preference: PowerPreference::HighPerformance,
        ..RequestAdapterOptions::default()
    };

    let mut required_limits = Limits::downlevel_webgl2_defaults();
    required_limits.max_texture_dimension_2d = 2048;
    let device_descriptor = DeviceDescriptor {
        required_features: Features::empty(),
        required_limits,
        ..DeviceDescriptor::default()
    };

    let pixels = match PixelsBuilder::new(width, height, surface_texture)
        .request_adapter_options(adapter_options)
        .device_descriptor(device_descriptor)
        .texture_format(texture_format)
        .surface_texture_format(texture_format)
        .wgpu_backend(Backends::GL)
        .build_async()
        .await
    {
        Ok(pixels) => pixels,
        Err(err) => {
            error!("building pixels: {err:?}");
            return;
        }
    };

    info!("canvas attached, starting event loop");
    renderer.renderer.init(width, height, Arc::clone(&window), pixels);
    renderer.window = Some(window);

    if let Err(err) = event_loop.run_app(&mut renderer) {
        error!("event loop exited: {err}");
    }
}

pub struct WebRenderer<'a> {
    window: Option<Arc<Window>>,
    renderer: Renderer<'a>,
}

impl<'a> ApplicationHandler for WebRenderer<'a> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.renderer.window_event(event_loop, event);
    }
}
