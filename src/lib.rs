pub mod color;
pub mod config;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod raster;
pub mod renderer;
pub mod simulation;
pub mod vectors;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{BoundaryPolicy, Config};
pub use pointer::{PointerInput, PointerState};
pub use simulation::{FrameObserver, Simulation};
