use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    config::{Config, DEFAULT_SEED},
    field::{FrameStats, ParticleField},
    particle::Particle,
    pointer::{HoldTimer, PointerInput, PointerState},
    raster::FrameRasterizer,
};

/// Read-only hook run after every frame.
pub trait FrameObserver {
    fn on_frame(&mut self, frame: u64, stats: &FrameStats);
}

impl<F: FnMut(u64, &FrameStats)> FrameObserver for F {
    fn on_frame(&mut self, frame: u64, stats: &FrameStats) {
        self(frame, stats)
    }
}

/// The per-tick driver: turns a timestamp and the latest pointer input into a
/// finished RGBA frame.
pub struct Simulation<R = SmallRng> {
    config: Config,
    field: ParticleField,
    rasterizer: FrameRasterizer,
    hold: HoldTimer,
    last_update: Option<f64>,
    pointer: PointerState,
    frames: u64,
    rng: R,
    observers: Vec<Box<dyn FrameObserver>>,
}

impl Simulation<SmallRng> {
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Seeds the field from `rng` and keeps using it for per-frame noise.
    pub fn with_rng(config: Config, mut rng: R) -> Self {
        let field = ParticleField::seed(&config, &mut rng);
        Self::with_field(config, field, rng)
    }

    /// Starts from an explicit population instead of the random disc.
    pub fn with_field(config: Config, field: ParticleField, rng: R) -> Self {
        Self {
            rasterizer: FrameRasterizer::new(config.width, config.height),
            config,
            field,
            hold: HoldTimer::default(),
            last_update: None,
            pointer: PointerState::ABSENT,
            frames: 0,
            rng,
            observers: vec![],
        }
    }

    pub fn subscribe(&mut self, observer: impl FrameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Runs one frame at `timestamp` milliseconds and returns the new frame.
    ///
    /// `dt` is zero on the first call and never negative. The pointer is read
    /// once, so every particle in the frame sees the same snapshot.
    pub fn advance(&mut self, timestamp: f64, input: PointerInput) -> &[u8] {
        let dt = self
            .last_update
            .map(|last| (timestamp - last).max(0.) as f32)
            .unwrap_or(0.);
        self.pointer = self.hold.observe(timestamp, input);

        self.rasterizer.render(
            &mut self.field,
            dt,
            &self.pointer,
            &self.config,
            &mut self.rng,
        );

        if !self.observers.is_empty() {
            let stats = self.field.stats(&self.pointer);
            for observer in self.observers.iter_mut() {
                observer.on_frame(self.frames, &stats);
            }
        }

        // Only move the clock forward; a host that repeats or rewinds a
        // timestamp gets a zero step.
        self.last_update = Some(self.last_update.map_or(timestamp, |last| last.max(timestamp)));
        self.frames += 1;

        self.rasterizer.frame()
    }

    #[inline]
    pub fn frame(&self) -> &[u8] {
        self.rasterizer.frame()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pointer snapshot used by the most recent frame.
    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stats(&self) -> FrameStats {
        self.field.stats(&self.pointer)
    }
}
