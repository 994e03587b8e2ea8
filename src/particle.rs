use rand::Rng;

use crate::{
    config::{BoundaryPolicy, Config},
    pointer::PointerState,
    vectors::Vector2D,
};

const CAPTURE_SCALE: f32 = 0.01;
const SWIRL_SCALE: f32 = 0.1;
// 20% of updates get a kick
const JITTER_THRESHOLD: f32 = 0.8;
const JITTER_SCALE: f32 = 0.1;
const JITTER_SPAN: f32 = 0.2;
const BOUNCE_DAMPING: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Swirl strength around the pointer, only used with angular drift on.
    pub drift: f32,
    /// Position before the most recent update. Nothing reads it yet; kept for
    /// trail rendering.
    pub last_position: Vector2D,
}

impl Particle {
    pub fn new(position: Vector2D, velocity: Vector2D, drift: f32) -> Self {
        Self {
            position,
            velocity,
            drift,
            last_position: position,
        }
    }

    /// Advances the particle by `dt` milliseconds.
    ///
    /// Position is integrated first with the velocity from the previous step;
    /// the pointer force then uses the displacement from the moved position.
    /// Friction is applied once per call regardless of `dt`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        pointer: &PointerState,
        config: &Config,
        rng: &mut R,
    ) {
        let dt = dt.max(0.);

        self.last_position = self.position;
        self.position += self.velocity * dt;

        if let Some(pointer_position) = pointer.position {
            let d = self.position - pointer_position;

            self.velocity -= d * dt * config.gravity;

            let grow = config.grow * pointer.held_seconds();
            if d.length_squared() < config.cursor_radius_sq + grow * grow {
                let sign = if pointer.pressed { -1. } else { 1. };
                self.velocity = d * (sign * CAPTURE_SCALE);
            }

            self.velocity *= config.friction;

            if config.angular_drift {
                self.position += d.perp() * (SWIRL_SCALE * self.drift);
            }
        }

        if dt > 0. && rng.random::<f32>() > JITTER_THRESHOLD {
            self.velocity.x += JITTER_SCALE * (JITTER_SPAN / 2. - rng.random::<f32>() * JITTER_SPAN);
            self.velocity.y += JITTER_SCALE * (JITTER_SPAN / 2. - rng.random::<f32>() * JITTER_SPAN);
        }

        self.apply_boundary(config);
    }

    fn apply_boundary(&mut self, config: &Config) {
        let (width, height) = config.extent();

        match config.boundary {
            BoundaryPolicy::None => {}
            BoundaryPolicy::Bounce => {
                if self.position.x < 0. || self.position.x > width {
                    self.velocity.x = -self.velocity.x * BOUNCE_DAMPING;
                }
                if self.position.y < 0. || self.position.y > height {
                    self.velocity.y = -self.velocity.y * BOUNCE_DAMPING;
                }
            }
            BoundaryPolicy::Wrap => {
                if self.position.x < 0. {
                    self.position.x += width;
                }
                if self.position.y < 0. {
                    self.position.y += height;
                }
                if self.position.x > width {
                    self.position.x -= width;
                }
                if self.position.y > height {
                    self.position.y -= height;
                }
            }
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
