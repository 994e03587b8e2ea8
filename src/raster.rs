use rand::Rng;

use crate::{
    color::particle_color,
    config::Config,
    field::ParticleField,
    particle::Particle,
    pointer::PointerState,
    vectors::Vector2D,
};

pub const BYTES_PER_PIXEL: usize = 4;

/// Owns the RGBA frame for the domain: row-major, origin top-left, one pixel
/// per world unit.
pub struct FrameRasterizer {
    width: usize,
    height: usize,
    frame: Vec<u8>,
}

impl FrameRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            frame: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    /// Steps every particle, then draws the result over a cleared frame.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        field: &mut ParticleField,
        dt: f32,
        pointer: &PointerState,
        config: &Config,
        rng: &mut R,
    ) -> &[u8] {
        field.update(dt, pointer, config, rng);
        self.draw(field.particles());
        &self.frame
    }

    /// Clears the frame and plots `particles` in order; later particles win
    /// shared pixels.
    pub fn draw(&mut self, particles: &[Particle]) {
        self.frame.fill(0);

        for particle in particles {
            if let Some(idx) = self.pixel_index(particle.position) {
                self.frame[idx..idx + BYTES_PER_PIXEL]
                    .copy_from_slice(&particle_color(particle.velocity));
            }
        }
    }

    /// Byte offset of the pixel under `position`, or `None` when it falls
    /// outside the frame (including NaN positions).
    pub fn pixel_index(&self, position: Vector2D) -> Option<usize> {
        let (x, y) = (position.x, position.y);
        let in_domain =
            0. <= x && x <= self.width as f32 && 0. <= y && y <= self.height as f32;
        if !in_domain {
            return None;
        }

        // The far edges are part of the domain but have no pixel.
        let (px, py) = (x.floor() as usize, y.floor() as usize);
        if px >= self.width || py >= self.height {
            return None;
        }

        Some((py * self.width + px) * BYTES_PER_PIXEL)
    }

    #[inline]
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
