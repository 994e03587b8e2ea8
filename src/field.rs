use std::f32::consts::PI;

use log::info;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;

use crate::{
    config::Config,
    particle::Particle,
    pointer::PointerState,
    vectors::{Vector2D, VectorPolar},
};

/// Particles per rayon task. Each chunk gets its own RNG stream.
pub const PARALLEL_CHUNK: usize = 4096;

const SEED_SPEED: f32 = 0.1;
const SEED_DRIFT: f32 = 0.1;

/// Aggregates over the population after a frame. Read-only observers use
/// them, e.g. to drive a sonification or an on-screen meter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub particles: usize,
    /// Sum of squared speeds.
    pub kinetic: f64,
    /// Sum of Manhattan distances to the pointer, 0 without a pointer.
    pub pointer_distance: f64,
}

pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Scatters `config.particle_count` particles around the domain centre with
    /// radius uniform in [0, width), so the disc overhangs the domain.
    pub fn seed<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let (width, height) = config.extent();
        let center = Vector2D::new(width / 2., height / 2.);

        let particles = (0..config.particle_count)
            .map(|_| {
                let radius = rng.random::<f32>() * width;
                let theta = 2. * PI * rng.random::<f32>();
                let velocity = Vector2D::new(
                    SEED_SPEED - rng.random::<f32>() * 2. * SEED_SPEED,
                    SEED_SPEED - rng.random::<f32>() * 2. * SEED_SPEED,
                );
                let drift = rng.random::<f32>() * SEED_DRIFT;
                Particle::new(Vector2D::from_polar(center, radius, theta), velocity, drift)
            })
            .collect::<Vec<_>>();

        info!("seeded {} particles", particles.len());
        Self::new(particles)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        pointer: &PointerState,
        config: &Config,
        rng: &mut R,
    ) {
        if config.parallel {
            self.update_parallel(dt, pointer, config, rng);
        } else {
            self.update_sequential(dt, pointer, config, rng);
        }
    }

    pub fn update_sequential<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        pointer: &PointerState,
        config: &Config,
        rng: &mut R,
    ) {
        for particle in self.particles.iter_mut() {
            particle.update(dt, pointer, config, rng);
        }
    }

    /// Same step as [`Self::update_sequential`], split across the rayon pool.
    ///
    /// Chunk seeds are drawn from `rng` in chunk order before any work starts,
    /// so the outcome depends only on `rng`, never on scheduling.
    pub fn update_parallel<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        pointer: &PointerState,
        config: &Config,
        rng: &mut R,
    ) {
        let chunk_count = self.particles.len().div_ceil(PARALLEL_CHUNK);
        let seeds: Vec<u64> = (0..chunk_count).map(|_| rng.random()).collect();
        let pointer = *pointer;

        self.particles
            .par_chunks_mut(PARALLEL_CHUNK)
            .zip(seeds.par_iter())
            .for_each(|(chunk, &seed)| {
                let mut chunk_rng = SmallRng::seed_from_u64(seed);
                for particle in chunk {
                    particle.update(dt, &pointer, config, &mut chunk_rng);
                }
            });
    }

    pub fn stats(&self, pointer: &PointerState) -> FrameStats {
        let (kinetic, pointer_distance) =
            self.particles
                .iter()
                .fold((0f64, 0f64), |(kinetic, distance), particle| {
                    let offset = pointer
                        .position
                        .map(|p| (particle.position - p).abs().element_sum() as f64)
                        .unwrap_or(0.);
                    (
                        kinetic + particle.velocity.length_squared() as f64,
                        distance + offset,
                    )
                });

        FrameStats {
            particles: self.particles.len(),
            kinetic,
            pointer_distance,
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize, parallel: bool) -> Config {
        Config {
            particle_count: count,
            parallel,
            ..Config::default()
        }
    }

    #[test]
    fn seeding_is_reproducible() {
        let cfg = config(1000, false);
        let a = ParticleField::seed(&cfg, &mut SmallRng::seed_from_u64(3));
        let b = ParticleField::seed(&cfg, &mut SmallRng::seed_from_u64(3));
        let c = ParticleField::seed(&cfg, &mut SmallRng::seed_from_u64(4));
        assert_eq!(a.particles(), b.particles());
        assert_ne!(a.particles(), c.particles());
        assert_eq!(a.len(), 1000);
    }

    #[test]
    fn seeded_particles_fall_in_expected_ranges() {
        let cfg = config(5000, false);
        let field = ParticleField::seed(&cfg, &mut SmallRng::seed_from_u64(11));
        let center = Vector2D::new(500., 500.);
        for particle in field.particles() {
            assert!(particle.position.distance(center) <= 1000. + 1e-2);
            assert!(particle.velocity.abs().max_element() <= 0.1 + 1e-6);
            assert!((0. ..0.1).contains(&particle.drift));
            assert_eq!(particle.last_position, particle.position);
        }
    }

    #[test]
    fn parallel_update_is_deterministic() {
        let cfg = config(3 * PARALLEL_CHUNK + 17, true);
        let pointer = PointerState {
            position: Some(Vector2D::new(400., 600.)),
            pressed: true,
            held: 1500.,
        };

        let run = || {
            let mut rng = SmallRng::seed_from_u64(99);
            let mut field = ParticleField::seed(&cfg, &mut rng);
            for _ in 0..5 {
                field.update(16., &pointer, &cfg, &mut rng);
            }
            field.particles().to_vec()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn parallel_and_sequential_agree_without_jitter_draws() {
        // At dt = 0 no particle consumes randomness, so both paths must match.
        let seq_cfg = config(2 * PARALLEL_CHUNK + 5, false);
        let par_cfg = Config {
            parallel: true,
            ..seq_cfg
        };
        let pointer = PointerState {
            position: Some(Vector2D::new(500., 500.)),
            pressed: false,
            held: 0.,
        };

        let mut seq = ParticleField::seed(&seq_cfg, &mut SmallRng::seed_from_u64(5));
        let mut par = ParticleField::seed(&par_cfg, &mut SmallRng::seed_from_u64(5));
        seq.update(0., &pointer, &seq_cfg, &mut SmallRng::seed_from_u64(6));
        par.update(0., &pointer, &par_cfg, &mut SmallRng::seed_from_u64(6));
        assert_eq!(seq.particles(), par.particles());
    }

    #[test]
    fn stats_sum_speed_and_pointer_distance() {
        let field = ParticleField::new(vec![
            Particle::new(Vector2D::new(10., 20.), Vector2D::new(3., 4.), 0.),
            Particle::new(Vector2D::new(-5., 0.), Vector2D::new(1., 0.), 0.),
        ]);

        let absent = field.stats(&PointerState::ABSENT);
        assert_eq!(absent.particles, 2);
        assert_eq!(absent.kinetic, 26.);
        assert_eq!(absent.pointer_distance, 0.);

        let pointer = PointerState {
            position: Some(Vector2D::new(0., 0.)),
            pressed: false,
            held: 0.,
        };
        assert_eq!(field.stats(&pointer).pointer_distance, 35.);
    }
}
