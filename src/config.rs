use std::{fmt, str::FromStr};

use log::warn;

pub const INITIAL_PARTICLE_COUNT: usize = 400_000;
pub const DOMAIN_WIDTH: u32 = 1000;
pub const DOMAIN_HEIGHT: u32 = 1000;
pub const CURSOR_RADIUS_SQ: f32 = 50. * 50.;
pub const GROW: f32 = 10.; // radius units per second held
pub const GRAVITY: f32 = 1e-7;
pub const FRICTION: f32 = 0.95;
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

/// How particles that leave the domain are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Particles may drift off-domain and are simply not drawn.
    #[default]
    None,
    /// Velocity on the offending axis is reversed and damped.
    Bounce,
    /// Position is translated by the domain extent.
    Wrap,
}

impl FromStr for BoundaryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bounce" => Ok(Self::Bounce),
            "wrap" => Ok(Self::Wrap),
            other => Err(ConfigError::UnknownBoundary(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBoundary(String),
    InvalidNumber { key: String, value: String },
    UnknownKey(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBoundary(value) => {
                write!(f, "unknown boundary policy {value:?} (expected none, bounce or wrap)")
            }
            Self::InvalidNumber { key, value } => write!(f, "{key}: {value:?} is not a valid number"),
            Self::UnknownKey(key) => write!(f, "unknown setting {key}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide simulation settings, fixed once the simulation is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub particle_count: usize,
    pub width: u32,
    pub height: u32,
    /// Squared interaction radius with the button released.
    pub cursor_radius_sq: f32,
    pub grow: f32,
    pub gravity: f32,
    pub friction: f32,
    pub boundary: BoundaryPolicy,
    pub angular_drift: bool,
    pub parallel: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: INITIAL_PARTICLE_COUNT,
            width: DOMAIN_WIDTH,
            height: DOMAIN_HEIGHT,
            cursor_radius_sq: CURSOR_RADIUS_SQ,
            grow: GROW,
            gravity: GRAVITY,
            friction: FRICTION,
            boundary: BoundaryPolicy::None,
            angular_drift: true,
            parallel: true,
            seed: None,
        }
    }
}

impl Config {
    pub const ENV_PREFIX: &'static str = "SWARM_";

    #[inline]
    pub fn extent(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Applies a single `key = value` override. Keys are the env names without
    /// the `SWARM_` prefix, case-insensitive.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.to_ascii_uppercase();
        let invalid = || ConfigError::InvalidNumber {
            key: key.clone(),
            value: value.to_string(),
        };

        match key.as_str() {
            "PARTICLES" => self.particle_count = value.trim().parse().map_err(|_| invalid())?,
            "BOUNDARY" => self.boundary = value.parse()?,
            "SEED" => self.seed = Some(value.trim().parse().map_err(|_| invalid())?),
            "GRAVITY" => self.gravity = value.trim().parse().map_err(|_| invalid())?,
            "FRICTION" => self.friction = value.trim().parse().map_err(|_| invalid())?,
            "DRIFT" => {
                self.angular_drift = match value.trim() {
                    "1" | "true" | "on" => true,
                    "0" | "false" | "off" => false,
                    _ => return Err(invalid()),
                }
            }
            "PARALLEL" => {
                self.parallel = match value.trim() {
                    "1" | "true" | "on" => true,
                    "0" | "false" | "off" => false,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.clone())),
        }

        Ok(())
    }

    /// Overlays every `(key, value)` pair, logging and skipping the bad ones.
    pub fn overlay<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(Self::ENV_PREFIX) else {
                continue;
            };
            if let Err(err) = self.apply(key, value.as_ref()) {
                warn!("ignoring {}{key}: {err}", Self::ENV_PREFIX);
            }
        }
        self
    }

    pub fn from_env() -> Self {
        Self::default().overlay(std::env::vars())
    }
}
