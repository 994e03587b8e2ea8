//! Speed-to-colour mapping for particles.
//!
//! The hue is periodic in squared speed, so very different speeds can share a
//! colour. That aliasing is what gives the field its banded look.

use std::f32::consts::PI;

use crate::vectors::Vector2D;

pub const SATURATION: f32 = 0.75;
pub const LIGHTNESS: f32 = 0.5;
pub const ALPHA: u8 = 128; // 50%

/// Hue in degrees for a particle moving at `velocity`. Ranges over [-360, 360].
#[inline]
pub fn hue(velocity: Vector2D) -> f32 {
    360. * f32::sin(PI * velocity.length_squared())
}

/// RGBA written into the frame for a particle moving at `velocity`.
#[inline]
pub fn particle_color(velocity: Vector2D) -> [u8; 4] {
    let [r, g, b] = hsl_to_rgb(hue(velocity) / 360., SATURATION, LIGHTNESS);
    [r, g, b, ALPHA]
}

/// Converts normalized hue/saturation/lightness (all nominally in [0, 1]) to
/// 8-bit RGB. Hue is taken modulo 1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let (r, g, b) = if s == 0. {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1. + s) } else { l + s - l * s };
        let p = 2. * l - q;
        (
            hue_to_rgb(p, q, h + 1. / 3.),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1. / 3.),
        )
    };

    [to_channel(r), to_channel(g), to_channel(b)]
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.);
    if t < 1. / 6. {
        p + (q - p) * 6. * t
    } else if t < 1. / 2. {
        q
    } else if t < 2. / 3. {
        p + (q - p) * (2. / 3. - t) * 6.
    } else {
        p
    }
}

#[inline]
fn to_channel(value: f32) -> u8 {
    // `as` saturates, NaN becomes 0
    (value * 255.).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsl_to_rgb(0., 1., 0.5), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(1. / 3., 1., 0.5), [0, 255, 0]);
        assert_eq!(hsl_to_rgb(2. / 3., 1., 0.5), [0, 0, 255]);
    }

    #[test]
    fn achromatic_ignores_hue() {
        for h in [0., 0.2, 0.5, 0.9, -0.3] {
            assert_eq!(hsl_to_rgb(h, 0., 0.5), [128, 128, 128]);
            assert_eq!(hsl_to_rgb(h, 0., 0.2), [51, 51, 51]);
            assert_eq!(hsl_to_rgb(h, 0., 1.), [255, 255, 255]);
        }
    }

    #[test]
    fn particle_defaults() {
        // q = 0.875, p = 0.125
        assert_eq!(hsl_to_rgb(0., SATURATION, LIGHTNESS), [223, 32, 32]);
        assert_eq!(hsl_to_rgb(0.5, SATURATION, LIGHTNESS), [32, 223, 223]);
    }

    #[test]
    fn hue_wraps_with_period_one() {
        for h in [0.05, 0.3, 0.4, 0.6, 0.8, 0.95] {
            assert_eq!(hsl_to_rgb(h, 0.75, 0.5), hsl_to_rgb(h + 1., 0.75, 0.5));
            assert_eq!(hsl_to_rgb(h, 0.75, 0.5), hsl_to_rgb(h - 1., 0.75, 0.5));
        }
    }

    #[test]
    fn hue_depends_only_on_speed() {
        let a = hue(Vector2D::new(0.3, 0.4));
        let b = hue(Vector2D::new(-0.4, 0.3));
        let c = hue(Vector2D::new(0., -0.5));
        assert_eq!(a, b);
        assert!((a - c).abs() < 1e-3);
        assert_eq!(hue(Vector2D::ZERO), 0.);
    }

    #[test]
    fn hue_is_not_monotonic_in_speed() {
        // sin(pi * 0.5) peaks, sin(pi * 1.5) troughs
        let peak = hue(Vector2D::new(0.5f32.sqrt(), 0.));
        let trough = hue(Vector2D::new(1.5f32.sqrt(), 0.));
        assert!((peak - 360.).abs() < 1e-2);
        assert!((trough + 360.).abs() < 1e-2);
    }

    #[test]
    fn particle_color_is_half_transparent() {
        assert_eq!(particle_color(Vector2D::ZERO), [223, 32, 32, ALPHA]);
    }
}
