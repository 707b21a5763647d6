//! Pseudo-relief shading from a one-sided finite difference of the noise.

use crate::noise::FractalNoise;
use crate::palette::Color;

/// Diagonal sample offset in noise-space units
pub const SHADE_OFFSET: f64 = 0.01;

/// Brightness change per unit of value difference
pub const SHADE_STRENGTH: f64 = 100.0;

/// Brightness delta for a pixel whose (possibly masked) value is `value`
/// at noise coordinates (nx, ny). The comparison sample comes from the raw
/// fractal field and is never masked.
pub fn shade_delta(noise: &FractalNoise, nx: f64, ny: f64, value: f64) -> f64 {
    let offset_value = noise.sample_normalized(nx + SHADE_OFFSET, ny + SHADE_OFFSET);
    (value - offset_value) * SHADE_STRENGTH
}

/// Add `delta` to every channel, saturating at 0 and 255
pub fn apply_shade(color: Color, delta: f64) -> Color {
    let channel = |c: u8| (c as f64 + delta).clamp(0.0, 255.0) as u8;
    Color::new(channel(color.r), channel(color.g), channel(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseBackend;

    #[test]
    fn test_apply_shade_clamps() {
        let c = Color::new(10, 128, 250);
        assert_eq!(apply_shade(c, 20.0), Color::new(30, 148, 255));
        assert_eq!(apply_shade(c, -20.0), Color::new(0, 108, 230));
        assert_eq!(apply_shade(c, 0.0), c);
    }

    #[test]
    fn test_delta_matches_raw_difference() {
        let noise = FractalNoise::new(NoiseBackend::Lattice, 4.0, 1);
        let (nx, ny) = (0.42, 1.37);
        let value = noise.sample_normalized(nx, ny);
        let expected = (value - noise.sample_normalized(nx + 0.01, ny + 0.01)) * 100.0;
        assert_eq!(shade_delta(&noise, nx, ny, value), expected);
        // Small offset on a smooth field keeps the delta modest
        assert!(expected.abs() < 5.0);
    }

    #[test]
    fn test_masked_value_compares_against_unmasked_field() {
        let noise = FractalNoise::new(NoiseBackend::Lattice, 4.0, 1);
        let raw = noise.sample_normalized(3.1 + SHADE_OFFSET, 2.2 + SHADE_OFFSET);
        let delta = shade_delta(&noise, 3.1, 2.2, 0.0);
        assert!((delta + raw * SHADE_STRENGTH).abs() < 1e-9);
    }
}
