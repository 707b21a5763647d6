//! Coherent noise sources.
//!
//! The default source is a seeded lattice gradient noise: a sine hash picks
//! an angle per integer lattice point, the angle becomes a unit gradient,
//! and the four surrounding gradients are blended with a quintic fade.
//! `fbm` layers any [`NoiseField`] into fractal noise.

use std::f64::consts::TAU;

use ::noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Octave count used when fractal detail is switched on
pub const FRACTAL_OCTAVES: u32 = 4;

/// Upper bound on the octave count `fbm` will evaluate
pub const MAX_OCTAVES: u32 = 12;

// Hash multipliers. Changing any of these changes every rendered image.
const HASH_X: f64 = 127.1;
const HASH_Y: f64 = 311.7;
const HASH_SEED: f64 = 74.7;
const HASH_SCALE: f64 = 43758.5453123;

/// Deterministic pseudo-random value in [0, 1) for a lattice point.
///
/// Coordinates are used as given; flooring to the lattice is the caller's job.
#[inline]
pub fn hash(ix: f64, iy: f64, seed: f64) -> f64 {
    let arg = ix * HASH_X + iy * HASH_Y + seed * HASH_SEED;
    if !arg.is_finite() {
        return 0.0;
    }
    let s = arg.sin() * HASH_SCALE;
    let f = s - s.floor();
    // s - floor(s) rounds up to 1.0 for tiny negative s
    if f >= 1.0 { 0.0 } else { f }
}

/// Largest hash argument magnitude reached when sampling `octaves` octaves
/// over |x| <= max_x, |y| <= max_y. One extra lattice cell covers the far
/// corners and the shading offset.
pub fn hash_argument_bound(max_x: f64, max_y: f64, seed: f64, octaves: u32) -> f64 {
    let frequency = 2f64.powi(octaves.clamp(1, MAX_OCTAVES) as i32 - 1);
    let ix = (max_x.abs() * frequency).floor() + 1.0;
    let iy = (max_y.abs() * frequency).floor() + 1.0;
    ix * HASH_X + iy * HASH_Y + seed.abs() * HASH_SEED
}

/// Unit gradient vector for a lattice point.
#[inline]
pub fn gradient(ix: f64, iy: f64, seed: f64) -> (f64, f64) {
    let angle = hash(ix, iy, seed) * TAU;
    (angle.cos(), angle.sin())
}

/// Quintic smoothstep: 6t^5 - 15t^4 + 10t^3
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A single-octave 2D noise source returning values in roughly [-1, 1].
pub trait NoiseField: Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Seeded lattice gradient noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeNoise {
    pub seed: f64,
}

impl LatticeNoise {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }
}

impl NoiseField for LatticeNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let x1 = x0 + 1.0;
        let y1 = y0 + 1.0;

        let corner = |cx: f64, cy: f64| {
            let (gx, gy) = gradient(cx, cy, self.seed);
            gx * (x - cx) + gy * (y - cy)
        };

        let sx = fade(x - x0);
        let sy = fade(y - y0);

        let top = lerp(corner(x0, y0), corner(x1, y0), sx);
        let bottom = lerp(corner(x0, y1), corner(x1, y1), sx);
        lerp(top, bottom, sy)
    }
}

/// Adapter over the `noise` crate's Perlin generator.
#[derive(Clone)]
pub struct CratePerlin {
    perlin: Perlin,
}

impl CratePerlin {
    pub fn new(seed: f64) -> Self {
        let bits = seed.to_bits();
        Self {
            perlin: Perlin::new((bits ^ (bits >> 32)) as u32),
        }
    }
}

impl NoiseField for CratePerlin {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }
}

/// Which single-octave source a render uses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseBackend {
    /// Sine-hash lattice gradient noise
    #[default]
    Lattice,
    /// `noise` crate Perlin
    Perlin,
}

/// Fractal Brownian motion: halve amplitude and double frequency per octave,
/// then divide by the amplitude total so the result stays in [-1, 1].
pub fn fbm<N: NoiseField + ?Sized>(field: &N, x: f64, y: f64, octaves: u32) -> f64 {
    let octaves = octaves.clamp(1, MAX_OCTAVES);
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * field.sample(x * frequency, y * frequency);
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_value
}

/// Fractal noise bound to a backend, seed and octave count.
pub struct FractalNoise {
    field: Box<dyn NoiseField>,
    octaves: u32,
}

impl FractalNoise {
    pub fn new(backend: NoiseBackend, seed: f64, octaves: u32) -> Self {
        let field: Box<dyn NoiseField> = match backend {
            NoiseBackend::Lattice => Box::new(LatticeNoise::new(seed)),
            NoiseBackend::Perlin => Box::new(CratePerlin::new(seed)),
        };
        Self { field, octaves: octaves.clamp(1, MAX_OCTAVES) }
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Raw fractal value in roughly [-1, 1]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        fbm(self.field.as_ref(), x, y, self.octaves)
    }

    /// Fractal value remapped to [0, 1]
    pub fn sample_normalized(&self, x: f64, y: f64) -> f64 {
        ((self.sample(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
