//! Render configuration.
//!
//! A `RenderConfig` is owned by the caller and passed into every render
//! call. It round-trips through JSON so a setup can be saved and shared.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::mask::{MaskConfig, MaskShape};
use crate::noise::{hash_argument_bound, NoiseBackend, FRACTAL_OCTAVES};
use crate::palette::ColorStopList;

/// Largest canvas a render will allocate (1 GiB of RGBA)
pub const MAX_PIXELS: usize = 1 << 28;

/// Everything one frame depends on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub width: usize,
    /// Canvas height in pixels
    pub height: usize,
    /// Pixels per noise-space unit (higher = larger features)
    pub scale: f64,
    pub seed: f64,
    /// Added to the noise-space y coordinate; advanced by animation drivers
    pub time_offset: f64,
    /// Layer several octaves instead of one
    pub fractal: bool,
    pub grayscale: bool,
    /// Blend between adjacent color stops
    pub smoothing: bool,
    /// Finite-difference relief shading
    pub shading: bool,
    pub mask: MaskConfig,
    pub palette: ColorStopList,
    pub backend: NoiseBackend,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scale: 100.0,
            seed: 0.0,
            time_offset: 0.0,
            fractal: true,
            grayscale: false,
            smoothing: true,
            shading: true,
            mask: MaskConfig::default(),
            palette: ColorStopList::terrain(),
            backend: NoiseBackend::Lattice,
        }
    }
}

impl RenderConfig {
    /// Check every precondition the render pipeline relies on
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        match self.width.checked_mul(self.height) {
            Some(pixels) if pixels <= MAX_PIXELS => {}
            _ => {
                return Err(RenderError::ImageTooLarge {
                    width: self.width,
                    height: self.height,
                    max_pixels: MAX_PIXELS,
                })
            }
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(RenderError::InvalidScale(self.scale));
        }
        if !self.seed.is_finite() {
            return Err(RenderError::NonFiniteSeed(self.seed));
        }
        if !self.time_offset.is_finite() {
            return Err(RenderError::NonFiniteTimeOffset(self.time_offset));
        }
        let max_x = self.width as f64 / self.scale;
        let max_y = self.height as f64 / self.scale + self.time_offset.abs();
        if !hash_argument_bound(max_x, max_y, self.seed, self.octave_count()).is_finite() {
            return Err(RenderError::NoiseDomainOverflow { max_x, max_y, seed: self.seed });
        }
        self.mask.validate()?;
        if self.palette.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        Ok(())
    }

    /// Octaves the fractal toggle maps to
    pub fn octave_count(&self) -> u32 {
        if self.fractal { FRACTAL_OCTAVES } else { 1 }
    }

    /// Replace seed, scale, mask and palette with random valid values.
    /// Canvas size and toggles are kept.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.seed = rng.gen_range(0..100_000) as f64;
        self.scale = rng.gen_range(40.0..240.0);
        self.time_offset = 0.0;
        let shapes = MaskShape::all();
        self.mask.shape = shapes[rng.gen_range(0..shapes.len())];
        self.mask.contrast = rng.gen_range(1.0..2.5);
        self.palette = ColorStopList::random(rng);
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
