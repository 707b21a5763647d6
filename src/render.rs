//! Frame rendering: noise -> mask -> color -> shading, per pixel.
//!
//! Pixels are independent, so rows are filled in parallel with rayon.
//! The output is identical to a sequential pass.

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::mask::MaskShaper;
use crate::noise::FractalNoise;
use crate::palette::{grayscale, Color};
use crate::pixel_buffer::{write_pixel, PixelBuffer, CHANNELS};
use crate::shading::{apply_shade, shade_delta};
use crate::tilemap::Tilemap;

/// Per-frame pipeline state built from a validated config.
pub struct FrameRenderer<'a> {
    config: &'a RenderConfig,
    noise: FractalNoise,
    mask: MaskShaper,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Self {
            config,
            noise: FractalNoise::new(config.backend, config.seed, config.octave_count()),
            mask: MaskShaper::new(config.width, config.height, config.mask)?,
        })
    }

    /// Noise-space coordinates of a pixel
    #[inline]
    pub fn noise_coords(&self, x: usize, y: usize) -> (f64, f64) {
        (
            x as f64 / self.config.scale,
            y as f64 / self.config.scale + self.config.time_offset,
        )
    }

    /// Masked, normalized value of a pixel
    pub fn value_at(&self, x: usize, y: usize) -> f64 {
        let (nx, ny) = self.noise_coords(x, y);
        let raw = self.noise.sample_normalized(nx, ny);
        self.mask.shape(x as f64, y as f64, raw)
    }

    /// Final color of a pixel
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        let value = self.value_at(x, y);
        let base = if self.config.grayscale {
            grayscale(value)
        } else {
            self.config.palette.color_for(value, self.config.smoothing)
        };

        if self.config.shading {
            let (nx, ny) = self.noise_coords(x, y);
            apply_shade(base, shade_delta(&self.noise, nx, ny, value))
        } else {
            base
        }
    }

    /// Overwrite every pixel of `buffer`, resizing it to the canvas first
    pub fn render_into(&self, buffer: &mut PixelBuffer) {
        let width = self.config.width;
        buffer.resize(width, self.config.height);
        buffer
            .bytes_mut()
            .par_chunks_mut(width * CHANNELS)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    write_pixel(px, self.color_at(x, y));
                }
            });
    }

    /// Raw value grid, same values the color pass sees
    pub fn values(&self) -> Tilemap<f64> {
        let width = self.config.width;
        let mut grid = Tilemap::new(width, self.config.height);
        grid.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = self.value_at(x, y);
                }
            });
        grid
    }
}

/// Render a fresh buffer for `config`
pub fn render(config: &RenderConfig) -> Result<PixelBuffer, RenderError> {
    let renderer = FrameRenderer::new(config)?;
    let mut buffer = PixelBuffer::new(config.width, config.height);
    renderer.render_into(&mut buffer);
    Ok(buffer)
}

/// Render into a caller-owned buffer. On error the buffer is untouched.
pub fn render_into(config: &RenderConfig, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
    FrameRenderer::new(config)?.render_into(buffer);
    Ok(())
}

/// Per-pixel normalized values in [0, 1], without color or shading
pub fn render_values(config: &RenderConfig) -> Result<Tilemap<f64>, RenderError> {
    Ok(FrameRenderer::new(config)?.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{MaskConfig, MaskShape};
    use crate::noise::NoiseBackend;

    fn small_gray() -> RenderConfig {
        RenderConfig {
            width: 4,
            height: 4,
            scale: 1.0,
            seed: 0.0,
            fractal: false,
            grayscale: true,
            shading: false,
            mask: MaskConfig { enabled: false, ..MaskConfig::default() },
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_small_grayscale_frame() {
        let config = small_gray();
        let a = render(&config).unwrap();
        let b = render(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), 4 * 4 * 4);

        for y in 0..4 {
            for x in 0..4 {
                let [r, g, b, alpha] = a.pixel(x, y);
                assert_eq!(r, g);
                assert_eq!(g, b);
                assert_eq!(alpha, 255);
            }
        }
    }

    #[test]
    fn test_idempotent_with_all_features() {
        let config = RenderConfig { width: 32, height: 24, scale: 10.0, seed: 7.0, ..RenderConfig::default() };
        assert_eq!(render(&config).unwrap(), render(&config).unwrap());
    }

    #[test]
    fn test_parallel_matches_per_pixel() {
        let config = RenderConfig { width: 17, height: 9, scale: 5.0, seed: 3.0, ..RenderConfig::default() };
        let buffer = render(&config).unwrap();
        let renderer = FrameRenderer::new(&config).unwrap();
        for y in 0..config.height {
            for x in 0..config.width {
                let c = renderer.color_at(x, y);
                assert_eq!(buffer.pixel(x, y), [c.r, c.g, c.b, 255]);
            }
        }
    }

    #[test]
    fn test_values_match_grayscale_pixels() {
        let config = RenderConfig { width: 8, height: 6, scale: 3.0, ..small_gray() };
        let values = render_values(&config).unwrap();
        let buffer = render(&config).unwrap();
        for (x, y, &v) in values.iter() {
            assert!((0.0..=1.0).contains(&v));
            assert_eq!(buffer.pixel(x, y)[0], (v * 255.0) as u8);
        }
    }

    #[test]
    fn test_circle_mask_zeroes_corner() {
        let config = RenderConfig {
            width: 10,
            height: 10,
            scale: 2.0,
            mask: MaskConfig { enabled: true, shape: MaskShape::Circle, contrast: 2.0 },
            ..small_gray()
        };
        let values = render_values(&config).unwrap();
        assert_eq!(*values.get(0, 0), 0.0);
    }

    #[test]
    fn test_time_offset_shifts_rows() {
        let base = RenderConfig { width: 6, height: 6, scale: 2.0, ..small_gray() };
        let shifted = RenderConfig { time_offset: 0.5, ..base.clone() };
        let a = render_values(&base).unwrap();
        let b = render_values(&shifted).unwrap();
        // One pixel row is 0.5 noise units at scale 2
        for x in 0..6 {
            assert!((a.get(x, 1) - b.get(x, 0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_config_leaves_buffer_untouched() {
        let good = small_gray();
        let mut buffer = render(&good).unwrap();
        let before = buffer.clone();

        let bad = RenderConfig { scale: 0.0, ..good };
        assert_eq!(render_into(&bad, &mut buffer), Err(RenderError::InvalidScale(0.0)));
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_huge_seed_is_rejected_not_rendered() {
        let config = RenderConfig { seed: 1e307, ..small_gray() };
        assert!(matches!(render(&config), Err(RenderError::NoiseDomainOverflow { .. })));
        assert!(matches!(render_values(&config), Err(RenderError::NoiseDomainOverflow { .. })));
    }

    #[test]
    fn test_tiny_scale_is_rejected_not_rendered() {
        let config = RenderConfig { scale: 1e-310, ..small_gray() };
        assert!(matches!(render_values(&config), Err(RenderError::NoiseDomainOverflow { .. })));
    }

    #[test]
    fn test_oversized_canvas_errors_before_allocating() {
        let config = RenderConfig { width: 1 << 62, height: 8, ..small_gray() };
        assert!(matches!(render(&config), Err(RenderError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_large_finite_inputs_stay_in_range() {
        let config = RenderConfig { seed: 1e9, time_offset: -1e6, scale: 0.5, ..small_gray() };
        let values = render_values(&config).unwrap();
        assert!(values.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_render_into_resizes_and_overwrites() {
        let mut buffer = PixelBuffer::new(1, 1);
        let config = RenderConfig { width: 5, height: 3, scale: 2.0, ..RenderConfig::default() };
        render_into(&config, &mut buffer).unwrap();
        assert_eq!(buffer, render(&config).unwrap());
    }

    #[test]
    fn test_backends_differ() {
        let lattice = RenderConfig { width: 8, height: 8, scale: 3.3, ..small_gray() };
        let perlin = RenderConfig { backend: NoiseBackend::Perlin, ..lattice.clone() };
        assert_ne!(render_values(&lattice).unwrap(), render_values(&perlin).unwrap());
    }
}
