//! Landmass masks: distance-from-center falloff that pushes noise toward
//! zero near the canvas edges.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Contrast factor applied to square and hexagon masks relative to circle.
/// Tuned by eye against the circle mask; presets depend on it.
pub const POLYGON_CONTRAST_FACTOR: f64 = 0.75;

/// sin(60°), the hexagon edge slope
const HEX_SLOPE: f64 = 0.866;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    #[default]
    Circle,
    Square,
    Hexagon,
}

impl MaskShape {
    pub fn all() -> &'static [MaskShape] {
        &[MaskShape::Circle, MaskShape::Square, MaskShape::Hexagon]
    }

    /// Next shape in cycle order
    pub fn next(self) -> Self {
        match self {
            MaskShape::Circle => MaskShape::Square,
            MaskShape::Square => MaskShape::Hexagon,
            MaskShape::Hexagon => MaskShape::Circle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaskShape::Circle => "circle",
            MaskShape::Square => "square",
            MaskShape::Hexagon => "hexagon",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    pub enabled: bool,
    pub shape: MaskShape,
    /// Contrast boost applied to masked land, must be >= 1.0
    pub contrast: f64,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shape: MaskShape::Circle,
            contrast: 1.5,
        }
    }
}

impl MaskConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !self.contrast.is_finite() || self.contrast < 1.0 {
            return Err(RenderError::InvalidContrast(self.contrast));
        }
        Ok(())
    }
}

/// Mask bound to a canvas size, center and extents precomputed.
#[derive(Clone, Copy, Debug)]
pub struct MaskShaper {
    config: MaskConfig,
    center_x: f64,
    center_y: f64,
    half_diagonal: f64,
}

impl MaskShaper {
    pub fn new(width: usize, height: usize, config: MaskConfig) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        config.validate()?;

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;
        Ok(Self {
            config,
            center_x,
            center_y,
            half_diagonal: (center_x * center_x + center_y * center_y).sqrt(),
        })
    }

    /// Normalized distance from center: 0 at center, 1 on the shape boundary
    pub fn distance(&self, px: f64, py: f64) -> f64 {
        let dx = px - self.center_x;
        let dy = py - self.center_y;
        match self.config.shape {
            MaskShape::Circle => (dx * dx + dy * dy).sqrt() / self.half_diagonal,
            MaskShape::Square => {
                (dx.abs() / self.center_x).max(dy.abs() / self.center_y)
            }
            MaskShape::Hexagon => {
                let nx = dx.abs() / self.center_x;
                let ny = dy.abs() / self.center_y;
                nx.max(HEX_SLOPE * ny + 0.5 * nx)
            }
        }
    }

    /// Falloff multiplier: 1 at center, 0 at and beyond the boundary
    pub fn falloff(&self, px: f64, py: f64) -> f64 {
        let d = self.distance(px, py);
        match self.config.shape {
            MaskShape::Circle => (1.0 - 2.0 * (d - 0.5)).clamp(0.0, 1.0),
            MaskShape::Square | MaskShape::Hexagon => (1.0 - d).max(0.0),
        }
    }

    /// Reshape a normalized noise value at pixel (px, py) into [0, 1].
    /// Identity when the mask is disabled.
    pub fn shape(&self, px: f64, py: f64, value: f64) -> f64 {
        if !self.config.enabled {
            return value;
        }

        let g = self.falloff(px, py);
        if g <= 0.0 {
            return 0.0;
        }

        let mut masked = value * g;
        if masked > 0.0 {
            masked *= match self.config.shape {
                MaskShape::Circle => self.config.contrast,
                MaskShape::Square | MaskShape::Hexagon => {
                    self.config.contrast * POLYGON_CONTRAST_FACTOR
                }
            };
        }
        masked.clamp(0.0, 1.0)
    }
}
