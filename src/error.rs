//! Errors raised when a render configuration cannot produce a sane frame.

/// Configuration errors. Every render entry point validates first and
/// returns one of these instead of producing NaN-filled output.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Scale must be finite and strictly positive
    InvalidScale(f64),
    /// Canvas must be at least 1x1
    InvalidDimensions { width: usize, height: usize },
    /// Seed must be a finite number
    NonFiniteSeed(f64),
    /// Time offset must be a finite number
    NonFiniteTimeOffset(f64),
    /// Canvas holds more pixels than a buffer may allocate
    ImageTooLarge { width: usize, height: usize, max_pixels: usize },
    /// Scale, seed or time offset push noise coordinates past f64 range
    NoiseDomainOverflow { max_x: f64, max_y: f64, seed: f64 },
    /// Mask contrast below 1.0 would invert the contrast boost
    InvalidContrast(f64),
    /// A palette needs at least one color stop
    EmptyPalette,
    /// Threshold outside [0, 1] or not finite
    InvalidThreshold { index: usize, threshold: f64 },
    /// Thresholds must be non-decreasing
    UnorderedPalette { index: usize, previous: f64, threshold: f64 },
    /// Color string that is not `#rrggbb`
    InvalidColor(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::InvalidScale(scale) => {
                write!(f, "Scale must be a positive finite number, got {}", scale)
            }
            RenderError::InvalidDimensions { width, height } => {
                write!(f, "Canvas size {}x{} is empty", width, height)
            }
            RenderError::ImageTooLarge { width, height, max_pixels } => write!(
                f,
                "Requested canvas {}x{} exceeds maximum {} pixels",
                width, height, max_pixels
            ),
            RenderError::NoiseDomainOverflow { max_x, max_y, seed } => write!(
                f,
                "Noise coordinates up to ({}, {}) with seed {} overflow the noise domain",
                max_x, max_y, seed
            ),
            RenderError::NonFiniteSeed(seed) => write!(f, "Seed {} is not finite", seed),
            RenderError::NonFiniteTimeOffset(t) => write!(f, "Time offset {} is not finite", t),
            RenderError::InvalidContrast(c) => {
                write!(f, "Mask contrast must be >= 1.0, got {}", c)
            }
            RenderError::EmptyPalette => write!(f, "Palette has no color stops"),
            RenderError::InvalidThreshold { index, threshold } => {
                write!(f, "Color stop {} has threshold {} outside [0, 1]", index, threshold)
            }
            RenderError::UnorderedPalette { index, previous, threshold } => write!(
                f,
                "Color stop {} threshold {} is below the previous threshold {}",
                index, threshold, previous
            ),
            RenderError::InvalidColor(s) => write!(f, "Invalid color '{}', expected #rrggbb", s),
        }
    }
}

impl std::error::Error for RenderError {}
