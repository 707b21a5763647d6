//! Procedural terrain image library
//!
//! Evaluates seeded fractal noise over a pixel grid, shapes it into a
//! landmass with a distance mask, colors it through a threshold palette
//! and fakes relief with finite-difference shading.

pub mod config;
pub mod error;
pub mod export;
pub mod mask;
pub mod noise;
pub mod palette;
pub mod pixel_buffer;
pub mod render;
pub mod shading;
pub mod tilemap;
pub mod viewer;

pub use config::RenderConfig;
pub use error::RenderError;
pub use pixel_buffer::PixelBuffer;
pub use render::{render, render_into, render_values, FrameRenderer};
