//! RGBA8 output buffer.

use image::RgbaImage;

use crate::palette::Color;

/// Bytes per pixel
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 pixels. Alpha is always 255 after a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent black buffer of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * CHANNELS],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate if the size changed; contents are unspecified afterwards
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height * CHANNELS, 0);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Convert into an `image` RGBA image
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        img.copy_from_slice(&self.pixels);
        img
    }

    /// Pack into `0RGB` words, the layout framebuffer windows expect
    pub fn to_argb_u32(&self) -> Vec<u32> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect()
    }
}

/// Write an opaque color into a 4-byte pixel slot
#[inline]
pub(crate) fn write_pixel(dest: &mut [u8], color: Color) {
    dest[0] = color.r;
    dest[1] = color.g;
    dest[2] = color.b;
    dest[3] = 255;
}
