//! # Pixel Channel Stream
//!
//! Flat view of an 8-bit RGB image: channel `i` is component `i % 3` (R, G, B)
//! of pixel `i / 3`, pixels in row-major order. `RgbImage` already stores its
//! samples in exactly this order, so the stream is the pixel buffer itself.

use image::{DynamicImage, RgbImage};

#[derive(Debug, Clone)]
pub struct PixelChannelStream {
    image: RgbImage,
}

impl PixelChannelStream {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Normalise any decoded image to 8-bit RGB, dropping alpha and extra
    /// channels.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgb8())
    }

    /// Number of channel values, `3 × pixel count`.
    pub fn len(&self) -> usize {
        self.channels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.len() / 3
    }

    /// # Panics
    /// If `index >= self.len()`.
    pub fn get(&self, index: usize) -> u8 {
        self.channels()[index]
    }

    /// # Panics
    /// If `index >= self.len()`.
    pub fn set(&mut self, index: usize, value: u8) {
        self.channels_mut()[index] = value;
    }

    pub fn channels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn channels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
