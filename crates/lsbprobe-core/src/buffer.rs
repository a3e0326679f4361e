//! Decoded pixel data handed to the estimator.

use crate::pairs::CHANNEL_STRIDE;

/// Row-major RGBA8 pixels plus their dimensions.
///
/// The estimator reads only the first channel of each 4-byte group; width and
/// height are carried for reporting. The buffer is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// Callers must pass `width * height * 4` bytes from a valid decode. This
    /// is checked in debug builds only.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * CHANNEL_STRIDE,
            "RGBA buffer length does not match {width}x{height}"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNEL_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
