//! Source image pixel buffer.

use crate::error::CropError;

/// An already-decoded source image with RGB pixel data.
///
/// The widget owns exactly one of these for its lifetime; the buffer is
/// immutable while installed and only swapped at load or released at
/// dispose.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a new SourceImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Validate dimensions against the buffer length.
    ///
    /// Used at `load_image` time: a zero-area or mis-sized buffer aborts
    /// loading and the widget keeps its prior state.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.width == 0 || self.height == 0 {
            return Err(CropError::InvalidImage("zero-area image".to_string()));
        }
        let expected = (self.width as usize) * (self.height as usize) * 3;
        if self.pixels.len() != expected {
            return Err(CropError::InvalidImage(format!(
                "buffer holds {} bytes, dimensions require {}",
                self.pixels.len(),
                expected
            )));
        }
        Ok(())
    }

    /// Create a SourceImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
