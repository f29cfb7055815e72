//! Source conditioning.
//!
//! Helpers the host runs on a freshly decoded bitmap before handing it to
//! the widget: bounding the resolution (the widget never needs more pixels
//! than the display can show) and the mild saturation lift applied while
//! building the working image.

use crate::error::CropError;
use crate::source::SourceImage;

/// Default longest-edge bound for the working image.
pub const DEFAULT_SOURCE_BOUND: u32 = 800;

/// Saturation multiplier applied when conditioning the source.
pub const SOURCE_SATURATION: f32 = 1.3;

/// Downscale so the longest edge fits within `max_edge`, preserving aspect
/// ratio. An image that already fits is returned unchanged; upscaling never
/// happens.
pub fn resize_to_bound(image: &SourceImage, max_edge: u32) -> Result<SourceImage, CropError> {
    if max_edge == 0 {
        return Err(CropError::InvalidImage("zero bound".to_string()));
    }
    image.validate()?;

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let scale = max_edge as f32 / image.width.max(image.height) as f32;
    let new_w = ((image.width as f32 * scale).round() as u32).max(1);
    let new_h = ((image.height as f32 * scale).round() as u32).max(1);

    let rgb = image
        .to_rgb_image()
        .ok_or_else(|| CropError::InvalidImage("failed to create RgbImage".to_string()))?;
    let resized = image::imageops::resize(&rgb, new_w, new_h, image::imageops::FilterType::Triangle);
    Ok(SourceImage::from_rgb_image(resized))
}

/// Scale each pixel's chroma about its luminance, in place.
///
/// `factor` 1.0 is a no-op; [`SOURCE_SATURATION`] gives the conditioning
/// lift.
pub fn boost_saturation(image: &mut SourceImage, factor: f32) {
    if factor == 1.0 {
        return;
    }
    for chunk in image.pixels.chunks_exact_mut(3) {
        let r = chunk[0] as f32 / 255.0;
        let g = chunk[1] as f32 / 255.0;
        let b = chunk[2] as f32 / 255.0;

        let gray = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        let r = gray + (r - gray) * factor;
        let g = gray + (g - gray) * factor;
        let b = gray + (b - gray) * factor;

        chunk[0] = (r.clamp(0.0, 1.0) * 255.0) as u8;
        chunk[1] = (g.clamp(0.0, 1.0) * 255.0) as u8;
        chunk[2] = (b.clamp(0.0, 1.0) * 255.0) as u8;
    }
}

/// Full conditioning pass: bound the resolution, then lift saturation.
pub fn condition_source(image: &SourceImage, max_edge: u32) -> Result<SourceImage, CropError> {
    let mut out = resize_to_bound(image, max_edge)?;
    boost_saturation(&mut out, SOURCE_SATURATION);
    Ok(out)
}
