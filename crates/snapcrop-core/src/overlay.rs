//! Shadow mask overlay.
//!
//! The dimming layer drawn over the widget with a cut-out where the crop
//! mask sits. Purely cosmetic and kept out of the correctness-critical
//! path: the widget caches one overlay and rebuilds it only when its pixel
//! size changes.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Shadow color over the masked-out region: black at ~50% opacity.
const SHADOW_ALPHA: u8 = 0x7f;

/// Shape of the crop mask cut-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaskShape {
    /// Circle inscribed in the mask rectangle.
    #[default]
    Circle,
    /// The mask rectangle itself.
    Rect,
}

/// A cached translucent overlay with a cut-out matching the mask shape.
///
/// RGBA, 4 bytes per pixel, row-major. Alpha is the only meaningful
/// channel (the shadow is black); the cut-out is fully transparent with a
/// one-pixel softened rim on the circle.
#[derive(Debug, Clone)]
pub struct ShadowOverlay {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ShadowOverlay {
    /// Render the overlay for a widget of the given pixel size.
    pub fn build(width: u32, height: u32, mask: &Rect, shape: MaskShape) -> Self {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        let center = mask.center();
        let radius = mask.width().min(mask.height()) / 2.0;

        for y in 0..height {
            for x in 0..width {
                // Sample at the pixel center.
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let cut = match shape {
                    MaskShape::Circle => {
                        let dx = px - center.x;
                        let dy = py - center.y;
                        let dist = (dx * dx + dy * dy).sqrt();
                        (radius - dist + 0.5).clamp(0.0, 1.0)
                    }
                    MaskShape::Rect => {
                        if px >= mask.left && px <= mask.right && py >= mask.top && py <= mask.bottom
                        {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };

                let alpha = (SHADOW_ALPHA as f32 * (1.0 - cut)).round() as u8;
                let idx = ((y * width + x) * 4 + 3) as usize;
                pixels[idx] = alpha;
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// True when the cached overlay still matches the widget size.
    pub fn matches_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Alpha channel value at a pixel.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[((y * self.width + x) * 4 + 3) as usize]
    }
}
