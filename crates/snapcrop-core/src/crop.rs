//! Crop-geometry resolution.
//!
//! Inverse-maps the on-screen mask back into source-image pixel
//! coordinates. The screen-to-source mapping is derived from the forward
//! transform without a stored inverse: the mapped image origin and far
//! corner give a *signed* extent whose direction encodes the quadrant
//! rotation, and the mask intersection's corners are ranked against the
//! mapped origin: the nearest corner is the "top-left analog" in source
//! space and the farthest the "bottom-right analog", whatever the current
//! rotation. Normalized fractions along the signed extent then scale by the
//! source dimensions to yield the crop rectangle.

use crate::bounds::visible_rect;
use crate::geometry::{Point, Rect};
use crate::matrix::Matrix;
use crate::source::SourceImage;
use serde::{Deserialize, Serialize};

/// Longest edge of the cropped output; larger extractions are downscaled
/// uniformly to this cap, never upscaled.
pub const OUTPUT_EDGE_CAP: u32 = 400;

/// Quarter-turn rotation state, recovered from the transform coefficients.
///
/// Discrete ±90° rotations flip which source axis maps to screen width;
/// the sign pattern of the linear part identifies the quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quadrant {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Quadrant {
    /// Classify a transform's rotation by the dominant cosine/sine signs.
    pub fn of(m: &Matrix) -> Quadrant {
        if m.a.abs() >= m.c.abs() {
            if m.a >= 0.0 {
                Quadrant::Deg0
            } else {
                Quadrant::Deg180
            }
        } else if m.c > 0.0 {
            Quadrant::Deg90
        } else {
            Quadrant::Deg270
        }
    }

    /// True when this rotation swaps the roles of the X and Y axes.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Quadrant::Deg90 | Quadrant::Deg270)
    }

    pub fn degrees(self) -> u32 {
        match self {
            Quadrant::Deg0 => 0,
            Quadrant::Deg90 => 90,
            Quadrant::Deg180 => 180,
            Quadrant::Deg270 => 270,
        }
    }
}

/// A crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn longer_edge(&self) -> u32 {
        self.width().max(self.height())
    }
}

/// Resolve the source-pixel rectangle visible under the mask.
///
/// Returns `None` when the visible image and the mask are disjoint or the
/// mapped extent is degenerate. The result is always within
/// `[0, width] x [0, height]`.
pub fn resolve_crop_rect(
    m: &Matrix,
    mask: &Rect,
    image_width: u32,
    image_height: u32,
) -> Option<CropRect> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let w = image_width as f32;
    let h = image_height as f32;

    // Signed extent: origin and far corner of the source, mapped forward.
    let origin = m.map_point(Point::new(0.0, 0.0));
    let extent = m.map_point(Point::new(w, h));

    let vis = visible_rect(m, w, h);
    let insert = vis.intersect(mask)?;

    let quadrant = Quadrant::of(m);
    let (span_x, span_y) = if quadrant.swaps_axes() {
        ((extent.y - origin.y).abs(), (extent.x - origin.x).abs())
    } else {
        ((extent.x - origin.x).abs(), (extent.y - origin.y).abs())
    };
    if span_x <= 0.0 || span_y <= 0.0 {
        return None;
    }

    let near = insert.closest_corner(origin);
    let far = insert.farthest_corner(origin);

    // Fractions along the signed extent; the axes swap roles under a
    // quarter turn.
    let (start_x, end_x, start_y, end_y) = if quadrant.swaps_axes() {
        (
            (near.y - origin.y).abs() / span_x,
            (far.y - origin.y).abs() / span_x,
            (near.x - origin.x).abs() / span_y,
            (far.x - origin.x).abs() / span_y,
        )
    } else {
        (
            (near.x - origin.x).abs() / span_x,
            (far.x - origin.x).abs() / span_x,
            (near.y - origin.y).abs() / span_y,
            (far.y - origin.y).abs() / span_y,
        )
    };

    // Round to the nearest pixel: quarter-turn round-trips land on exact
    // boundaries and must not drift across them.
    let px = |frac: f32, dim: u32| ((frac * dim as f32).round() as u32).min(dim);
    let x0 = px(start_x, image_width);
    let x1 = px(end_x, image_width);
    let y0 = px(start_y, image_height);
    let y1 = px(end_y, image_height);

    Some(CropRect {
        left: x0.min(x1),
        top: y0.min(y1),
        right: x0.max(x1),
        bottom: y0.max(y1),
    })
}

/// Extract `rect` from the source, apply the quadrant rotation, and cap the
/// output's longer edge at [`OUTPUT_EDGE_CAP`].
pub fn extract_crop(image: &SourceImage, rect: &CropRect, quadrant: Quadrant) -> Option<SourceImage> {
    if image.is_empty() {
        return None;
    }

    // Clamp to the source bounds; a degenerate rect still yields one pixel.
    let left = rect.left.min(image.width.saturating_sub(1));
    let top = rect.top.min(image.height.saturating_sub(1));
    let right = rect.right.clamp(left, image.width);
    let bottom = rect.bottom.clamp(top, image.height);
    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let mut output = vec![0u8; (out_width * out_height * 3) as usize];

    // Copy pixel data row by row for efficiency
    for y in 0..out_height {
        let src_y = top + y;
        let src_row_start = ((src_y * image.width + left) * 3) as usize;
        let dst_row_start = (y * out_width * 3) as usize;
        let len = (out_width * 3) as usize;
        output[dst_row_start..dst_row_start + len]
            .copy_from_slice(&image.pixels[src_row_start..src_row_start + len]);
    }

    let extracted = SourceImage::new(out_width, out_height, output);
    let rotated = rotate_quadrant(&extracted, quadrant)?;
    cap_output(&rotated)
}

/// Rotate by a quarter-turn multiple (clockwise).
fn rotate_quadrant(image: &SourceImage, quadrant: Quadrant) -> Option<SourceImage> {
    if quadrant == Quadrant::Deg0 {
        return Some(image.clone());
    }
    let rgb = image.to_rgb_image()?;
    let rotated = match quadrant {
        Quadrant::Deg0 => unreachable!(),
        Quadrant::Deg90 => image::imageops::rotate90(&rgb),
        Quadrant::Deg180 => image::imageops::rotate180(&rgb),
        Quadrant::Deg270 => image::imageops::rotate270(&rgb),
    };
    Some(SourceImage::from_rgb_image(rotated))
}

/// Downscale so the longer edge equals the cap; smaller output is returned
/// unchanged.
fn cap_output(image: &SourceImage) -> Option<SourceImage> {
    let longer = image.width.max(image.height);
    if longer <= OUTPUT_EDGE_CAP {
        return Some(image.clone());
    }
    let scale = OUTPUT_EDGE_CAP as f32 / longer as f32;
    let new_w = ((image.width as f32 * scale).round() as u32).max(1);
    let new_h = ((image.height as f32 * scale).round() as u32).max(1);
    let rgb = image.to_rgb_image()?;
    let resized = image::imageops::resize(&rgb, new_w, new_h, image::imageops::FilterType::Triangle);
    Some(SourceImage::from_rgb_image(resized))
}

/// The full pipeline: resolve the crop rectangle under the mask and produce
/// the cropped, rotated, capped output image.
pub fn cropped_image(image: &SourceImage, m: &Matrix, mask: &Rect) -> Option<SourceImage> {
    let rect = resolve_crop_rect(m, mask, image.width, image.height)?;
    extract_crop(image, &rect, Quadrant::of(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 300x300 mask centered in a 600x600 widget.
    fn mask() -> Rect {
        Rect::new(150.0, 150.0, 450.0, 450.0)
    }

    /// Cover-fit transform for a 1000x2000 source: uniform 0.3 scale,
    /// visible rect 300x600 at (150, top).
    fn covering_transform(top: f32) -> Matrix {
        let mut m = Matrix::identity();
        m.post_scale(0.3, 0.3, 0.0, 0.0);
        m.post_translate(150.0, top);
        m
    }

    /// Source image where each pixel value encodes its position.
    fn test_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v);
                pixels.push(v);
                pixels.push(v);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    #[test]
    fn test_quadrant_classification() {
        let mut m = Matrix::identity();
        assert_eq!(Quadrant::of(&m), Quadrant::Deg0);
        m.post_rotate(90.0, 300.0, 300.0);
        assert_eq!(Quadrant::of(&m), Quadrant::Deg90);
        m.post_rotate(90.0, 300.0, 300.0);
        assert_eq!(Quadrant::of(&m), Quadrant::Deg180);
        m.post_rotate(90.0, 300.0, 300.0);
        assert_eq!(Quadrant::of(&m), Quadrant::Deg270);
        m.post_rotate(90.0, 300.0, 300.0);
        assert_eq!(Quadrant::of(&m), Quadrant::Deg0);
    }

    #[test]
    fn test_quadrant_survives_scale() {
        let mut m = Matrix::identity();
        m.post_rotate(90.0, 0.0, 0.0);
        m.post_scale(4.0, 4.0, 100.0, 100.0);
        assert_eq!(Quadrant::of(&m), Quadrant::Deg90);
        assert!(Quadrant::Deg90.swaps_axes());
        assert!(!Quadrant::Deg180.swaps_axes());
    }

    #[test]
    fn test_resolve_unrotated_center_band() {
        // Cover-fit: the mask sees the vertically centered square of the
        // 1000x2000 source.
        let m = covering_transform(0.0);
        let rect = resolve_crop_rect(&m, &mask(), 1000, 2000).unwrap();
        assert_eq!(rect, CropRect { left: 0, top: 500, right: 1000, bottom: 1500 });
    }

    #[test]
    fn test_resolve_is_rotation_invariant_for_full_turn() {
        let mask = mask();
        let m0 = covering_transform(0.0);
        let base = resolve_crop_rect(&m0, &mask, 1000, 2000).unwrap();

        // Four quarter turns about the mask center restore the rect.
        let mut m = m0;
        for _ in 0..4 {
            m.post_rotate(90.0, 300.0, 300.0);
        }
        let restored = resolve_crop_rect(&m, &mask, 1000, 2000).unwrap();
        assert_eq!(base, restored);
    }

    #[test]
    fn test_resolve_quarter_turn_swaps_axes() {
        let mask = mask();
        let mut m = covering_transform(0.0);
        m.post_rotate(90.0, 300.0, 300.0);
        let rect = resolve_crop_rect(&m, &mask, 1000, 2000).unwrap();
        // The same central band is selected through the rotated mapping.
        assert_eq!(rect, CropRect { left: 0, top: 500, right: 1000, bottom: 1500 });
    }

    #[test]
    fn test_resolve_disjoint_returns_none() {
        let mut m = covering_transform(0.0);
        m.post_translate(2000.0, 0.0);
        assert!(resolve_crop_rect(&m, &mask(), 1000, 2000).is_none());
    }

    #[test]
    fn test_resolve_pan_shifts_crop_window() {
        // Pan the image up 150 screen px (= 500 source px at 0.3 scale):
        // the mask sees a band 500 px lower in the source.
        let mut m = covering_transform(0.0);
        m.post_translate(0.0, -150.0);
        let rect = resolve_crop_rect(&m, &mask(), 1000, 2000).unwrap();
        assert_eq!(rect.top, 1000);
        assert_eq!(rect.bottom, 2000);
    }

    #[test]
    fn test_extract_preserves_pixel_origin() {
        let img = test_image(100, 100);
        let rect = CropRect { left: 20, top: 30, right: 60, bottom: 70 };
        let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
        assert_eq!(out.width, 40);
        assert_eq!(out.height, 40);
        // First output pixel comes from (20, 30): value (30*100+20) % 256
        assert_eq!(out.pixels[0], ((30 * 100 + 20) % 256) as u8);
    }

    #[test]
    fn test_extract_quarter_turn_swaps_dimensions() {
        let img = test_image(100, 100);
        let rect = CropRect { left: 0, top: 0, right: 80, bottom: 40 };
        let out = extract_crop(&img, &rect, Quadrant::Deg90).unwrap();
        assert_eq!(out.width, 40);
        assert_eq!(out.height, 80);
    }

    #[test]
    fn test_extract_caps_longer_edge() {
        let img = test_image(1200, 900);
        let rect = CropRect { left: 0, top: 0, right: 1200, bottom: 900 };
        let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
        assert_eq!(out.width, OUTPUT_EDGE_CAP);
        assert_eq!(out.height, 300);
    }

    #[test]
    fn test_extract_never_upscales() {
        let img = test_image(100, 100);
        let rect = CropRect { left: 10, top: 10, right: 50, bottom: 90 };
        let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
        assert_eq!(out.width, 40);
        assert_eq!(out.height, 80);
    }

    #[test]
    fn test_extract_clamps_to_source_bounds() {
        let img = test_image(50, 50);
        let rect = CropRect { left: 40, top: 40, right: 90, bottom: 90 };
        let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
        assert_eq!(out.width, 10);
        assert_eq!(out.height, 10);
    }

    #[test]
    fn test_cropped_image_end_to_end() {
        let img = test_image(1000, 2000);
        let m = covering_transform(0.0);
        let out = cropped_image(&img, &m, &mask()).unwrap();
        // 1000x1000 source region capped to the output edge.
        assert_eq!(out.width, OUTPUT_EDGE_CAP);
        assert_eq!(out.height, OUTPUT_EDGE_CAP);
    }

    #[test]
    fn test_cropped_image_none_when_disjoint() {
        let img = test_image(1000, 2000);
        let mut m = covering_transform(0.0);
        m.post_translate(5000.0, 0.0);
        assert!(cropped_image(&img, &m, &mask()).is_none());
    }

    #[test]
    fn test_crop_rect_accessors() {
        let r = CropRect { left: 10, top: 20, right: 110, bottom: 50 };
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 30);
        assert_eq!(r.longer_edge(), 100);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mask() -> Rect {
        Rect::new(150.0, 150.0, 450.0, 450.0)
    }

    /// Transforms in the gesture-reachable family: uniform scale, pan, and
    /// quarter-turn rotations about the mask center.
    fn transform_strategy() -> impl Strategy<Value = Matrix> {
        (
            0.1f32..=5.0,
            -800.0f32..=800.0,
            -800.0f32..=800.0,
            0u8..4,
        )
            .prop_map(|(scale, dx, dy, quarter_turns)| {
                let mut m = Matrix::identity();
                m.post_scale(scale, scale, 0.0, 0.0);
                m.post_translate(dx, dy);
                for _ in 0..quarter_turns {
                    m.post_rotate(90.0, 300.0, 300.0);
                }
                m
            })
    }

    proptest! {
        /// Property: the resolved rect always lies within the source bounds.
        #[test]
        fn prop_crop_rect_within_source(
            m in transform_strategy(),
            (w, h) in (50u32..=2000, 50u32..=2000),
        ) {
            if let Some(rect) = resolve_crop_rect(&m, &mask(), w, h) {
                prop_assert!(rect.right <= w);
                prop_assert!(rect.bottom <= h);
                prop_assert!(rect.left <= rect.right);
                prop_assert!(rect.top <= rect.bottom);
            }
        }

        /// Property: resolution is deterministic.
        #[test]
        fn prop_resolve_deterministic(m in transform_strategy()) {
            let a = resolve_crop_rect(&m, &mask(), 1000, 800);
            let b = resolve_crop_rect(&m, &mask(), 1000, 800);
            prop_assert_eq!(a, b);
        }

        /// Property: the output's longer edge never exceeds the cap.
        #[test]
        fn prop_output_capped(
            (left, top) in (0u32..400, 0u32..400),
            (cw, ch) in (1u32..=1200, 1u32..=1200),
        ) {
            let img = {
                let mut pixels = vec![0u8; (1600 * 1600 * 3) as usize];
                pixels[0] = 1;
                SourceImage::new(1600, 1600, pixels)
            };
            let rect = CropRect {
                left,
                top,
                right: (left + cw).min(1600),
                bottom: (top + ch).min(1600),
            };
            let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
            prop_assert!(out.width.max(out.height) <= OUTPUT_EDGE_CAP);
        }

        /// Property: extraction never enlarges the crop region.
        #[test]
        fn prop_no_upscale(
            (cw, ch) in (1u32..=300, 1u32..=300),
        ) {
            let img = SourceImage::new(400, 400, vec![0u8; 400 * 400 * 3]);
            let rect = CropRect { left: 0, top: 0, right: cw, bottom: ch };
            let out = extract_crop(&img, &rect, Quadrant::Deg0).unwrap();
            prop_assert!(out.width <= cw.max(1));
            prop_assert!(out.height <= ch.max(1));
        }
    }
}
