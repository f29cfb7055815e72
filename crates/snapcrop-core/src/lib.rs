//! Snapcrop Core - Interactive image-cropping engine
//!
//! This crate provides the core of the Snapcrop widget: gesture-to-transform
//! interpretation, frame-bounds enforcement with snap-back animation, and
//! the crop-geometry resolver that maps the on-screen mask back into source
//! pixel coordinates.

pub mod animate;
pub mod bounds;
pub mod crop;
pub mod error;
pub mod gesture;
pub mod geometry;
pub mod matrix;
pub mod overlay;
pub mod prepare;
pub mod schedule;
pub mod source;
pub mod widget;

pub use bounds::{visible_rect, FramePolicy, MAX_SCALE};
pub use crop::{cropped_image, resolve_crop_rect, CropRect, Quadrant, OUTPUT_EDGE_CAP};
pub use error::CropError;
pub use gesture::{GesturePhase, Pointer, PointerEvent, PointerKind};
pub use geometry::{Point, Rect};
pub use matrix::Matrix;
pub use overlay::{MaskShape, ShadowOverlay};
pub use source::SourceImage;
pub use widget::CropWidget;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_surface_reexports() {
        // The façade and its collaborators are reachable from the root.
        let widget = CropWidget::new(600, 600);
        assert!(widget.crop_rect().is_none());
        assert_eq!(Matrix::identity(), Matrix::default());
        assert_eq!(MaskShape::default(), MaskShape::Circle);
    }
}
