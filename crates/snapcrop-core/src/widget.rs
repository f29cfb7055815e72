//! The cropping widget.
//!
//! Owns the single live transform and wires the gesture tracker, bounds
//! policy, animator, crop resolver, and overlay cache together. One logical
//! owner thread drives everything: pointer events mutate the transform,
//! release schedules any snap-back frames, and the host pumps the frame
//! queue from its render loop.
//!
//! Control flow per input sample:
//!
//! 1. The gesture tracker updates its state machine and, on a move,
//!    produces a candidate transform (adopted unclamped; overshoot is
//!    visible until release).
//! 2. The bounds policy evaluates the live transform; an out-of-frame
//!    result marks the gesture as tracking out of bounds.
//! 3. A pointer lift either accepts the transform, or schedules a
//!    snap-back to the last legal transform (out-of-frame) or the
//!    gesture-start transform (over-zoom).

use crate::animate::plan_snap_back;
use crate::bounds::FramePolicy;
use crate::crop::{cropped_image, resolve_crop_rect, CropRect};
use crate::error::CropError;
use crate::gesture::{GesturePhase, GestureTracker, PointerEvent, PointerKind};
use crate::geometry::Rect;
use crate::matrix::Matrix;
use crate::overlay::{MaskShape, ShadowOverlay};
use crate::schedule::FrameQueue;
use crate::source::SourceImage;

/// The mask side is this fraction of the shorter widget dimension.
const MASK_FRACTION: f32 = 2.0 / 3.0;

type RenderCallback = Box<dyn FnMut(&Matrix)>;

/// Interactive crop widget state.
pub struct CropWidget {
    transform: Matrix,
    tracker: GestureTracker,
    policy: FramePolicy,
    mask_shape: MaskShape,
    source: Option<SourceImage>,
    overlay: Option<ShadowOverlay>,
    queue: FrameQueue,
    tracking_out_of_bounds: bool,
    render: Option<RenderCallback>,
}

/// Centered square mask sized to two-thirds of the shorter dimension.
fn mask_for(width: f32, height: f32) -> Rect {
    let side = width.min(height) * MASK_FRACTION;
    let left = (width - side) / 2.0;
    let top = (height - side) / 2.0;
    Rect::from_size(left, top, side, side)
}

impl CropWidget {
    /// Create a widget with the given pixel size and a circular mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_shape(width, height, MaskShape::Circle)
    }

    pub fn with_shape(width: u32, height: u32, shape: MaskShape) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            transform: Matrix::identity(),
            tracker: GestureTracker::new(),
            policy: FramePolicy::new(mask_for(w, h), w, h),
            mask_shape: shape,
            source: None,
            overlay: Some(ShadowOverlay::build(width, height, &mask_for(w, h), shape)),
            queue: FrameQueue::new(),
            tracking_out_of_bounds: false,
            render: None,
        }
    }

    /// Register the repaint hook, fired once per accepted transform.
    pub fn set_render_callback(&mut self, f: impl FnMut(&Matrix) + 'static) {
        self.render = Some(Box::new(f));
    }

    /// The fixed crop window.
    pub fn mask_rect(&self) -> Rect {
        self.policy.mask
    }

    /// The live transform.
    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    /// True while snap-back frames are pending.
    pub fn is_animating(&self) -> bool {
        self.queue.has_pending()
    }

    /// The cached shadow overlay, if the widget has a size.
    pub fn overlay(&self) -> Option<&ShadowOverlay> {
        self.overlay.as_ref()
    }

    /// The installed source image.
    pub fn source(&self) -> Result<&SourceImage, CropError> {
        self.source.as_ref().ok_or(CropError::NoSourceImage)
    }

    fn emit_render(&mut self) {
        if let Some(cb) = self.render.as_mut() {
            cb(&self.transform);
        }
    }

    fn source_dims(&self) -> Option<(f32, f32)> {
        self.source
            .as_ref()
            .map(|s| (s.width as f32, s.height as f32))
    }

    /// Install a new source image.
    ///
    /// Resets the transform to the cover-fit policy: uniform scale so the
    /// image's shorter dimension covers the mask, then positioned by the
    /// centering policy (centered on each axis where it fits, flush where
    /// it overflows). Pending animation frames are invalidated first; a
    /// rejected image leaves all prior state untouched.
    pub fn load_image(&mut self, image: SourceImage) -> Result<(), CropError> {
        image.validate()?;

        self.queue.clear();
        self.tracker.reset();
        self.tracking_out_of_bounds = false;

        let mask = self.policy.mask;
        let scale_w = mask.width() / image.width as f32;
        let scale_h = mask.height() / image.height as f32;
        let mut scale = scale_w.max(scale_h);
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }

        let mut m = Matrix::identity();
        m.post_scale(scale, scale, 0.0, 0.0);
        let (dx, dy) = self
            .policy
            .center_delta(&m, image.width as f32, image.height as f32);
        m.post_translate(dx, dy);

        self.source = Some(image);
        self.transform = m;
        self.emit_render();
        Ok(())
    }

    /// Feed one pointer sample. A no-op before an image is loaded.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) {
        let Some((img_w, img_h)) = self.source_dims() else {
            return;
        };

        match event.kind {
            PointerKind::Down => {
                // The gesture takes ownership: pending snap-back frames
                // must never land after this.
                self.queue.invalidate();
                self.tracker.pointer_down(&self.transform, &event.pointers);
            }
            PointerKind::Move => {
                if let Some(m) = self.tracker.pointer_move(&event.pointers) {
                    self.transform = m;
                    if self.tracker.phase() == GesturePhase::Zoom
                        && !self.policy.is_out_of_frame(&m, img_w, img_h)
                    {
                        self.tracker.record_legal(&m);
                    }
                }
            }
            PointerKind::Up => {}
        }

        self.tracking_out_of_bounds = self.policy.is_out_of_frame(&self.transform, img_w, img_h);

        if event.kind == PointerKind::Up {
            self.tracker.pointer_up();
            if self.tracking_out_of_bounds {
                self.tracking_out_of_bounds = false;
                let target = *self.tracker.last_legal();
                plan_snap_back(
                    &mut self.queue,
                    &self.policy,
                    &self.transform,
                    &target,
                    self.tracker.pinch_mid(),
                    img_w,
                    img_h,
                );
            } else if self.policy.is_over_scale(&self.transform, img_w, img_h) {
                let target = *self.tracker.saved();
                plan_snap_back(
                    &mut self.queue,
                    &self.policy,
                    &self.transform,
                    &target,
                    self.tracker.pinch_mid(),
                    img_w,
                    img_h,
                );
            }
        } else {
            self.emit_render();
        }
    }

    /// Discrete rotation about the mask center. Always legal: a quarter
    /// turn of a covering image still covers the mask.
    pub fn rotate(&mut self, degrees: f32) {
        if self.source.is_none() {
            return;
        }
        let center = self.policy.mask.center();
        self.transform.post_rotate(degrees, center.x, center.y);
        self.emit_render();
    }

    /// The crop rectangle in source pixel coordinates, or `None` when no
    /// image is loaded or nothing of it sits under the mask.
    pub fn crop_rect(&self) -> Option<CropRect> {
        let source = self.source().ok()?;
        resolve_crop_rect(&self.transform, &self.policy.mask, source.width, source.height)
    }

    /// The cropped output image per the mask, or `None` as for
    /// [`crop_rect`](Self::crop_rect).
    pub fn cropped_image(&self) -> Option<SourceImage> {
        let source = self.source().ok()?;
        cropped_image(source, &self.transform, &self.policy.mask)
    }

    /// Resize the widget: recompute the mask, rebuild the overlay, and
    /// re-center the image.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        let (w, h) = (width as f32, height as f32);
        self.policy = FramePolicy::new(mask_for(w, h), w, h);

        let rebuild = self
            .overlay
            .as_ref()
            .map_or(true, |o| !o.matches_size(width, height));
        if rebuild {
            self.overlay = Some(ShadowOverlay::build(
                width,
                height,
                &self.policy.mask,
                self.mask_shape,
            ));
        }

        if let Some((img_w, img_h)) = self.source_dims() {
            let (dx, dy) = self.policy.center_delta(&self.transform, img_w, img_h);
            self.transform.post_translate(dx, dy);
            self.emit_render();
        }
    }

    /// Advance the animation clock and deliver due snap-back frames.
    pub fn pump(&mut self, now_ms: u64) {
        let mut frames = Vec::new();
        self.queue.pump(now_ms, |f| frames.push(f));
        for frame in frames {
            self.transform = frame.matrix;
            if frame.finalize {
                self.tracker.finalize(&frame.matrix);
            }
            self.emit_render();
        }
    }

    /// Release the source image and all cached state. Acts as a barrier:
    /// pending frames are invalidated before anything is dropped.
    pub fn dispose(&mut self) {
        self.queue.clear();
        self.tracker.reset();
        self.tracking_out_of_bounds = false;
        self.source = None;
        self.overlay = None;
        self.transform = Matrix::identity();
    }
}
