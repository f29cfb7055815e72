//! Frame legality policy.
//!
//! Decides whether the transformed image still covers the crop mask,
//! whether the zoom exceeds the allowed maximum, and how far a released
//! out-of-bounds transform must move to re-cover the mask. During an active
//! gesture every intermediate transform is evaluated but never clamped; the
//! user may overshoot freely and only the release triggers correction.

use crate::geometry::{Point, Rect};
use crate::matrix::Matrix;

/// Maximum zoom: the smaller visible dimension may not exceed this multiple
/// of the widget width.
pub const MAX_SCALE: f32 = 10.0;

/// The on-screen bounding box of the transformed source image.
pub fn visible_rect(m: &Matrix, image_width: f32, image_height: f32) -> Rect {
    m.map_rect(&Rect::from_size(0.0, 0.0, image_width, image_height))
}

/// Bounds policy for one widget: the fixed mask rectangle plus the widget's
/// pixel size. Rebuilt whenever the widget is resized.
#[derive(Debug, Clone, Copy)]
pub struct FramePolicy {
    pub mask: Rect,
    pub widget_width: f32,
    pub widget_height: f32,
}

impl FramePolicy {
    pub fn new(mask: Rect, widget_width: f32, widget_height: f32) -> Self {
        Self {
            mask,
            widget_width,
            widget_height,
        }
    }

    /// True when the visible image no longer fully covers the mask.
    pub fn is_out_of_frame(&self, m: &Matrix, image_width: f32, image_height: f32) -> bool {
        !visible_rect(m, image_width, image_height).contains_rect(&self.mask)
    }

    /// True when the zoom exceeds the maximum. The comparator is the widget
    /// width, not the mask or image width; see DESIGN.md.
    pub fn is_over_scale(&self, m: &Matrix, image_width: f32, image_height: f32) -> bool {
        let vis = visible_rect(m, image_width, image_height);
        vis.width().min(vis.height()) > self.widget_width * MAX_SCALE
    }

    /// Correct a translation snap-back target so it re-covers the mask with
    /// minimal displacement.
    ///
    /// Classifies which part of `from`'s visible/mask intersection is out of
    /// bounds: first the four intersection corners (a corner strictly inside
    /// the mask means the image has pulled away diagonally), then the four
    /// single-edge overflow cases in left, right, top, bottom order. The
    /// returned transform is `to` with its translation replaced by `from`'s
    /// translation plus the classified correction; when nothing classifies,
    /// `to` keeps its own translation.
    pub fn fix_translation(
        &self,
        from: &Matrix,
        to: &Matrix,
        image_width: f32,
        image_height: f32,
    ) -> Matrix {
        let vis = visible_rect(from, image_width, image_height);
        // When the rects are disjoint the intersection degenerates to the
        // visible rect itself and only the fall-back branch can apply.
        let (insert, has_insert) = match vis.intersect(&self.mask) {
            Some(r) => (r, true),
            None => (vis, false),
        };
        let mask = self.mask;

        let (from_tx, from_ty) = from.translation();
        let mut tx = from_tx;
        let mut ty = from_ty;

        let lt = Point::new(insert.left, insert.top);
        let rt = Point::new(insert.right, insert.top);
        let lb = Point::new(insert.left, insert.bottom);
        let rb = Point::new(insert.right, insert.bottom);

        if mask.contains_point_strict(lt) {
            tx += mask.left - insert.left;
            ty += mask.top - insert.top;
        } else if mask.contains_point_strict(rt) {
            tx += mask.right - insert.right;
            ty += mask.top - insert.top;
        } else if mask.contains_point_strict(lb) {
            tx += mask.left - insert.left;
            ty += mask.bottom - insert.bottom;
        } else if mask.contains_point_strict(rb) {
            tx += mask.right - insert.right;
            ty += mask.bottom - insert.bottom;
        } else if insert.left > mask.left
            && insert.left <= mask.right
            && insert.top <= mask.top
            && insert.bottom >= mask.bottom
        {
            tx += mask.left - insert.left;
        } else if has_insert
            && insert.right < mask.right
            && insert.right >= mask.left
            && insert.top <= mask.top
            && insert.bottom >= mask.bottom
        {
            tx += mask.right - insert.right;
        } else if has_insert
            && insert.top > mask.top
            && insert.top <= mask.bottom
            && insert.left <= mask.left
            && insert.right >= mask.right
        {
            ty += mask.top - insert.top;
        } else if has_insert
            && insert.bottom < mask.bottom
            && insert.bottom >= mask.top
            && insert.left <= mask.left
            && insert.right >= mask.right
        {
            ty += mask.bottom - insert.bottom;
        } else {
            let (to_tx, to_ty) = to.translation();
            tx = to_tx;
            ty = to_ty;
        }

        let mut fixed = *to;
        fixed.set_translation(tx, ty);
        fixed
    }

    /// Translation delta that centers the visible image in the widget.
    ///
    /// Per axis: a visible extent smaller than the widget is centered; one
    /// that overhangs is pulled flush when a gap opened at either side.
    pub fn center_delta(&self, m: &Matrix, image_width: f32, image_height: f32) -> (f32, f32) {
        let rect = visible_rect(m, image_width, image_height);
        let width = rect.width();
        let height = rect.height();

        let mut dx = 0.0;
        let mut dy = 0.0;

        if height < self.widget_height {
            dy = (self.widget_height - height) / 2.0 - rect.top;
        } else if rect.top > 0.0 {
            dy = -rect.top;
        } else if rect.bottom < self.widget_height {
            dy = self.widget_height - rect.bottom;
        }

        if width < self.widget_width {
            dx = (self.widget_width - width) / 2.0 - rect.left;
        } else if rect.left > 0.0 {
            dx = -rect.left;
        } else if rect.right < self.widget_width {
            dx = self.widget_width - rect.right;
        }

        (dx, dy)
    }
}
