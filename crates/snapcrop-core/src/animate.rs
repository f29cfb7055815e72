//! Snap-back animation planning.
//!
//! When a gesture ends out of bounds the live transform is animated back to
//! a legal target. The correction is either translation-only (the target
//! shares the source's scale) or scale-only (an over-zoom rejected back to
//! the gesture-start transform):
//!
//! - Translation interpolates linearly toward the fix-vector-corrected
//!   target.
//! - Scale interpolates geometrically (equal per-step ratios about the
//!   pinch midpoint) so the zoom reads as constant perceived speed.
//!
//! Either way the last frame snaps exactly to the target and finalizes the
//! widget's gesture state. All frames go through the generation-tagged
//! queue; they never mutate anything directly.

use crate::bounds::{visible_rect, FramePolicy};
use crate::geometry::Point;
use crate::matrix::Matrix;
use crate::schedule::{AnimFrame, FrameQueue};

/// Number of interpolation steps per snap-back.
pub const ANIM_STEPS: u32 = 10;

/// Delay between successive animation frames, in milliseconds.
pub const ANIM_FRAME_MS: u64 = 15;

/// Visible-rect widths closer than this are the same scale, making the
/// correction translation-only.
const WIDTH_EPSILON: f32 = 1e-3;

/// Plan the snap-back from `from` to `to` and enqueue its frames.
///
/// `pivot` is the pinch midpoint recorded at zoom start; scale-only
/// corrections contract about it. The caller owns delivery via
/// [`FrameQueue::pump`].
pub fn plan_snap_back(
    queue: &mut FrameQueue,
    policy: &FramePolicy,
    from: &Matrix,
    to: &Matrix,
    pivot: Point,
    image_width: f32,
    image_height: f32,
) {
    let from_vis = visible_rect(from, image_width, image_height);
    let to_vis = visible_rect(to, image_width, image_height);
    let translate_only = (from_vis.width() - to_vis.width()).abs() < WIDTH_EPSILON;

    if translate_only {
        let target = policy.fix_translation(from, to, image_width, image_height);
        let (from_tx, from_ty) = from.translation();
        let (to_tx, to_ty) = target.translation();
        let dx = to_tx - from_tx;
        let dy = to_ty - from_ty;

        for i in 0..ANIM_STEPS {
            let t = (i + 1) as f32 / ANIM_STEPS as f32;
            let mut m = *from;
            m.post_translate(dx * t, dy * t);
            queue.schedule(
                ANIM_FRAME_MS * i as u64,
                AnimFrame {
                    matrix: m,
                    finalize: false,
                },
            );
        }
        queue.schedule(
            ANIM_FRAME_MS * ANIM_STEPS as u64,
            AnimFrame {
                matrix: target,
                finalize: true,
            },
        );
    } else {
        let ratio = (to_vis.width() / from_vis.width()).powf(1.0 / ANIM_STEPS as f32);
        let mut m = *from;
        for i in 0..ANIM_STEPS {
            m.post_scale(ratio, ratio, pivot.x, pivot.y);
            queue.schedule(
                ANIM_FRAME_MS * i as u64,
                AnimFrame {
                    matrix: m,
                    finalize: false,
                },
            );
        }
        queue.schedule(
            ANIM_FRAME_MS * ANIM_STEPS as u64,
            AnimFrame {
                matrix: *to,
                finalize: true,
            },
        );
    }
}
