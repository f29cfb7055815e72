//! Multi-touch gesture interpretation.
//!
//! Consumes pointer down/move/up samples and turns them into candidate
//! transforms. The state machine has three phases:
//!
//! - `Idle`: no pointer engaged
//! - `Drag`: one pointer panning the image
//! - `Zoom`: two pointers pinching about their midpoint
//!
//! Every move sample rebuilds the candidate transform from the snapshot
//! taken at gesture start, so the live transform never accumulates drift
//! across samples. Pinch samples with the fingers closer than
//! [`MIN_POINTER_SPACING`] are ignored: near-coincident fingers would
//! amplify jitter through the distance ratio.

use crate::geometry::Point;
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Minimum inter-pointer distance (px) for a pinch sample to count.
pub const MIN_POINTER_SPACING: f32 = 10.0;

/// The kind of a pointer event sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// One touch point within an event sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One input sample: the event kind plus the currently-down pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pointers: Vec<Pointer>,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pointers: Vec<Pointer>) -> Self {
        Self { kind, pointers }
    }
}

/// Current gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Drag,
    Zoom,
}

/// Distance between the first two pointers of a sample.
fn spacing(pointers: &[Pointer]) -> f32 {
    pointers[0].position().distance(pointers[1].position())
}

/// Interprets pointer samples into candidate transforms.
///
/// The tracker holds two transform snapshots: `saved` (the live transform
/// at gesture start, the base every move sample rebuilds from) and
/// `last_legal` (the most recent candidate observed to satisfy the frame
/// bounds, the snap-back target after an out-of-frame release).
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
    start: Point,
    pinch_mid: Point,
    pinch_start_dist: f32,
    saved: Matrix,
    last_legal: Matrix,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Transform at gesture start.
    pub fn saved(&self) -> &Matrix {
        &self.saved
    }

    /// Most recent in-bounds candidate.
    pub fn last_legal(&self) -> &Matrix {
        &self.last_legal
    }

    /// Pinch midpoint recorded when the zoom began. Also the pivot for the
    /// zoom snap-back animation.
    pub fn pinch_mid(&self) -> Point {
        self.pinch_mid
    }

    /// Feed a pointer-down sample.
    ///
    /// The first pointer arms a drag; a second pointer upgrades to a pinch
    /// iff the fingers are far enough apart. A degenerate second pointer
    /// leaves the current phase untouched.
    pub fn pointer_down(&mut self, current: &Matrix, pointers: &[Pointer]) {
        match pointers.len() {
            0 => {}
            1 => {
                self.saved = *current;
                self.last_legal = *current;
                self.start = pointers[0].position();
                self.phase = GesturePhase::Drag;
            }
            _ => {
                let dist = spacing(pointers);
                if dist > MIN_POINTER_SPACING {
                    self.saved = *current;
                    self.pinch_start_dist = dist;
                    self.pinch_mid =
                        Point::midpoint(pointers[0].position(), pointers[1].position());
                    self.phase = GesturePhase::Zoom;
                }
            }
        }
    }

    /// Feed a move sample and produce the candidate transform, rebuilt from
    /// the gesture-start snapshot. Returns `None` while idle, on a
    /// degenerate pinch sample, or when the sample carries too few
    /// pointers for the current phase.
    pub fn pointer_move(&self, pointers: &[Pointer]) -> Option<Matrix> {
        match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Drag => {
                let p = pointers.first()?.position();
                let mut m = self.saved;
                m.post_translate(p.x - self.start.x, p.y - self.start.y);
                Some(m)
            }
            GesturePhase::Zoom => {
                if pointers.len() < 2 {
                    return None;
                }
                let dist = spacing(pointers);
                if dist <= MIN_POINTER_SPACING {
                    return None;
                }
                let scale = dist / self.pinch_start_dist;
                let mut m = self.saved;
                m.post_scale(scale, scale, self.pinch_mid.x, self.pinch_mid.y);
                Some(m)
            }
        }
    }

    /// Any pointer lift ends the gesture; bounds enforcement happens at
    /// this point, driven by the widget.
    pub fn pointer_up(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    /// Record a candidate that passed the frame-bounds check.
    pub fn record_legal(&mut self, m: &Matrix) {
        self.last_legal = *m;
    }

    /// Adopt the final transform of a completed snap-back: both snapshots
    /// collapse onto it and the phase returns to idle.
    pub fn finalize(&mut self, m: &Matrix) {
        self.saved = *m;
        self.last_legal = *m;
        self.phase = GesturePhase::Idle;
    }

    /// Forget all gesture state (image load, dispose).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ptr(id: u32, x: f32, y: f32) -> Pointer {
        Pointer { id, x, y }
    }

    #[test]
    fn test_first_down_arms_drag() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 10.0, 10.0)]);
        assert_eq!(t.phase(), GesturePhase::Drag);
    }

    #[test]
    fn test_drag_translates_from_start() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 10.0, 10.0)]);

        let m = t.pointer_move(&[ptr(0, 25.0, 40.0)]).unwrap();
        assert_eq!(m.translation(), (15.0, 30.0));

        // Each sample rebuilds from the start snapshot, not the last one.
        let m = t.pointer_move(&[ptr(0, 12.0, 11.0)]).unwrap();
        assert_eq!(m.translation(), (2.0, 1.0));
    }

    #[test]
    fn test_second_pointer_upgrades_to_zoom() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 0.0, 0.0)]);
        t.pointer_down(
            &Matrix::identity(),
            &[ptr(0, 0.0, 0.0), ptr(1, 100.0, 0.0)],
        );
        assert_eq!(t.phase(), GesturePhase::Zoom);
        assert_eq!(t.pinch_mid(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_degenerate_pinch_keeps_drag() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 0.0, 0.0)]);
        // 5 px apart: below the 10 px floor, mode must not change.
        t.pointer_down(&Matrix::identity(), &[ptr(0, 0.0, 0.0), ptr(1, 5.0, 0.0)]);
        assert_eq!(t.phase(), GesturePhase::Drag);
    }

    #[test]
    fn test_zoom_scales_about_midpoint() {
        let mut t = GestureTracker::new();
        let m0 = Matrix::identity();
        t.pointer_down(&m0, &[ptr(0, 0.0, 0.0)]);
        t.pointer_down(&m0, &[ptr(0, 0.0, 100.0), ptr(1, 0.0, 200.0)]);

        // Fingers spread from 100 px to 200 px: 2x zoom about (0, 150).
        let m = t.pointer_move(&[ptr(0, 0.0, 100.0), ptr(1, 0.0, 300.0)]).unwrap();
        let (sx, sy) = m.scale_factors();
        assert!((sx - 2.0).abs() < 1e-4);
        assert!((sy - 2.0).abs() < 1e-4);
        let mid = m.map_point(Point::new(0.0, 150.0));
        assert!((mid.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_zoom_sample_ignored() {
        let mut t = GestureTracker::new();
        let m0 = Matrix::identity();
        t.pointer_down(&m0, &[ptr(0, 0.0, 0.0)]);
        t.pointer_down(&m0, &[ptr(0, 0.0, 0.0), ptr(1, 50.0, 0.0)]);
        assert_eq!(t.phase(), GesturePhase::Zoom);
        // Fingers collapsed below the floor: sample yields nothing, phase
        // persists.
        assert!(t.pointer_move(&[ptr(0, 0.0, 0.0), ptr(1, 4.0, 0.0)]).is_none());
        assert_eq!(t.phase(), GesturePhase::Zoom);
    }

    #[test]
    fn test_pointer_up_returns_to_idle() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 0.0, 0.0)]);
        t.pointer_up();
        assert_eq!(t.phase(), GesturePhase::Idle);
        assert!(t.pointer_move(&[ptr(0, 1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_record_legal_updates_snapshot() {
        let mut t = GestureTracker::new();
        t.pointer_down(&Matrix::identity(), &[ptr(0, 0.0, 0.0)]);
        let mut m = Matrix::identity();
        m.post_translate(7.0, 8.0);
        t.record_legal(&m);
        assert_eq!(t.last_legal().translation(), (7.0, 8.0));
    }
}
