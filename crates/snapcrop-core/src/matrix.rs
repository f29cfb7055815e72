//! 2D affine transform.
//!
//! A plain value type holding the six coefficients of a 2×3 affine matrix.
//! A point `(x, y)` maps to:
//!
//! ```text
//! X = a·x + b·y + tx
//! Y = c·x + d·y + ty
//! ```
//!
//! The `post_*` mutators compose the new operation *after* the existing
//! transform, matching the "apply this additional change to the current
//! on-screen state" semantics of incremental gesture updates: for an
//! existing map M and a new operation T, the result maps points through
//! T ∘ M.

use crate::error::CropError;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Determinants below this magnitude are treated as non-invertible.
const DET_EPSILON: f32 = 1e-9;

/// A 2×3 affine transform: scale, rotation, and skew plus translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row 1, col 1 (x-scale / rotation cosine).
    pub a: f32,
    /// Row 1, col 2 (x-skew / negated rotation sine).
    pub b: f32,
    /// X translation.
    pub tx: f32,
    /// Row 2, col 1 (y-skew / rotation sine).
    pub c: f32,
    /// Row 2, col 2 (y-scale / rotation cosine).
    pub d: f32,
    /// Y translation.
    pub ty: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            tx: 0.0,
            c: 0.0,
            d: 1.0,
            ty: 0.0,
        }
    }

    /// Compose a translation after the current transform.
    pub fn post_translate(&mut self, dx: f32, dy: f32) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Compose a scale about the pivot `(px, py)` after the current
    /// transform.
    pub fn post_scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) {
        self.a *= sx;
        self.b *= sx;
        self.tx = sx * self.tx + px * (1.0 - sx);
        self.c *= sy;
        self.d *= sy;
        self.ty = sy * self.ty + py * (1.0 - sy);
    }

    /// Compose a rotation (degrees, positive = clockwise in y-down screen
    /// coordinates) about the pivot `(px, py)` after the current transform.
    pub fn post_rotate(&mut self, degrees: f32, px: f32, py: f32) {
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();

        let (a, b, tx) = (self.a, self.b, self.tx);
        let (c, d, ty) = (self.c, self.d, self.ty);

        self.a = cos * a - sin * c;
        self.b = cos * b - sin * d;
        self.tx = px + cos * (tx - px) - sin * (ty - py);
        self.c = sin * a + cos * c;
        self.d = sin * b + cos * d;
        self.ty = py + sin * (tx - px) + cos * (ty - py);
    }

    /// Map a single point through the transform.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Map a rectangle and return the axis-aligned bounding box of its four
    /// mapped corners.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|p| self.map_point(p));
        let mut left = corners[0].x;
        let mut top = corners[0].y;
        let mut right = corners[0].x;
        let mut bottom = corners[0].y;
        for p in &corners[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }
        Rect::new(left, top, right, bottom)
    }

    /// Invert the transform.
    ///
    /// Fails with [`CropError::NonInvertibleTransform`] when the determinant
    /// is numerically zero; the caller must discard the offending update.
    pub fn invert(&self) -> Result<Matrix, CropError> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < DET_EPSILON {
            return Err(CropError::NonInvertibleTransform);
        }
        let inv_det = 1.0 / det;
        Ok(Matrix {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            tx: (self.b * self.ty - self.d * self.tx) * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            ty: (self.c * self.tx - self.a * self.ty) * inv_det,
        })
    }

    /// Effective scale factors: the column norms of the linear part.
    pub fn scale_factors(&self) -> (f32, f32) {
        (
            (self.a * self.a + self.c * self.c).sqrt(),
            (self.b * self.b + self.d * self.d).sqrt(),
        )
    }

    /// The translation components.
    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.tx, self.ty)
    }

    /// Replace the translation components, keeping the linear part.
    pub fn set_translation(&mut self, tx: f32, ty: f32) {
        self.tx = tx;
        self.ty = ty;
    }
}
