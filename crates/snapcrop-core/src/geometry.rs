//! Screen-space geometry primitives.
//!
//! Points and rectangles used throughout the widget: the fixed mask
//! rectangle, the derived visible rectangle of the transformed image, and
//! their intersection. All coordinates are f32 screen pixels with the origin
//! at the top-left corner and y growing downward.

use serde::{Deserialize, Serialize};

/// A 2D point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point. Comparison-only, so no sqrt.
    #[inline]
    pub fn distance_sq(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Midpoint between two points.
    #[inline]
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }
}

/// An axis-aligned rectangle in screen coordinates.
///
/// Stored as edges rather than origin+size because most of the widget's
/// geometry works edge-wise (containment, overflow classification).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle from origin and size.
    pub fn from_size(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Normalize so that left <= right and top <= bottom.
    pub fn normalized(&self) -> Rect {
        Rect {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// True when the rectangle encloses no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// True when `other` lies entirely within this rectangle (edges included).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// True when `p` lies strictly inside this rectangle. Points on an edge
    /// do not count; overflow classification relies on that.
    pub fn contains_point_strict(&self, p: Point) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }

    /// Intersection with another rectangle, or `None` when disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }

    /// The four corners in candidate order: top-left, bottom-left,
    /// top-right, bottom-right. Corner selection is order-sensitive (first
    /// wins on distance ties), so this order is part of the contract.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
        ]
    }

    /// Corner closest to `target`. First corner in `corners()` order wins
    /// ties, which keeps the crop inversion deterministic.
    pub fn closest_corner(&self, target: Point) -> Point {
        let mut best = self.corners()[0];
        let mut best_d = best.distance_sq(target);
        for c in &self.corners()[1..] {
            let d = c.distance_sq(target);
            if d < best_d {
                best = *c;
                best_d = d;
            }
        }
        best
    }

    /// Corner farthest from `target`. First corner in `corners()` order wins
    /// ties.
    pub fn farthest_corner(&self, target: Point) -> Point {
        let mut best = self.corners()[0];
        let mut best_d = best.distance_sq(target);
        for c in &self.corners()[1..] {
            let d = c.distance_sq(target);
            if d > best_d {
                best = *c;
                best_d = d;
            }
        }
        best
    }
}
