//! Axis-aligned rectangles
//!
//! World space is y-up with the origin at the bottom-left of the screen,
//! so `pos` is a rectangle's bottom-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// A square of side `size` at (x, y)
    pub const fn square(x: f32, y: f32, size: f32) -> Self {
        Self::new(x, y, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True if the two rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge or corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Clamp the left edge into [min_x, max_x]
    pub fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        if self.pos.x < min_x {
            self.pos.x = min_x;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_interior() {
        let a = Rect::square(0.0, 0.0, 64.0);
        let b = Rect::square(32.0, 32.0, 64.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let bucket = Rect::square(368.0, 20.0, 64.0);

        // Drop directly left, touching bucket's left edge
        let left = Rect::square(368.0 - 64.0, 20.0, 64.0);
        assert!(!left.overlaps(&bucket));
        assert!(!bucket.overlaps(&left));

        // Drop resting on top of the bucket
        let above = Rect::square(368.0, 84.0, 64.0);
        assert!(!above.overlaps(&bucket));

        // Corner contact only
        let corner = Rect::square(432.0, 84.0, 64.0);
        assert!(!corner.overlaps(&bucket));
    }

    #[test]
    fn test_sliver_overlap_counts() {
        let bucket = Rect::square(368.0, 20.0, 64.0);
        let drop = Rect::square(368.0 - 63.5, 83.5, 64.0);
        assert!(drop.overlaps(&bucket));
    }

    #[test]
    fn test_clamp_x() {
        let mut r = Rect::square(-10.0, 0.0, 64.0);
        r.clamp_x(0.0, 736.0);
        assert_eq!(r.pos.x, 0.0);

        r.pos.x = 900.0;
        r.clamp_x(0.0, 736.0);
        assert_eq!(r.pos.x, 736.0);
    }
}
