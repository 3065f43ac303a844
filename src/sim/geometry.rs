//! Line segment primitives for wall collision
//!
//! Points are screen-space `DVec2`s with y growing downward.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: DVec2,
    pub end: DVec2,
}

impl LineSegment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Whether this segment crosses `other`
    #[inline]
    pub fn intersects(&self, other: &LineSegment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }
}

/// True when `a -> b -> c` turns counterclockwise
#[inline]
pub fn ccw(a: DVec2, b: DVec2, c: DVec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Orientation test for segments `(p1, p2)` and `(p3, p4)`
///
/// Collinear overlaps are not reported.
#[inline]
pub fn segments_intersect(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}
