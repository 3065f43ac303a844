//! Wall collision for the cave corridor
//!
//! Each tick the visible part of the track is turned into two screen-space
//! polylines (left and right wall, obstacles traced as rectangular notches)
//! and the ship's motion since the previous tick is tested against them.
//!
//! The test is discrete: a ship that moves past a whole wall edge within a
//! single tick is not caught. That matches the game's tuning and is kept.

use std::ops::Range;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::generator::CaveSegment;
use super::geometry::{LineSegment, segments_intersect};

/// Screen mapping for the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub generate_width: f64,
    pub segment_length: f64,
    pub view_height: f64,
    /// Generation-to-screen horizontal scale
    pub pixel_scale: f64,
}

impl Viewport {
    /// Screen row of segment `index` at the given scroll position
    #[inline]
    pub fn segment_y(&self, index: usize, scroll_top: f64) -> f64 {
        self.view_height - (index as f64 * self.segment_length - scroll_top)
    }

    /// Generation x to screen x
    #[inline]
    pub fn to_screen_x(&self, x: f64) -> f64 {
        x * self.pixel_scale
    }
}

/// Wall polylines for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollidingLines {
    pub left: Vec<DVec2>,
    pub right: Vec<DVec2>,
}

impl CollidingLines {
    /// Whether `motion` crosses either wall
    pub fn hit(&self, motion: &LineSegment) -> bool {
        intersects(motion, &self.left) || intersects(motion, &self.right)
    }
}

/// Indices of the segments that can touch the ship this tick
pub fn visible_range(segment_count: usize, scroll_top: f64, viewport: &Viewport) -> Range<usize> {
    let first = ((scroll_top / viewport.segment_length).floor() as i64 - 1).max(0) as usize;
    assert!(
        first <= segment_count,
        "collision window starts at segment {first} but only {segment_count} were generated"
    );
    let span = ((viewport.view_height + 2.0 * viewport.segment_length) / viewport.segment_length)
        .ceil() as usize
        + 1;
    first..(first + span).min(segment_count)
}

/// Build the wall polylines for the visible window
pub fn build_visible_walls(
    segments: &[CaveSegment],
    scroll_top: f64,
    viewport: &Viewport,
) -> CollidingLines {
    let range = visible_range(segments.len(), scroll_top, viewport);
    let mut lines = CollidingLines {
        left: Vec::with_capacity(range.len() * 3),
        right: Vec::with_capacity(range.len() * 3),
    };

    for index in range {
        let segment = &segments[index];
        let y = viewport.segment_y(index, scroll_top);

        lines
            .left
            .push(DVec2::new(viewport.to_screen_x(segment.left_offset), y));
        lines.right.push(DVec2::new(
            viewport.to_screen_x(segment.right_wall_x(viewport.generate_width)),
            y,
        ));

        // Obstacle: run out to the gap edge, then along it to the next row
        if let Some((open_start, open_end)) = segment.obstacle() {
            let y_next = y - viewport.segment_length;
            let start_x = viewport.to_screen_x(open_start);
            let end_x = viewport.to_screen_x(open_end);
            lines.left.push(DVec2::new(start_x, y));
            lines.left.push(DVec2::new(start_x, y_next));
            lines.right.push(DVec2::new(end_x, y));
            lines.right.push(DVec2::new(end_x, y_next));
        }
    }

    lines
}

/// Whether `motion` crosses any edge of `polyline`
pub fn intersects(motion: &LineSegment, polyline: &[DVec2]) -> bool {
    polyline
        .windows(2)
        .any(|edge| segments_intersect(motion.start, motion.end, edge[0], edge[1]))
}

/// The ship's path over one tick in screen space
///
/// The previous position sits `scroll_delta` lower on screen because the
/// track has moved under the ship since then.
pub fn ship_motion(
    prev_x: f64,
    x: f64,
    ship_y: f64,
    scroll_delta: f64,
    viewport: &Viewport,
) -> LineSegment {
    LineSegment::new(
        DVec2::new(viewport.to_screen_x(prev_x), ship_y + scroll_delta),
        DVec2::new(viewport.to_screen_x(x), ship_y),
    )
}
