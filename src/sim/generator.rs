//! Procedural cave generation
//!
//! A level is a table of segments, one per `segment_length` of track. Each
//! segment records how far the left and right walls sit from the canvas
//! edges, plus an optional breakable obstacle wall with a gap in it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One along-track sample of the corridor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaveSegment {
    /// Distance from the canvas left edge to the left wall
    pub left_offset: f64,
    /// Distance from the canvas right edge to the right wall
    pub right_offset: f64,
    /// Obstacle gap start (generation x), `None` when no obstacle
    pub wall_open_start: Option<f64>,
    /// Obstacle gap end (generation x)
    pub wall_open_end: Option<f64>,
}

impl CaveSegment {
    /// Segment without an obstacle
    pub fn open(left_offset: f64, right_offset: f64) -> Self {
        Self {
            left_offset,
            right_offset,
            wall_open_start: None,
            wall_open_end: None,
        }
    }

    /// Distance between the walls
    #[inline]
    pub fn channel_width(&self, generate_width: f64) -> f64 {
        generate_width - self.left_offset - self.right_offset
    }

    /// Generation x of the right wall
    #[inline]
    pub fn right_wall_x(&self, generate_width: f64) -> f64 {
        generate_width - self.right_offset
    }

    /// Obstacle gap as `(start, end)` when the segment has one
    pub fn obstacle(&self) -> Option<(f64, f64)> {
        match (self.wall_open_start, self.wall_open_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Difficulty parameters derived from the level number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Maximum lateral wander per segment
    pub rnd_width: f64,
    /// Nominal corridor width
    pub channel_width: f64,
    /// Probability that an eligible segment stays free of obstacles
    pub wall_chance: f64,
    /// Obstacle-eligible segment stride
    pub wall_every: usize,
    /// Segments generated after the safe run-up
    pub segment_count: usize,
}

impl LevelParams {
    pub fn for_level(level: u32, generate_width: f64) -> Self {
        let level_f = level as f64;
        Self {
            rnd_width: ((generate_width / 10.0).floor() + level_f * 10.0).min(150.0),
            channel_width: ((generate_width / 1.85).floor() - level_f * 16.0).max(30.0),
            wall_chance: (0.5 - level_f / 12.0).max(0.15),
            wall_every: (30.0 - level_f / 2.0).floor().max(5.0) as usize,
            segment_count: (600.0 + 125.0 * level_f).floor() as usize,
        }
    }

    /// Narrowest channel the generator allows
    #[inline]
    pub fn min_channel(&self) -> f64 {
        self.channel_width / 1.25
    }

    /// Widest channel the generator allows
    #[inline]
    pub fn max_channel(&self) -> f64 {
        self.channel_width * 1.25
    }

    /// Width of an obstacle's gap
    #[inline]
    pub fn opening_width(&self) -> f64 {
        self.channel_width / 1.35
    }

    /// Total segments in the level, safe run-up included
    #[inline]
    pub fn total_segments(&self) -> usize {
        SAFE_SEGMENTS + self.segment_count
    }
}

/// Canvas width needed to hold the widest channel plus both wall margins
///
/// Level 1 has the widest channel; later levels only narrow it.
pub fn required_width(generate_width: f64) -> f64 {
    LevelParams::for_level(1, generate_width).max_channel() + 2.0 * WALL_MARGIN
}

/// Level generator for a fixed canvas
#[derive(Debug, Clone, Copy)]
pub struct CaveGenerator {
    pub generate_width: f64,
    pub segment_length: f64,
}

impl Default for CaveGenerator {
    fn default() -> Self {
        Self::new(GENERATE_WIDTH, SEGMENT_LENGTH)
    }
}

impl CaveGenerator {
    pub fn new(generate_width: f64, segment_length: f64) -> Self {
        assert!(
            generate_width.is_finite() && generate_width > 0.0,
            "generate width must be positive, got {generate_width}"
        );
        assert!(
            segment_length.is_finite() && segment_length > 0.0,
            "segment length must be positive, got {segment_length}"
        );
        let needed = required_width(generate_width);
        assert!(
            needed < generate_width,
            "generate width {generate_width} is too narrow, needs more than {needed}"
        );
        Self {
            generate_width,
            segment_length,
        }
    }

    /// Generate a level with the given RNG
    pub fn generate_with<R: Rng>(&self, level: u32, rng: &mut R) -> Vec<CaveSegment> {
        let width = self.generate_width;
        let params = LevelParams::for_level(level, width);

        let mut segments = Vec::with_capacity(params.total_segments());
        let safe = width / 5.0;
        segments.extend((0..SAFE_SEGMENTS).map(|_| CaveSegment::open(safe, safe)));

        let min_channel = params.min_channel();
        let max_channel = params.max_channel();
        let left_max = (width - WALL_MARGIN - min_channel).max(WALL_MARGIN);
        let max_bias = self.segment_length / 2.0;

        let mut last_left = safe;
        let mut last_right = safe;
        let mut bias = 0.0;

        for i in 0..params.segment_count {
            let index = SAFE_SEGMENTS + i;

            let mut left = last_left + (rng.random::<f64>() - 0.5) * params.rnd_width + bias;
            let mut right = last_right + (rng.random::<f64>() - 0.5) * params.rnd_width - bias;

            // Corridor hugging a side: push it back toward the middle
            if left < WALL_MARGIN {
                left = WALL_MARGIN;
                bias = rng.random::<f64>() * max_bias;
            } else if left > left_max {
                left = left_max;
                bias = -rng.random::<f64>() * max_bias;
            }

            let channel = (width - left - right).clamp(min_channel, max_channel);
            right = width - left - channel;
            if right < WALL_MARGIN {
                right = WALL_MARGIN;
                bias = -rng.random::<f64>() * max_bias;
            }

            let mut segment = CaveSegment::open(left, right);

            if index > SAFE_SEGMENTS
                && index % params.wall_every == 0
                && rng.random::<f64>() > params.wall_chance
            {
                let opening = params.opening_width();
                let room = segment.channel_width(width) - opening;
                let start = left + room * rng.random_range(0.1..0.9);
                segment.wall_open_start = Some(start);
                segment.wall_open_end = Some(start + opening);
            }

            segments.push(segment);
            last_left = left;
            last_right = right;
        }

        log::debug!(
            "Generated level {}: {} segments, channel {}, wall every {}",
            level,
            segments.len(),
            params.channel_width,
            params.wall_every
        );

        segments
    }

    /// Generate a reproducible level
    pub fn generate_seeded(&self, level: u32, seed: u64) -> Vec<CaveSegment> {
        let mut rng = Pcg32::seed_from_u64(seed);
        self.generate_with(level, &mut rng)
    }

    /// Generate a fresh level from the thread RNG
    pub fn generate(&self, level: u32) -> Vec<CaveSegment> {
        let mut rng = Pcg32::from_rng(&mut rand::rng());
        self.generate_with(level, &mut rng)
    }
}

/// Generate a fresh (unseeded) level for the given canvas width
pub fn generate(level: u32, generate_width: f64) -> Vec<CaveSegment> {
    CaveGenerator::new(generate_width, SEGMENT_LENGTH).generate(level)
}

/// Generate a reproducible level for the given canvas width
pub fn generate_seeded(level: u32, generate_width: f64, seed: u64) -> Vec<CaveSegment> {
    CaveGenerator::new(generate_width, SEGMENT_LENGTH).generate_seeded(level, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one_shape() {
        let segments = generate(1, 320.0);
        assert_eq!(segments.len(), 30 + 725);
        for segment in &segments[..SAFE_SEGMENTS] {
            assert_eq!(segment.left_offset, 64.0);
            assert_eq!(segment.right_offset, 64.0);
            assert!(segment.obstacle().is_none());
        }
    }

    #[test]
    fn test_level_params() {
        let params = LevelParams::for_level(1, 320.0);
        assert_eq!(params.rnd_width, 42.0);
        assert_eq!(params.channel_width, 156.0);
        assert!((params.wall_chance - (0.5 - 1.0 / 12.0)).abs() < 1e-12);
        assert_eq!(params.wall_every, 29);
        assert_eq!(params.segment_count, 725);

        let hard = LevelParams::for_level(50, 320.0);
        assert_eq!(hard.rnd_width, 150.0);
        assert_eq!(hard.channel_width, 30.0);
        assert_eq!(hard.wall_chance, 0.15);
        assert_eq!(hard.wall_every, 5);
    }

    #[test]
    fn test_first_generated_segment_channel() {
        let segments = generate_seeded(1, 320.0, 42);
        let params = LevelParams::for_level(1, 320.0);
        let channel = segments[SAFE_SEGMENTS + 1].channel_width(320.0);
        assert!(channel >= params.min_channel() - 1e-9);
        assert!(channel <= params.max_channel() + 1e-9);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_seeded(4, 320.0, 1234);
        let b = generate_seeded(4, 320.0, 1234);
        let c = generate_seeded(4, 320.0, 4321);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_obstacles_only_on_stride() {
        let params = LevelParams::for_level(6, 320.0);
        let segments = generate_seeded(6, 320.0, 99);
        for (index, segment) in segments.iter().enumerate() {
            if segment.obstacle().is_some() {
                assert!(index > SAFE_SEGMENTS);
                assert_eq!(index % params.wall_every, 0);
            }
        }
        assert!(segments.iter().any(|s| s.obstacle().is_some()));
    }

    #[test]
    #[should_panic]
    fn test_rejects_non_positive_width() {
        generate(1, 0.0);
    }

    #[test]
    #[should_panic(expected = "too narrow")]
    fn test_rejects_width_too_narrow_for_channel() {
        generate_seeded(1, 40.0, 7);
    }

    #[test]
    fn test_required_width() {
        // 156 * 1.25 + 2 * 10
        assert_eq!(required_width(320.0), 215.0);
        assert!(required_width(40.0) > 40.0);
    }

    proptest! {
        #[test]
        fn prop_generator_bounds(level in 1u32..=50, seed in any::<u64>()) {
            let width = 320.0;
            let params = LevelParams::for_level(level, width);
            let segments = generate_seeded(level, width, seed);

            prop_assert_eq!(segments.len(), 30 + (600.0 + 125.0 * level as f64).floor() as usize);

            for segment in &segments[SAFE_SEGMENTS..] {
                prop_assert!(segment.left_offset >= WALL_MARGIN);
                prop_assert!(segment.right_offset >= WALL_MARGIN);
                let channel = segment.channel_width(width);
                prop_assert!(channel >= params.channel_width * 0.75);
                prop_assert!(channel <= params.channel_width * 1.35);

                if let Some((start, end)) = segment.obstacle() {
                    prop_assert!(end > start);
                    prop_assert!(start > segment.left_offset);
                    prop_assert!(end < segment.right_wall_x(width));
                }
            }
        }
    }
}
