//! Frame timing
//!
//! Animation frame callbacks report absolute timestamps; the simulation
//! wants the time since the previous frame.

/// Interval of the fixed timer used when no animation frame source exists
pub const FALLBACK_FRAME_MS: f64 = 17.0;

/// Converts absolute frame timestamps (ms) into elapsed time
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the previous frame; 0 on the first frame
    pub fn frame(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_ms {
            Some(last) => now_ms - last,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        elapsed
    }

    /// Forget the previous frame (after a pause between levels)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
