//! Platform abstraction layer
//!
//! Helpers for hosts driving the simulation:
//! - Frame timing (animation frame timestamps or a fixed-interval timer)

pub mod time;

pub use time::{FALLBACK_FRAME_MS, FrameClock};
