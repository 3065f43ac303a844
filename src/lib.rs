//! Cave Runner - simulation core for an endless cave-flying game
//!
//! Core modules:
//! - `sim`: Level generation, ship controls, wall collision and the game loop
//! - `config`: Host-supplied configuration (canvas size, device tuning)
//! - `platform`: Host timing helpers (frame clock)

pub mod config;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, DevicePlatform, SimConfig};

/// Game configuration constants
pub mod consts {
    /// Width of the generation canvas (level layout space)
    pub const GENERATE_WIDTH: f64 = 320.0;
    /// Length of one track segment in screen units
    pub const SEGMENT_LENGTH: f64 = 20.0;
    /// Segments at the start of every level with no obstacles and wide walls
    pub const SAFE_SEGMENTS: usize = 30;
    /// Minimum distance between a wall and the canvas edge
    pub const WALL_MARGIN: f64 = 10.0;

    /// Default view size (screen units)
    pub const VIEW_HEIGHT: f64 = 480.0;
    /// Fixed screen row of the ship
    pub const SHIP_Y: f64 = 400.0;

    /// Ship lateral acceleration limit
    pub const MAX_ACCELERATION: f64 = 10.0;
    /// Acceleration below this snaps to zero while coasting
    pub const ACCELERATION_SNAP: f64 = 0.25;
    /// Divisor applied to acceleration each coasting tick
    pub const ACCELERATION_DECAY: f64 = 1.5;

    /// Device tuning factors
    pub const DEVICE_FACTOR_IOS: f64 = 1.75;
    pub const DEVICE_FACTOR_DEFAULT: f64 = 1.25;

    /// Drag distance (screen units) that maps to full slide direction
    pub const SLIDE_FULL_DELTA: f64 = 8.0;
    /// Slide direction drops to zero after the finger rests this long (ms)
    pub const SLIDE_REST_MS: f64 = 25.0;

    /// Tilt smoothing weight of the previous value
    pub const TILT_SMOOTHING: f64 = 0.7;
    /// Screen units per unit of tilt
    pub const TILT_SCALE: f64 = 32.0;
    /// Tilt moves smaller than this (generation units) are ignored
    pub const TILT_DEAD_ZONE: f64 = 3.0;

    /// Nominal frame rate the logical timestep is normalized to
    pub const NOMINAL_FPS: f64 = 60.0;
}
