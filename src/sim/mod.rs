//! Cave runner simulation
//!
//! Everything gameplay-related lives here and is free of rendering or
//! platform dependencies:
//! - `generator`: level layout
//! - `control`: input schemes and ship physics
//! - `collision`: wall polylines and the motion test
//! - `tick`: the frame loop and game state machine

pub mod collision;
pub mod control;
pub mod generator;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{CollidingLines, Viewport, build_visible_walls, intersects};
pub use control::{ButtonSide, ControlScheme, ControlState, InputEvent, apply_input};
pub use generator::{CaveGenerator, CaveSegment, LevelParams, generate, generate_seeded, required_width};
pub use geometry::{LineSegment, ccw, segments_intersect};
pub use state::{GameEvent, GamePhase, GameRunState, Message, Ship};
pub use tick::{CaveSim, logical_dt};
