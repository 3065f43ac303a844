//! Game state and core simulation types

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// No level generated yet, waiting for the first tap
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Ship hit a wall
    Crashed,
    /// Reached the end of the track
    LevelComplete,
}

impl GamePhase {
    /// Label for the overlay button
    pub fn button_label(&self) -> &'static str {
        match self {
            GamePhase::Idle => "start",
            GamePhase::Running => "",
            GamePhase::Crashed => "try again",
            GamePhase::LevelComplete => "continue",
        }
    }

    /// Whether a tap on the overlay starts a level
    pub fn awaits_tap(&self) -> bool {
        !matches!(self, GamePhase::Running)
    }
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Horizontal position (generation space)
    pub x: f64,
    /// Fixed screen row
    pub y: f64,
    /// Lateral acceleration, used directly as velocity
    pub acceleration: f64,
}

impl Ship {
    /// Ship centered on the canvas
    pub fn new(generate_width: f64, y: f64) -> Self {
        Self {
            x: generate_width / 2.0,
            y,
            acceleration: 0.0,
        }
    }
}

/// Level, score and scroll progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRunState {
    /// Current level (0 before the first level and after a crash)
    pub level: u32,
    /// Raw score, may go negative
    pub score: f64,
    /// Distance scrolled along the track (screen units)
    pub scroll_top: f64,
    pub phase: GamePhase,
}

impl GameRunState {
    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

/// Overlay messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    TapToStart,
    Crashed,
    LevelUp,
}

impl Message {
    pub fn text(&self) -> &'static str {
        match self {
            Message::TapToStart => "tap to start",
            Message::Crashed => "crashed",
            Message::LevelUp => "level up",
        }
    }
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Message(Message),
    ScoreChanged { level: u32, score: u64 },
    PhaseChanged(GamePhase),
}
