//! Frame-driven simulation loop
//!
//! The host calls [`CaveSim::tick`] once per display frame with the elapsed
//! milliseconds and keeps scheduling frames while it returns `true`.

use super::collision::{Viewport, build_visible_walls, ship_motion, visible_range};
use super::control::{self, ControlFrame, ControlScheme, ControlState, InputEvent};
use super::generator::{CaveGenerator, CaveSegment};
use super::state::{GameEvent, GamePhase, GameRunState, Message, Ship};
use crate::config::SimConfig;
use crate::consts::*;

/// Logical frames for an elapsed time (1.0 = one frame at 60 fps)
#[inline]
pub fn logical_dt(elapsed_ms: f64) -> f64 {
    NOMINAL_FPS / (1000.0 / elapsed_ms)
}

/// The cave runner simulation core
#[derive(Debug, Clone)]
pub struct CaveSim {
    pub config: SimConfig,
    pub run: GameRunState,
    pub ship: Ship,
    pub control: ControlState,
    /// Current level layout, empty while idle
    pub segments: Vec<CaveSegment>,
    generator: CaveGenerator,
    events: Vec<GameEvent>,
    /// Last `(level, display score)` reported to the host
    last_score: Option<(u32, u64)>,
    stopped: bool,
}

impl CaveSim {
    /// Create an idle simulation
    ///
    /// Panics if `config` is invalid.
    pub fn new(config: SimConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid simulation config: {err}");
        }

        let generator = CaveGenerator::new(config.generate_width, config.segment_length);
        let mut sim = Self {
            ship: Ship::new(config.generate_width, config.ship_y),
            control: ControlState::new(config.control_scheme),
            run: GameRunState::default(),
            segments: Vec::new(),
            generator,
            events: Vec::new(),
            last_score: None,
            stopped: false,
            config,
        };
        sim.events.push(GameEvent::Message(Message::TapToStart));
        sim
    }

    pub fn phase(&self) -> GamePhase {
        self.run.phase
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            generate_width: self.config.generate_width,
            segment_length: self.config.segment_length,
            view_height: self.config.view_height,
            pixel_scale: self.config.pixel_scale,
        }
    }

    /// Whether the host should schedule another frame
    pub fn wants_frame(&self) -> bool {
        !self.stopped && self.run.phase == GamePhase::Running
    }

    /// Take the events produced since the last call
    ///
    /// Hosts drain once per frame. `ScoreChanged` is only queued when the
    /// level or displayed score differs from the last one queued.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// First visible segment index and the visible slice, for rendering
    pub fn visible_segments(&self) -> (usize, &[CaveSegment]) {
        if self.segments.is_empty() {
            return (0, &self.segments[..]);
        }
        let range = visible_range(self.segments.len(), self.run.scroll_top, &self.viewport());
        (range.start, &self.segments[range])
    }

    /// Segment under the ship's nose, if the track extends that far
    pub fn segment_at_ship(&self) -> Option<&CaveSegment> {
        let ahead = self.run.scroll_top + self.config.view_height - self.ship.y;
        let index = (ahead / self.config.segment_length).floor();
        if index < 0.0 {
            return None;
        }
        self.segments.get(index as usize)
    }

    /// Record a host input event
    pub fn apply_input(&mut self, event: InputEvent) {
        control::apply_input(&mut self.control, event);
    }

    /// Switch control scheme; the ship keeps its position
    pub fn set_control_scheme(&mut self, scheme: ControlScheme) {
        if self.control.scheme() != scheme {
            log::debug!("Control scheme {:?} -> {:?}", self.control.scheme(), scheme);
            self.control = ControlState::new(scheme);
            self.ship.acceleration = 0.0;
        }
    }

    /// Tap on the message overlay
    pub fn tap(&mut self) {
        if self.run.phase.awaits_tap() {
            self.start_level();
        }
    }

    /// Generate the next level and start running
    pub fn start_level(&mut self) {
        if self.run.level == 0 {
            self.run.score = 0.0;
        }
        self.run.level += 1;
        self.run.scroll_top = 0.0;
        self.ship = Ship::new(self.config.generate_width, self.config.ship_y);
        self.control.reset();
        self.stopped = false;

        let level = self.run.level;
        self.segments = match self.config.seed {
            Some(seed) => self
                .generator
                .generate_seeded(level, seed.wrapping_add(level as u64)),
            None => self.generator.generate(level),
        };
        log::info!(
            "Level {} started: {} segments, score {}",
            level,
            self.segments.len(),
            self.run.display_score()
        );

        self.set_phase(GamePhase::Running);
        self.push_score();
    }

    /// Stop driving the loop (view torn down)
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Advance one display frame; returns whether to schedule the next one
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        if !self.wants_frame() {
            return false;
        }

        let dt = logical_dt(elapsed_ms);
        if !(dt > 0.0 && dt.is_finite()) {
            log::debug!("Skipping frame with elapsed {elapsed_ms}ms");
            return true;
        }

        let level = self.run.level as f64;
        let prev_x = self.ship.x;
        let scroll_delta = (4.0 + level) * dt;
        self.run.scroll_top += scroll_delta;

        let frame = ControlFrame {
            dt,
            elapsed_ms,
            device_factor: self.config.device_factor,
            generate_width: self.config.generate_width,
            pixel_scale: self.config.pixel_scale,
        };
        self.run.score += control::update(&mut self.control, &frame, &mut self.ship);

        let viewport = self.viewport();
        let reached = (self.run.scroll_top / self.config.segment_length).floor() as usize;
        if reached > self.segments.len() {
            log::info!("Level {} complete, score {}", self.run.level, self.run.display_score());
            self.events.push(GameEvent::Message(Message::LevelUp));
            self.set_phase(GamePhase::LevelComplete);
        } else {
            let walls = build_visible_walls(&self.segments, self.run.scroll_top, &viewport);
            let motion = ship_motion(prev_x, self.ship.x, self.ship.y, scroll_delta, &viewport);
            if walls.hit(&motion) {
                log::info!(
                    "Crashed on level {} at scroll {:.0}, score {}",
                    self.run.level,
                    self.run.scroll_top,
                    self.run.display_score()
                );
                self.run.level = 0;
                self.events.push(GameEvent::Message(Message::Crashed));
                self.set_phase(GamePhase::Crashed);
            }
        }

        if self.run.phase == GamePhase::Running {
            self.run.score += level * dt;
        }
        self.push_score();

        self.wants_frame()
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.run.phase != phase {
            self.run.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    fn push_score(&mut self) {
        let current = (self.run.level, self.run.display_score());
        if self.last_score != Some(current) {
            self.last_score = Some(current);
            self.events.push(GameEvent::ScoreChanged {
                level: current.0,
                score: current.1,
            });
        }
    }
}
