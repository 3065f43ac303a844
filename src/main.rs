//! Cave Runner entry point
//!
//! The game itself runs inside a mobile web view. Natively this runs a
//! headless session with an autopilot on the fixed-interval timer, which is
//! handy for checking level tuning from the command line.

use cave_runner::platform::{FALLBACK_FRAME_MS, FrameClock};
use cave_runner::sim::{ButtonSide, CaveSim, ControlScheme, GameEvent, GamePhase, InputEvent};
use cave_runner::{ConfigError, SimConfig};

/// Frames to simulate before giving up
const MAX_FRAMES: u32 = 60 * 60 * 5;
/// Levels to attempt (crashes count)
const MAX_ATTEMPTS: u32 = 5;
/// Segments the autopilot looks ahead for obstacles
const LOOKAHEAD: usize = 6;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cave Runner (native) starting headless autopilot...");

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let mut sim = CaveSim::new(config);
    sim.set_control_scheme(ControlScheme::Buttons);
    run_autopilot(&mut sim);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives CaveSim directly
}

/// Config from the JSON file named on the command line, or defaults
fn load_config() -> Result<SimConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => SimConfig::from_file(&path),
        None => Ok(SimConfig::default()),
    }
}

fn run_autopilot(sim: &mut CaveSim) {
    let mut clock = FrameClock::new();
    let mut now_ms = 0.0;
    let mut attempts = 0;
    let mut held: Option<ButtonSide> = None;

    sim.tap();
    for _ in 0..MAX_FRAMES {
        let wanted = steer(sim);
        if wanted != held {
            if let Some(side) = held {
                sim.apply_input(InputEvent::ButtonUp(side));
            }
            if let Some(side) = wanted {
                sim.apply_input(InputEvent::ButtonDown(side));
            }
            held = wanted;
        }

        now_ms += FALLBACK_FRAME_MS;
        let keep_going = sim.tick(clock.frame(now_ms));

        for event in sim.drain_events() {
            match event {
                GameEvent::Message(message) => println!("> {}", message.text()),
                GameEvent::PhaseChanged(phase) => log::debug!("phase {phase:?}"),
                GameEvent::ScoreChanged { .. } => {}
            }
        }

        if !keep_going {
            match sim.phase() {
                GamePhase::Crashed | GamePhase::LevelComplete => {
                    attempts += 1;
                    println!(
                        "level {} score {} ({})",
                        sim.run.level,
                        sim.run.display_score(),
                        sim.phase().button_label()
                    );
                    if attempts >= MAX_ATTEMPTS {
                        break;
                    }
                    if let Some(side) = held.take() {
                        sim.apply_input(InputEvent::ButtonUp(side));
                    }
                    clock.reset();
                    sim.tap();
                }
                _ => break,
            }
        }
    }

    sim.stop();
    println!("final level {} score {}", sim.run.level, sim.run.display_score());
}

/// Pick a button aiming at the next obstacle gap, or the channel middle
fn steer(sim: &CaveSim) -> Option<ButtonSide> {
    let ahead = sim.run.scroll_top + sim.config.view_height - sim.ship.y;
    let index = (ahead / sim.config.segment_length).floor().max(0.0) as usize;
    let width = sim.config.generate_width;

    let target = sim
        .segments
        .iter()
        .skip(index)
        .take(LOOKAHEAD)
        .find_map(|segment| segment.obstacle())
        .map(|(start, end)| (start + end) / 2.0)
        .or_else(|| {
            sim.segment_at_ship()
                .map(|s| (s.left_offset + s.right_wall_x(width)) / 2.0)
        })?;

    // Lead by the current drift so the ship settles instead of swinging
    let predicted = sim.ship.x + sim.ship.acceleration * 3.0;
    if predicted < target - 4.0 {
        Some(ButtonSide::Right)
    } else if predicted > target + 4.0 {
        Some(ButtonSide::Left)
    } else {
        None
    }
}
