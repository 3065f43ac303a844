//! Ship controls
//!
//! Input events only record intent (`desired_direction`, smoothed tilt).
//! The per-tick [`update`] turns that intent into ship motion, so event
//! handlers never touch the ship directly.

use serde::{Deserialize, Serialize};

use super::state::Ship;
use crate::consts::*;

/// Player-selectable control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// Drag horizontally anywhere on screen
    #[default]
    Slide,
    /// Steer by tilting the device
    Tilt,
    /// On-screen left/right buttons
    Buttons,
}

/// Which on-screen button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonSide {
    Left,
    Right,
}

/// Raw input from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    ButtonDown(ButtonSide),
    ButtonUp(ButtonSide),
    Accelerometer { x: f64, y: f64, z: f64 },
}

/// Slide scheme state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideState {
    pub touch_active: bool,
    pub last_x: f64,
    pub last_y: f64,
    /// Time since the last touch movement (ms)
    pub rest_ms: f64,
    pub desired_direction: f64,
}

/// Tilt scheme state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TiltState {
    pub calibrated: bool,
    /// Reading taken at calibration
    pub baseline: [f64; 3],
    /// Smoothed reading relative to the baseline
    pub smoothed: [f64; 3],
}

/// Buttons scheme state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ButtonState {
    pub left: bool,
    pub right: bool,
}

impl ButtonState {
    pub fn desired_direction(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Active scheme plus its transient state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ControlState {
    Slide(SlideState),
    Tilt(TiltState),
    Buttons(ButtonState),
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(ControlScheme::default())
    }
}

impl ControlState {
    pub fn new(scheme: ControlScheme) -> Self {
        match scheme {
            ControlScheme::Slide => ControlState::Slide(SlideState::default()),
            ControlScheme::Tilt => ControlState::Tilt(TiltState::default()),
            ControlScheme::Buttons => ControlState::Buttons(ButtonState::default()),
        }
    }

    pub fn scheme(&self) -> ControlScheme {
        match self {
            ControlState::Slide(_) => ControlScheme::Slide,
            ControlState::Tilt(_) => ControlScheme::Tilt,
            ControlState::Buttons(_) => ControlScheme::Buttons,
        }
    }

    /// Clear transient input at level start (tilt recalibrates)
    ///
    /// Held buttons survive so a button kept down through the tap stays live.
    pub fn reset(&mut self) {
        match self {
            ControlState::Buttons(_) => {}
            _ => *self = ControlState::new(self.scheme()),
        }
    }

    /// Current steering intent in [-1, 1] (always 0 for tilt)
    pub fn desired_direction(&self) -> f64 {
        match self {
            ControlState::Slide(slide) => slide.desired_direction,
            ControlState::Buttons(buttons) => buttons.desired_direction(),
            ControlState::Tilt(_) => 0.0,
        }
    }
}

/// Slide direction for a horizontal drag delta
#[inline]
pub fn slide_direction(delta_x: f64) -> f64 {
    if delta_x == 0.0 {
        return 0.0;
    }
    delta_x.signum() / (SLIDE_FULL_DELTA / delta_x.abs().min(SLIDE_FULL_DELTA))
}

/// Record an input event. Events for other schemes are ignored.
pub fn apply_input(control: &mut ControlState, event: InputEvent) {
    match (control, event) {
        (ControlState::Slide(slide), InputEvent::TouchStart { x, y }) => {
            slide.touch_active = true;
            slide.last_x = x;
            slide.last_y = y;
            slide.rest_ms = 0.0;
        }
        (ControlState::Slide(slide), InputEvent::TouchMove { x, y }) => {
            if !slide.touch_active {
                return;
            }
            slide.desired_direction = slide_direction(x - slide.last_x);
            slide.last_x = x;
            slide.last_y = y;
            slide.rest_ms = 0.0;
        }
        (ControlState::Slide(slide), InputEvent::TouchEnd) => {
            slide.touch_active = false;
            slide.desired_direction = 0.0;
        }
        (ControlState::Buttons(buttons), InputEvent::ButtonDown(side)) => match side {
            ButtonSide::Left => buttons.left = true,
            ButtonSide::Right => buttons.right = true,
        },
        (ControlState::Buttons(buttons), InputEvent::ButtonUp(side)) => match side {
            ButtonSide::Left => buttons.left = false,
            ButtonSide::Right => buttons.right = false,
        },
        (ControlState::Tilt(tilt), InputEvent::Accelerometer { x, y, z }) => {
            let sample = [x, y, z];
            if !tilt.calibrated {
                tilt.calibrated = true;
                tilt.baseline = sample;
                tilt.smoothed = [0.0; 3];
                log::debug!("Tilt calibrated at ({x:.2}, {y:.2}, {z:.2})");
                return;
            }
            for axis in 0..3 {
                let relative = sample[axis] - tilt.baseline[axis];
                tilt.smoothed[axis] =
                    TILT_SMOOTHING * tilt.smoothed[axis] + (1.0 - TILT_SMOOTHING) * relative;
            }
        }
        _ => {}
    }
}

/// Per-tick inputs the control model needs from the loop
#[derive(Debug, Clone, Copy)]
pub struct ControlFrame {
    /// Logical frames elapsed (1.0 = one 60 fps frame)
    pub dt: f64,
    /// Real time elapsed (ms)
    pub elapsed_ms: f64,
    pub device_factor: f64,
    pub generate_width: f64,
    pub pixel_scale: f64,
}

/// Integrate one tick of ship motion; returns the score delta
pub fn update(control: &mut ControlState, frame: &ControlFrame, ship: &mut Ship) -> f64 {
    match control {
        ControlState::Tilt(tilt) => {
            if !tilt.calibrated {
                return 0.0;
            }
            let middle = frame.generate_width / 2.0;
            let target = middle - tilt.smoothed[0] * TILT_SCALE / frame.pixel_scale;
            let delta = target - ship.x;
            if delta.abs() < TILT_DEAD_ZONE {
                return 0.0;
            }
            ship.x = target;
            ship.acceleration = 0.0;
            -delta.abs().floor()
        }
        ControlState::Slide(slide) => {
            if slide.touch_active {
                slide.rest_ms += frame.elapsed_ms;
                if slide.rest_ms >= SLIDE_REST_MS {
                    slide.desired_direction = 0.0;
                }
            }
            integrate(ship, slide.desired_direction, frame)
        }
        ControlState::Buttons(buttons) => integrate(ship, buttons.desired_direction(), frame),
    }
}

/// Acceleration physics shared by slide and buttons
fn integrate(ship: &mut Ship, desired: f64, frame: &ControlFrame) -> f64 {
    if desired != 0.0 {
        // Kick out of rest or reversal so steering responds immediately
        if desired > 0.0 && ship.acceleration < 1.0 {
            ship.acceleration = 1.0;
        } else if desired < 0.0 && ship.acceleration > -1.0 {
            ship.acceleration = -1.0;
        }
        ship.acceleration += desired * frame.device_factor * frame.dt;
        ship.acceleration = ship.acceleration.clamp(-MAX_ACCELERATION, MAX_ACCELERATION);
    } else {
        ship.acceleration /= ACCELERATION_DECAY;
        if ship.acceleration.abs() < ACCELERATION_SNAP {
            ship.acceleration = 0.0;
        }
    }

    ship.x += ship.acceleration * frame.dt;
    -(ship.acceleration * frame.dt).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(dt: f64) -> ControlFrame {
        ControlFrame {
            dt,
            elapsed_ms: dt * 1000.0 / NOMINAL_FPS,
            device_factor: DEVICE_FACTOR_DEFAULT,
            generate_width: GENERATE_WIDTH,
            pixel_scale: 1.0,
        }
    }

    #[test]
    fn test_slide_direction() {
        assert_eq!(slide_direction(0.0), 0.0);
        assert_eq!(slide_direction(8.0), 1.0);
        assert_eq!(slide_direction(40.0), 1.0);
        assert_eq!(slide_direction(-4.0), -0.5);
        assert_eq!(slide_direction(2.0), 0.25);
    }

    #[test]
    fn test_slide_rests_to_zero() {
        let mut control = ControlState::new(ControlScheme::Slide);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        apply_input(&mut control, InputEvent::TouchStart { x: 100.0, y: 300.0 });
        apply_input(&mut control, InputEvent::TouchMove { x: 110.0, y: 300.0 });
        assert_eq!(control.desired_direction(), 1.0);

        // One 16ms frame keeps the intent
        let f = frame(1.0);
        update(&mut control, &f, &mut ship);
        assert_eq!(control.desired_direction(), 1.0);

        // A second frame without movement passes the rest window
        update(&mut control, &f, &mut ship);
        assert_eq!(control.desired_direction(), 0.0);
    }

    #[test]
    fn test_touch_end_clears_direction() {
        let mut control = ControlState::new(ControlScheme::Slide);
        apply_input(&mut control, InputEvent::TouchStart { x: 100.0, y: 300.0 });
        apply_input(&mut control, InputEvent::TouchMove { x: 96.0, y: 300.0 });
        assert_eq!(control.desired_direction(), -0.5);
        apply_input(&mut control, InputEvent::TouchEnd);
        assert_eq!(control.desired_direction(), 0.0);
    }

    #[test]
    fn test_buttons_press_release() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Left));
        assert_eq!(control.desired_direction(), -1.0);
        apply_input(&mut control, InputEvent::ButtonUp(ButtonSide::Left));
        assert_eq!(control.desired_direction(), 0.0);
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Right));
        assert_eq!(control.desired_direction(), 1.0);

        // Touch events do nothing for the button scheme
        apply_input(&mut control, InputEvent::TouchEnd);
        assert_eq!(control.desired_direction(), 1.0);
    }

    #[test]
    fn test_held_direction_pins_acceleration() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Right));

        let f = frame(1.0);
        let mut last_x = ship.x;
        for _ in 0..100 {
            update(&mut control, &f, &mut ship);
            assert!(ship.x > last_x);
            last_x = ship.x;
        }
        assert_eq!(ship.acceleration, MAX_ACCELERATION);
    }

    #[test]
    fn test_release_decays_and_snaps() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        ship.acceleration = 9.0;

        let f = frame(1.0);
        update(&mut control, &f, &mut ship);
        assert!((ship.acceleration - 6.0).abs() < 1e-9);

        for _ in 0..20 {
            update(&mut control, &f, &mut ship);
        }
        assert_eq!(ship.acceleration, 0.0);
    }

    #[test]
    fn test_reversal_kicks() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        ship.acceleration = 5.0;
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Left));
        update(&mut control, &frame(1.0), &mut ship);
        assert!((ship.acceleration - (-1.0 - DEVICE_FACTOR_DEFAULT)).abs() < 1e-9);
    }

    #[test]
    fn test_score_penalty_follows_motion() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Right));
        let delta = update(&mut control, &frame(1.0), &mut ship);
        // acceleration 1 + 1.25 = 2.25 -> -floor(2.25)
        assert_eq!(delta, -2.0);
    }

    #[test]
    fn test_tilt_calibrates_then_steers() {
        let mut control = ControlState::new(ControlScheme::Tilt);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        let f = frame(1.0);

        // Uncalibrated: nothing moves
        assert_eq!(update(&mut control, &f, &mut ship), 0.0);

        apply_input(&mut control, InputEvent::Accelerometer { x: 0.5, y: 0.0, z: 9.8 });
        assert_eq!(update(&mut control, &f, &mut ship), 0.0);
        assert_eq!(ship.x, GENERATE_WIDTH / 2.0);

        // Tilt right of baseline by 1.0 -> smoothed 0.3 -> target 160 - 9.6
        apply_input(&mut control, InputEvent::Accelerometer { x: 1.5, y: 0.0, z: 9.8 });
        let delta = update(&mut control, &f, &mut ship);
        assert!((ship.x - (160.0 - 9.6)).abs() < 1e-9);
        assert_eq!(delta, -9.0);
    }

    #[test]
    fn test_tilt_dead_zone() {
        let mut control = ControlState::new(ControlScheme::Tilt);
        let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
        apply_input(&mut control, InputEvent::Accelerometer { x: 0.0, y: 0.0, z: 9.8 });
        // 0.3 * 0.2 * 32 = 1.92 < dead zone
        apply_input(&mut control, InputEvent::Accelerometer { x: 0.2, y: 0.0, z: 9.8 });
        update(&mut control, &frame(1.0), &mut ship);
        assert_eq!(ship.x, GENERATE_WIDTH / 2.0);
    }

    #[test]
    fn test_reset_recalibrates() {
        let mut control = ControlState::new(ControlScheme::Tilt);
        apply_input(&mut control, InputEvent::Accelerometer { x: 0.0, y: 0.0, z: 9.8 });
        control.reset();
        assert!(matches!(control, ControlState::Tilt(TiltState { calibrated: false, .. })));
    }

    #[test]
    fn test_reset_clears_touch() {
        let mut control = ControlState::new(ControlScheme::Slide);
        apply_input(&mut control, InputEvent::TouchStart { x: 100.0, y: 300.0 });
        apply_input(&mut control, InputEvent::TouchMove { x: 108.0, y: 300.0 });
        control.reset();
        assert!(matches!(control, ControlState::Slide(SlideState { touch_active: false, .. })));
        assert_eq!(control.desired_direction(), 0.0);
    }

    #[test]
    fn test_reset_keeps_held_buttons() {
        let mut control = ControlState::new(ControlScheme::Buttons);
        apply_input(&mut control, InputEvent::ButtonDown(ButtonSide::Right));
        control.reset();
        assert_eq!(control.desired_direction(), 1.0);
        apply_input(&mut control, InputEvent::ButtonUp(ButtonSide::Right));
        assert_eq!(control.desired_direction(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_acceleration_stays_clamped(
            inputs in proptest::collection::vec((-1.0f64..=1.0, 0.0f64..4.0), 1..200)
        ) {
            let mut ship = Ship::new(GENERATE_WIDTH, SHIP_Y);
            for (desired, dt) in inputs {
                let f = ControlFrame { dt, ..frame(1.0) };
                integrate(&mut ship, desired, &f);
                prop_assert!(ship.acceleration >= -MAX_ACCELERATION);
                prop_assert!(ship.acceleration <= MAX_ACCELERATION);
            }
        }
    }
}
