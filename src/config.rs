//! Simulation configuration
//!
//! Supplied by the host at construction. Nothing here is read from globals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::control::ControlScheme;
use crate::sim::generator::required_width;

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("generate width {width} is too narrow for a {needed}-unit channel plus wall margins")]
    TooNarrow { width: f64, needed: f64 },
    #[error("ship row {ship_y} lies outside the view (height {view_height})")]
    ShipOutsideView { ship_y: f64, view_height: f64 },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Host platform, used only to pick the control tuning factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DevicePlatform {
    Ios,
    Android,
    #[default]
    Other,
}

impl DevicePlatform {
    /// Parse the platform name reported by the host ("iOS", "Android", ...)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "ios" | "iphone" | "ipad" => DevicePlatform::Ios,
            "android" => DevicePlatform::Android,
            _ => DevicePlatform::Other,
        }
    }

    /// Acceleration factor applied to slide/button steering
    pub fn device_factor(&self) -> f64 {
        match self {
            DevicePlatform::Ios => DEVICE_FACTOR_IOS,
            DevicePlatform::Android | DevicePlatform::Other => DEVICE_FACTOR_DEFAULT,
        }
    }
}

/// Everything the simulation core needs from its host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Width of the level layout canvas
    pub generate_width: f64,
    /// Length of a track segment in screen units
    pub segment_length: f64,
    /// Platform tuned steering factor
    pub device_factor: f64,
    /// Generation-to-screen horizontal scale
    pub pixel_scale: f64,
    /// Visible track height in screen units
    pub view_height: f64,
    /// Fixed screen row of the ship (measured from the top)
    pub ship_y: f64,
    /// Initial control scheme
    pub control_scheme: ControlScheme,
    /// Level seed; `None` draws a fresh layout every level
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            generate_width: GENERATE_WIDTH,
            segment_length: SEGMENT_LENGTH,
            device_factor: DEVICE_FACTOR_DEFAULT,
            pixel_scale: 1.0,
            view_height: VIEW_HEIGHT,
            ship_y: SHIP_Y,
            control_scheme: ControlScheme::Slide,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Defaults tuned for the named host platform
    pub fn for_platform(name: &str) -> Self {
        Self {
            device_factor: DevicePlatform::from_name(name).device_factor(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Scale factor that stretches the generation canvas across the screen
    pub fn pixel_scale_for_screen(&self, screen_width: f64) -> f64 {
        screen_width / self.generate_width
    }

    /// Check that the configuration can produce a playable track
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("generate_width", self.generate_width),
            ("segment_length", self.segment_length),
            ("device_factor", self.device_factor),
            ("pixel_scale", self.pixel_scale),
            ("view_height", self.view_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let needed = required_width(self.generate_width);
        if needed >= self.generate_width {
            return Err(ConfigError::TooNarrow {
                width: self.generate_width,
                needed,
            });
        }

        if !(self.ship_y >= 0.0 && self.ship_y <= self.view_height) {
            return Err(ConfigError::ShipOutsideView {
                ship_y: self.ship_y,
                view_height: self.view_height,
            });
        }

        Ok(())
    }
}
