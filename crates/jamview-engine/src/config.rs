//! Playback configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use jamview_core::constants::{DEFAULT_SPEED, DEFAULT_TRAIL_WINDOW, MAX_SPEED, MIN_SPEED};
use jamview_core::error::ConfigError;

/// Configuration for a playback session. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Positions kept per trail.
    pub trail_window: usize,
    /// Speed multiplier bounds; requests outside are clamped.
    pub min_speed: f64,
    pub max_speed: f64,
    /// Speed multiplier at startup.
    pub initial_speed: f64,
    pub show_links: bool,
    pub show_trails: bool,
    /// Carry sub-step progress across frames instead of dropping it.
    pub carry_fraction: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            trail_window: DEFAULT_TRAIL_WINDOW,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            initial_speed: DEFAULT_SPEED,
            show_links: true,
            show_trails: true,
            carry_fraction: true,
        }
    }
}

impl PlaybackConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PlaybackConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trail_window == 0 {
            return Err(ConfigError::Invalid("trail_window must be at least 1".into()));
        }
        if !(self.min_speed.is_finite() && self.max_speed.is_finite()) {
            return Err(ConfigError::Invalid("speed bounds must be finite".into()));
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            return Err(ConfigError::Invalid(format!(
                "speed bounds must satisfy 0 < min <= max, got {}..{}",
                self.min_speed, self.max_speed
            )));
        }
        if !self.initial_speed.is_finite() {
            return Err(ConfigError::Invalid("initial_speed must be finite".into()));
        }
        Ok(())
    }

    /// Replace every invalid value with its default, warning about each one.
    ///
    /// The result always passes [`PlaybackConfig::validate`].
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.trail_window == 0 {
            tracing::warn!("trail_window 0 replaced by {}", defaults.trail_window);
            self.trail_window = defaults.trail_window;
        }
        let bounds_ok = self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed > 0.0
            && self.min_speed <= self.max_speed;
        if !bounds_ok {
            tracing::warn!(
                min = self.min_speed,
                max = self.max_speed,
                "invalid speed bounds replaced by defaults"
            );
            self.min_speed = defaults.min_speed;
            self.max_speed = defaults.max_speed;
        }
        if !self.initial_speed.is_finite() {
            tracing::warn!(speed = self.initial_speed, "ignoring non-finite initial_speed");
            self.initial_speed = defaults.initial_speed;
        }
        self
    }

    /// Clamp a requested speed into the configured bounds.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.max(self.min_speed).min(self.max_speed)
    }
}
