//! Animation and layout settings.
//!
//! Every field has a default, so a JSON config file only needs to mention the
//! values it changes.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8};

use serde::Deserialize;
use thiserror::Error;

/// Reasons an [`EngineConfig`] is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value}")]
    BadDuration { name: &'static str, value: f32 },
    #[error("queue_capacity must be at least 1")]
    ZeroQueue,
    #[error("gap ({gap}) must be non-negative and smaller than spacing ({spacing})")]
    BadLayout { spacing: f32, gap: f32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Seconds for one face turn.
    pub turn_duration: f32,
    /// Seconds for one whole-puzzle view nudge.
    pub view_duration: f32,
    /// Requests that may wait behind the running animation. Further requests
    /// are dropped.
    pub queue_capacity: usize,
    /// Radians per view nudge.
    pub nudge_angle: f32,
    /// Initial view rotation about the vertical axis, in radians.
    pub initial_view_yaw: f32,
    /// Distance between neighbouring slot centers.
    pub spacing: f32,
    /// Visible space between neighbouring cubies.
    pub gap: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_duration: 0.4,
            view_duration: 0.3,
            queue_capacity: 4,
            nudge_angle: FRAC_PI_8,
            initial_view_yaw: FRAC_PI_4,
            spacing: 0.40,
            gap: 0.004,
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("turn_duration", self.turn_duration),
            ("view_duration", self.view_duration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::BadDuration { name, value });
            }
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueue);
        }
        if !(0.0..self.spacing).contains(&self.gap) {
            return Err(ConfigError::BadLayout {
                spacing: self.spacing,
                gap: self.gap,
            });
        }
        Ok(())
    }
}
