//! Simulation parameters
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Container, ContainerError, ContactPolicy, Side};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid container: {0}")]
    Container(#[from] ContainerError),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Scene and physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub window_width: f32,
    pub window_height: f32,
    /// Container center, also the ball spawn point
    pub container_center: Vec2,
    pub side_length: f32,
    /// Opening size as a fraction of the side length
    pub gap_fraction: f32,
    /// 0 = right, 1 = top, 2 = left, 3 = bottom
    pub gap_side: u8,
    pub ball_radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Bounce energy retention (0.0-1.0)
    pub restitution: f32,
    /// Balls spawned for every ball that escapes
    pub respawn_count: u32,
    pub contact_policy: ContactPolicy,
    /// RNG seed for spawn velocity and color
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            container_center: Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
            side_length: CONTAINER_SIDE,
            gap_fraction: GAP_FRACTION,
            gap_side: 0,
            ball_radius: BALL_RADIUS,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            gravity: GRAVITY,
            restitution: RESTITUTION,
            respawn_count: RESPAWN_COUNT,
            contact_policy: ContactPolicy::default(),
            seed: 0x5eed,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges, including the container parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(invalid("window size", "must be positive"));
        }
        if !self.container_center.is_finite() {
            return Err(invalid("container_center", "must be finite"));
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(invalid("ball_radius", "must be finite and positive"));
        }
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed && self.max_speed.is_finite()) {
            return Err(invalid("speed range", "need 0 <= min_speed <= max_speed"));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid("restitution", "must be within [0, 1]"));
        }
        self.build_container()?;
        Ok(())
    }

    pub fn build_container(&self) -> Result<Container, ConfigError> {
        let side = Side::try_from(self.gap_side)?;
        Ok(Container::new(
            self.container_center,
            self.side_length,
            self.gap_fraction,
            side,
        )?)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
