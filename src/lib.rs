//! Spin Cage - balls bouncing inside a rotating, gapped square
//!
//! Core modules:
//! - `sim`: Container geometry, collision detection and the step loop
//! - `config`: Data-driven simulation parameters (JSON)

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};

use glam::Vec2;
use rand::Rng;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Container rotation speed: one revolution every 10 seconds
    pub const ROTATION_SPEED_DEG: f32 = 360.0 / 10.0;

    /// Extra slack when deciding a contact point lies inside the gap span
    pub const GAP_SPAN_TOLERANCE: f32 = 0.5;
    /// Slack for the diagnostic point-in-gap test
    pub const GAP_POINT_TOLERANCE: f32 = 0.01;
    /// Lengths below this are treated as zero
    pub const DEGENERATE_EPSILON: f32 = 1e-4;

    /// Default scene (window coordinates, y grows downward)
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 800.0;
    pub const CONTAINER_SIDE: f32 = 600.0;
    pub const GAP_FRACTION: f32 = 0.25;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_MIN_SPEED: f32 = 100.0;
    pub const BALL_MAX_SPEED: f32 = 300.0;

    /// Gravity (pixels/s², +y is down)
    pub const GRAVITY: f32 = 500.0;
    pub const RESTITUTION: f32 = 0.9;
    /// Balls spawned per escaped ball
    pub const RESPAWN_COUNT: u32 = 2;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Vector of the given magnitude pointing along `theta`
#[inline]
pub fn from_angle(theta: f32, magnitude: f32) -> Vec2 {
    Vec2::new(magnitude * theta.cos(), magnitude * theta.sin())
}

/// Uniform sample from [min, max]; returns `min` for an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
