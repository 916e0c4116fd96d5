//! Simulation state: balls, the spawner and the container they live in

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::collision::{Circle, ContactPolicy};
use super::container::Container;
use crate::config::{ConfigError, SimConfig};
use crate::random_range;

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// RGBA
    pub color: [u8; 4],
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            color: [255, 255, 255, 255],
        }
    }

    /// True once the whole ball has left the window rectangle
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.x - self.radius > width
            || self.pos.y + self.radius < 0.0
            || self.pos.y - self.radius > height
    }
}

impl Circle for Ball {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Creates balls with random launch velocity and color from a seeded RNG
#[derive(Debug, Clone)]
pub struct BallSpawner {
    rng: Pcg32,
    spawn_point: Vec2,
    radius: f32,
    min_speed: f32,
    max_speed: f32,
}

impl BallSpawner {
    pub fn new(seed: u64, spawn_point: Vec2, radius: f32, min_speed: f32, max_speed: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spawn_point,
            radius,
            min_speed,
            max_speed,
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn spawn(&mut self, id: u32) -> Ball {
        let vel = self.random_velocity();
        let mut ball = Ball::new(id, self.spawn_point, vel, self.radius);
        ball.color = self.random_color();
        ball
    }

    /// Whether a new ball at the spawn point would crowd an existing one
    ///
    /// Requires twice the touching distance as clearance.
    pub fn is_blocked(&self, balls: &[Ball]) -> bool {
        balls.iter().any(|b| {
            let clearance = (self.radius + b.radius) * 2.0;
            self.spawn_point.distance(b.pos) < clearance
        })
    }

    fn random_velocity(&mut self) -> Vec2 {
        let angle = random_range(&mut self.rng, 0.0, TAU);
        let speed = random_range(&mut self.rng, self.min_speed, self.max_speed);
        crate::from_angle(angle, speed)
    }

    fn random_color(&mut self) -> [u8; 4] {
        [
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
            255,
        ]
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub container: Container,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    /// Balls owed to the scene, spawned one per tick when the spawn point is clear
    pub pending_respawns: u32,
    /// Total balls that left the window
    pub escaped: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub gravity: Vec2,
    pub restitution: f32,
    pub respawn_count: u32,
    pub contact_policy: ContactPolicy,
    /// Window size used for off-screen culling
    pub bounds: Vec2,
    spawner: BallSpawner,
    next_id: u32,
}

impl SimState {
    /// Build a scene from config with one ball at the spawn point
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let container = config.build_container()?;
        let spawner = BallSpawner::new(
            config.seed,
            container.center(),
            config.ball_radius,
            config.min_speed,
            config.max_speed,
        );

        let mut state = Self {
            container,
            balls: Vec::new(),
            pending_respawns: 0,
            escaped: 0,
            time_ticks: 0,
            gravity: Vec2::new(0.0, config.gravity),
            restitution: config.restitution,
            respawn_count: config.respawn_count,
            contact_policy: config.contact_policy,
            bounds: Vec2::new(config.window_width, config.window_height),
            spawner,
            next_id: 1,
        };
        state.spawn_ball();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball at the spawn point unconditionally
    pub fn spawn_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let ball = self.spawner.spawn(id);
        self.balls.push(ball);
        id
    }

    /// Remove balls outside the window and queue their replacements
    ///
    /// Returns the number of balls removed.
    pub fn cull_off_screen(&mut self) -> usize {
        let (w, h) = (self.bounds.x, self.bounds.y);
        let before = self.balls.len();
        self.balls.retain(|b| !b.is_off_screen(w, h));
        let removed = before - self.balls.len();
        if removed > 0 {
            self.escaped += removed as u64;
            let owed = (removed as u32).saturating_mul(self.respawn_count);
            self.pending_respawns = self.pending_respawns.saturating_add(owed);
            log::debug!(
                "{} ball(s) escaped, {} respawn(s) pending",
                removed,
                self.pending_respawns
            );
        }
        removed
    }

    /// Spawn at most one pending ball if the spawn point is clear
    pub fn spawn_pending(&mut self) -> Option<u32> {
        if self.pending_respawns == 0 || self.spawner.is_blocked(&self.balls) {
            return None;
        }
        self.pending_respawns -= 1;
        let id = self.spawn_ball();
        log::debug!("Spawned ball {} ({} pending)", id, self.pending_respawns);
        Some(id)
    }
}
