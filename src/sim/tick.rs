//! Fixed timestep simulation tick
//!
//! Per-step order: rotate the container, integrate balls, resolve container
//! contacts, resolve ball pairs, then cull escaped balls and respawn.

use glam::Vec2;

use super::collision::{CollisionInfo, check_ball_collision, check_container_collision_with};
use super::state::{Ball, SimState};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Per-step counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub wall_contacts: u32,
    pub ball_contacts: u32,
    pub escaped: u32,
    pub spawned: u32,
}

/// Advance the simulation by one step of `dt` seconds
pub fn tick(state: &mut SimState, dt: f32) -> TickStats {
    let mut stats = TickStats::default();
    state.time_ticks += 1;

    state.container.update(dt);

    for ball in &mut state.balls {
        ball.vel += state.gravity * dt;
        ball.pos += ball.vel * dt;
    }

    for ball in &mut state.balls {
        let info = check_container_collision_with(&*ball, &state.container, state.contact_policy);
        if info.has_collision {
            resolve_wall_contact(ball, &info, state.restitution);
            stats.wall_contacts += 1;
        }
    }

    for i in 0..state.balls.len() {
        let (head, tail) = state.balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail {
            let info = check_ball_collision(&*a, &*b);
            if info.has_collision {
                resolve_ball_contact(a, b, &info, state.restitution);
                stats.ball_contacts += 1;
            }
        }
    }

    stats.escaped = state.cull_off_screen() as u32;
    if state.spawn_pending().is_some() {
        stats.spawned = 1;
    }

    stats
}

/// Push a ball off a wall and bounce it if it is moving into the wall
///
/// The container normal points from the ball toward the wall.
pub fn resolve_wall_contact(ball: &mut Ball, info: &CollisionInfo, restitution: f32) {
    ball.pos -= info.normal * info.penetration;
    let into_wall = ball.vel.dot(info.normal);
    if into_wall > 0.0 {
        ball.vel -= (1.0 + restitution) * into_wall * info.normal;
    }
}

/// Separate two equal-mass balls and exchange the normal impulse
///
/// The normal points from `a` toward `b`.
pub fn resolve_ball_contact(a: &mut Ball, b: &mut Ball, info: &CollisionInfo, restitution: f32) {
    let half = info.normal * (info.penetration * 0.5);
    a.pos -= half;
    b.pos += half;

    let approach = (b.vel - a.vel).dot(info.normal);
    if approach < 0.0 {
        let impulse: Vec2 = info.normal * (-(1.0 + restitution) * approach * 0.5);
        a.vel -= impulse;
        b.vel += impulse;
    }
}

/// Runs whole `SIM_DT` ticks out of variable frame time
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick as many times as `frame_dt` allows, up to `MAX_SUBSTEPS`
    ///
    /// Returns the number of ticks run. Time beyond the substep cap is dropped.
    pub fn advance(&mut self, state: &mut SimState, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if self.accumulator >= SIM_DT {
            log::warn!(
                "Dropping {:.3}s of simulation time (substep cap {})",
                self.accumulator,
                MAX_SUBSTEPS
            );
            self.accumulator = 0.0;
        }
        substeps
    }
}
