//! Collision detection against balls and the rotating container
//!
//! The tricky part: the container's walls move every step and one of them
//! has a hole in it. A ball near a corner can overlap two walls at once, and
//! a ball sitting in the opening must not touch the gapped wall at all.
//!
//! Normal convention: for container contacts the normal points from the ball
//! center toward the wall, so a resolver pushes the ball by
//! `-normal * penetration`. For ball pairs it points from `a` toward `b`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::container::{Container, Edge, Side};
use crate::consts::{DEGENERATE_EPSILON, GAP_SPAN_TOLERANCE};

/// Read-only view of a circular body
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

#[cfg(test)]
impl Circle for (Vec2, f32) {
    fn center(&self) -> Vec2 {
        self.0
    }

    fn radius(&self) -> f32 {
        self.1
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionInfo {
    /// Whether a collision occurred
    pub has_collision: bool,
    /// Unit contact normal (see module docs for direction)
    pub normal: Vec2,
    /// Overlap depth, non-negative
    pub penetration: f32,
    /// Closest point on the touched surface
    pub point: Vec2,
    /// Wall that produced a container contact
    pub side: Option<Side>,
}

impl CollisionInfo {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// How to pick one contact when a ball overlaps several walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPolicy {
    /// Largest penetration wins; ties keep the earlier wall
    #[default]
    Deepest,
    /// Last overlapping wall in right/top/left/bottom order wins
    LastInOrder,
}

/// Check two circles for overlap
///
/// Coincident centers report no collision since no normal is defined.
pub fn check_ball_collision(a: &impl Circle, b: &impl Circle) -> CollisionInfo {
    let delta = b.center() - a.center();
    let dist_sq = delta.length_squared();
    let combined = a.radius() + b.radius();

    if dist_sq <= DEGENERATE_EPSILON || dist_sq >= combined * combined {
        return CollisionInfo::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = delta / dist;
    CollisionInfo {
        has_collision: true,
        normal,
        penetration: combined - dist,
        point: a.center() + normal * a.radius(),
        side: None,
    }
}

/// Check a ball against the container walls using [`ContactPolicy::Deepest`]
pub fn check_container_collision(ball: &impl Circle, container: &Container) -> CollisionInfo {
    check_container_collision_with(ball, container, ContactPolicy::default())
}

/// Check a ball against the container walls, picking one contact by `policy`
pub fn check_container_collision_with(
    ball: &impl Circle,
    container: &Container,
    policy: ContactPolicy,
) -> CollisionInfo {
    let gap = container.gap_boundaries();
    let mut best = CollisionInfo::miss();

    for edge in container.world_edges() {
        let Some(contact) = edge_contact(ball, &edge, container.center(), gap) else {
            continue;
        };
        let replace = match policy {
            ContactPolicy::Deepest => !best.has_collision || contact.penetration > best.penetration,
            ContactPolicy::LastInOrder => true,
        };
        if replace {
            best = contact;
        }
    }

    best
}

/// Contact between a ball and one wall, if the ball overlaps its solid part
fn edge_contact(
    ball: &impl Circle,
    edge: &Edge,
    container_center: Vec2,
    (gap_start, gap_end): (Vec2, Vec2),
) -> Option<CollisionInfo> {
    let pos = ball.center();
    let radius = ball.radius();
    let closest = edge.closest_point(pos)?;

    if edge.has_gap {
        let gap_len = gap_start.distance(gap_end);
        let along = closest.distance(gap_start) + closest.distance(gap_end);
        if along <= gap_len + GAP_SPAN_TOLERANCE {
            return None;
        }
    }

    let dist = pos.distance(closest);
    if dist >= radius {
        return None;
    }

    let normal = if dist > DEGENERATE_EPSILON {
        (closest - pos) / dist
    } else {
        outward_perpendicular(edge, container_center)?
    };

    Some(CollisionInfo {
        has_collision: true,
        normal,
        penetration: radius - dist,
        point: closest,
        side: Some(edge.side),
    })
}

/// Edge perpendicular oriented away from the container center
fn outward_perpendicular(edge: &Edge, container_center: Vec2) -> Option<Vec2> {
    let perp = edge.direction()?.perp();
    let outward = edge.midpoint() - container_center;
    Some(if perp.dot(outward) < 0.0 { -perp } else { perp })
}
