//! Deterministic simulation module
//!
//! Geometry and collision queries are pure functions of their inputs; the
//! only state mutated per step is the container rotation and the balls.
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod container;
pub mod state;
pub mod tick;

pub use collision::{
    Circle, CollisionInfo, ContactPolicy, check_ball_collision, check_container_collision,
    check_container_collision_with,
};
pub use container::{Container, ContainerError, Edge, Side};
pub use state::{Ball, BallSpawner, SimState};
pub use tick::{FixedStep, TickStats, tick};
