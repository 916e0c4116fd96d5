//! Rotating square container geometry
//!
//! The container is a square centered on `center` that spins at a constant
//! rate. One side (fixed for the container's lifetime) has an opening
//! centered on it, sized as a fraction of the side length.
//!
//! Local side layout before rotation (y up):
//! - corners: 0 = bottom-right, 1 = top-right, 2 = top-left, 3 = bottom-left
//! - edge i runs from corner i to corner (i + 1) % 4, so edge 0 is the right
//!   side, 1 the top, 2 the left and 3 the bottom

use glam::Vec2;
use thiserror::Error;

use crate::consts::{DEGENERATE_EPSILON, GAP_POINT_TOLERANCE, ROTATION_SPEED_DEG};
use crate::wrap_angle;

/// Invalid container parameters (caller programming errors)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContainerError {
    #[error("side length must be finite and positive, got {0}")]
    InvalidSideLength(f32),
    #[error("gap fraction must be within [0, 1], got {0}")]
    InvalidGapFraction(f32),
    #[error("gap side index must be in 0..=3, got {0}")]
    InvalidGapSide(u8),
}

/// A side of the square in local (unrotated) space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Right,
    Top,
    Left,
    Bottom,
}

impl Side {
    /// Sides in edge order
    pub const ALL: [Side; 4] = [Side::Right, Side::Top, Side::Left, Side::Bottom];

    /// Local side index (0..=3)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Right => 0,
            Side::Top => 1,
            Side::Left => 2,
            Side::Bottom => 3,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = ContainerError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Side::ALL
            .get(index as usize)
            .copied()
            .ok_or(ContainerError::InvalidGapSide(index))
    }
}

/// A directed wall segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
    /// Local side this edge came from
    pub side: Side,
    /// Whether this edge carries the opening
    pub has_gap: bool,
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, `None` for a degenerate edge
    #[inline]
    pub fn direction(&self) -> Option<Vec2> {
        let v = self.end - self.start;
        if v.length() < DEGENERATE_EPSILON {
            return None;
        }
        Some(v / v.length())
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Closest point on the finite segment to `p`, `None` for a degenerate edge
    pub fn closest_point(&self, p: Vec2) -> Option<Vec2> {
        let dir = self.direction()?;
        let t = (p - self.start).dot(dir).clamp(0.0, self.length());
        Some(self.start + dir * t)
    }
}

/// The rotating square with one gapped side
#[derive(Debug, Clone)]
pub struct Container {
    center: Vec2,
    side_length: f32,
    /// Gap size as a fraction of the side length (0.0-1.0)
    gap_fraction: f32,
    gap_side: Side,
    /// Degrees per second
    rotation_speed: f32,
    /// Current rotation in radians, kept in [0, 2π)
    angle: f32,
}

impl Container {
    pub fn new(
        center: Vec2,
        side_length: f32,
        gap_fraction: f32,
        gap_side: Side,
    ) -> Result<Self, ContainerError> {
        validate_side_length(side_length)?;
        validate_gap_fraction(gap_fraction)?;
        Ok(Self {
            center,
            side_length,
            gap_fraction,
            gap_side,
            rotation_speed: ROTATION_SPEED_DEG,
            angle: 0.0,
        })
    }

    /// Advance the rotation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let delta = (self.rotation_speed * dt).to_radians();
        self.angle = wrap_angle(self.angle + delta);
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn side_length(&self) -> f32 {
        self.side_length
    }

    /// Current rotation (radians, [0, 2π))
    pub fn rotation(&self) -> f32 {
        self.angle
    }

    /// Rotation speed in degrees per second
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn gap_fraction(&self) -> f32 {
        self.gap_fraction
    }

    pub fn gap_side(&self) -> Side {
        self.gap_side
    }

    /// Change the side length; takes effect on the next geometry query
    pub fn set_side_length(&mut self, side_length: f32) -> Result<(), ContainerError> {
        validate_side_length(side_length)?;
        self.side_length = side_length;
        Ok(())
    }

    /// Change the gap size; takes effect on the next geometry query
    pub fn set_gap_fraction(&mut self, gap_fraction: f32) -> Result<(), ContainerError> {
        validate_gap_fraction(gap_fraction)?;
        self.gap_fraction = gap_fraction;
        Ok(())
    }

    /// Corners in world space: bottom-right, top-right, top-left, bottom-left
    pub fn world_corners(&self) -> [Vec2; 4] {
        let h = self.side_length / 2.0;
        let rot = Vec2::from_angle(self.angle);
        [
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
            Vec2::new(-h, -h),
        ]
        .map(|local| self.center + rot.rotate(local))
    }

    /// Edges in world space, in right/top/left/bottom order
    pub fn world_edges(&self) -> [Edge; 4] {
        let corners = self.world_corners();
        Side::ALL.map(|side| {
            let i = side.index();
            Edge {
                start: corners[i],
                end: corners[(i + 1) % 4],
                side,
                has_gap: side == self.gap_side,
            }
        })
    }

    /// World-space endpoints of the opening on the gap edge
    ///
    /// The opening spans `gap_fraction * edge_length` and is centered on the
    /// edge midpoint. Returned in the gap edge's start-to-end direction.
    pub fn gap_boundaries(&self) -> (Vec2, Vec2) {
        let edge = self.world_edges()[self.gap_side.index()];
        let (from, to) = self.gap_span(&edge);
        let dir = edge.direction().unwrap_or(Vec2::ZERO);
        (edge.start + dir * from, edge.start + dir * to)
    }

    /// Whether `point` lies strictly inside the rotated square
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = Vec2::from_angle(-self.angle).rotate(point - self.center);
        let h = self.side_length / 2.0;
        local.x.abs() < h && local.y.abs() < h
    }

    /// Whether `point` projects onto the open part of the gap edge
    pub fn is_point_in_gap(&self, point: Vec2) -> bool {
        let edge = self.world_edges()[self.gap_side.index()];
        let Some(dir) = edge.direction() else {
            return false;
        };
        let (from, to) = self.gap_span(&edge);
        let t = (point - edge.start).dot(dir);
        t >= from - GAP_POINT_TOLERANCE && t <= to + GAP_POINT_TOLERANCE
    }

    /// Distances along `edge` (from its start) where the opening begins and ends
    fn gap_span(&self, edge: &Edge) -> (f32, f32) {
        let len = edge.length();
        let gap = len * self.gap_fraction;
        let from = (len - gap) / 2.0;
        (from, from + gap)
    }
}

fn validate_side_length(side_length: f32) -> Result<(), ContainerError> {
    if side_length.is_finite() && side_length > 0.0 {
        Ok(())
    } else {
        Err(ContainerError::InvalidSideLength(side_length))
    }
}

fn validate_gap_fraction(gap_fraction: f32) -> Result<(), ContainerError> {
    if (0.0..=1.0).contains(&gap_fraction) {
        Ok(())
    } else {
        Err(ContainerError::InvalidGapFraction(gap_fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{SQRT_2, TAU};

    fn square() -> Container {
        Container::new(Vec2::ZERO, 600.0, 0.25, Side::Right).unwrap()
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert_eq!(
            Container::new(Vec2::ZERO, -1.0, 0.25, Side::Right).unwrap_err(),
            ContainerError::InvalidSideLength(-1.0)
        );
        assert!(Container::new(Vec2::ZERO, 0.0, 0.25, Side::Right).is_err());
        assert!(Container::new(Vec2::ZERO, f32::NAN, 0.25, Side::Right).is_err());
        assert!(Container::new(Vec2::ZERO, 600.0, 1.5, Side::Right).is_err());
        assert!(Container::new(Vec2::ZERO, 600.0, -0.1, Side::Right).is_err());
        assert_eq!(Side::try_from(4), Err(ContainerError::InvalidGapSide(4)));
        assert_eq!(Side::try_from(2), Ok(Side::Left));
    }

    #[test]
    fn test_corners_axis_aligned_at_zero() {
        let c = Container::new(Vec2::new(400.0, 300.0), 600.0, 0.25, Side::Right).unwrap();
        let corners = c.world_corners();
        assert!(approx(corners[0], Vec2::new(700.0, 0.0)));
        assert!(approx(corners[1], Vec2::new(700.0, 600.0)));
        assert!(approx(corners[2], Vec2::new(100.0, 600.0)));
        assert!(approx(corners[3], Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_edges_connect_corners() {
        let mut c = square();
        c.update(1.7);
        let corners = c.world_corners();
        let edges = c.world_edges();
        for (i, edge) in edges.iter().enumerate() {
            assert!(approx(edge.start, corners[i]));
            assert!(approx(edge.end, corners[(i + 1) % 4]));
            assert_eq!(edge.side.index(), i);
            assert_eq!(edge.has_gap, i == 0);
            assert!((edge.length() - 600.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_right_edge_at_zero() {
        let edge = square().world_edges()[0];
        assert!(approx(edge.start, Vec2::new(300.0, -300.0)));
        assert!(approx(edge.end, Vec2::new(300.0, 300.0)));
        assert!(approx(edge.midpoint(), Vec2::new(300.0, 0.0)));
    }

    #[test]
    fn test_gap_boundaries_centered() {
        let (a, b) = square().gap_boundaries();
        assert!(approx(a, Vec2::new(300.0, -75.0)));
        assert!(approx(b, Vec2::new(300.0, 75.0)));
    }

    #[test]
    fn test_gap_boundaries_follow_rotation() {
        let mut c = square();
        // 90 degrees
        c.update(2.5);
        let (a, b) = c.gap_boundaries();
        assert!(approx(a, Vec2::new(75.0, 300.0)));
        assert!(approx(b, Vec2::new(-75.0, 300.0)));
    }

    #[test]
    fn test_update_rotation_speed() {
        let mut c = square();
        c.update(1.0);
        assert!((c.rotation() - 36f32.to_radians()).abs() < 1e-6);
        for _ in 0..9 {
            c.update(1.0);
        }
        // Full revolution after 10 s
        let r = c.rotation();
        assert!(r < 1e-3 || TAU - r < 1e-3);
    }

    #[test]
    fn test_reconfigure_applies_next_query() {
        let mut c = square();
        c.set_side_length(200.0).unwrap();
        c.set_gap_fraction(0.5).unwrap();
        assert!(approx(c.world_corners()[1], Vec2::new(100.0, 100.0)));
        let (a, b) = c.gap_boundaries();
        assert!((a.distance(b) - 100.0).abs() < 1e-3);

        assert!(c.set_gap_fraction(2.0).is_err());
        assert!(c.set_side_length(-5.0).is_err());
        assert_eq!(c.gap_fraction(), 0.5);
        assert_eq!(c.side_length(), 200.0);
    }

    #[test]
    fn test_contains_point() {
        let mut c = square();
        assert!(c.contains_point(Vec2::new(299.0, 0.0)));
        assert!(!c.contains_point(Vec2::new(301.0, 0.0)));
        // At 45° the corner region along the x axis reaches 300·√2
        c.update(1.25);
        assert!(c.contains_point(Vec2::new(400.0, 0.0)));
        assert!(!c.contains_point(Vec2::new(300.0, 300.0)));
    }

    #[test]
    fn test_point_in_gap_matches_boundaries() {
        let c = square();
        assert!(c.is_point_in_gap(Vec2::new(300.0, 0.0)));
        assert!(c.is_point_in_gap(Vec2::new(320.0, 74.0)));
        assert!(c.is_point_in_gap(Vec2::new(300.0, 75.0)));
        assert!(!c.is_point_in_gap(Vec2::new(300.0, 80.0)));
        assert!(!c.is_point_in_gap(Vec2::new(300.0, -200.0)));
    }

    proptest! {
        #[test]
        fn prop_rotation_wraps_and_accumulates(steps in prop::collection::vec(0.0f32..2.0, 1..50)) {
            let mut c = square();
            let mut total = 0.0f64;
            for dt in &steps {
                c.update(*dt);
                total += (ROTATION_SPEED_DEG as f64 * *dt as f64).to_radians();
                prop_assert!(c.rotation() >= 0.0 && c.rotation() < TAU);
            }
            let expected = total.rem_euclid(std::f64::consts::TAU) as f32;
            let diff = (c.rotation() - expected).abs();
            prop_assert!(diff.min(TAU - diff) < 1e-3);
        }

        #[test]
        fn prop_corners_equidistant(seconds in 0.0f32..10.0, side in 10.0f32..1000.0) {
            let mut c = Container::new(Vec2::new(50.0, -20.0), side, 0.25, Side::Top).unwrap();
            c.update(seconds);
            for corner in c.world_corners() {
                let d = corner.distance(c.center());
                prop_assert!((d - side / SQRT_2).abs() < side * 1e-5);
            }
        }
    }
}
