//! Waypoint path produced by the position planner, plus the shared
//! trapezoidal-profile duration estimator.

use itertools::Itertools;
use nalgebra::Vector2;

use crate::common::{KinematicLimits, ObstacleSet};

/// Travel time over `length` meters under a trapezoidal velocity
/// profile: accelerate from rest to the velocity limit, cruise,
/// decelerate back to rest.
///
/// When the path is too short to reach the limit, the combined
/// accel+decel time is scaled by `length / (accel_dist + decel_dist)`, a
/// triangular-profile approximation. This is the shared timing primitive
/// behind every "can robot X reach point Y before time T" query; it is
/// intentionally approximate and ignores turning time.
pub fn trapezoidal_duration(length: f64, limits: &KinematicLimits) -> f64 {
    let v = limits.max_velocity;
    let accel_time = v / limits.acceleration;
    let decel_time = v / limits.deceleration;
    let accel_dist = 0.5 * v * v / limits.acceleration;
    let decel_dist = 0.5 * v * v / limits.deceleration;

    if length < accel_dist + decel_dist {
        (length / (accel_dist + decel_dist)) * (accel_time + decel_time)
    } else {
        accel_time + decel_time + (length - accel_dist - decel_dist) / v
    }
}

/// Ordered sequence of 2D waypoints.
///
/// Produced once per successful planning attempt; callers only consume
/// it (the shortcutting pass runs inside the planner before the path is
/// returned).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Vector2<f64>>,
}

impl Path {
    /// Build a path from an ordered sequence of waypoints.
    pub fn from_points(points: Vec<Vector2<f64>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<&Vector2<f64>> {
        self.points.first()
    }

    pub fn goal(&self) -> Option<&Vector2<f64>> {
        self.points.last()
    }

    /// Sum of Euclidean distances between consecutive waypoints.
    pub fn length(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b - a).norm())
            .sum()
    }

    /// Estimated travel time under the given kinematic limits.
    pub fn duration(&self, limits: &KinematicLimits) -> f64 {
        trapezoidal_duration(self.length(), limits)
    }

    /// Remove waypoints whose removal leaves every remaining consecutive
    /// segment collision-free (classic shortcutting).
    ///
    /// From each kept waypoint the farthest directly-reachable successor
    /// is kept and everything between is dropped. Endpoints are never
    /// removed; the result is never longer than the input.
    pub fn optimize<O: ObstacleSet>(&mut self, obstacles: &O) {
        if self.points.len() < 3 {
            return;
        }

        let mut kept = vec![self.points[0]];
        let mut i = 0;
        while i + 1 < self.points.len() {
            let mut j = self.points.len() - 1;
            while j > i + 1 && obstacles.segment_blocked(&self.points[i], &self.points[j]) {
                j -= 1;
            }
            kept.push(self.points[j]);
            i = j;
        }
        self.points = kept;
    }
}
