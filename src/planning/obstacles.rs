//! Obstacle hit-testing for the planners.
//!
//! Robots, the ball-avoid radius and keep-out zones are all modeled as
//! circles. An [`ObstacleGroup`] is a read-only snapshot built fresh per
//! planning call; the planners only ever query it, never mutate it.

use nalgebra::Vector2;

use crate::common::ObstacleSet;

/// Distance from point `pt` to the segment `a`-`b`.
fn point_segment_distance(pt: &Vector2<f64>, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (pt - a).norm();
    }
    let t = ((pt - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (pt - closest).norm()
}

/// Circular obstacle: another robot, the ball-avoid zone, etc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleObstacle {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(center: Vector2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `pt` lies inside the obstacle inflated by `margin`.
    pub fn hit_point(&self, pt: &Vector2<f64>, margin: f64) -> bool {
        (pt - self.center).norm() <= self.radius + margin
    }

    /// Whether the segment `from`-`to` crosses the obstacle inflated by
    /// `margin`.
    pub fn hit_segment(&self, from: &Vector2<f64>, to: &Vector2<f64>, margin: f64) -> bool {
        point_segment_distance(&self.center, from, to) <= self.radius + margin
    }
}

/// Read-only collection of static circular obstacles, inflated by the
/// planning robot's radius so the robot can be treated as a point.
#[derive(Debug, Clone, Default)]
pub struct ObstacleGroup {
    obstacles: Vec<CircleObstacle>,
    margin: f64,
}

impl ObstacleGroup {
    pub fn new(obstacles: Vec<CircleObstacle>, margin: f64) -> Self {
        Self { obstacles, margin }
    }

    pub fn push(&mut self, obstacle: CircleObstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl ObstacleSet for ObstacleGroup {
    fn point_blocked(&self, pt: &Vector2<f64>) -> bool {
        self.obstacles.iter().any(|obs| obs.hit_point(pt, self.margin))
    }

    fn segment_blocked(&self, from: &Vector2<f64>, to: &Vector2<f64>) -> bool {
        self.obstacles
            .iter()
            .any(|obs| obs.hit_segment(from, to, self.margin))
    }
}

/// An obstacle moving at constant velocity, projected linearly forward.
///
/// Opponent robots are assumed to continue along their current velocity
/// vector indefinitely; the planner checks candidate states against the
/// projected position at the candidate's point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingObstacle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
}

impl MovingObstacle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64) -> Self {
        Self { pos, vel, radius }
    }

    /// Projected position `t` seconds from the snapshot.
    pub fn position_at(&self, t: f64) -> Vector2<f64> {
        self.pos + self.vel * t
    }

    /// Whether `pt` is within the combined radius of the obstacle's
    /// projected position at time `t`.
    pub fn hit_at(&self, pt: &Vector2<f64>, t: f64, margin: f64) -> bool {
        (pt - self.position_at(t)).norm() <= self.radius + margin
    }
}
