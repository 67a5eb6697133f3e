//! Kinematic (position + velocity) states and the time-parameterized
//! paths built from them.
//!
//! Adjacent waypoints of a [`MotionPath`] implicitly define a cubic
//! Bezier segment with control points `[p0, p0+v0, p1-v1, p1]`, so a
//! path of n waypoints is a chain of n-1 curves whose boundary
//! velocities match the stored waypoint velocities.

use itertools::Itertools;
use nalgebra::Vector2;

use crate::common::{ObstacleSet, PlannerError, PlannerResult};

/// The state of a robot at one point in time: where it is and how fast
/// it is moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl MotionState {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>) -> Self {
        Self { pos, vel }
    }

    /// At rest at `pos`.
    pub fn stationary(pos: Vector2<f64>) -> Self {
        Self { pos, vel: Vector2::zeros() }
    }

    /// Control points of the cubic Bezier segment from `start` to `end`:
    /// `[p0, p0+v0, p1-v1, p1]`.
    fn control_points(start: &MotionState, end: &MotionState) -> [Vector2<f64>; 4] {
        [
            start.pos,
            start.pos + start.vel,
            end.pos - end.vel,
            end.pos,
        ]
    }

    /// Position on the Bezier segment at parameter `t` in `[0, 1]`.
    ///
    /// Exact at the endpoints: `t = 0` yields `start.pos`, `t = 1`
    /// yields `end.pos`.
    pub fn evaluate_bezier_position(
        start: &MotionState,
        end: &MotionState,
        t: f64,
    ) -> Vector2<f64> {
        let [c0, c1, c2, c3] = Self::control_points(start, end);
        let u = 1.0 - t;
        c0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + c3 * (t * t * t)
    }

    /// Velocity on the Bezier segment at parameter `t` in `[0, 1]`.
    ///
    /// The curve derivative is scaled by 1/3 so the boundary velocities
    /// equal the stored waypoint velocities exactly: `t = 0` yields
    /// `start.vel`, `t = 1` yields `end.vel`.
    pub fn evaluate_bezier_velocity(
        start: &MotionState,
        end: &MotionState,
        t: f64,
    ) -> Vector2<f64> {
        let [c0, c1, c2, c3] = Self::control_points(start, end);
        let u = 1.0 - t;
        (c1 - c0) * (u * u) + (c2 - c1) * (2.0 * u * t) + (c3 - c2) * (t * t)
    }

    /// Full (position, velocity) state on the segment at `t` in `[0, 1]`.
    pub fn evaluate_bezier(start: &MotionState, end: &MotionState, t: f64) -> MotionState {
        MotionState::new(
            Self::evaluate_bezier_position(start, end, t),
            Self::evaluate_bezier_velocity(start, end, t),
        )
    }
}

/// A goal the velocity planner chases; may move over time.
pub trait MotionTarget {
    /// The goal state `t` seconds after the start of the planning
    /// attempt.
    fn state_at(&self, t: f64) -> MotionState;
}

/// A static goal: the same state at every time.
impl MotionTarget for MotionState {
    fn state_at(&self, _t: f64) -> MotionState {
        *self
    }
}

/// A goal moving at constant velocity, e.g. a rolling ball to catch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTarget {
    pub start: MotionState,
}

impl LinearTarget {
    pub fn new(start: MotionState) -> Self {
        Self { start }
    }
}

impl MotionTarget for LinearTarget {
    fn state_at(&self, t: f64) -> MotionState {
        MotionState::new(self.start.pos + self.start.vel * t, self.start.vel)
    }
}

/// Time-parameterized sequence of [`MotionState`] waypoints.
///
/// Each waypoint carries a timestamp; timestamps are non-decreasing and
/// start at zero. The continuous state at any time inside the path is
/// read off the Bezier segment covering that time.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPath {
    states: Vec<MotionState>,
    times: Vec<f64>,
}

impl MotionPath {
    /// Build a path from ordered waypoints and their timestamps.
    ///
    /// The sequences must have equal length and the timestamps must be
    /// non-decreasing starting at zero.
    pub fn new(states: Vec<MotionState>, times: Vec<f64>) -> PlannerResult<Self> {
        if states.len() != times.len() {
            return Err(PlannerError::InvalidInput(format!(
                "{} states but {} timestamps",
                states.len(),
                times.len()
            )));
        }
        if let Some(&first) = times.first() {
            if first != 0.0 {
                return Err(PlannerError::InvalidInput(
                    "first timestamp must be zero".to_string(),
                ));
            }
        }
        if times.iter().tuple_windows().any(|(a, b)| b < a) {
            return Err(PlannerError::InvalidInput(
                "timestamps must be non-decreasing".to_string(),
            ));
        }
        Ok(Self { states, times })
    }

    pub fn states(&self) -> &[MotionState] {
        &self.states
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Sum of Euclidean distances between consecutive waypoint
    /// positions.
    pub fn length(&self) -> f64 {
        self.states
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b.pos - a.pos).norm())
            .sum()
    }

    /// Time the path takes to follow, i.e. the last timestamp.
    pub fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// The interpolated state at time `t`, or `None` when `t` falls
    /// outside `[0, duration]` (never extrapolates).
    pub fn evaluate(&self, t: f64) -> Option<MotionState> {
        if self.states.is_empty() || t < 0.0 || t > self.duration() {
            return None;
        }
        if self.states.len() == 1 {
            return Some(self.states[0]);
        }

        for i in 0..self.states.len() - 1 {
            let (t0, t1) = (self.times[i], self.times[i + 1]);
            if t <= t1 {
                let seg = t1 - t0;
                let u = if seg > 0.0 { (t - t0) / seg } else { 0.0 };
                return Some(MotionState::evaluate_bezier(
                    &self.states[i],
                    &self.states[i + 1],
                    u,
                ));
            }
        }
        // t == duration with trailing zero-length segments
        self.states.last().copied()
    }

    /// Shortcutting pass over the waypoints, same rule as
    /// [`Path::optimize`](crate::planning::path::Path::optimize):
    /// straight position segments that clear the obstacles let the
    /// waypoints between them drop out. Timestamps travel with their
    /// waypoints, so the path keeps its time parameterization.
    pub fn optimize<O: ObstacleSet>(&mut self, obstacles: &O) {
        if self.states.len() < 3 {
            return;
        }

        let mut kept_states = vec![self.states[0]];
        let mut kept_times = vec![self.times[0]];
        let mut i = 0;
        while i + 1 < self.states.len() {
            let mut j = self.states.len() - 1;
            while j > i + 1
                && obstacles.segment_blocked(&self.states[i].pos, &self.states[j].pos)
            {
                j -= 1;
            }
            kept_states.push(self.states[j]);
            kept_times.push(self.times[j]);
            i = j;
        }
        self.states = kept_states;
        self.times = kept_times;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NoObstacles;

    fn sample_states() -> (MotionState, MotionState) {
        let start = MotionState::new(Vector2::new(0.3, -1.2), Vector2::new(0.7, 0.4));
        let end = MotionState::new(Vector2::new(4.1, 2.6), Vector2::new(-0.2, 1.1));
        (start, end)
    }

    #[test]
    fn test_bezier_endpoint_positions_exact() {
        let (start, end) = sample_states();
        assert_eq!(
            MotionState::evaluate_bezier(&start, &end, 0.0).pos,
            start.pos
        );
        assert_eq!(MotionState::evaluate_bezier(&start, &end, 1.0).pos, end.pos);
    }

    #[test]
    fn test_bezier_endpoint_velocities_match_waypoints() {
        let (start, end) = sample_states();
        let at_start = MotionState::evaluate_bezier_velocity(&start, &end, 0.0);
        let at_end = MotionState::evaluate_bezier_velocity(&start, &end, 1.0);
        assert!((at_start - start.vel).norm() < 1e-12);
        assert!((at_end - end.vel).norm() < 1e-12);
    }

    #[test]
    fn test_straight_segment_midpoint() {
        // zero velocities degenerate to a straight interpolation
        let start = MotionState::stationary(Vector2::new(0.0, 0.0));
        let end = MotionState::stationary(Vector2::new(2.0, 0.0));
        let mid = MotionState::evaluate_bezier_position(&start, &end, 0.5);
        assert!((mid - Vector2::new(1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_path_validation() {
        let s = MotionState::stationary(Vector2::zeros());
        assert!(MotionPath::new(vec![s, s], vec![0.0]).is_err());
        assert!(MotionPath::new(vec![s, s], vec![0.5, 1.0]).is_err());
        assert!(MotionPath::new(vec![s, s], vec![0.0, -1.0]).is_err());
        assert!(MotionPath::new(vec![s, s], vec![0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_evaluate_bounds() {
        let a = MotionState::stationary(Vector2::new(0.0, 0.0));
        let b = MotionState::stationary(Vector2::new(1.0, 0.0));
        let path = MotionPath::new(vec![a, b], vec![0.0, 2.0]).unwrap();

        assert!(path.evaluate(-0.1).is_none());
        assert!(path.evaluate(2.1).is_none());
        assert_eq!(path.evaluate(0.0).unwrap().pos, a.pos);
        assert_eq!(path.evaluate(2.0).unwrap().pos, b.pos);
    }

    #[test]
    fn test_evaluate_selects_covering_segment() {
        let a = MotionState::stationary(Vector2::new(0.0, 0.0));
        let b = MotionState::stationary(Vector2::new(1.0, 0.0));
        let c = MotionState::stationary(Vector2::new(1.0, 1.0));
        let path = MotionPath::new(vec![a, b, c], vec![0.0, 1.0, 2.0]).unwrap();

        let first = path.evaluate(0.5).unwrap();
        assert!((first.pos - Vector2::new(0.5, 0.0)).norm() < 1e-12);
        let second = path.evaluate(1.5).unwrap();
        assert!((second.pos - Vector2::new(1.0, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn test_duration_and_length() {
        let a = MotionState::stationary(Vector2::new(0.0, 0.0));
        let b = MotionState::stationary(Vector2::new(3.0, 4.0));
        let path = MotionPath::new(vec![a, b], vec![0.0, 1.5]).unwrap();
        assert_eq!(path.duration(), 1.5);
        assert!((path.length() - 5.0).abs() < 1e-12);

        let empty = MotionPath::new(vec![], vec![]).unwrap();
        assert_eq!(empty.duration(), 0.0);
    }

    #[test]
    fn test_optimize_keeps_timestamps_with_waypoints() {
        let states: Vec<MotionState> = (0..5)
            .map(|i| MotionState::stationary(Vector2::new(i as f64, 0.0)))
            .collect();
        let times: Vec<f64> = (0..5).map(|i| i as f64 * 0.25).collect();
        let mut path = MotionPath::new(states, times).unwrap();

        path.optimize(&NoObstacles);
        assert_eq!(path.len(), 2);
        assert_eq!(path.times(), &[0.0, 1.0]);
        assert_eq!(path.duration(), 1.0);
    }

    #[test]
    fn test_linear_target_tracks_velocity() {
        let target = LinearTarget::new(MotionState::new(
            Vector2::new(1.0, 0.0),
            Vector2::new(0.5, -0.5),
        ));
        let at = target.state_at(2.0);
        assert_eq!(at.pos, Vector2::new(2.0, -1.0));
        assert_eq!(at.vel, Vector2::new(0.5, -0.5));

        // a plain MotionState is a static target
        let fixed = MotionState::stationary(Vector2::new(3.0, 3.0));
        assert_eq!(fixed.state_at(10.0), fixed);
    }
}
