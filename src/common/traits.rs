//! Feasibility-oracle and obstacle interfaces.
//!
//! The planners never know how validity is decided; they depend on these
//! traits, which a caller (or a test fake) implements. This replaces the
//! virtual-callback hooks of older planner designs with an explicit
//! strategy object passed in at construction.

use nalgebra::Vector2;

/// The pluggable capability bundle a planning tree depends on: validity,
/// sampling, distance and goal tests over one state type.
///
/// Implementations must be side-effect-free with respect to the tree:
/// calling any method never changes what a later call returns for the
/// same arguments (random sampling aside).
pub trait StateSpace {
    /// A point in the state space. 2D position for the position planner,
    /// (position, velocity) for the velocity planner.
    type State: Clone + PartialEq;

    /// Whether a single state is feasible (on the field, not inside an
    /// obstacle).
    fn state_is_valid(&self, state: &Self::State) -> bool;

    /// Whether the straight transition between two states is feasible.
    fn segment_is_valid(&self, from: &Self::State, to: &Self::State) -> bool;

    /// A state drawn uniformly at random from the space.
    fn random_state(&self) -> Self::State;

    /// Distance between two states, used for nearest-neighbor queries.
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;

    /// The state reached by moving from `from` exactly `step` toward
    /// `to`, or `to` itself if it is closer than `step`. Never
    /// overshoots.
    fn step_toward(&self, from: &Self::State, to: &Self::State, step: f64) -> Self::State;

    /// Whether `state` is close enough to the goal to end the search.
    ///
    /// Connection-terminated searches (the bidirectional planner ends on
    /// a cross-tree connection, not a goal test) can leave the default.
    fn is_near_goal(&self, _state: &Self::State) -> bool {
        false
    }
}

/// Read-only hit-testing over a set of obstacles.
///
/// Called hundreds to thousands of times per planning attempt, so
/// implementations should be cheap. `Sync` lets independent per-robot
/// planner instances share one obstacle snapshot across threads.
pub trait ObstacleSet: Sync {
    /// Whether a point lies inside any obstacle.
    fn point_blocked(&self, pt: &Vector2<f64>) -> bool;

    /// Whether the segment between two points crosses any obstacle.
    fn segment_blocked(&self, from: &Vector2<f64>, to: &Vector2<f64>) -> bool;
}

/// The empty obstacle set; useful for tests and open-field demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleSet for NoObstacles {
    fn point_blocked(&self, _pt: &Vector2<f64>) -> bool {
        false
    }

    fn segment_blocked(&self, _from: &Vector2<f64>, _to: &Vector2<f64>) -> bool {
        false
    }
}
