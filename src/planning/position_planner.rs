//! Bidirectional RRT planner over static 2D positions.
//!
//! Two trees grow in lockstep, one rooted at the start and one at the
//! goal; every iteration each tree takes a bounded step toward a random
//! field point and the opposite tree tries to connect to the new node.
//! The first successful cross-connection yields the path.

use nalgebra::Vector2;

use crate::common::{
    FieldBounds, ObstacleSet, PlannerError, PlannerResult, StateSpace,
};
use crate::planning::path::Path;
use crate::planning::tree::{NodeId, Tree};

/// Tuning for one [`RrtPlanner`] instance. Set once before `plan` and
/// immutable for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrtConfig {
    /// Max distance between a tree node and its parent [m]
    pub step: f64,
    /// Iteration budget for one planning attempt (connect retries not
    /// included)
    pub max_iterations: usize,
    /// Robot radius used for field insetting [m]
    pub robot_radius: f64,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            step: 0.3,
            max_iterations: 250,
            robot_radius: 0.09,
        }
    }
}

/// Feasibility oracle for planar position states: a point is valid when
/// it lies on the inset field and outside every obstacle.
pub struct PositionSpace<'a, O: ObstacleSet> {
    field: FieldBounds,
    obstacles: &'a O,
    robot_radius: f64,
    goal: Vector2<f64>,
    goal_tolerance: f64,
}

impl<'a, O: ObstacleSet> PositionSpace<'a, O> {
    pub fn new(
        field: FieldBounds,
        obstacles: &'a O,
        robot_radius: f64,
        goal: Vector2<f64>,
        goal_tolerance: f64,
    ) -> Self {
        Self { field, obstacles, robot_radius, goal, goal_tolerance }
    }
}

impl<'a, O: ObstacleSet> StateSpace for PositionSpace<'a, O> {
    type State = Vector2<f64>;

    fn state_is_valid(&self, state: &Vector2<f64>) -> bool {
        self.field.contains(state, self.robot_radius) && !self.obstacles.point_blocked(state)
    }

    fn segment_is_valid(&self, from: &Vector2<f64>, to: &Vector2<f64>) -> bool {
        !self.obstacles.segment_blocked(from, to)
    }

    fn random_state(&self) -> Vector2<f64> {
        self.field.random_point(self.robot_radius, &mut rand::thread_rng())
    }

    fn distance(&self, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
        (a - b).norm()
    }

    fn step_toward(&self, from: &Vector2<f64>, to: &Vector2<f64>, step: f64) -> Vector2<f64> {
        let delta = to - from;
        let d = delta.norm();
        if d < step {
            *to
        } else {
            from + delta / d * step
        }
    }

    fn is_near_goal(&self, state: &Vector2<f64>) -> bool {
        (state - self.goal).norm() <= self.goal_tolerance
    }
}

/// Bidirectional RRT position planner.
///
/// Stateless between calls: each `plan` builds its trees from scratch on
/// the obstacle snapshot it is given, so one instance per robot can run
/// in parallel with others as long as no trees or paths are shared.
#[derive(Debug, Clone)]
pub struct RrtPlanner {
    field: FieldBounds,
    config: RrtConfig,
}

impl RrtPlanner {
    pub fn new(field: FieldBounds, config: RrtConfig) -> Self {
        Self { field, config }
    }

    pub fn config(&self) -> &RrtConfig {
        &self.config
    }

    /// Plan a collision-free path from `start` to `goal`.
    ///
    /// Returns `InvalidInput` when either endpoint is blocked or off the
    /// field, and `Exhausted` when the iteration budget runs out without
    /// a connection. Exhaustion is a normal outcome on a crowded field,
    /// not a fault.
    pub fn plan<O: ObstacleSet>(
        &self,
        start: Vector2<f64>,
        goal: Vector2<f64>,
        obstacles: &O,
    ) -> PlannerResult<Path> {
        // Goal radius of one step: any state `extend` could produce on
        // the way to the goal counts as near it. The bidirectional search
        // itself terminates on a cross-tree connection, so only external
        // oracle users consult `is_near_goal`.
        let space = PositionSpace::new(
            self.field,
            obstacles,
            self.config.robot_radius,
            goal,
            self.config.step,
        );

        if !space.state_is_valid(&start) {
            return Err(PlannerError::InvalidInput(
                "start position is blocked or off the field".to_string(),
            ));
        }
        if !space.state_is_valid(&goal) {
            return Err(PlannerError::InvalidInput(
                "goal position is blocked or off the field".to_string(),
            ));
        }

        let mut start_tree = Tree::with_step(self.config.step);
        let mut goal_tree = Tree::with_step(self.config.step);
        start_tree.insert_root(start)?;
        goal_tree.insert_root(goal)?;

        for _ in 0..self.config.max_iterations {
            let sample = space.random_state();

            // grow the start tree and try to connect the goal tree to
            // the new node
            if let Some(new_node) = start_tree.extend(&space, &sample, None) {
                let new_state = *start_tree.node(new_node).state();
                if let Some(junction) = goal_tree.connect(&space, &new_state) {
                    return Ok(self.make_path(
                        &start_tree,
                        new_node,
                        &goal_tree,
                        junction,
                        obstacles,
                    ));
                }
            }

            // symmetric attempt from the goal side
            if let Some(new_node) = goal_tree.extend(&space, &sample, None) {
                let new_state = *goal_tree.node(new_node).state();
                if let Some(junction) = start_tree.connect(&space, &new_state) {
                    return Ok(self.make_path(
                        &start_tree,
                        junction,
                        &goal_tree,
                        new_node,
                        obstacles,
                    ));
                }
            }
        }

        Err(PlannerError::Exhausted {
            iterations: self.config.max_iterations,
        })
    }

    /// Merge the two connecting branches into one start-to-goal path and
    /// run the shortcutting pass.
    fn make_path<O: ObstacleSet>(
        &self,
        start_tree: &Tree<Vector2<f64>>,
        start_node: NodeId,
        goal_tree: &Tree<Vector2<f64>>,
        goal_node: NodeId,
        obstacles: &O,
    ) -> Path {
        // start tree: root-to-node runs start -> junction
        let mut states = start_tree.states_to_root(start_node, false);
        // goal tree: node-to-root runs junction -> goal
        let tail = goal_tree.states_to_root(goal_node, true);

        // the junction state appears in both branches; keep one copy
        let skip = if tail.first() == states.last() { 1 } else { 0 };
        states.extend(tail.into_iter().skip(skip));

        let mut path = Path::from_points(states);
        path.optimize(obstacles);
        path
    }
}

/// Convenience wrapper matching the strategy-evaluator interface:
/// one-shot position plan with default tuning.
pub fn run_position_plan<O: ObstacleSet>(
    field: FieldBounds,
    start: Vector2<f64>,
    goal: Vector2<f64>,
    obstacles: &O,
) -> PlannerResult<Path> {
    RrtPlanner::new(field, RrtConfig::default()).plan(start, goal, obstacles)
}
