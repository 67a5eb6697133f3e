//! Kinematics-aware RRT planner over (position, velocity) states.
//!
//! Instead of stepping toward sampled positions, the tree grows by
//! picking a random existing node, sampling a random acceleration, and
//! integrating the node's state forward one fixed time step. Paths come
//! out physically followable and time-parameterized, and the goal may
//! move (e.g. catching a rolling ball). Because the goal moves, there is
//! no reverse tree to seed; growth is single-tree.

use nalgebra::Vector2;
use rand::Rng;
use rand_distr::{Distribution, UnitCircle};

use crate::common::{FieldBounds, ObstacleSet, PlannerError, PlannerResult};
use crate::planning::motion::{MotionPath, MotionState, MotionTarget};
use crate::planning::obstacles::MovingObstacle;
use crate::planning::tree::Tree;

/// Tuning for one [`VelocityPlanner`] instance. Set once before `plan`
/// and immutable for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityConfig {
    /// Integration interval separating a node from its parent [s]
    pub time_step: f64,
    /// Top translational speed; faster candidates are rejected [m/s]
    pub max_velocity: f64,
    /// Sampled acceleration magnitudes are uniform in
    /// `[0, max_acceleration]` [m/s^2]
    pub max_acceleration: f64,
    /// A node is near the goal when its position is within this radius
    /// of the goal position [m]
    pub goal_pos_tolerance: f64,
    /// ...and its velocity within this much of the goal velocity [m/s]
    pub goal_vel_tolerance: f64,
    /// Iteration budget for one planning attempt
    pub max_iterations: usize,
    /// Robot radius used for field insetting and robot-robot clearance [m]
    pub robot_radius: f64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            max_velocity: 2.0,
            max_acceleration: 1.5,
            goal_pos_tolerance: 0.15,
            goal_vel_tolerance: 0.5,
            max_iterations: 2000,
            robot_radius: 0.09,
        }
    }
}

/// Velocity-aware single-tree RRT planner.
#[derive(Debug, Clone)]
pub struct VelocityPlanner {
    field: FieldBounds,
    config: VelocityConfig,
}

impl VelocityPlanner {
    pub fn new(field: FieldBounds, config: VelocityConfig) -> Self {
        Self { field, config }
    }

    pub fn config(&self) -> &VelocityConfig {
        &self.config
    }

    /// Plan a kinematically-feasible path from `start` to a possibly
    /// moving `goal`.
    ///
    /// `moving_obstacles` are opponents projected forward along their
    /// current velocity; `planned_paths` are teammates whose plans for
    /// this cycle are already fixed, treated as moving obstacles along
    /// those plans. Teammates without a plan yet are simply not in
    /// either list.
    pub fn plan<O, G>(
        &self,
        start: MotionState,
        goal: &G,
        static_obstacles: &O,
        moving_obstacles: &[MovingObstacle],
        planned_paths: &[MotionPath],
    ) -> PlannerResult<MotionPath>
    where
        O: ObstacleSet,
        G: MotionTarget,
    {
        if !self.state_is_clear(&start.pos, 0.0, static_obstacles, moving_obstacles, planned_paths)
        {
            return Err(PlannerError::InvalidInput(
                "start state is blocked or off the field".to_string(),
            ));
        }

        let dt = self.config.time_step;
        // stepless: candidates come from integrating accelerations, not
        // from `extend`
        let mut tree = Tree::new();
        tree.insert_root(start)?;
        let mut rng = rand::thread_rng();

        for _ in 0..self.config.max_iterations {
            let base = match tree.random_node(&mut rng) {
                Some(id) => id,
                None => break,
            };
            let base_state = *tree.node(base).state();
            let candidate_time = (tree.depth(base) + 1) as f64 * dt;

            let acc = self.random_acceleration(&mut rng);
            let vel = base_state.vel + acc * dt;
            let pos = base_state.pos + base_state.vel * dt + acc * (0.5 * dt * dt);

            if vel.norm() > self.config.max_velocity {
                continue;
            }
            if !self.state_is_clear(
                &pos,
                candidate_time,
                static_obstacles,
                moving_obstacles,
                planned_paths,
            ) {
                continue;
            }
            // the swept segment must be clear too, not just the endpoint
            if static_obstacles.segment_blocked(&base_state.pos, &pos) {
                continue;
            }

            let node = tree.insert_child(base, MotionState::new(pos, vel));

            let goal_state = goal.state_at(candidate_time);
            if (pos - goal_state.pos).norm() <= self.config.goal_pos_tolerance
                && (vel - goal_state.vel).norm() <= self.config.goal_vel_tolerance
            {
                let states = tree.states_to_root(node, false);
                let times = (0..states.len()).map(|i| i as f64 * dt).collect();
                let mut path = MotionPath::new(states, times)?;
                path.optimize(static_obstacles);
                return Ok(path);
            }
        }

        Err(PlannerError::Exhausted {
            iterations: self.config.max_iterations,
        })
    }

    /// Whether a position is feasible at time `t`: on the inset field,
    /// outside every static obstacle, and clear of every moving obstacle
    /// and planned teammate projected to `t`.
    fn state_is_clear<O: ObstacleSet>(
        &self,
        pos: &Vector2<f64>,
        t: f64,
        static_obstacles: &O,
        moving_obstacles: &[MovingObstacle],
        planned_paths: &[MotionPath],
    ) -> bool {
        let r = self.config.robot_radius;
        if !self.field.contains(pos, r) {
            return false;
        }
        if static_obstacles.point_blocked(pos) {
            return false;
        }
        if moving_obstacles.iter().any(|obs| obs.hit_at(pos, t, r)) {
            return false;
        }
        // a teammate sits at its plan's end state once the plan is done
        !planned_paths.iter().any(|path| {
            let teammate = path
                .evaluate(t.min(path.duration()))
                .map(|s| s.pos)
                .or_else(|| path.states().last().map(|s| s.pos));
            match teammate {
                Some(p) => (pos - p).norm() <= 2.0 * r,
                None => false,
            }
        })
    }

    /// Random acceleration: magnitude uniform in `[0, max_acceleration]`,
    /// direction uniform on the circle.
    fn random_acceleration<R: Rng>(&self, rng: &mut R) -> Vector2<f64> {
        let mag = rng.gen_range(0.0..=self.config.max_acceleration);
        let dir: [f64; 2] = UnitCircle.sample(rng);
        Vector2::new(dir[0], dir[1]) * mag
    }
}

/// Convenience wrapper matching the strategy-evaluator interface:
/// one-shot velocity plan with default tuning.
pub fn run_velocity_plan<O: ObstacleSet, G: MotionTarget>(
    field: FieldBounds,
    start: MotionState,
    goal: &G,
    static_obstacles: &O,
    moving_obstacles: &[MovingObstacle],
    planned_paths: &[MotionPath],
) -> PlannerResult<MotionPath> {
    VelocityPlanner::new(field, VelocityConfig::default()).plan(
        start,
        goal,
        static_obstacles,
        moving_obstacles,
        planned_paths,
    )
}
