//! soccer_planning - RRT motion planning for robot soccer
//!
//! This crate plans collision-free, kinematically-feasible motion for
//! wheeled robots on a shared soccer field: a generic arena-backed RRT
//! tree, a bidirectional planner over static positions, a velocity-aware
//! planner that samples accelerations, and the path types (with a
//! trapezoidal duration estimator) that strategy code consumes.

// Core modules
pub mod common;
pub mod utils;

// Planning algorithms
pub mod planning;

// Re-export common types for convenience
pub use common::{FieldBounds, KinematicLimits, NoObstacles, ObstacleSet, StateSpace};
pub use common::{PlannerError, PlannerResult};
pub use planning::{CircleObstacle, MovingObstacle, ObstacleGroup};
pub use planning::{LinearTarget, MotionPath, MotionState, MotionTarget, Path};
pub use planning::{NodeId, Tree, TreeNode};
pub use planning::{RrtConfig, RrtPlanner, VelocityConfig, VelocityPlanner};
pub use planning::{run_position_plan, run_velocity_plan, trapezoidal_duration};
