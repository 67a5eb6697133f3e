// Motion planning module: RRT trees, paths, and the two planners

pub mod tree;
pub mod obstacles;
pub mod path;
pub mod motion;
pub mod position_planner;
pub mod velocity_planner;

pub use tree::*;
pub use obstacles::*;
pub use path::*;
pub use motion::*;
pub use position_planner::*;
pub use velocity_planner::*;
