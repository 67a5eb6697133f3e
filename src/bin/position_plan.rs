// Bidirectional RRT position planning demo on a soccer field

use nalgebra::Vector2;

use soccer_planning::utils::FieldPlot;
use soccer_planning::{
    CircleObstacle, FieldBounds, KinematicLimits, ObstacleGroup, PlannerError, RrtConfig,
    RrtPlanner,
};

fn main() {
    println!("position planner start!!");

    let field = FieldBounds::standard();
    let robot_radius = 0.09;

    // a wall of opponents between us and the goal position
    let obstacles = ObstacleGroup::new(
        vec![
            CircleObstacle::new(Vector2::new(-1.0, 4.0), 0.09),
            CircleObstacle::new(Vector2::new(-0.3, 4.2), 0.09),
            CircleObstacle::new(Vector2::new(0.4, 4.0), 0.09),
            CircleObstacle::new(Vector2::new(1.2, 3.8), 0.09),
            CircleObstacle::new(Vector2::new(0.0, 5.5), 0.09),
        ],
        robot_radius,
    );

    let planner = RrtPlanner::new(
        field,
        RrtConfig {
            step: 0.3,
            max_iterations: 2000,
            robot_radius,
        },
    );

    let start = Vector2::new(-2.0, 1.0);
    let goal = Vector2::new(1.5, 7.0);

    match planner.plan(start, goal, &obstacles) {
        Ok(path) => {
            println!(
                "path found: {} waypoints, {:.2} m",
                path.len(),
                path.length()
            );
            let limits = KinematicLimits::default();
            println!("estimated travel time: {:.2} s", path.duration(&limits));

            let mut plot = FieldPlot::new("Bidirectional RRT Position Planning", field);
            plot.add_obstacles(&obstacles)
                .add_path(&path)
                .add_start(&start)
                .add_goal(&goal);
            match plot.save("img/position_plan.png") {
                Ok(()) => println!("plot saved to img/position_plan.png"),
                Err(e) => println!("plotting failed: {}", e),
            }
        }
        Err(PlannerError::Exhausted { iterations }) => {
            println!("no path found within {} iterations", iterations);
        }
        Err(e) => println!("planning failed: {}", e),
    }

    println!("position planner finish!!");
}
