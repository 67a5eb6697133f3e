// Velocity-aware RRT demo: intercept a rolling ball while avoiding a
// moving opponent

use nalgebra::Vector2;

use soccer_planning::utils::FieldPlot;
use soccer_planning::{
    FieldBounds, LinearTarget, MotionState, MotionTarget, MovingObstacle, NoObstacles,
    PlannerError, VelocityConfig, VelocityPlanner,
};

fn main() {
    println!("velocity planner start!!");

    let field = FieldBounds::standard();

    let planner = VelocityPlanner::new(
        field,
        VelocityConfig {
            time_step: 0.1,
            max_velocity: 2.0,
            max_acceleration: 2.0,
            goal_pos_tolerance: 0.3,
            goal_vel_tolerance: 1.5,
            max_iterations: 20000,
            robot_radius: 0.09,
        },
    );

    // robot at rest near our goal line
    let start = MotionState::stationary(Vector2::new(0.0, 1.0));

    // ball rolling across the field; catch up with it
    let ball = LinearTarget::new(MotionState::new(
        Vector2::new(1.5, 3.0),
        Vector2::new(-0.3, 0.2),
    ));

    // opponent cutting toward the ball
    let opponent = MovingObstacle::new(Vector2::new(-2.0, 3.5), Vector2::new(0.4, -0.1), 0.09);

    match planner.plan(start, &ball, &NoObstacles, &[opponent], &[]) {
        Ok(path) => {
            println!(
                "path found: {} waypoints, {:.2} m in {:.2} s",
                path.len(),
                path.length(),
                path.duration()
            );
            if let Some(end) = path.evaluate(path.duration()) {
                println!(
                    "arrives at ({:.2}, {:.2}) moving at {:.2} m/s",
                    end.pos.x,
                    end.pos.y,
                    end.vel.norm()
                );
            }

            let mut plot = FieldPlot::new("Velocity-Aware RRT Planning", field);
            plot.add_motion_path(&path, 200)
                .add_start(&start.pos)
                .add_goal(&ball.state_at(path.duration()).pos);
            match plot.save("img/velocity_plan.png") {
                Ok(()) => println!("plot saved to img/velocity_plan.png"),
                Err(e) => println!("plotting failed: {}", e),
            }
        }
        Err(PlannerError::Exhausted { iterations }) => {
            println!("no path found within {} iterations", iterations);
        }
        Err(e) => println!("planning failed: {}", e),
    }

    println!("velocity planner finish!!");
}
