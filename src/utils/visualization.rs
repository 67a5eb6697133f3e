//! Visualization utilities for soccer_planning
//!
//! Renders fields, obstacles, RRT trees and planned paths with gnuplot.
//! Only the demo binaries use this; library planning code never draws.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};
use nalgebra::Vector2;

use crate::common::FieldBounds;
use crate::planning::obstacles::ObstacleGroup;
use crate::planning::tree::Tree;
use crate::planning::{MotionPath, Path};

/// Color palette for consistent styling
pub mod colors {
    pub const FIELD: &str = "#006400";
    pub const OBSTACLE: &str = "#000000";
    pub const TREE: &str = "#B0B0B0";
    pub const START: &str = "#00FF00";
    pub const GOAL: &str = "#0000FF";
    pub const PATH: &str = "#FF0000";
}

/// One polyline to draw, with its style.
struct LineSet {
    x: Vec<f64>,
    y: Vec<f64>,
    color: &'static str,
    width: f64,
    caption: Option<String>,
}

/// One point marker set to draw.
struct PointSet {
    x: Vec<f64>,
    y: Vec<f64>,
    color: &'static str,
    size: f64,
    caption: String,
}

/// Collects field, tree, obstacle and path geometry, then renders it all
/// into a single gnuplot figure.
pub struct FieldPlot {
    title: String,
    field: FieldBounds,
    lines: Vec<LineSet>,
    points: Vec<PointSet>,
}

impl FieldPlot {
    pub fn new(title: &str, field: FieldBounds) -> Self {
        let mut plot = Self {
            title: title.to_string(),
            field,
            lines: Vec::new(),
            points: Vec::new(),
        };
        plot.add_field_outline();
        plot
    }

    fn add_field_outline(&mut self) {
        let half_w = self.field.width / 2.0;
        self.lines.push(LineSet {
            x: vec![-half_w, half_w, half_w, -half_w, -half_w],
            y: vec![0.0, 0.0, self.field.length, self.field.length, 0.0],
            color: colors::FIELD,
            width: 2.0,
            caption: None,
        });
    }

    /// Draw every obstacle as a circle outline.
    pub fn add_obstacles(&mut self, obstacles: &ObstacleGroup) -> &mut Self {
        for obs in obstacles.obstacles() {
            let (x, y): (Vec<f64>, Vec<f64>) = (0..=36)
                .map(|i| {
                    let theta = i as f64 * 10.0_f64.to_radians();
                    (
                        obs.center.x + obs.radius * theta.cos(),
                        obs.center.y + obs.radius * theta.sin(),
                    )
                })
                .unzip();
            self.lines.push(LineSet {
                x,
                y,
                color: colors::OBSTACLE,
                width: 1.5,
                caption: None,
            });
        }
        self
    }

    /// Draw every parent-child edge of a planning tree.
    pub fn add_tree(&mut self, tree: &Tree<Vector2<f64>>) -> &mut Self {
        for (from, to) in tree.edges() {
            self.lines.push(LineSet {
                x: vec![from.x, to.x],
                y: vec![from.y, to.y],
                color: colors::TREE,
                width: 0.5,
                caption: None,
            });
        }
        self
    }

    /// Draw a planned waypoint path.
    pub fn add_path(&mut self, path: &Path) -> &mut Self {
        self.lines.push(LineSet {
            x: path.points().iter().map(|p| p.x).collect(),
            y: path.points().iter().map(|p| p.y).collect(),
            color: colors::PATH,
            width: 2.5,
            caption: Some("Path".to_string()),
        });
        self
    }

    /// Draw a motion path sampled along its Bezier segments.
    pub fn add_motion_path(&mut self, path: &MotionPath, samples: usize) -> &mut Self {
        let duration = path.duration();
        let (x, y): (Vec<f64>, Vec<f64>) = (0..=samples)
            .filter_map(|i| {
                let t = duration * i as f64 / samples as f64;
                path.evaluate(t).map(|s| (s.pos.x, s.pos.y))
            })
            .unzip();
        self.lines.push(LineSet {
            x,
            y,
            color: colors::PATH,
            width: 2.5,
            caption: Some("Motion path".to_string()),
        });
        self
    }

    /// Mark the start position.
    pub fn add_start(&mut self, pos: &Vector2<f64>) -> &mut Self {
        self.points.push(PointSet {
            x: vec![pos.x],
            y: vec![pos.y],
            color: colors::START,
            size: 2.0,
            caption: "Start".to_string(),
        });
        self
    }

    /// Mark the goal position.
    pub fn add_goal(&mut self, pos: &Vector2<f64>) -> &mut Self {
        self.points.push(PointSet {
            x: vec![pos.x],
            y: vec![pos.y],
            color: colors::GOAL,
            size: 2.0,
            caption: "Goal".to_string(),
        });
        self
    }

    fn render(&self, figure: &mut Figure) {
        let axes = figure.axes2d();
        axes.set_title(&self.title, &[])
            .set_x_label("X [m]", &[])
            .set_y_label("Y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0));

        for line in &self.lines {
            match &line.caption {
                Some(caption) => {
                    axes.lines(
                        &line.x,
                        &line.y,
                        &[Caption(caption), Color(line.color), LineWidth(line.width)],
                    );
                }
                None => {
                    axes.lines(&line.x, &line.y, &[Color(line.color), LineWidth(line.width)]);
                }
            }
        }
        for pts in &self.points {
            axes.points(
                &pts.x,
                &pts.y,
                &[
                    Caption(&pts.caption),
                    Color(pts.color),
                    PointSymbol('O'),
                    PointSize(pts.size),
                ],
            );
        }
    }

    /// Save the figure as a PNG.
    pub fn save(&self, output_path: &str) -> Result<(), gnuplot::GnuplotInitError> {
        let mut figure = Figure::new();
        self.render(&mut figure);
        figure.save_to_png(output_path, 800, 800)
    }

    /// Open an interactive gnuplot window.
    pub fn show(&self) -> Result<(), gnuplot::GnuplotInitError> {
        let mut figure = Figure::new();
        self.render(&mut figure);
        figure.show().map(|_| ())
    }
}
