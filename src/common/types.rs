//! Common types used throughout soccer_planning

use nalgebra::Vector2;
use rand::Rng;

/// Rectangular playing field.
///
/// Field coordinates follow the vision convention: x spans
/// `[-width/2, width/2]`, y spans `[0, length]` with our goal line at
/// `y = 0`. All dimensions are in meters and passed in explicitly so unit
/// tests can use synthetic field sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub length: f64,
}

impl FieldBounds {
    pub fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    /// Standard SSL field (6.05m x 8.09m)
    pub fn standard() -> Self {
        Self { width: 6.05, length: 8.09 }
    }

    /// Whether `pt` lies on the field after insetting every edge by
    /// `inset` (typically the robot radius, so the robot body stays in
    /// bounds, not just its center).
    pub fn contains(&self, pt: &Vector2<f64>, inset: f64) -> bool {
        pt.x.abs() <= self.width / 2.0 - inset
            && pt.y >= inset
            && pt.y <= self.length - inset
    }

    /// Uniformly random point on the field inset by `inset` on every edge.
    pub fn random_point<R: Rng>(&self, inset: f64, rng: &mut R) -> Vector2<f64> {
        let half_w = self.width / 2.0 - inset;
        Vector2::new(
            rng.gen_range(-half_w..=half_w),
            rng.gen_range(inset..=self.length - inset),
        )
    }
}

/// Kinematic limits used by the trapezoidal duration estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicLimits {
    /// Top translational speed [m/s]
    pub max_velocity: f64,
    /// Acceleration from rest [m/s^2]
    pub acceleration: f64,
    /// Deceleration to rest [m/s^2]
    pub deceleration: f64,
}

impl KinematicLimits {
    pub fn new(max_velocity: f64, acceleration: f64, deceleration: f64) -> Self {
        Self { max_velocity, acceleration, deceleration }
    }
}

impl Default for KinematicLimits {
    fn default() -> Self {
        Self {
            max_velocity: 2.0,
            acceleration: 1.5,
            deceleration: 2.5,
        }
    }
}
