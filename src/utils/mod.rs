//! Utility modules for soccer_planning

pub mod visualization;

pub use visualization::{colors, FieldPlot};
