//! Common types, traits, and error definitions for soccer_planning
//!
//! This module provides the foundational building blocks shared by the
//! position and velocity planners.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
