//! Error types for soccer_planning

use std::fmt;

/// Failure outcomes of a planning attempt.
///
/// Both variants are expected, recoverable results: callers fall back to
/// "no plan this cycle", hold position, or retry with relaxed obstacles.
/// Neither should ever terminate the process.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// The iteration or retry budget ran out before a feasible path was
    /// found. Normal for crowded fields; not an internal fault.
    Exhausted {
        /// Number of iterations the planner ran before giving up.
        iterations: usize,
    },
    /// The start or goal state itself failed the feasibility oracle
    /// (e.g. already inside an obstacle, or off the field). Surfaced
    /// distinctly from `Exhausted` so callers can decide whether to relax
    /// constraints versus retry.
    InvalidInput(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Exhausted { iterations } => {
                write!(f, "no feasible path within {} iterations", iterations)
            }
            PlannerError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planning operations
pub type PlannerResult<T> = Result<T, PlannerError>;
