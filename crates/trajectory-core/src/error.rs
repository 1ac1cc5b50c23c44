//! Error types for trajectory mutation

use thiserror::Error;

/// Error returned when a sample cannot be appended to a trajectory
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("Sample {index} has a non-finite time or position")]
    NonFiniteSample { index: usize },

    #[error("Sample {index} at t={time} precedes the previous sample at t={previous}")]
    TimeOutOfOrder {
        index: usize,
        time: f64,
        previous: f64,
    },
}

/// Result type for trajectory mutations
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;
