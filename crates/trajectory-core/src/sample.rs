//! Trajectory sample definition

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A single timestamped position along a trajectory.
///
/// Positions are kept in double precision; conversion to GPU floats happens
/// relative to the eye at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: DVec3,
}

impl TrajectorySample {
    /// Create a new sample
    pub fn new(time: f64, position: DVec3) -> Self {
        Self { time, position }
    }

    /// Check that time and every position component are finite
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.position.is_finite()
    }
}
