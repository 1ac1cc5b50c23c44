//! Read-only access to a trajectory.

use glam::DVec3;
use parking_lot::MappedRwLockReadGuard;
use uuid::Uuid;

use crate::sample::TrajectorySample;
use crate::trajectory::Trajectory;

/// A borrowed, read-only view of a [`Trajectory`].
///
/// Renderers receive trajectories through this view so that drawing code
/// cannot append, clear, or flush notifications.
#[derive(Clone, Copy)]
pub struct TrajectoryView<'a> {
    trajectory: &'a Trajectory,
}

impl<'a> TrajectoryView<'a> {
    pub(crate) fn new(trajectory: &'a Trajectory) -> Self {
        Self { trajectory }
    }

    /// Unique identifier of the trajectory
    pub fn id(&self) -> Uuid {
        self.trajectory.id()
    }

    /// Display name of the trajectory
    pub fn name(&self) -> &'a str {
        self.trajectory.name()
    }

    /// Read access to all samples.
    pub fn samples(&self) -> MappedRwLockReadGuard<'a, [TrajectorySample]> {
        self.trajectory.samples()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    /// Check if the trajectory has no samples
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    /// Get a sample by index
    pub fn sample(&self, index: usize) -> Option<TrajectorySample> {
        self.trajectory.sample(index)
    }

    /// Get the most recent sample
    pub fn last(&self) -> Option<TrajectorySample> {
        self.trajectory.last()
    }

    /// Time span covered by the samples
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.trajectory.time_range()
    }

    /// Index of the last sample whose time is at or before `time`
    pub fn index_at_time(&self, time: f64) -> Option<usize> {
        self.trajectory.index_at_time(time)
    }

    /// Positions from `start` to the end
    pub fn positions_from(&self, start: usize) -> Vec<DVec3> {
        self.trajectory.positions_from(start)
    }

    /// Returns true if this view reads `trajectory`.
    pub fn is(&self, trajectory: &Trajectory) -> bool {
        std::ptr::eq(self.trajectory, trajectory)
    }
}

impl std::fmt::Debug for TrajectoryView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TrajectoryView").field(self.trajectory).finish()
    }
}
