//! TrajectoryDrawer trait definition.

use trajectory_core::TrajectoryView;

use crate::error::RenderResult;
use crate::rte::EyeRelativeEncoder;
use crate::traits::VertexSink;

/// The drawing style of a [`TrajectoryArtist`](crate::artist::TrajectoryArtist).
///
/// The artist owns subscription and lifetime management; a drawer only
/// decides what geometry a trajectory turns into. Notifications are forwarded
/// to the drawer only when they come from the artist's current trajectory.
///
/// Drawers see the trajectory through a [`TrajectoryView`], which has no
/// mutating methods: a drawer cannot append to or clear the trajectory it is
/// being notified about.
///
/// # Caching
///
/// Drawers may cache anything derived from the trajectory in double
/// precision (positions, indices, bounds), but never eye-relative vertices:
/// those are produced in [`draw`](TrajectoryDrawer::draw) with the encoder
/// for the current frame.
pub trait TrajectoryDrawer: Send + 'static {
    /// The trajectory's samples were discarded, or the artist switched to
    /// `trajectory`. Rebuild any cached state from scratch.
    fn data_cleared(&mut self, trajectory: TrajectoryView<'_>);

    /// Samples were appended to `trajectory`. Extend cached state
    /// incrementally where possible.
    fn data_added(&mut self, trajectory: TrajectoryView<'_>);

    /// The artist no longer has a trajectory. Drop all cached state.
    fn detached(&mut self) {}

    /// Emit eye-relative vertices for `trajectory` into `sink`.
    fn draw(
        &self,
        trajectory: TrajectoryView<'_>,
        encoder: &EyeRelativeEncoder,
        sink: &mut dyn VertexSink,
    ) -> RenderResult<()>;
}
