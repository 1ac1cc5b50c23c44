//! Trajectory artist: keeps a drawer in sync with one shared trajectory.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use trajectory_core::{Trajectory, TrajectorySubscriber};
use uuid::Uuid;

use crate::context::DrawContext;
use crate::error::RenderResult;
use crate::program::ShaderProgram;
use crate::traits::{Artist, CountingSink, TrajectoryDrawer, VertexSink};

/// Mutable artist state, guarded as a unit so trajectory replacement and
/// notification handling never interleave.
struct ArtistState<D> {
    trajectory: Option<Arc<Trajectory>>,
    program: Option<Arc<ShaderProgram>>,
    drawer: D,
}

/// The part of an artist a trajectory holds (weakly) as its subscriber.
struct ArtistShared<D> {
    id: Uuid,
    state: Mutex<ArtistState<D>>,
}

impl<D: TrajectoryDrawer> TrajectorySubscriber for ArtistShared<D> {
    fn data_cleared(&self, trajectory: &Trajectory) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if is_current(state.trajectory.as_ref(), trajectory) {
            state.drawer.data_cleared(trajectory.view());
        } else {
            tracing::trace!(
                "Artist {} ignored stale clear from '{}'",
                self.id,
                trajectory.name()
            );
        }
    }

    fn data_added(&self, trajectory: &Trajectory) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if is_current(state.trajectory.as_ref(), trajectory) {
            state.drawer.data_added(trajectory.view());
        } else {
            tracing::trace!(
                "Artist {} ignored stale append from '{}'",
                self.id,
                trajectory.name()
            );
        }
    }
}

fn is_current(current: Option<&Arc<Trajectory>>, trajectory: &Trajectory) -> bool {
    current.is_some_and(|current| std::ptr::eq(Arc::as_ptr(current), trajectory))
}

/// Draws one shared [`Trajectory`] through a [`TrajectoryDrawer`].
///
/// The artist subscribes to the trajectory it is given and forwards change
/// notifications to its drawer. At draw time the drawer encodes positions
/// relative to the current eye.
///
/// # Ownership
///
/// The artist holds an `Arc` to its trajectory and never mutates it. The
/// trajectory only holds the artist weakly; dropping the artist unsubscribes
/// it.
///
/// # Copying
///
/// Cloning an artist (when the drawer is `Clone`) shares the trajectory
/// handle but registers the copy as a separate subscriber with its own id.
///
/// # Reentrancy
///
/// Drawers must not call back into their own artist from `data_cleared`,
/// `data_added` or `draw`.
pub struct TrajectoryArtist<D: TrajectoryDrawer> {
    shared: Arc<ArtistShared<D>>,
}

impl<D: TrajectoryDrawer> TrajectoryArtist<D> {
    /// Create an artist with no trajectory.
    pub fn new(drawer: D) -> Self {
        Self::with_program(drawer, None)
    }

    fn with_program(drawer: D, program: Option<Arc<ShaderProgram>>) -> Self {
        Self {
            shared: Arc::new(ArtistShared {
                id: Uuid::new_v4(),
                state: Mutex::new(ArtistState {
                    trajectory: None,
                    program,
                    drawer,
                }),
            }),
        }
    }

    /// Unique identifier of this artist.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    fn subscriber(&self) -> Weak<dyn TrajectorySubscriber> {
        let weak: Weak<ArtistShared<D>> = Arc::downgrade(&self.shared);
        weak
    }

    /// Replace the trajectory being drawn.
    ///
    /// Setting the trajectory already in use does nothing. Otherwise the
    /// artist moves its subscription from the old trajectory to the new one
    /// and resets its drawer: `data_cleared(new)` for a new trajectory,
    /// `detached()` for `None`.
    pub fn set_trajectory(&self, trajectory: Option<Arc<Trajectory>>) {
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let unchanged = match (&state.trajectory, &trajectory) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        // Notifications take the state lock, so while it is held no
        // trajectory can reach this artist between the two steps.
        let subscriber = self.subscriber();
        if let Some(new) = &trajectory {
            new.add_subscriber(subscriber.clone());
        }
        if let Some(old) = state.trajectory.take() {
            old.remove_subscriber(&subscriber);
        }
        state.trajectory = trajectory;

        match &state.trajectory {
            Some(current) => {
                tracing::debug!("Artist {} now draws '{}'", self.shared.id, current.name());
                state.drawer.data_cleared(current.view());
            }
            None => {
                tracing::debug!("Artist {} detached", self.shared.id);
                state.drawer.detached();
            }
        }
    }

    /// The trajectory being drawn.
    pub fn trajectory(&self) -> Option<Arc<Trajectory>> {
        self.shared.state.lock().trajectory.clone()
    }

    /// Returns true if a trajectory is set.
    pub fn has_trajectory(&self) -> bool {
        self.shared.state.lock().trajectory.is_some()
    }

    /// Override the shader program, or restore the default with `None`.
    pub fn set_program(&self, program: Option<Arc<ShaderProgram>>) {
        self.shared.state.lock().program = program;
    }

    /// The program override, if any.
    pub fn program(&self) -> Option<Arc<ShaderProgram>> {
        self.shared.state.lock().program.clone()
    }

    /// The program this artist draws with.
    pub fn effective_program(&self) -> Arc<ShaderProgram> {
        self.program().unwrap_or_else(ShaderProgram::default_rte)
    }

    /// Run `f` with shared access to the drawer.
    pub fn with_drawer<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.shared.state.lock().drawer)
    }

    /// Emit this frame's vertices into `sink`.
    ///
    /// Without a trajectory nothing is drawn and the eye is not consulted.
    /// Otherwise the eye must be established in `context`. Returns the number
    /// of submitted vertices.
    pub fn draw(&self, context: &DrawContext, sink: &mut dyn VertexSink) -> RenderResult<usize> {
        let state = self.shared.state.lock();
        let Some(trajectory) = state.trajectory.as_deref() else {
            return Ok(0);
        };

        let encoder = context.encoder()?;
        let mut counting = CountingSink::new(sink);
        state.drawer.draw(trajectory.view(), &encoder, &mut counting)?;
        Ok(counting.count())
    }
}

impl<D: TrajectoryDrawer + Default> Default for TrajectoryArtist<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: TrajectoryDrawer + Clone> Clone for TrajectoryArtist<D> {
    fn clone(&self) -> Self {
        let (drawer, program, trajectory) = {
            let state = self.shared.state.lock();
            (
                state.drawer.clone(),
                state.program.clone(),
                state.trajectory.clone(),
            )
        };

        let copy = Self::with_program(drawer, program);
        copy.set_trajectory(trajectory);
        copy
    }
}

impl<D: TrajectoryDrawer> Drop for TrajectoryArtist<D> {
    fn drop(&mut self) {
        let trajectory = self.shared.state.lock().trajectory.take();
        if let Some(trajectory) = trajectory {
            trajectory.remove_subscriber(&self.subscriber());
        }
    }
}

impl<D: TrajectoryDrawer> std::fmt::Debug for TrajectoryArtist<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("TrajectoryArtist")
            .field("id", &self.shared.id)
            .field("trajectory", &state.trajectory.as_ref().map(|t| t.name()))
            .field("program", &state.program.as_ref().map(|p| p.label()))
            .finish()
    }
}

impl<D: TrajectoryDrawer> Artist for TrajectoryArtist<D> {
    fn id(&self) -> Uuid {
        TrajectoryArtist::id(self)
    }

    fn effective_program(&self) -> Arc<ShaderProgram> {
        TrajectoryArtist::effective_program(self)
    }

    fn draw(&self, context: &DrawContext, sink: &mut dyn VertexSink) -> RenderResult<usize> {
        TrajectoryArtist::draw(self, context, sink)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use trajectory_core::TrajectoryView;

    use super::*;
    use crate::error::RenderError;
    use crate::rte::EyeRelativeEncoder;
    use crate::vertex::RteVertex;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Cleared,
        Added,
        Detached,
    }

    /// Caches positions incrementally and records what it was told.
    #[derive(Debug, Clone, Default)]
    struct PolylineDrawer {
        points: Vec<DVec3>,
        events: Vec<Event>,
        source: Option<Uuid>,
    }

    impl TrajectoryDrawer for PolylineDrawer {
        fn data_cleared(&mut self, trajectory: TrajectoryView<'_>) {
            self.events.push(Event::Cleared);
            self.source = Some(trajectory.id());
            self.points = trajectory.positions_from(0);
        }

        fn data_added(&mut self, trajectory: TrajectoryView<'_>) {
            self.events.push(Event::Added);
            let cached = self.points.len();
            self.points.extend(trajectory.positions_from(cached));
        }

        fn detached(&mut self) {
            self.events.push(Event::Detached);
            self.source = None;
            self.points.clear();
        }

        fn draw(
            &self,
            _trajectory: TrajectoryView<'_>,
            encoder: &EyeRelativeEncoder,
            sink: &mut dyn VertexSink,
        ) -> RenderResult<()> {
            encoder.encode_into(self.points.iter().copied(), sink);
            Ok(())
        }
    }

    fn events(artist: &TrajectoryArtist<PolylineDrawer>) -> Vec<Event> {
        artist.with_drawer(|drawer| drawer.events.clone())
    }

    fn point_count(artist: &TrajectoryArtist<PolylineDrawer>) -> usize {
        artist.with_drawer(|drawer| drawer.points.len())
    }

    fn shared(name: &str) -> Arc<Trajectory> {
        Arc::new(Trajectory::new(name))
    }

    #[test]
    fn test_set_trajectory_subscribes_once() {
        let trajectory = shared("t");
        let artist: TrajectoryArtist<PolylineDrawer> = TrajectoryArtist::default();
        assert!(!artist.has_trajectory());

        artist.set_trajectory(Some(trajectory.clone()));
        artist.set_trajectory(Some(trajectory.clone()));
        assert_eq!(trajectory.subscriber_count(), 1);
        assert_eq!(events(&artist), vec![Event::Cleared]);

        trajectory.add_position(0.0, DVec3::ZERO).unwrap();
        assert_eq!(events(&artist), vec![Event::Cleared, Event::Added]);
    }

    #[test]
    fn test_drawer_reads_current_trajectory() {
        let first = shared("first");
        let second = shared("second");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());

        artist.set_trajectory(Some(first.clone()));
        assert_eq!(artist.with_drawer(|d| d.source), Some(first.id()));

        artist.set_trajectory(Some(second.clone()));
        assert_eq!(artist.with_drawer(|d| d.source), Some(second.id()));

        artist.set_trajectory(None);
        assert_eq!(artist.with_drawer(|d| d.source), None);
    }

    #[test]
    fn test_replacing_trajectory_moves_subscription() {
        let first = shared("first");
        let second = shared("second");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());

        artist.set_trajectory(Some(first.clone()));
        artist.set_trajectory(Some(second.clone()));

        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);
        assert!(Arc::ptr_eq(&artist.trajectory().unwrap(), &second));

        first.add_position(0.0, DVec3::ZERO).unwrap();
        assert_eq!(events(&artist), vec![Event::Cleared, Event::Cleared]);
    }

    #[test]
    fn test_stale_notification_is_ignored() {
        let first = shared("first");
        let second = shared("second");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(first.clone()));
        artist.set_trajectory(Some(second.clone()));

        // An event already in flight from the replaced trajectory.
        first.add_position(0.0, DVec3::X).unwrap();
        artist.shared.data_added(&first);
        artist.shared.data_cleared(&first);

        assert_eq!(events(&artist), vec![Event::Cleared, Event::Cleared]);
        assert_eq!(point_count(&artist), 0);
    }

    #[test]
    fn test_detach_leaves_artist_idle() {
        let trajectory = shared("t");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(trajectory.clone()));
        trajectory.add_position(0.0, DVec3::ZERO).unwrap();

        artist.set_trajectory(None);
        artist.set_trajectory(None);

        assert!(!artist.has_trajectory());
        assert_eq!(trajectory.subscriber_count(), 0);
        assert_eq!(
            events(&artist),
            vec![Event::Cleared, Event::Added, Event::Detached]
        );
    }

    #[test]
    fn test_draw_without_trajectory_is_noop() {
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        let mut vertices: Vec<RteVertex> = Vec::new();

        // No eye either: the missing trajectory wins.
        assert_eq!(artist.draw(&DrawContext::new(), &mut vertices), Ok(0));
        assert!(vertices.is_empty());
    }

    #[test]
    fn test_draw_without_eye_fails() {
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(shared("t")));
        let mut vertices: Vec<RteVertex> = Vec::new();

        let result = artist.draw(&DrawContext::new(), &mut vertices);
        assert_eq!(result, Err(RenderError::EyeNotEstablished));
    }

    #[test]
    fn test_interplanetary_append_and_draw() {
        let trajectory = shared("probe");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(trajectory.clone()));

        trajectory
            .add_position(0.0, DVec3::new(1.0e11, 0.0, 0.0))
            .unwrap();
        assert_eq!(events(&artist), vec![Event::Cleared, Event::Added]);

        let context = DrawContext::with_eye(DVec3::new(1.0e11, 0.0, 1000.0));
        let mut vertices: Vec<RteVertex> = Vec::new();
        assert_eq!(artist.draw(&context, &mut vertices), Ok(1));

        let vertex = vertices[0];
        assert_eq!(vertex.coarse, [0.0, 0.0, -1000.0]);
        assert_eq!(vertex.reconstruct_f64(), DVec3::new(0.0, 0.0, -1000.0));
    }

    #[test]
    fn test_draw_follows_the_eye() {
        let trajectory = shared("t");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(trajectory.clone()));
        trajectory.add_position(0.0, DVec3::new(5.0, 0.0, 0.0)).unwrap();

        let mut context = DrawContext::with_eye(DVec3::ZERO);
        let mut first: Vec<RteVertex> = Vec::new();
        artist.draw(&context, &mut first).unwrap();

        context.set_eye(DVec3::new(1.0, 0.0, 0.0));
        let mut second: Vec<RteVertex> = Vec::new();
        artist.draw(&context, &mut second).unwrap();

        assert_eq!(first[0].coarse, [5.0, 0.0, 0.0]);
        assert_eq!(second[0].coarse, [4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_copy_subscribes_independently() {
        let trajectory = shared("t");
        let original = TrajectoryArtist::new(PolylineDrawer::default());
        original.set_trajectory(Some(trajectory.clone()));
        trajectory.add_position(0.0, DVec3::ZERO).unwrap();

        let copy = original.clone();
        assert_ne!(copy.id(), original.id());
        assert!(Arc::ptr_eq(&copy.trajectory().unwrap(), &trajectory));
        assert_eq!(trajectory.subscriber_count(), 2);
        assert_eq!(point_count(&copy), 1);

        trajectory.clear();
        assert_eq!(
            events(&original),
            vec![Event::Cleared, Event::Added, Event::Cleared]
        );
        assert_eq!(
            events(&copy),
            vec![Event::Cleared, Event::Added, Event::Cleared, Event::Cleared]
        );
        assert_eq!(point_count(&original), 0);
        assert_eq!(point_count(&copy), 0);

        drop(copy);
        assert_eq!(trajectory.subscriber_count(), 1);
    }

    #[test]
    fn test_drop_unsubscribes_and_releases_trajectory() {
        let trajectory = shared("t");
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        artist.set_trajectory(Some(trajectory.clone()));
        assert_eq!(Arc::strong_count(&trajectory), 2);

        drop(artist);
        assert_eq!(trajectory.subscriber_count(), 0);
        assert_eq!(Arc::strong_count(&trajectory), 1);
    }

    #[test]
    fn test_program_override() {
        let artist = TrajectoryArtist::new(PolylineDrawer::default());
        assert!(artist.program().is_none());
        assert!(Arc::ptr_eq(
            &artist.effective_program(),
            &ShaderProgram::default_rte()
        ));

        let custom = Arc::new(ShaderProgram::new("Custom", "// custom"));
        artist.set_program(Some(custom.clone()));
        assert!(Arc::ptr_eq(&artist.effective_program(), &custom));
        assert!(Arc::ptr_eq(&artist.clone().effective_program(), &custom));

        artist.set_program(None);
        assert_eq!(artist.effective_program().label(), ShaderProgram::default_rte().label());
    }
}
