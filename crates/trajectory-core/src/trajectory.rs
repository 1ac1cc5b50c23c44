//! Trajectory data source.

use std::sync::{Arc, Weak};

use glam::DVec3;
use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard};
use uuid::Uuid;

use crate::error::{TrajectoryError, TrajectoryResult};
use crate::sample::TrajectorySample;
use crate::subscriber::{SubscriberList, TrajectorySubscriber};
use crate::view::TrajectoryView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notification {
    Cleared,
    Added,
}

/// Pending notifications while auto-inform is disabled.
///
/// Each pending event remembers the subscribers registered when it was
/// recorded; later registrants do not receive it.
struct NotifyState {
    auto_inform: bool,
    cleared: Option<SubscriberList>,
    added: Option<SubscriberList>,
}

impl Default for NotifyState {
    fn default() -> Self {
        Self {
            auto_inform: true,
            cleared: None,
            added: None,
        }
    }
}

impl NotifyState {
    fn record(&mut self, notification: Notification, current: &SubscriberList) {
        let audience = match notification {
            Notification::Cleared => {
                // Samples appended before the clear are gone.
                self.added = None;
                &mut self.cleared
            }
            Notification::Added => &mut self.added,
        };
        audience.get_or_insert_with(SubscriberList::default).merge(current);
    }

    fn take_pending(&mut self) -> (Option<SubscriberList>, Option<SubscriberList>) {
        (self.cleared.take(), self.added.take())
    }
}

/// An ordered, append-only sequence of timestamped positions.
///
/// A trajectory is shared through `Arc<Trajectory>` between its owner, which
/// appends and clears samples, and any number of [`TrajectorySubscriber`]s
/// that only read it. Subscribers are held weakly, so subscribing never
/// extends the lifetime of either side.
///
/// Mutations notify every registered subscriber synchronously before they
/// return, unless auto-inform has been disabled with
/// [`Trajectory::set_auto_inform`].
pub struct Trajectory {
    id: Uuid,
    name: String,
    samples: RwLock<Vec<TrajectorySample>>,
    subscribers: Mutex<SubscriberList>,
    notify: Mutex<NotifyState>,
}

impl Trajectory {
    /// Create a new empty trajectory
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            samples: RwLock::new(Vec::new()),
            subscribers: Mutex::new(SubscriberList::default()),
            notify: Mutex::new(NotifyState::default()),
        }
    }

    /// Unique identifier of this trajectory
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name of this trajectory
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========== Mutation ==========

    /// Append a single sample.
    ///
    /// Returns the index of the new sample.
    pub fn add_sample(&self, sample: TrajectorySample) -> TrajectoryResult<usize> {
        let index = {
            let mut samples = self.samples.write();
            validate(samples.last(), samples.len(), &sample)?;
            samples.push(sample);
            samples.len() - 1
        };
        self.notify(Notification::Added);
        Ok(index)
    }

    /// Append a position at the given time.
    pub fn add_position(&self, time: f64, position: DVec3) -> TrajectoryResult<usize> {
        self.add_sample(TrajectorySample::new(time, position))
    }

    /// Append a batch of samples with a single notification.
    ///
    /// The whole batch is validated before anything is appended; on error the
    /// trajectory is left unchanged. Returns the number of appended samples.
    pub fn add_samples<I>(&self, batch: I) -> TrajectoryResult<usize>
    where
        I: IntoIterator<Item = TrajectorySample>,
    {
        let batch: Vec<TrajectorySample> = batch.into_iter().collect();
        if batch.is_empty() {
            return Ok(0);
        }

        {
            let mut samples = self.samples.write();
            let mut previous = samples.last().copied();
            for (offset, sample) in batch.iter().enumerate() {
                validate(previous.as_ref(), samples.len() + offset, sample)?;
                previous = Some(*sample);
            }
            samples.extend_from_slice(&batch);
        }

        self.notify(Notification::Added);
        Ok(batch.len())
    }

    /// Discard every sample.
    pub fn clear(&self) {
        let removed = {
            let mut samples = self.samples.write();
            let removed = samples.len();
            samples.clear();
            removed
        };
        tracing::debug!("Trajectory '{}' cleared ({} samples)", self.name, removed);
        self.notify(Notification::Cleared);
    }

    // ========== Notification control ==========

    /// Enable or disable immediate notification of subscribers.
    ///
    /// While disabled, mutations are recorded and delivered by the next call
    /// to [`Trajectory::inform_subscribers`]. Re-enabling flushes anything
    /// still pending.
    pub fn set_auto_inform(&self, enabled: bool) {
        self.notify.lock().auto_inform = enabled;
        if enabled {
            self.inform_subscribers();
        }
    }

    /// Whether mutations notify subscribers immediately
    pub fn auto_inform(&self) -> bool {
        self.notify.lock().auto_inform
    }

    /// Deliver pending notifications.
    ///
    /// A pending clear is delivered before a pending append. Each is delivered
    /// at most once, no matter how many mutations were recorded, and only to
    /// subscribers that were registered at one of those mutations and still
    /// are.
    pub fn inform_subscribers(&self) {
        let (cleared, added) = self.notify.lock().take_pending();
        if let Some(audience) = cleared {
            self.deliver(Notification::Cleared, Some(&audience));
        }
        if let Some(audience) = added {
            self.deliver(Notification::Added, Some(&audience));
        }
    }

    fn notify(&self, notification: Notification) {
        {
            let mut state = self.notify.lock();
            if !state.auto_inform {
                state.record(notification, &self.subscribers.lock());
                return;
            }
        }
        self.deliver(notification, None);
    }

    fn deliver(&self, notification: Notification, audience: Option<&SubscriberList>) {
        // Release the list before calling out so callbacks can read us and
        // subscribe or unsubscribe others.
        let mut subscribers = self.subscribers.lock().snapshot();
        if let Some(audience) = audience {
            subscribers.retain(|subscriber| audience.contains(&Arc::downgrade(subscriber)));
        }
        tracing::trace!(
            "Trajectory '{}' delivering {:?} to {} subscribers",
            self.name,
            notification,
            subscribers.len()
        );

        for subscriber in subscribers {
            match notification {
                Notification::Cleared => subscriber.data_cleared(self),
                Notification::Added => subscriber.data_added(self),
            }
        }
    }

    // ========== Subscribers ==========

    /// Register a subscriber.
    ///
    /// Returns false if the subscriber was already registered.
    pub fn add_subscriber(&self, subscriber: Weak<dyn TrajectorySubscriber>) -> bool {
        let added = self.subscribers.lock().insert(subscriber);
        if added {
            tracing::debug!("Trajectory '{}' gained a subscriber", self.name);
        }
        added
    }

    /// Unregister a subscriber.
    ///
    /// Returns false if the subscriber was not registered.
    pub fn remove_subscriber(&self, subscriber: &Weak<dyn TrajectorySubscriber>) -> bool {
        let removed = self.subscribers.lock().remove(subscriber);
        if removed {
            tracing::debug!("Trajectory '{}' lost a subscriber", self.name);
        }
        removed
    }

    /// Check whether a subscriber is registered
    pub fn is_subscribed(&self, subscriber: &Weak<dyn TrajectorySubscriber>) -> bool {
        self.subscribers.lock().contains(subscriber)
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().live_count()
    }

    // ========== Queries ==========

    /// Read-only view for renderers
    pub fn view(&self) -> TrajectoryView<'_> {
        TrajectoryView::new(self)
    }

    /// Read access to all samples.
    ///
    /// The guard blocks writers; drop it before mutating the trajectory.
    pub fn samples(&self) -> MappedRwLockReadGuard<'_, [TrajectorySample]> {
        RwLockReadGuard::map(self.samples.read(), |samples| samples.as_slice())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    /// Check if the trajectory has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    /// Get a sample by index
    pub fn sample(&self, index: usize) -> Option<TrajectorySample> {
        self.samples.read().get(index).copied()
    }

    /// Get the most recent sample
    pub fn last(&self) -> Option<TrajectorySample> {
        self.samples.read().last().copied()
    }

    /// Time span covered by the samples, as (first, last)
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let samples = self.samples.read();
        Some((samples.first()?.time, samples.last()?.time))
    }

    /// Index of the last sample whose time is at or before `time`
    pub fn index_at_time(&self, time: f64) -> Option<usize> {
        let samples = self.samples.read();
        samples
            .partition_point(|sample| sample.time <= time)
            .checked_sub(1)
    }

    /// Positions from `start` to the end, for incremental consumers
    pub fn positions_from(&self, start: usize) -> Vec<DVec3> {
        let samples = self.samples.read();
        samples
            .get(start..)
            .map(|tail| tail.iter().map(|sample| sample.position).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Trajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trajectory")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn validate(
    previous: Option<&TrajectorySample>,
    index: usize,
    sample: &TrajectorySample,
) -> TrajectoryResult<()> {
    if !sample.is_finite() {
        return Err(TrajectoryError::NonFiniteSample { index });
    }
    if let Some(previous) = previous
        && sample.time < previous.time
    {
        return Err(TrajectoryError::TimeOutOfOrder {
            index,
            time: sample.time,
            previous: previous.time,
        });
    }
    Ok(())
}
