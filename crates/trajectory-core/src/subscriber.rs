//! Subscriber protocol between a trajectory and its observers.

use std::sync::{Arc, Weak};

use crate::trajectory::Trajectory;

/// An observer of trajectory changes.
///
/// Notifications are delivered synchronously on the thread that mutated the
/// trajectory, before the mutating call returns. For a given subscriber,
/// `data_added` calls arrive in append order and a `data_cleared` always
/// precedes the `data_added` calls that follow the reset.
///
/// # Reentrancy
///
/// Implementations may read the trajectory from inside a callback, but must
/// not mutate it (append, clear, or flush notifications). Doing so from a
/// callback has no defined ordering.
pub trait TrajectorySubscriber: Send + Sync {
    /// Called when all samples of `trajectory` were discarded.
    ///
    /// Any geometry derived from `trajectory` is invalid afterwards.
    fn data_cleared(&self, trajectory: &Trajectory);

    /// Called when one or more samples were appended to `trajectory` since
    /// the previous notification.
    fn data_added(&self, trajectory: &Trajectory);
}

/// Identity-keyed set of weakly held subscribers.
///
/// Subscribers are compared by the address of the object they point to, so
/// the same observer cannot be registered twice. Entries whose subscriber has
/// been dropped are pruned lazily.
#[derive(Default, Clone)]
pub(crate) struct SubscriberList {
    entries: Vec<Weak<dyn TrajectorySubscriber>>,
}

impl SubscriberList {
    /// Insert a subscriber. Returns false if it was already present.
    pub(crate) fn insert(&mut self, subscriber: Weak<dyn TrajectorySubscriber>) -> bool {
        if self.contains(&subscriber) {
            return false;
        }
        self.entries.push(subscriber);
        true
    }

    /// Remove a subscriber. Returns false if it was not present.
    pub(crate) fn remove(&mut self, subscriber: &Weak<dyn TrajectorySubscriber>) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !same_subscriber(entry, subscriber));
        self.entries.len() != before
    }

    /// Add every subscriber of `other` that is not already present.
    pub(crate) fn merge(&mut self, other: &SubscriberList) {
        for entry in &other.entries {
            self.insert(entry.clone());
        }
    }

    pub(crate) fn contains(&self, subscriber: &Weak<dyn TrajectorySubscriber>) -> bool {
        self.entries
            .iter()
            .any(|entry| same_subscriber(entry, subscriber))
    }

    /// Number of subscribers that are still alive.
    pub(crate) fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Upgrade every live subscriber, dropping dead entries.
    ///
    /// The returned snapshot is what a single notification is delivered to.
    pub(crate) fn snapshot(&mut self) -> Vec<Arc<dyn TrajectorySubscriber>> {
        self.entries.retain(|entry| entry.strong_count() > 0);
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }
}

fn same_subscriber(a: &Weak<dyn TrajectorySubscriber>, b: &Weak<dyn TrajectorySubscriber>) -> bool {
    std::ptr::addr_eq(a.as_ptr(), b.as_ptr())
}
