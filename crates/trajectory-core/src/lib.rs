//! Trajectory Core
//!
//! Shared trajectory data source and the subscriber protocol used to keep
//! renderers in sync with it.
//!
//! # Overview
//!
//! - [`Trajectory`] - Append/clear sequence of double-precision samples
//! - [`TrajectorySubscriber`] - Observer notified when a trajectory changes
//! - [`TrajectoryView`] - Read-only access handed to renderers
//! - [`TrajectoryError`] - Rejected mutations
//!
//! Trajectories are shared through `Arc<Trajectory>`. Any number of
//! subscribers may read a trajectory; only its owner mutates it.

pub mod error;
pub mod sample;
pub mod subscriber;
pub mod trajectory;
pub mod view;

pub use error::{TrajectoryError, TrajectoryResult};
pub use sample::TrajectorySample;
pub use subscriber::TrajectorySubscriber;
pub use trajectory::Trajectory;
pub use view::TrajectoryView;
