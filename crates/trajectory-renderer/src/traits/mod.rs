//! Core traits for the artist system.
//!
//! This module defines the extension point concrete trajectory renderers
//! implement, the object-safe view the layer draws through, and the sink
//! vertices are submitted to.

mod artist;
mod drawer;
mod sink;

pub use artist::*;
pub use drawer::*;
pub use sink::*;

pub(crate) use sink::CountingSink;
