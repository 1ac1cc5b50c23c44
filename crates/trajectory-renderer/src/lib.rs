//! Trajectory Renderer
//!
//! Relative-to-eye rendering of double-precision trajectories with wgpu.
//!
//! # Architecture
//!
//! - [`artist::TrajectoryArtist`] - Subscribes to one shared trajectory and
//!   drives a drawer
//! - [`traits::TrajectoryDrawer`] - Extension point for drawing styles
//! - [`rte::EyeRelativeEncoder`] - Splits f64 world points into f32
//!   coarse/residual pairs relative to the eye
//! - [`context::DrawContext`] - Per-frame eye position
//! - [`layer::TrajectoryLayer`] - Uploads and draws artists on the GPU
//!
//! # Module Structure
//!
//! ```text
//! trajectory-renderer/
//! ├── traits/          # Core abstractions (TrajectoryDrawer, Artist, VertexSink)
//! ├── artist.rs        # TrajectoryArtist
//! ├── rte.rs           # Relative-to-eye encoding
//! ├── vertex.rs        # RteVertex and vertex layout
//! ├── context.rs       # Per-frame eye state
//! ├── camera.rs        # Double-precision camera
//! ├── program.rs       # Shader programs
//! ├── pipeline.rs      # Pipeline utilities
//! ├── buffer.rs        # GPU vertex buffer
//! ├── layer.rs         # GPU layer
//! └── config.rs        # Renderer configuration
//! ```

// Core abstractions
pub mod artist;
pub mod context;
pub mod rte;
pub mod traits;

// Rendering infrastructure
pub mod buffer;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod layer;
pub mod pipeline;
pub mod program;
pub mod vertex;

// Re-exports for convenience
pub use artist::TrajectoryArtist;
pub use camera::{Camera, CameraUniform};
pub use config::RendererConfig;
pub use constants::VertexSlot;
pub use context::DrawContext;
pub use error::{RenderError, RenderResult};
pub use layer::TrajectoryLayer;
pub use program::ShaderProgram;
pub use rte::{EyeRelativeEncoder, split_relative_to_eye};
pub use traits::{Artist, TrajectoryDrawer, VertexSink};
pub use vertex::RteVertex;

pub use trajectory_core::{Trajectory, TrajectorySample, TrajectorySubscriber, TrajectoryView};
