//! Renderer configuration structures
//!
//! This module provides configurable settings for trajectory rendering that
//! can be serialized to and loaded from RON files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::buffer::DEFAULT_VERTEX_CAPACITY;
use crate::error::{RenderError, RenderResult};

/// Camera default configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near_plane: f32,
    /// Far clipping plane distance
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            near_plane: 1.0,
            far_plane: 1.0e12,
        }
    }
}

/// Primitive assembly for trajectory geometry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Topology {
    /// Connected polyline through consecutive vertices
    #[default]
    LineStrip,
    /// Independent segments from vertex pairs
    LineList,
    /// One point per vertex
    PointList,
}

impl Topology {
    /// The matching wgpu primitive topology.
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
            Topology::PointList => wgpu::PrimitiveTopology::PointList,
        }
    }
}

/// Pipeline settings for trajectory rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineSettings {
    /// How vertices are assembled into primitives
    pub topology: Topology,
    /// Whether trajectories are depth tested against the scene
    pub depth_test: bool,
    /// Trajectory color (RGBA)
    pub color: [f32; 4],
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            topology: Topology::LineStrip,
            depth_test: true,
            color: [1.0, 0.8, 0.2, 1.0],
        }
    }
}

/// GPU vertex buffer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BufferConfig {
    /// Number of vertices a new buffer can hold before growing
    pub initial_vertex_capacity: u32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: DEFAULT_VERTEX_CAPACITY,
        }
    }
}

/// Complete renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererConfig {
    /// Camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineSettings,
    /// Vertex buffer settings
    #[serde(default)]
    pub buffer: BufferConfig,
}

impl RendererConfig {
    /// Create a new renderer configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from RON text
    pub fn from_ron_str(text: &str) -> RenderResult<Self> {
        ron::from_str(text).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Serialize the configuration to pretty-printed RON
    pub fn to_ron_string(&self) -> RenderResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RenderError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!("Loaded renderer config from {:?}", path);
        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let text = self.to_ron_string()?;
        std::fs::write(path, text).map_err(|e| RenderError::Io(e.to_string()))?;
        tracing::info!("Saved renderer config to {:?}", path);
        Ok(())
    }
}
