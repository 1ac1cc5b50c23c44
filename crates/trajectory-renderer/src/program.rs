//! Shader programs for trajectory rendering
//!
//! Every artist draws with the built-in relative-to-eye program unless it
//! carries an override. Custom programs must consume the vertex layout of
//! [`RteVertex`](crate::vertex::RteVertex): coarse offset at
//! [`attributes::POSITION`](crate::constants::attributes::POSITION), residual
//! at [`attributes::VERTEX_LOW`](crate::constants::attributes::VERTEX_LOW).

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use crate::constants::program::{DEFAULT_LABEL, FS_ENTRY, VS_ENTRY};

static DEFAULT_PROGRAM: LazyLock<Arc<ShaderProgram>> = LazyLock::new(|| {
    Arc::new(ShaderProgram::new(
        DEFAULT_LABEL,
        include_str!("../shaders/rte.wgsl"),
    ))
});

/// A WGSL program with its entry points.
///
/// Programs compare by value: two programs with the same label but different
/// sources or entry points are different programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    label: String,
    source: Cow<'static, str>,
    vs_entry: String,
    fs_entry: String,
}

impl ShaderProgram {
    /// Create a program using the default `vs_main` / `fs_main` entry points.
    pub fn new(label: impl Into<String>, source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            vs_entry: VS_ENTRY.to_string(),
            fs_entry: FS_ENTRY.to_string(),
        }
    }

    /// Use different entry points.
    pub fn with_entry_points(mut self, vs_entry: &str, fs_entry: &str) -> Self {
        self.vs_entry = vs_entry.to_string();
        self.fs_entry = fs_entry.to_string();
        self
    }

    /// The shared built-in relative-to-eye program.
    pub fn default_rte() -> Arc<ShaderProgram> {
        Arc::clone(&DEFAULT_PROGRAM)
    }

    /// Program label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// WGSL source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Vertex shader entry point
    pub fn vs_entry(&self) -> &str {
        &self.vs_entry
    }

    /// Fragment shader entry point
    pub fn fs_entry(&self) -> &str {
        &self.fs_entry
    }

    /// Compile the program into a shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Shader", self.label)),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.source())),
        })
    }
}
