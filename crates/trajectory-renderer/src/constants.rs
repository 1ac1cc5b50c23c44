//! Renderer constants
//!
//! Shader locations and sizes shared between the CPU-side vertex layout and
//! the WGSL programs.

/// Vertex attribute locations of the relative-to-eye vertex layout.
pub mod attributes {
    /// Coarse eye-relative position (`vec3<f32>`).
    pub const POSITION: u32 = 0;
    /// Residual (low-order) eye-relative position (`vec3<f32>`).
    ///
    /// Custom programs must read the residual from this location.
    pub const VERTEX_LOW: u32 = 1;
}

/// Vertex buffer sizing.
pub mod buffer {
    /// Vertex capacity of a freshly created buffer.
    pub const DEFAULT_VERTEX_CAPACITY: u32 = 4096;
    /// Growth factor applied when an upload exceeds capacity.
    pub const GROWTH_FACTOR: u32 = 2;
}

/// Default program entry points.
pub mod program {
    /// Label of the built-in relative-to-eye program.
    pub const DEFAULT_LABEL: &str = "Trajectory RTE";
    /// Vertex shader entry point.
    pub const VS_ENTRY: &str = "vs_main";
    /// Fragment shader entry point.
    pub const FS_ENTRY: &str = "fs_main";
}

/// Vertex attribute slots of the relative-to-eye layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSlot {
    /// Coarse component, see [`attributes::POSITION`].
    Position,
    /// Residual component, see [`attributes::VERTEX_LOW`].
    VertexLow,
}

impl VertexSlot {
    /// Shader location of this slot.
    pub const fn location(self) -> u32 {
        match self {
            VertexSlot::Position => attributes::POSITION,
            VertexSlot::VertexLow => attributes::VERTEX_LOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_distinct() {
        assert_eq!(VertexSlot::Position.location(), attributes::POSITION);
        assert_eq!(VertexSlot::VertexLow.location(), attributes::VERTEX_LOW);
        assert_ne!(
            VertexSlot::Position.location(),
            VertexSlot::VertexLow.location()
        );
    }
}
