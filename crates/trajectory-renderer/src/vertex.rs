//! Vertex types and attribute utilities
//!
//! The relative-to-eye vertex carries two `Float32x3` attributes: the coarse
//! eye-relative position at [`attributes::POSITION`] and the residual at the
//! reserved [`attributes::VERTEX_LOW`] location.

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Vec3};

use crate::constants::attributes;

/// Creates a vertex attribute with the offset calculated from the struct field.
///
/// # Example
///
/// ```ignore
/// #[repr(C)]
/// struct MyVertex {
///     position: [f32; 3],
///     color: [f32; 4],
/// }
///
/// const VERTEX_ATTRIBUTES: &[wgpu::VertexAttribute] = &[
///     vertex_attr!(MyVertex, position, 0, Float32x3),
///     vertex_attr!(MyVertex, color, 1, Float32x4),
/// ];
/// ```
#[macro_export]
macro_rules! vertex_attr {
    ($struct:ty, $field:ident, $location:expr, $format:ident) => {
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!($struct, $field) as u64,
            shader_location: $location,
            format: wgpu::VertexFormat::$format,
        }
    };
}

/// An eye-relative vertex pair.
///
/// `coarse + residual` (added on the GPU) reconstructs the offset of a world
/// point from the eye. Produced per draw by
/// [`EyeRelativeEncoder`](crate::rte::EyeRelativeEncoder); never cache it
/// across eye movement.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct RteVertex {
    /// Eye-relative offset rounded to f32.
    pub coarse: [f32; 3],
    /// Rounding error of `coarse`, rounded to f32.
    pub residual: [f32; 3],
}

impl RteVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        vertex_attr!(RteVertex, coarse, attributes::POSITION, Float32x3),
        vertex_attr!(RteVertex, residual, attributes::VERTEX_LOW, Float32x3),
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }

    /// Offset as the GPU reconstructs it: a single f32 addition.
    pub fn reconstruct(&self) -> Vec3 {
        Vec3::from_array(self.coarse) + Vec3::from_array(self.residual)
    }

    /// Offset reconstructed in double precision.
    ///
    /// Recovers the eye-relative offset to roughly 48 bits of mantissa.
    pub fn reconstruct_f64(&self) -> DVec3 {
        Vec3::from_array(self.coarse).as_dvec3() + Vec3::from_array(self.residual).as_dvec3()
    }
}
