//! GPU vertex buffer for eye-relative vertices

use crate::constants::buffer::GROWTH_FACTOR;
use crate::vertex::RteVertex;

/// Growable vertex buffer holding one frame's worth of [`RteVertex`] data.
///
/// Contents are rewritten every frame: eye-relative vertices are only valid
/// for the eye they were encoded against.
pub struct RteVertexBuffer {
    buffer: wgpu::Buffer,
    label: String,
    count: u32,
    capacity: u32,
}

impl RteVertexBuffer {
    /// Create a new vertex buffer with the given capacity.
    pub fn new(device: &wgpu::Device, label: &str, capacity: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, capacity),
            label: label.to_string(),
            count: 0,
            capacity,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} RTE Vertex Buffer", label)),
            size: (capacity as usize * std::mem::size_of::<RteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the buffer contents, growing it if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[RteVertex]) {
        let count = vertices.len().min(u32::MAX as usize);
        if count < vertices.len() {
            tracing::warn!(
                "Vertex count {} exceeds u32 range, truncating",
                vertices.len()
            );
        }
        let count = count as u32;

        if count > self.capacity {
            let capacity = grown_capacity(self.capacity, count);
            tracing::warn!(
                "{} vertex buffer grows from {} to {} vertices",
                self.label,
                self.capacity,
                capacity
            );
            self.buffer = Self::allocate(device, &self.label, capacity);
            self.capacity = capacity;
        }

        self.count = count;
        if count > 0 {
            queue.write_buffer(
                &self.buffer,
                0,
                bytemuck::cast_slice(&vertices[..count as usize]),
            );
        }
    }

    /// Forget the current contents.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Get the current vertex count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the capacity in vertices.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Get a buffer slice for use in render passes.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

fn grown_capacity(current: u32, required: u32) -> u32 {
    required.max(current.saturating_mul(GROWTH_FACTOR))
}
