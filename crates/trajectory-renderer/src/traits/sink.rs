//! Vertex submission target.

use crate::vertex::RteVertex;

/// Receives eye-relative vertices produced at draw time.
///
/// Implemented for `Vec<RteVertex>` so a frame's vertices can be collected
/// and uploaded with [`RteVertexBuffer`](crate::buffer::RteVertexBuffer).
pub trait VertexSink {
    /// Submit one vertex.
    fn submit(&mut self, vertex: RteVertex);
}

impl VertexSink for Vec<RteVertex> {
    fn submit(&mut self, vertex: RteVertex) {
        self.push(vertex);
    }
}

/// Counts vertices on their way to another sink.
pub(crate) struct CountingSink<'a> {
    inner: &'a mut dyn VertexSink,
    count: usize,
}

impl<'a> CountingSink<'a> {
    pub(crate) fn new(inner: &'a mut dyn VertexSink) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl VertexSink for CountingSink<'_> {
    fn submit(&mut self, vertex: RteVertex) {
        self.count += 1;
        self.inner.submit(vertex);
    }
}
