//! Artist trait definition.

use std::sync::Arc;

use uuid::Uuid;

use crate::context::DrawContext;
use crate::error::RenderResult;
use crate::program::ShaderProgram;
use crate::traits::VertexSink;

/// Object-safe view of an artist, whatever its drawer type.
///
/// Lets a [`TrajectoryLayer`](crate::layer::TrajectoryLayer) draw artists
/// with different drawing styles in one frame.
pub trait Artist: Send + Sync {
    /// Returns the unique id of this artist.
    fn id(&self) -> Uuid;

    /// Returns the program this artist draws with.
    fn effective_program(&self) -> Arc<ShaderProgram>;

    /// Emit this frame's vertices. See
    /// [`TrajectoryArtist::draw`](crate::artist::TrajectoryArtist::draw).
    fn draw(&self, context: &DrawContext, sink: &mut dyn VertexSink) -> RenderResult<usize>;
}
