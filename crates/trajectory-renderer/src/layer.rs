//! GPU layer that uploads and draws artists' eye-relative geometry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::buffer::RteVertexBuffer;
use crate::camera::{Camera, CameraUniform};
use crate::config::{PipelineSettings, RendererConfig};
use crate::context::DrawContext;
use crate::error::RenderResult;
use crate::pipeline::{PipelineConfig, create_camera_bind_group, create_camera_bind_group_layout};
use crate::program::ShaderProgram;
use crate::traits::Artist;
use crate::vertex::RteVertex;

/// Uploaded geometry of one artist.
struct Batch {
    program: Arc<ShaderProgram>,
    buffer: RteVertexBuffer,
}

/// One artist's vertices for the current frame.
struct EncodedArtist {
    id: Uuid,
    program: Arc<ShaderProgram>,
    vertices: Vec<RteVertex>,
}

/// Start a frame on `context` looking through `camera` and encode every
/// artist against that eye.
///
/// Artists with nothing to draw are skipped. If any artist fails, the error
/// is returned and nothing from this frame is kept.
fn encode_frame(
    camera: &Camera,
    context: &mut DrawContext,
    artists: &[&dyn Artist],
) -> RenderResult<Vec<EncodedArtist>> {
    context.begin_frame(camera);

    let mut encoded = Vec::with_capacity(artists.len());
    for artist in artists {
        let mut vertices = Vec::new();
        if artist.draw(context, &mut vertices)? == 0 {
            continue;
        }
        encoded.push(EncodedArtist {
            id: artist.id(),
            program: artist.effective_program(),
            vertices,
        });
    }
    Ok(encoded)
}

/// Drop cached entries whose program is not in `in_use`.
fn retain_programs<'a, T>(
    cache: &mut HashMap<Arc<ShaderProgram>, T>,
    in_use: impl IntoIterator<Item = &'a Arc<ShaderProgram>>,
) {
    let in_use: HashSet<&ShaderProgram> = in_use
        .into_iter()
        .map(|program| &**program)
        .collect();
    cache.retain(|program, _| {
        let keep = in_use.contains(&**program);
        if !keep {
            tracing::debug!("Dropping trajectory pipeline for '{}'", program.label());
        }
        keep
    });
}

/// Draws a set of artists with one camera.
///
/// Each frame, [`prepare`](TrajectoryLayer::prepare) takes the eye from the
/// camera, re-encodes every artist against it and uploads the result;
/// [`render`](TrajectoryLayer::render) issues one draw call per artist.
/// Pipelines are built lazily, one per distinct program, and dropped once no
/// artist uses them.
pub struct TrajectoryLayer {
    settings: PipelineSettings,
    format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    initial_capacity: u32,
    camera_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipelines: HashMap<Arc<ShaderProgram>, wgpu::RenderPipeline>,
    batches: HashMap<Uuid, Batch>,
    order: Vec<Uuid>,
}

impl TrajectoryLayer {
    /// Creates a new trajectory layer.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> Self {
        let camera_layout = create_camera_bind_group_layout(device);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Trajectory Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group =
            create_camera_bind_group(device, &camera_layout, &camera_buffer, "Trajectory");

        Self {
            settings: config.pipeline.clone(),
            format,
            depth_format,
            initial_capacity: config.buffer.initial_vertex_capacity,
            camera_layout,
            camera_buffer,
            bind_group,
            pipelines: HashMap::new(),
            batches: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Set the trajectory color
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.settings.color = color;
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, program: &Arc<ShaderProgram>) {
        if self.pipelines.contains_key(program) {
            return;
        }

        tracing::debug!("Building trajectory pipeline for '{}'", program.label());
        let layouts = [&self.camera_layout];
        let pipeline = PipelineConfig::new(program, self.format, self.depth_format, &layouts)
            .with_settings(&self.settings)
            .build(device);
        self.pipelines.insert(Arc::clone(program), pipeline);
    }

    /// Encode and upload every artist for this frame.
    ///
    /// Starts a new frame on `context` from `camera`, so vertices are always
    /// encoded against the eye the view matrix is built for. On error the
    /// previously prepared frame is left untouched.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        context: &mut DrawContext,
        artists: &[&dyn Artist],
    ) -> RenderResult<()> {
        let frame = encode_frame(camera, context, artists)?;

        let uniform = camera.uniform(self.settings.color);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));

        self.order.clear();
        for EncodedArtist {
            id,
            program,
            vertices,
        } in frame
        {
            self.ensure_pipeline(device, &program);

            let initial_capacity = self.initial_capacity;
            let batch = self.batches.entry(id).or_insert_with(|| Batch {
                program: Arc::clone(&program),
                buffer: RteVertexBuffer::new(device, "Trajectory", initial_capacity),
            });
            batch.program = program;
            batch.buffer.upload(device, queue, &vertices);
            self.order.push(id);
        }

        let drawn = &self.order;
        self.batches.retain(|id, _| drawn.contains(id));
        retain_programs(
            &mut self.pipelines,
            self.batches.values().map(|batch| &batch.program),
        );
        Ok(())
    }

    /// Draw the prepared batches.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        for id in &self.order {
            let Some(batch) = self.batches.get(id) else {
                continue;
            };
            let Some(pipeline) = self.pipelines.get(&batch.program) else {
                continue;
            };
            if batch.buffer.is_empty() {
                continue;
            }

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, batch.buffer.slice());
            render_pass.draw(0..batch.buffer.count(), 0..1);
        }
    }

    /// Number of artists drawn by the last [`prepare`](TrajectoryLayer::prepare).
    pub fn batch_count(&self) -> usize {
        self.order.len()
    }
}
