use crate::camera::OrbitCamera;
use crate::frame::RenderRequest;
use crate::geometry::build_frame_lines;
use crate::pipeline::{LinePipeline, Uniforms};
use wgpu::util::DeviceExt;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// GPU side of the frame display: holds the line pipeline, the camera and
/// the vertex buffer built from the latest render request.
pub struct FrameView {
    pipeline: LinePipeline,
    pub camera: OrbitCamera,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl FrameView {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let pipeline = LinePipeline::new(device, color_format);
        let camera = OrbitCamera::new();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new(camera.view_projection())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = pipeline.create_uniform_bind_group(device, &uniform_buffer);

        Self {
            pipeline,
            camera,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Replace the drawn lines with the contents of `request`.
    pub fn upload(&mut self, device: &wgpu::Device, request: &RenderRequest) {
        let vertices = build_frame_lines(request);

        self.vertex_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("frame_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.vertex_count = vertices.len() as u32;

        self.camera.elevation_deg = request.elevation_deg as f32;
        self.camera.azimuth_deg = request.azimuth_deg as f32;

        tracing::debug!(vertices = self.vertex_count, title = %request.title, "Frame uploaded");
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Clear `target` and draw the current lines into it.
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[Uniforms::new(self.camera.view_projection())]),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("frame_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };

        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
