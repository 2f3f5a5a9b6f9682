use super::helpers;
use glam::{Mat4, Vec3, Vec4};
use pano_core::visuals::{handle_triangles, marker_triangles};
use pano_core::HotspotVisual;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerVertex {
    pos: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerUniforms {
    view_proj: [[f32; 4]; 4],
}

const HANDLE_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.95);
const INITIAL_CAPACITY: u64 = 4096;

/// Hotspot hit geometry, rebuilt on the CPU every frame.
pub(crate) struct MarkerResources {
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    capacity: u64,
    vertex_count: u32,
    scratch: Vec<MarkerVertex>,
}

fn vertex_buffer(device: &wgpu::Device, vertices: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("marker_vertices"),
        size: vertices * std::mem::size_of::<MarkerVertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl MarkerResources {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(pano_core::MARKER_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("marker_bgl"),
            entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let attrs = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
        let pipeline = helpers::make_mesh_pipeline(
            device,
            "marker_pipeline",
            &pl,
            &shader,
            ("vs_marker", "fs_marker"),
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MarkerVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attrs,
            }],
            color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker_uniforms"),
            size: std::mem::size_of::<MarkerUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("marker_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        Self {
            pipeline,
            uniform,
            bind_group,
            vertex_buffer: vertex_buffer(device, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            vertex_count: 0,
            scratch: Vec::new(),
        }
    }

    /// Tessellate visible markers and handles and stage them for drawing.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        visuals: &[HotspotVisual],
    ) {
        self.scratch.clear();
        let mut push = |tris: Vec<Vec3>, color: Vec4| {
            self.scratch.extend(tris.into_iter().map(|p| MarkerVertex {
                pos: p.to_array(),
                color: color.to_array(),
            }));
        };
        for v in visuals {
            if v.rgba.w > 0.0 {
                push(marker_triangles(v), v.rgba);
            }
            if !v.handles.is_empty() {
                push(handle_triangles(v), HANDLE_COLOR);
            }
        }
        let needed = self.scratch.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.vertex_buffer = vertex_buffer(device, self.capacity);
        }
        if needed > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }
        let u = MarkerUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&u));
        self.vertex_count = needed as u32;
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}
