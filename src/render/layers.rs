use super::helpers;
use glam::{Mat4, Vec3};
use pano_core::{Blend, LayerDraw};
use std::collections::HashMap;
use wgpu::util::DeviceExt;
use web_sys as web;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LayerVertex {
    pos: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LayerUniforms {
    view_proj: [[f32; 4]; 4],
    tint: [f32; 4],
}

struct LayerTexture {
    _texture: wgpu::Texture,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// The shared sphere mesh plus one texture per manifest file.
pub(crate) struct LayerResources {
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    normal_pipeline: wgpu::RenderPipeline,
    additive_pipeline: wgpu::RenderPipeline,
    textures: HashMap<String, LayerTexture>,
}

impl LayerResources {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let mesh = pano_core::panorama_sphere();
        let vertices: Vec<LayerVertex> = mesh
            .positions
            .iter()
            .zip(&mesh.uvs)
            .map(|(p, uv)| LayerVertex {
                pos: p.to_array(),
                uv: uv.to_array(),
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("layer_shader"),
            source: wgpu::ShaderSource::Wgsl(pano_core::LAYER_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("layer_bgl"),
            entries: &[
                helpers::texture_entry(0),
                helpers::sampler_entry(1),
                helpers::uniform_entry(
                    2,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
            ],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("layer_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let attrs = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LayerVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attrs,
        }];
        let normal_pipeline = helpers::make_mesh_pipeline(
            device,
            "layer_normal",
            &pl,
            &shader,
            ("vs_layer", "fs_layer"),
            &buffers,
            color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let additive_pipeline = helpers::make_mesh_pipeline(
            device,
            "layer_additive",
            &pl,
            &shader,
            ("vs_layer", "fs_layer"),
            &buffers,
            color_format,
            Some(helpers::ADDITIVE_BLEND),
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("layer_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            bgl,
            sampler,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            normal_pipeline,
            additive_pipeline,
            textures: HashMap::new(),
        }
    }

    pub(crate) fn has(&self, file: &str) -> bool {
        self.textures.contains_key(file)
    }

    pub(crate) fn clear(&mut self) {
        self.textures.clear();
    }

    /// Copy a decoded image into a new texture for `file`.
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        file: &str,
        bitmap: &web::ImageBitmap,
    ) {
        let max = device.limits().max_texture_dimension_2d;
        let (w, h) = (bitmap.width(), bitmap.height());
        if w == 0 || h == 0 || w > max || h > max {
            log::warn!("[render] skipping {} ({}x{}, limit {})", file, w, h, max);
            return;
        }
        let size = wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        };
        // Rgba8Unorm: panoramas are sampled without sRGB decoding.
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(file),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::ImageBitmap(bitmap.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("layer_uniforms"),
            size: std::mem::size_of::<LayerUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("layer_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform.as_entire_binding(),
                },
            ],
        });
        self.textures.insert(
            file.to_string(),
            LayerTexture {
                _texture: texture,
                uniform,
                bind_group,
            },
        );
        log::debug!("[render] uploaded {} ({}x{})", file, w, h);
    }

    /// Draw the stack bottom first. Layers without a texture yet are skipped.
    pub(crate) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        tint: Vec3,
        stack: &[LayerDraw],
    ) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for layer in stack.iter().filter(|l| l.visible()) {
            let Some(tex) = self.textures.get(&layer.file) else {
                continue;
            };
            let u = LayerUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                tint: tint.extend(layer.opacity.clamp(0.0, 1.0)).to_array(),
            };
            queue.write_buffer(&tex.uniform, 0, bytemuck::bytes_of(&u));
            rpass.set_pipeline(match layer.blend {
                Blend::Normal => &self.normal_pipeline,
                Blend::Additive => &self.additive_pipeline,
            });
            rpass.set_bind_group(0, &tex.bind_group, &[]);
            rpass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}
