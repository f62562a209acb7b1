//! Render pipeline surface for the sign layer.
//!
//! The draw submission itself belongs to the host; this module only builds
//! the pipeline, its bind group layout, and the vertex buffer layout table
//! matching `sign.wgsl`.

use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, Device, RenderPipeline, SamplerBindingType, ShaderStages,
    TextureSampleType, TextureViewDimension, VertexBufferLayout,
    util::{BufferInitDescriptor, DeviceExt},
};

use placard_geometry::Corner;

use crate::{
    atlas_texture::{AtlasTexture, ParamsBuffer},
    attributes::AttributeBuffer,
    pods::{
        ColorMode, InstanceColor, InstanceSize, PixelOffset, PositionHigh, PositionLow,
        QuadVertex, TextureFrame,
    },
};

const VERTEX_SHADER_ENTRY: &str = "vs_main";
const FRAGMENT_SHADER_ENTRY: &str = "fs_main";

/// One vertex buffer layout per attribute buffer, slot order fixed: the quad,
/// the four corner high parts, the four low parts, then frame, offset, color
/// mode, color, size.
pub fn vertex_buffer_layouts() -> [VertexBufferLayout<'static>; 14] {
    let [c1, c2, c3, c4] = Corner::ALL;
    [
        QuadVertex::layout(),
        PositionHigh::layout(c1),
        PositionHigh::layout(c2),
        PositionHigh::layout(c3),
        PositionHigh::layout(c4),
        PositionLow::layout(c1),
        PositionLow::layout(c2),
        PositionLow::layout(c3),
        PositionLow::layout(c4),
        TextureFrame::layout(),
        PixelOffset::layout(),
        ColorMode::layout(),
        InstanceColor::layout(),
        InstanceSize::layout(),
    ]
}

/// Uploads the shared normalized quad.
pub fn create_quad_buffer(device: &Device) -> wgpu::Buffer {
    device.create_buffer_init(&BufferInitDescriptor {
        label: Some("Sign Quad Buffer"),
        contents: bytemuck::cast_slice(&QuadVertex::quad()),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Uploads one per-instance attribute buffer. Constant attributes upload
/// their single shared element.
pub fn create_attribute_buffer(
    device: &Device,
    label: &str,
    attribute: &AttributeBuffer,
) -> wgpu::Buffer {
    device.create_buffer_init(&BufferInitDescriptor {
        label: Some(label),
        contents: attribute.bytes(),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

pub struct SignPipeline {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
}

impl SignPipeline {
    /// `view_projection_bind_group_layout` comes from the host, which owns
    /// the map projection matrix.
    pub fn new(
        device: &Device,
        target_format: wgpu::TextureFormat,
        view_projection_bind_group_layout: &BindGroupLayout,
    ) -> Self {
        let shader = &device.create_shader_module(wgpu::include_wgsl!("sign.wgsl"));

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Sign Layer Bind Group Layout"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        multisampled: false,
                        view_dimension: TextureViewDimension::D2,
                        sample_type: TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::VERTEX_FRAGMENT,
                    ty: BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sign Layer Pipeline Layout"),
            bind_group_layouts: &[view_projection_bind_group_layout, &bind_group_layout],
            push_constant_ranges: &[],
        });

        let targets = [Some(wgpu::ColorTargetState {
            format: target_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let vertex_layouts = vertex_buffer_layouts();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sign Layer Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(VERTEX_SHADER_ENTRY),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(FRAGMENT_SHADER_ENTRY),
                compilation_options: Default::default(),
                targets: &targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                // A georeferenced footprint may wind either way.
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn bind(
        &self,
        device: &Device,
        atlas: &AtlasTexture,
        sampler: &wgpu::Sampler,
        params: &ParamsBuffer,
    ) -> BindGroup {
        device.create_bind_group(&BindGroupDescriptor {
            label: Some("Sign Layer Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: params.as_binding_resource(),
                },
            ],
        })
    }
}
