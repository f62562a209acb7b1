//! GPU surface of the packed atlas.

use wgpu::{
    AddressMode, Device, Extent3d, FilterMode, Origin3d, Queue, Sampler, SamplerDescriptor,
    Texture, TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
    TextureView, TextureViewDescriptor,
    util::DeviceExt,
};

use placard_atlas::AtlasImage;

use crate::pods::SignParams;

/// The atlas raster uploaded as an Rgba8 texture.
///
/// Immutable once created; a repacked atlas replaces the whole texture and
/// releases the old one.
#[derive(Debug)]
pub struct AtlasTexture {
    texture: Texture,
    view: TextureView,
}

impl AtlasTexture {
    const FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

    pub fn new(device: &Device, queue: &Queue, image: &AtlasImage) -> Self {
        let size = Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("Sign atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: Self::FORMAT,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            image.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width() * 4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&TextureViewDescriptor::default());

        Self { texture, view }
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// Creates a linear and edge clamping texture sampler.
///
/// Padding exists only between the packed characters, not at the canvas
/// borders; clamping keeps border texels from wrapping around.
pub fn linear_clamping(device: &Device) -> Sampler {
    device.create_sampler(&SamplerDescriptor {
        label: Some("Sign Atlas Sampler"),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    })
}

/// Uniform buffer for [`SignParams`].
#[derive(Debug)]
pub struct ParamsBuffer(wgpu::Buffer);

impl ParamsBuffer {
    pub fn new(device: &Device, params: SignParams) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sign Params Buffer"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self(buffer)
    }

    pub fn upload(&self, queue: &Queue, params: SignParams) {
        queue.write_buffer(&self.0, 0, bytemuck::cast_slice(&[params]));
    }

    pub fn as_binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.0.as_entire_binding()
    }
}
