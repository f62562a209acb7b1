//! POD element types for the per-instance attribute buffers, with their
//! vertex buffer layouts.
//!
//! One buffer per attribute, row-major by feature index, matching the shader
//! location table in `sign.wgsl`:
//!
//! - `0` quad corner sign (per vertex)
//! - `1..=4` corner world positions, high part
//! - `5..=8` corner low-order corrections
//! - `9` texture frame, `10` pixel offset, `11` color mode, `12` color,
//!   `13` size

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode, vertex_attr_array};

use placard_geometry::{Color, Corner};

/// One vertex of the normalized quad the vertex stage matches against the
/// per-corner world positions.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub sign: [f32; 2],
}

impl QuadVertex {
    /// The non-instanced quad, one vertex per corner, in [`Corner::ALL`]
    /// order so the sign patterns match the instance attribute order. The
    /// order also renders as a triangle strip covering the whole quad.
    pub fn quad() -> [QuadVertex; 4] {
        Corner::ALL.map(|corner| {
            let (x, y) = corner.local_sign();
            QuadVertex { sign: [x, y] }
        })
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![0 => Float32x2];
        VertexBufferLayout {
            array_stride: size_of::<QuadVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// A corner's world position rounded to f32, z always 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PositionHigh(pub [f32; 3]);

impl PositionHigh {
    pub fn layout(corner: Corner) -> VertexBufferLayout<'static> {
        static ATTRS: [[VertexAttribute; 1]; 4] = [
            vertex_attr_array![1 => Float32x3],
            vertex_attr_array![2 => Float32x3],
            vertex_attr_array![3 => Float32x3],
            vertex_attr_array![4 => Float32x3],
        ];
        VertexBufferLayout {
            array_stride: size_of::<PositionHigh>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS[corner.index()],
        }
    }
}

/// A corner's low-order correction terms for lng/lat.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PositionLow(pub [f32; 2]);

impl PositionLow {
    pub fn layout(corner: Corner) -> VertexBufferLayout<'static> {
        static ATTRS: [[VertexAttribute; 1]; 4] = [
            vertex_attr_array![5 => Float32x2],
            vertex_attr_array![6 => Float32x2],
            vertex_attr_array![7 => Float32x2],
            vertex_attr_array![8 => Float32x2],
        ];
        VertexBufferLayout {
            array_stride: size_of::<PositionLow>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS[corner.index()],
        }
    }
}

/// The label's rectangle in atlas pixel space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TextureFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextureFrame {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![9 => Float32x4];
        VertexBufferLayout {
            array_stride: size_of::<TextureFrame>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// Pixel offset of the label relative to its anchor.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PixelOffset(pub [f32; 2]);

impl PixelOffset {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![10 => Float32x2];
        VertexBufferLayout {
            array_stride: size_of::<PixelOffset>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// 1 tints the texel's alpha with the instance color, 0 keeps the texel's own
/// rasterized color.
//
// WebGL accepted a single unsigned byte here; wgpu has no scalar u8 vertex
// format, so the flag widens to u32 on the wire.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorMode(pub u32);

impl ColorMode {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![11 => Uint32];
        VertexBufferLayout {
            array_stride: size_of::<ColorMode>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// RGBA color, one byte per channel, normalized in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceColor(pub [u8; 4]);

impl InstanceColor {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![12 => Unorm8x4];
        VertexBufferLayout {
            array_stride: size_of::<InstanceColor>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

impl From<Color> for InstanceColor {
    fn from(value: Color) -> Self {
        Self(value.to_rgba8())
    }
}

/// Per-label size multiplier.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceSize(pub f32);

impl InstanceSize {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = vertex_attr_array![13 => Float32];
        VertexBufferLayout {
            array_stride: size_of::<InstanceSize>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// Shared uniforms: atlas texel dimensions, size scale, opacity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SignParams {
    pub texture_dim: [f32; 2],
    pub size_scale: f32,
    pub opacity: f32,
}

// WebGL uniform requirement
const_assert_eq!(size_of::<SignParams>() % 16, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_signs_follow_the_corner_table() {
        let quad = QuadVertex::quad();
        assert_eq!(quad[0].sign, [1.0, 1.0]);
        assert_eq!(quad[1].sign, [-1.0, 1.0]);
        assert_eq!(quad[2].sign, [-1.0, -1.0]);
        assert_eq!(quad[3].sign, [1.0, -1.0]);
    }

    #[test]
    fn corner_layouts_use_distinct_shader_locations() {
        let locations: Vec<u32> = Corner::ALL
            .iter()
            .map(|&c| PositionHigh::layout(c).attributes[0].shader_location)
            .chain(
                Corner::ALL
                    .iter()
                    .map(|&c| PositionLow::layout(c).attributes[0].shader_location),
            )
            .collect();
        assert_eq!(locations, [1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
