//! The per-attribute update functions.
//!
//! Each function fills one attribute buffer for all features, in input
//! order. They are registered with the [`AttributeManager`] under the
//! accessor they read, so they only run when that input changed.
//!
//! [`AttributeManager`]: crate::attributes::AttributeManager

use bytemuck::Zeroable;
use log::warn;

use placard_atlas::GlyphFrame;
use placard_geometry::Corner;

use crate::{
    attributes::AttributeBuffer,
    features::Feature,
    fp64::{self, PrecisionMode},
    mapping::SignMapping,
    pods::{ColorMode, InstanceColor, InstanceSize, PixelOffset, PositionHigh, PositionLow, TextureFrame},
};

/// Everything an update function may read.
pub struct BuildContext<'a> {
    pub features: &'a [Feature],
    /// One frame per feature, parallel by index. May be shorter when the
    /// atlas has not caught up; missing frames read as zero.
    pub frames: &'a [GlyphFrame],
    pub mapping: &'a SignMapping,
    pub precision: PrecisionMode,
}

pub fn corner_high<const K: usize>(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let corner = Corner::ALL[K];
    let values: Vec<PositionHigh> = context
        .features
        .iter()
        .map(|feature| {
            let p = feature.footprint.corner(corner);
            PositionHigh([p.lng as f32, p.lat as f32, 0.0])
        })
        .collect();
    buffer.fill(&values);
}

pub fn corner_low<const K: usize>(context: &BuildContext, buffer: &mut AttributeBuffer) {
    if context.precision == PrecisionMode::Single {
        // One shared zero element, uploaded once.
        buffer.fill_constant(PositionLow([0.0, 0.0]));
        return;
    }

    let corner = Corner::ALL[K];
    let values: Vec<PositionLow> = context
        .features
        .iter()
        .map(|feature| {
            let p = feature.footprint.corner(corner);
            PositionLow([fp64::low_part(p.lng), fp64::low_part(p.lat)])
        })
        .collect();
    buffer.fill(&values);
}

pub fn texture_frames(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let values: Vec<TextureFrame> = (0..context.features.len())
        .map(|index| match context.frames.get(index) {
            Some(frame) => TextureFrame {
                x: frame.origin.x,
                y: frame.origin.y,
                width: frame.size.width,
                height: frame.size.height,
            },
            None => TextureFrame::zeroed(),
        })
        .collect();
    buffer.fill(&values);
}

pub fn offsets(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let mut missing = 0;
    let values: Vec<PixelOffset> = context
        .features
        .iter()
        .map(|feature| match context.mapping.get(&feature.text) {
            Some(entry) => PixelOffset(entry.offset()),
            None => {
                missing += 1;
                PixelOffset([0.0, 0.0])
            }
        })
        .collect();
    if missing > 0 {
        warn!("{missing} features reference no atlas entry, offsets zeroed");
    }
    buffer.fill(&values);
}

pub fn color_modes(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let values: Vec<ColorMode> = context
        .features
        .iter()
        .map(|feature| {
            let mask = context
                .mapping
                .get(&feature.text)
                .is_some_and(|entry| entry.mask);
            ColorMode(mask as u32)
        })
        .collect();
    buffer.fill(&values);
}

pub fn colors(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let values: Vec<InstanceColor> = context
        .features
        .iter()
        .map(|feature| feature.color.into())
        .collect();
    buffer.fill(&values);
}

pub fn sizes(context: &BuildContext, buffer: &mut AttributeBuffer) {
    let values: Vec<InstanceSize> = context
        .features
        .iter()
        .map(|feature| InstanceSize(feature.size))
        .collect();
    buffer.fill(&values);
}

#[cfg(test)]
mod tests {
    use euclid::{point2, size2};
    use placard_geometry::{GeoPoint, QuadFootprint};

    use crate::mapping::MappingEntry;

    use super::*;

    fn feature(text: &str) -> Feature {
        let footprint = QuadFootprint([
            GeoPoint::new(13.4050001, 52.5200001),
            GeoPoint::new(13.4040001, 52.5200001),
            GeoPoint::new(13.4040001, 52.5190001),
            GeoPoint::new(13.4050001, 52.5190001),
        ]);
        Feature::new("1", text, footprint)
    }

    fn frame(text: &str) -> GlyphFrame {
        GlyphFrame {
            text: text.into(),
            origin: point2(10.0, 20.0),
            size: size2(40.0, 12.0),
            per_char: vec![point2(14.0, 20.0)],
            row: 0,
        }
    }

    fn context<'a>(
        features: &'a [Feature],
        frames: &'a [GlyphFrame],
        mapping: &'a SignMapping,
        precision: PrecisionMode,
    ) -> BuildContext<'a> {
        BuildContext {
            features,
            frames,
            mapping,
            precision,
        }
    }

    #[test]
    fn corner_attributes_split_each_corner() {
        let features = [feature("a")];
        let frames = [frame("a")];
        let mapping = SignMapping::from_frames(&frames);
        let ctx = context(&features, &frames, &mapping, PrecisionMode::Double);

        let mut high = AttributeBuffer::with_element_size(size_of::<PositionHigh>());
        let mut low = AttributeBuffer::with_element_size(size_of::<PositionLow>());
        corner_high::<2>(&ctx, &mut high);
        corner_low::<2>(&ctx, &mut low);

        let p = features[0].footprint.corner(Corner::BottomLeft);
        let highs: &[PositionHigh] = high.as_slice();
        let lows: &[PositionLow] = low.as_slice();
        assert_eq!(highs, &[PositionHigh([p.lng as f32, p.lat as f32, 0.0])]);
        assert_eq!(
            lows,
            &[PositionLow([fp64::low_part(p.lng), fp64::low_part(p.lat)])]
        );
        assert!(!low.is_constant());

        // The reconstruction beats plain f32 rounding.
        let reconstructed = highs[0].0[0] as f64 + lows[0].0[0] as f64;
        assert!((reconstructed - p.lng).abs() < (p.lng as f32 as f64 - p.lng).abs());
    }

    #[test]
    fn single_precision_collapses_low_parts_to_a_shared_constant() {
        let features = [feature("a"), feature("b")];
        let frames = [frame("a"), frame("b")];
        let mapping = SignMapping::from_frames(&frames);
        let ctx = context(&features, &frames, &mapping, PrecisionMode::Single);

        let mut low = AttributeBuffer::with_element_size(size_of::<PositionLow>());
        corner_low::<0>(&ctx, &mut low);

        assert!(low.is_constant());
        assert_eq!(low.as_slice::<PositionLow>(), &[PositionLow([0.0, 0.0])]);
    }

    #[test]
    fn texture_frames_read_by_index_and_zero_fill() {
        let features = [feature("a"), feature("b")];
        let frames = [frame("a")];
        let mapping = SignMapping::from_frames(&frames);
        let ctx = context(&features, &frames, &mapping, PrecisionMode::Single);

        let mut buffer = AttributeBuffer::with_element_size(size_of::<TextureFrame>());
        texture_frames(&ctx, &mut buffer);

        let values: &[TextureFrame] = buffer.as_slice();
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[0],
            TextureFrame {
                x: 10.0,
                y: 20.0,
                width: 40.0,
                height: 12.0
            }
        );
        assert_eq!(values[1], TextureFrame::zeroed());
    }

    #[test]
    fn missing_mapping_entry_zeroes_offset_and_color_mode() {
        let features = [feature("unknown")];
        let mapping = SignMapping::default();
        let ctx = context(&features, &[], &mapping, PrecisionMode::Single);

        let mut offset = AttributeBuffer::with_element_size(size_of::<PixelOffset>());
        let mut mode = AttributeBuffer::with_element_size(size_of::<ColorMode>());
        offsets(&ctx, &mut offset);
        color_modes(&ctx, &mut mode);

        assert_eq!(offset.as_slice::<PixelOffset>(), &[PixelOffset([0.0, 0.0])]);
        assert_eq!(mode.as_slice::<ColorMode>(), &[ColorMode(0)]);
    }

    #[test]
    fn mask_entries_enable_color_mode() {
        let features = [feature("a")];
        let mut mapping = SignMapping::default();
        mapping.insert(
            "a",
            MappingEntry {
                width: 8.0,
                height: 8.0,
                anchor_x: 4.0,
                anchor_y: 4.0,
                mask: true,
            },
        );
        let ctx = context(&features, &[], &mapping, PrecisionMode::Single);

        let mut mode = AttributeBuffer::with_element_size(size_of::<ColorMode>());
        color_modes(&ctx, &mut mode);
        assert_eq!(mode.as_slice::<ColorMode>(), &[ColorMode(1)]);
    }

    #[test]
    fn colors_default_to_opaque_black() {
        let features = [feature("a")];
        let mapping = SignMapping::default();
        let ctx = context(&features, &[], &mapping, PrecisionMode::Single);

        let mut buffer = AttributeBuffer::with_element_size(size_of::<InstanceColor>());
        colors(&ctx, &mut buffer);
        assert_eq!(
            buffer.as_slice::<InstanceColor>(),
            &[InstanceColor([0, 0, 0, 255])]
        );
    }
}
