//! The sign layer: atlas lifecycle, prop diffing, and the per-update
//! attribute recompute.

use std::mem;

use anyhow::Result;
use log::{debug, info};

use placard_atlas::{AtlasImage, AtlasOptions, AtlasPacker, GlyphFrame, TextRequest};

use crate::{
    attributes::{Accessor, AttributeManager},
    features::Feature,
    fp64::PrecisionMode,
    instances::{self, BuildContext},
    mapping::SignMapping,
    pods::{
        ColorMode, InstanceColor, InstanceSize, PixelOffset, PositionHigh, PositionLow,
        SignParams, TextureFrame,
    },
};

/// Layer inputs, diffed against their previous version on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct SignProps {
    pub data: Vec<Feature>,
    pub precision: PrecisionMode,
    pub size_scale: f32,
    pub opacity: f32,
}

impl Default for SignProps {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            precision: PrecisionMode::default(),
            size_scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// The packed atlas with its derived lookup state. Replaced wholesale when
/// the feature data changes identity, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedAtlas {
    pub image: AtlasImage,
    pub frames: Vec<GlyphFrame>,
    pub mapping: SignMapping,
}

pub struct SignLayer {
    packer: AtlasPacker,
    props: SignProps,
    attributes: AttributeManager,
    atlas: Option<PackedAtlas>,
}

impl SignLayer {
    pub fn new(props: SignProps) -> Result<Self> {
        let mut layer = Self {
            packer: AtlasPacker::new(AtlasOptions::default())?,
            props: SignProps::default(),
            attributes: register_attributes(),
            atlas: None,
        };
        layer.update(props)?;
        Ok(layer)
    }

    /// Applies new props.
    ///
    /// The atlas is rebuilt only when the label set itself changed identity;
    /// otherwise only the attributes whose declared accessor changed are
    /// recomputed, the rest are reused as-is. Safe to call back-to-back; a
    /// superseded update is simply overwritten by the next one.
    pub fn update(&mut self, props: SignProps) -> Result<()> {
        let old = mem::replace(&mut self.props, props);

        for accessor in diff_accessors(&old, &self.props) {
            self.attributes.invalidate(accessor);
        }

        if self.atlas.is_none() || data_identity_changed(&old.data, &self.props.data) {
            self.rebuild_atlas()?;
            self.attributes.invalidate_all();
        }

        let Some(atlas) = self.atlas.as_ref() else {
            return Ok(());
        };
        let context = BuildContext {
            features: &self.props.data,
            frames: &atlas.frames,
            mapping: &atlas.mapping,
            precision: self.props.precision,
        };
        let rebuilt = self.attributes.update(&context);
        debug!("recomputed {rebuilt} attribute buffers");

        Ok(())
    }

    fn rebuild_atlas(&mut self) -> Result<()> {
        let requests: Vec<TextRequest> = self
            .props
            .data
            .iter()
            .map(|feature| TextRequest::new(feature.text.clone(), feature.font_color))
            .collect();

        let (image, frames) = self.packer.pack(&requests)?;
        info!(
            "packed {} labels into a {}x{} atlas",
            frames.len(),
            image.width(),
            image.height()
        );

        let mapping = SignMapping::from_frames(&frames);
        self.atlas = Some(PackedAtlas {
            image,
            frames,
            mapping,
        });
        Ok(())
    }

    pub fn props(&self) -> &SignProps {
        &self.props
    }

    pub fn atlas(&self) -> Option<&PackedAtlas> {
        self.atlas.as_ref()
    }

    pub fn attributes(&self) -> &AttributeManager {
        &self.attributes
    }

    /// The uniforms the draw stage consumes alongside the attribute buffers
    /// and the atlas texture.
    pub fn params(&self) -> SignParams {
        let texture_dim = match &self.atlas {
            Some(atlas) => [atlas.image.width() as f32, atlas.image.height() as f32],
            None => [0.0, 0.0],
        };
        SignParams {
            texture_dim,
            size_scale: self.props.size_scale,
            opacity: self.props.opacity,
        }
    }
}

/// Registers the full per-instance attribute table, one buffer per
/// attribute. Names are stable and addressable via
/// [`AttributeManager::buffer`].
pub(crate) fn register_attributes() -> AttributeManager {
    let mut manager = AttributeManager::new();

    manager.add_instanced(
        "corner1_high",
        size_of::<PositionHigh>(),
        Accessor::PositionsSquare,
        instances::corner_high::<0>,
    );
    manager.add_instanced(
        "corner2_high",
        size_of::<PositionHigh>(),
        Accessor::PositionsSquare,
        instances::corner_high::<1>,
    );
    manager.add_instanced(
        "corner3_high",
        size_of::<PositionHigh>(),
        Accessor::PositionsSquare,
        instances::corner_high::<2>,
    );
    manager.add_instanced(
        "corner4_high",
        size_of::<PositionHigh>(),
        Accessor::PositionsSquare,
        instances::corner_high::<3>,
    );
    manager.add_instanced(
        "corner1_low",
        size_of::<PositionLow>(),
        Accessor::PositionsSquare,
        instances::corner_low::<0>,
    );
    manager.add_instanced(
        "corner2_low",
        size_of::<PositionLow>(),
        Accessor::PositionsSquare,
        instances::corner_low::<1>,
    );
    manager.add_instanced(
        "corner3_low",
        size_of::<PositionLow>(),
        Accessor::PositionsSquare,
        instances::corner_low::<2>,
    );
    manager.add_instanced(
        "corner4_low",
        size_of::<PositionLow>(),
        Accessor::PositionsSquare,
        instances::corner_low::<3>,
    );
    manager.add_instanced(
        "texture_frames",
        size_of::<TextureFrame>(),
        Accessor::Icon,
        instances::texture_frames,
    );
    manager.add_instanced(
        "offsets",
        size_of::<PixelOffset>(),
        Accessor::Icon,
        instances::offsets,
    );
    manager.add_instanced(
        "color_modes",
        size_of::<ColorMode>(),
        Accessor::Icon,
        instances::color_modes,
    );
    manager.add_instanced(
        "colors",
        size_of::<InstanceColor>(),
        Accessor::Color,
        instances::colors,
    );
    manager.add_instanced(
        "sizes",
        size_of::<InstanceSize>(),
        Accessor::Size,
        instances::sizes,
    );

    manager
}

/// True when the rendered label set itself changed, which invalidates the
/// packed atlas.
fn data_identity_changed(old: &[Feature], new: &[Feature]) -> bool {
    old.len() != new.len()
        || old
            .iter()
            .zip(new)
            .any(|(a, b)| a.id != b.id || a.text != b.text || a.font_color != b.font_color)
}

/// Accessor-level invalidations for prop changes that keep the data
/// identity.
fn diff_accessors(old: &SignProps, new: &SignProps) -> Vec<Accessor> {
    let mut accessors = Vec::new();

    if old.precision != new.precision {
        // The corner split depends on the mode, so everything positional
        // goes.
        accessors.extend([Accessor::Position, Accessor::PositionsSquare]);
    }

    if old.data.len() == new.data.len() {
        let pairs = || old.data.iter().zip(&new.data);
        if pairs().any(|(a, b)| a.footprint != b.footprint || a.position != b.position) {
            accessors.extend([Accessor::Position, Accessor::PositionsSquare]);
        }
        if pairs().any(|(a, b)| a.color != b.color) {
            accessors.push(Accessor::Color);
        }
        if pairs().any(|(a, b)| a.size != b.size) {
            accessors.push(Accessor::Size);
        }
    }

    accessors
}
