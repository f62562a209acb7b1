//! Packs short text labels into a single fixed-size texture atlas.
//!
//! A variable number of variable-length strings is laid out into rows of one
//! `max_dim` x `max_dim` RGBA canvas; the font size is derived from the batch
//! volume so the batch always has a chance to fit. Each request yields a
//! [`GlyphFrame`] with per-character draw origins and the string's aggregate
//! bounding box in atlas pixel space.

mod image;
mod metrics;
mod packer;
mod raster;

pub use image::*;
pub use metrics::*;
pub use packer::*;

use anyhow::{Context, Result};
use cosmic_text::{FontSystem, fontdb};
use swash::scale::ScaleContext;

/// Lays out and rasterizes label batches.
///
/// Owns the font database and the swash scaler; both are reused across packs.
pub struct AtlasPacker {
    font_system: FontSystem,
    scale_context: ScaleContext,
    font_id: fontdb::ID,
    options: AtlasOptions,
}

impl AtlasPacker {
    pub fn new(options: AtlasOptions) -> Result<Self> {
        let font_system = FontSystem::new();
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..Default::default()
        };
        let font_id = font_system
            .db()
            .query(&query)
            .context("no sans-serif font available")?;

        Ok(Self {
            font_system,
            scale_context: ScaleContext::new(),
            font_id,
            options,
        })
    }

    /// Packs all requests into one atlas: one [`GlyphFrame`] per request, in
    /// input order. Packing the same request list twice yields identical
    /// geometry.
    ///
    /// Capacity precondition: `requests.len() * longest_text_len` must be
    /// bounded for the canvas; labels past capacity are laid out anyway but
    /// their texels are unreachable (a warning is logged).
    pub fn pack(&mut self, requests: &[TextRequest]) -> Result<(AtlasImage, Vec<GlyphFrame>)> {
        let font = self
            .font_system
            .get_font(self.font_id, fontdb::Weight::NORMAL)
            .context("selected font disappeared from the database")?;

        let layout = plan_layout(requests, &mut FontAdvance::new(&font), self.options);

        let mut image = AtlasImage::new(self.options.max_dim, self.options.max_dim);
        raster::rasterize(
            &mut image,
            &layout.frames,
            requests,
            &font,
            &mut self.scale_context,
            layout.font_size,
        );

        Ok((image, layout.frames))
    }
}
