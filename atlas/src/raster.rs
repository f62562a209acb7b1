//! Character rasterization against a planned layout.

use cosmic_text::{Font, SwashImage};
use log::debug;
use swash::{
    scale::{Render, ScaleContext, Source, StrikeWith},
    zeno::Format,
};

use crate::{AtlasImage, GlyphFrame, TextRequest, packer::BASELINE_SCALE};

/// Renders every character of every frame into the canvas, tinted with its
/// request's font color. The baseline sits `font_size * 0.9` below each
/// character's draw origin.
pub fn rasterize(
    image: &mut AtlasImage,
    frames: &[GlyphFrame],
    requests: &[TextRequest],
    font: &Font,
    context: &mut ScaleContext,
    font_size: u32,
) {
    let baseline = font_size as f32 * BASELINE_SCALE;

    for (request, frame) in requests.iter().zip(frames) {
        for (ch, origin) in request.text.chars().zip(&frame.per_char) {
            let Some(glyph) = rasterize_char(context, font, ch, font_size as f32) else {
                // Advance width was already reserved, the cell just stays
                // transparent.
                debug!("no raster for {ch:?}");
                continue;
            };
            image.blend_glyph(
                glyph.placement,
                glyph.content,
                &glyph.data,
                origin.x,
                origin.y + baseline,
                request.font_color,
            );
        }
    }
}

fn rasterize_char(
    context: &mut ScaleContext,
    font: &Font,
    ch: char,
    font_size: f32,
) -> Option<SwashImage> {
    let font = font.as_swash();
    let glyph_id = font.charmap().map(ch);

    let mut scaler = context.builder(font).size(font_size).hint(true).build();

    Render::new(&[
        Source::ColorOutline(0),
        Source::ColorBitmap(StrikeWith::BestFit),
        Source::Outline,
    ])
    .format(Format::Alpha)
    .render(&mut scaler, glyph_id)
}
