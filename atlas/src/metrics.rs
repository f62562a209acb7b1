use cosmic_text::Font;

/// Measurement seam for the layout pass.
///
/// Layout only ever needs per-character advance widths (shaping and kerning
/// are out of scope), so this is the whole surface. Tests substitute a
/// fixed-width implementation.
pub trait CharAdvance {
    /// Advance width of `ch` at `font_size` pixels.
    fn advance(&mut self, ch: char, font_size: f32) -> f32;
}

/// Advance widths from the resolved font's glyph metrics.
pub struct FontAdvance<'a> {
    font: &'a Font,
}

impl<'a> FontAdvance<'a> {
    pub fn new(font: &'a Font) -> Self {
        Self { font }
    }
}

impl CharAdvance for FontAdvance<'_> {
    fn advance(&mut self, ch: char, font_size: f32) -> f32 {
        let font = self.font.as_swash();
        let glyph = font.charmap().map(ch);
        font.glyph_metrics(&[]).scale(font_size).advance_width(glyph)
    }
}
