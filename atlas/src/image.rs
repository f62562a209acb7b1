use cosmic_text::{Placement, SwashContent};
use euclid::default::{Box2D, Point2D, Size2D};

use placard_geometry::Color;

/// One label to be packed into the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    pub font_color: Color,
}

impl TextRequest {
    pub fn new(text: impl Into<String>, font_color: Color) -> Self {
        Self {
            text: text.into(),
            font_color,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Where one packed string ended up in atlas pixel space.
///
/// `origin` is the offset of the first character's cell, `size` the extent of
/// the whole string. `per_char` holds one draw origin per character of the
/// source text, in order. Immutable once produced by the packer.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphFrame {
    pub text: String,
    pub origin: Point2D<f32>,
    pub size: Size2D<f32>,
    pub per_char: Vec<Point2D<f32>>,
    pub row: u32,
}

impl GlyphFrame {
    pub fn bounds(&self) -> Box2D<f32> {
        Box2D::from_origin_and_size(self.origin, self.size)
    }
}

/// The packed RGBA raster holding every rendered label.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AtlasImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 texels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Blends a rasterized glyph at the given pen position.
    ///
    /// `pen_x` is the character's draw origin, `baseline_y` the baseline below
    /// it. The placement carries the glyph's bearing relative to the pen.
    /// Texels outside the canvas are clipped, which is where capacity overflow
    /// ends up.
    pub fn blend_glyph(
        &mut self,
        placement: Placement,
        content: SwashContent,
        data: &[u8],
        pen_x: f32,
        baseline_y: f32,
        color: Color,
    ) {
        let left = pen_x.round() as i64 + placement.left as i64;
        let top = baseline_y.round() as i64 - placement.top as i64;
        let rgba = color.to_rgba8();

        for row in 0..placement.height as i64 {
            let y = top + row;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for col in 0..placement.width as i64 {
                let x = left + col;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let src = ((row * placement.width as i64 + col)
                    * match content {
                        SwashContent::Mask => 1,
                        SwashContent::Color => 4,
                        SwashContent::SubpixelMask => 4,
                    }) as usize;
                let texel = match content {
                    SwashContent::Mask => {
                        let coverage = data[src];
                        let alpha = (coverage as u16 * rgba[3] as u16 / 255) as u8;
                        [rgba[0], rgba[1], rgba[2], alpha]
                    }
                    // Color bitmaps (emoji) keep their own colors.
                    SwashContent::Color | SwashContent::SubpixelMask => {
                        [data[src], data[src + 1], data[src + 2], data[src + 3]]
                    }
                };
                let dst = ((y as u32 * self.width + x as u32) * 4) as usize;
                // Frames never overlap, so last-wins by coverage is enough.
                if texel[3] > self.data[dst + 3] {
                    self.data[dst..dst + 4].copy_from_slice(&texel);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_placement(width: u32, height: u32) -> Placement {
        Placement {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    #[test]
    fn mask_texels_are_tinted_with_the_font_color() {
        let mut image = AtlasImage::new(8, 8);
        let coverage = [255u8, 128, 0, 0];
        image.blend_glyph(
            mask_placement(2, 2),
            SwashContent::Mask,
            &coverage,
            1.0,
            1.0,
            Color::WHITE,
        );

        assert_eq!(image.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(image.pixel(2, 1), [255, 255, 255, 128]);
        assert_eq!(image.pixel(1, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn texels_outside_the_canvas_are_clipped() {
        let mut image = AtlasImage::new(4, 4);
        let coverage = [255u8; 16];
        // Pen far past the bottom edge: the whole glyph lands out of bounds.
        image.blend_glyph(
            mask_placement(4, 4),
            SwashContent::Mask,
            &coverage,
            0.0,
            100.0,
            Color::WHITE,
        );

        assert!(image.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn baseline_offsets_the_glyph_upwards() {
        let mut image = AtlasImage::new(8, 8);
        let placement = Placement {
            left: 0,
            top: 3,
            width: 1,
            height: 1,
        };
        image.blend_glyph(placement, SwashContent::Mask, &[255], 0.0, 5.0, Color::WHITE);

        // top bearing 3 above a baseline of 5 puts the texel at y = 2.
        assert_eq!(image.pixel(0, 2)[3], 255);
    }
}
