//! Row layout of text requests into a fixed-size canvas.
//!
//! The layout pass is pure: it sees only per-character advance widths through
//! the [`CharAdvance`] seam and never touches a font, which keeps its geometry
//! deterministic and testable. Rasterization happens afterwards against the
//! planned frames.

use euclid::{point2, size2};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;

use crate::{CharAdvance, GlyphFrame, TextRequest};

/// Slack above/below the glyphs within a row, relative to the font size.
pub const HEIGHT_SCALE: f32 = 1.2;
/// Baseline position below a character's draw origin, relative to the font size.
pub const BASELINE_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtlasOptions {
    /// Fixed canvas dimension; the atlas is always `max_dim` x `max_dim`.
    pub max_dim: u32,
    /// Padding around each character and between characters, in pixels.
    pub padding: f32,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            max_dim: 2048,
            padding: 4.0,
        }
    }
}

/// The packing cursor, threaded explicitly through placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f32,
    pub row: u32,
}

impl Cursor {
    fn wrapped(self) -> Self {
        Self {
            x: 0.0,
            row: self.row + 1,
        }
    }
}

/// The planned geometry for one atlas, before rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasLayout {
    pub font_size: u32,
    pub frames: Vec<GlyphFrame>,
    pub rows: u32,
    /// Frames whose rectangle exceeds the canvas. See [`plan_layout`].
    pub overflowing: usize,
}

/// Derives the font size from the request volume: the canvas area is divided
/// evenly among `request_count * max_len` character cells, so larger batches
/// trade legibility for guaranteed fit.
pub fn derive_font_size(max_dim: u32, request_count: usize, max_len: usize) -> u32 {
    let cells = (request_count.max(1) * max_len.max(1)) as f64;
    let dim = max_dim as f64;
    (0.5 * (dim * dim / cells).sqrt()).floor() as u32
}

fn row_stride(font_size: u32, padding: f32) -> f32 {
    font_size as f32 * HEIGHT_SCALE + padding
}

/// Lays out all requests left-to-right, top-to-bottom.
///
/// One frame per request, input order. A request is placed contiguously within
/// a single row; when its projected right edge would come within
/// `3 * font_size` px of the canvas edge, the cursor wraps to a new row first.
///
/// Capacity is a precondition, not an error: `request_count * max_len` must be
/// bounded so that all rows fit the canvas. Frames that exceed it are still
/// laid out (and counted in `overflowing`) but their texels are unreachable.
pub fn plan_layout(
    requests: &[TextRequest],
    metrics: &mut impl CharAdvance,
    options: AtlasOptions,
) -> AtlasLayout {
    let max_len = requests.iter().map(TextRequest::char_count).max().unwrap_or(0);
    let font_size = derive_font_size(options.max_dim, requests.len(), max_len);

    let font_height = font_size as f32 * HEIGHT_SCALE;
    let stride = row_stride(font_size, options.padding);
    let wrap_margin = 3.0 * font_size as f32;
    let max_dim = options.max_dim as f32;

    let mut frames = Vec::with_capacity(requests.len());
    let mut cursor = Cursor::default();

    for request in requests {
        let advances = request
            .text
            .chars()
            .map(|ch| metrics.advance(ch, font_size as f32))
            .collect_vec();

        // Single-character labels are centered optically: half the measured
        // advance is added on both sides.
        let bonus = match advances.as_slice() {
            [single] => single / 2.0,
            _ => 0.0,
        };
        let cell_extra = 2.0 * (options.padding + bonus);
        let width: f32 = advances.iter().map(|a| a + cell_extra).sum();

        if cursor.x > 0.0 && cursor.x + width + wrap_margin >= max_dim {
            cursor = cursor.wrapped();
        }

        let y = cursor.row as f32 * stride;
        let mut x = cursor.x;
        let per_char = advances
            .iter()
            .map(|advance| {
                let origin = point2(x + bonus + options.padding, y);
                x += advance + cell_extra;
                origin
            })
            .collect();

        frames.push(GlyphFrame {
            text: request.text.clone(),
            origin: point2(cursor.x, y),
            size: size2(x - cursor.x, font_height),
            per_char,
            row: cursor.row,
        });
        cursor.x = x;
    }

    let overflowing = frames
        .iter()
        .filter(|frame| {
            let bounds = frame.bounds();
            bounds.max.x > max_dim || bounds.max.y > max_dim
        })
        .count();
    if overflowing > 0 {
        warn!(
            "atlas capacity exceeded: {overflowing} of {} labels fall outside the {}px canvas",
            frames.len(),
            options.max_dim
        );
    }

    let rows = frames.last().map(|f| f.row + 1).unwrap_or(0);

    AtlasLayout {
        font_size,
        frames,
        rows,
        overflowing,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use placard_geometry::Color;

    use super::*;

    /// Fixed advance width, independent of character and font size.
    struct MonoAdvance(f32);

    impl CharAdvance for MonoAdvance {
        fn advance(&mut self, _ch: char, _font_size: f32) -> f32 {
            self.0
        }
    }

    fn requests(texts: &[&str]) -> Vec<TextRequest> {
        texts
            .iter()
            .map(|t| TextRequest::new(*t, Color::WHITE))
            .collect()
    }

    fn options(max_dim: u32) -> AtlasOptions {
        AtlasOptions {
            max_dim,
            padding: 4.0,
        }
    }

    #[test]
    fn font_size_shrinks_with_volume() {
        assert_eq!(derive_font_size(2048, 1, 1), 1024);
        assert_eq!(derive_font_size(2048, 4, 1), 512);
        assert_eq!(derive_font_size(2048, 3, 30), 107);
    }

    #[test]
    fn font_size_survives_degenerate_input() {
        assert_eq!(derive_font_size(2048, 0, 0), 1024);
        assert_eq!(derive_font_size(2048, 5, 0), derive_font_size(2048, 5, 1));
    }

    #[test]
    fn empty_request_list_packs_to_nothing() {
        let layout = plan_layout(&[], &mut MonoAdvance(10.0), options(2048));
        assert!(layout.frames.is_empty());
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.overflowing, 0);
    }

    #[test]
    fn one_frame_per_request_with_per_char_origins() {
        let layout = plan_layout(
            &requests(&["abc", "", "hello"]),
            &mut MonoAdvance(10.0),
            options(2048),
        );

        assert_eq!(layout.frames.len(), 3);
        assert_eq!(layout.frames[0].per_char.len(), 3);
        assert_eq!(layout.frames[1].per_char.len(), 0);
        assert_eq!(layout.frames[2].per_char.len(), 5);
    }

    #[test]
    fn zero_length_text_has_zero_width_and_no_negative_extent() {
        let layout = plan_layout(&requests(&[""]), &mut MonoAdvance(10.0), options(2048));
        let frame = &layout.frames[0];
        assert_eq!(frame.size.width, 0.0);
        assert!(frame.size.height > 0.0);
    }

    #[test]
    fn single_character_is_centered_symmetrically() {
        let advance = 10.0;
        let layout = plan_layout(&requests(&["A"]), &mut MonoAdvance(advance), options(2048));
        let frame = &layout.frames[0];

        // Half the advance is added on both sides of the cell.
        let draw_x = frame.per_char[0].x;
        let left_gap = draw_x - frame.origin.x;
        let right_gap = frame.origin.x + frame.size.width - (draw_x + advance);
        assert_eq!(left_gap, right_gap);
        assert_eq!(frame.size.width, 2.0 * advance + 2.0 * 4.0);
    }

    #[test]
    fn third_request_wraps_to_a_fresh_row() {
        // font size 107, wrap margin 321, each 30-char string is 690px wide:
        // two fit in row 0, the third projects past the margin and wraps.
        let text: String = "x".repeat(30);
        let layout = plan_layout(
            &requests(&[&text, &text, &text]),
            &mut MonoAdvance(15.0),
            options(2048),
        );

        assert_eq!(layout.frames[0].row, 0);
        assert_eq!(layout.frames[1].row, 0);
        assert_eq!(layout.frames[2].row, 1);
        assert_eq!(layout.frames[2].origin.x, 0.0);
        assert_eq!(layout.rows, 2);

        // One row further down: font_size * 1.2 + padding.
        let stride = layout.font_size as f32 * HEIGHT_SCALE + 4.0;
        assert_abs_diff_eq!(layout.frames[2].origin.y, stride, epsilon = 1e-4);

        // Never truncated mid-string: the wrapped frame is contiguous.
        let third = &layout.frames[2];
        assert_eq!(third.per_char.len(), 30);
        assert!(third.per_char.iter().all(|p| p.y == third.origin.y));
    }

    #[test]
    fn frames_stay_in_bounds_and_never_overlap() {
        let texts: Vec<String> = (0..12).map(|i| format!("label-{i}")).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let layout = plan_layout(&requests(&texts), &mut MonoAdvance(12.0), options(2048));

        assert_eq!(layout.overflowing, 0);
        let max = 2048.0;
        for frame in &layout.frames {
            let b = frame.bounds();
            assert!(b.min.x >= 0.0 && b.min.y >= 0.0);
            assert!(b.max.x <= max && b.max.y <= max);
        }
        for (a, b) in layout.frames.iter().tuple_combinations() {
            assert!(
                !a.bounds().intersects(&b.bounds()),
                "{:?} overlaps {:?}",
                a.text,
                b.text
            );
        }
    }

    #[test]
    fn identical_input_plans_identical_geometry() {
        let reqs = requests(&["one", "two", "three"]);
        let first = plan_layout(&reqs, &mut MonoAdvance(9.0), options(2048));
        let second = plan_layout(&reqs, &mut MonoAdvance(9.0), options(2048));
        assert_eq!(first, second);
    }

    #[test]
    fn capacity_overflow_is_detected_not_hidden() {
        // 10 one-character labels on a 64px canvas: one label per row, the
        // later rows run past the bottom edge.
        let texts: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let layout = plan_layout(&requests(&texts), &mut MonoAdvance(10.0), options(64));

        assert_eq!(layout.frames.len(), 10);
        assert!(layout.overflowing > 0);
        // Layout semantics are unchanged: frames are still produced in order.
        assert!(layout.frames.iter().all(|f| !f.text.is_empty()));
    }
}
