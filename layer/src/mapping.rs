use std::collections::HashMap;

use placard_atlas::GlyphFrame;

/// What the instance pipeline reads from one atlas entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingEntry {
    pub width: f32,
    pub height: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    /// A transparency mask is tinted with the instance color; everything else
    /// keeps its own rasterized colors.
    pub mask: bool,
}

impl MappingEntry {
    /// Text labels anchor at their center and carry their own baked colors.
    pub fn from_frame(frame: &GlyphFrame) -> Self {
        Self {
            width: frame.size.width,
            height: frame.size.height,
            anchor_x: frame.size.width / 2.0,
            anchor_y: frame.size.height / 2.0,
            mask: false,
        }
    }

    pub fn offset(&self) -> [f32; 2] {
        [
            self.width / 2.0 - self.anchor_x,
            self.height / 2.0 - self.anchor_y,
        ]
    }
}

/// Atlas entries keyed the way features reference them: by label text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignMapping(HashMap<String, MappingEntry>);

impl SignMapping {
    pub fn from_frames(frames: &[GlyphFrame]) -> Self {
        Self(
            frames
                .iter()
                .map(|frame| (frame.text.clone(), MappingEntry::from_frame(frame)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.0.get(key)
    }

    /// Replaces or adds an entry, e.g. to mark an icon as a mask.
    pub fn insert(&mut self, key: impl Into<String>, entry: MappingEntry) {
        self.0.insert(key.into(), entry);
    }
}
