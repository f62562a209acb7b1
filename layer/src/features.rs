//! Sign features and their GeoJSON-shaped source data.

use anyhow::Result;
use log::warn;
use serde::Deserialize;

use placard_geometry::{Color, GeoPoint, QuadFootprint};

/// One sign to render: a label over a quadrilateral footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub text: String,
    /// Baked into the atlas raster.
    pub font_color: Color,
    pub footprint: QuadFootprint,
    /// The anchor position, by default the footprint centroid.
    pub position: GeoPoint,
    /// Instance color; only visible for transparency-mask entries.
    pub color: Color,
    pub size: f32,
}

impl Feature {
    pub fn new(id: impl Into<String>, text: impl Into<String>, footprint: QuadFootprint) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            font_color: Color::WHITE,
            position: footprint.centroid(),
            footprint,
            color: Color::default(),
            size: 1.0,
        }
    }

    pub fn with_font_color(mut self, font_color: Color) -> Self {
        self.font_color = font_color;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Collection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: RawGeometry,
    #[serde(default)]
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    /// Polygon rings; only the outer ring is read.
    coordinates: Vec<Vec<GeoPoint>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default, rename = "fontColor")]
    font_color: Option<String>,
}

/// Reads a GeoJSON-shaped feature collection of labelled polygons.
///
/// The first four outer-ring coordinates become the sign's footprint, the
/// ring average its anchor position, `properties.name` its label. Features
/// without a usable ring or name are skipped with a warning, never an error.
pub fn features_from_geojson(json: &str) -> Result<Vec<Feature>> {
    let collection: Collection = serde_json::from_str(json)?;

    let mut features = Vec::with_capacity(collection.features.len());
    for (index, raw) in collection.features.into_iter().enumerate() {
        let Some(ring) = raw.geometry.coordinates.first() else {
            warn!("feature {index} has no polygon ring, skipped");
            continue;
        };
        if ring.len() < 4 {
            warn!("feature {index} has a degenerate ring of {} points, skipped", ring.len());
            continue;
        }
        let Some(text) = raw.properties.name else {
            warn!("feature {index} has no name, skipped");
            continue;
        };

        let footprint = QuadFootprint([ring[0], ring[1], ring[2], ring[3]]);
        // The anchor averages the whole ring, not just the footprint corners.
        let position = ring
            .iter()
            .fold(GeoPoint::default(), |acc, &p| acc + p)
            / ring.len() as f64;

        let id = match raw.properties.id {
            Some(serde_json::Value::String(s)) => s,
            Some(value) => value.to_string(),
            None => index.to_string(),
        };

        let font_color = match raw.properties.font_color.as_deref() {
            None => Color::WHITE,
            Some(css) => Color::from_css(css).unwrap_or_else(|| {
                warn!("feature {index} has unparsable font color {css:?}, using white");
                Color::WHITE
            }),
        };

        let mut feature = Feature::new(id, text, footprint).with_font_color(font_color);
        feature.position = position;
        features.push(feature);
    }

    Ok(features)
}
