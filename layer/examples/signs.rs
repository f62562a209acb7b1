//! Packs a small feature collection and dumps the resulting per-instance
//! attribute buffers.
//!
//! Run with `RUST_LOG=info` to see the atlas lifecycle.

use anyhow::Result;

use placard_layer::{PrecisionMode, SignLayer, SignProps, features_from_geojson};

const GEOJSON: &str = r##"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [13.4049, 52.5201], [13.4041, 52.5201],
                    [13.4041, 52.5195], [13.4049, 52.5195],
                    [13.4049, 52.5201]
                ]]
            },
            "properties": {"name": "Alexanderplatz", "id": 1}
        },
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [13.3779, 52.5164], [13.3771, 52.5164],
                    [13.3771, 52.5158], [13.3779, 52.5158],
                    [13.3779, 52.5164]
                ]]
            },
            "properties": {"name": "U", "id": 2, "fontColor": "#fff"}
        }
    ]
}"##;

fn main() -> Result<()> {
    env_logger::init();

    let data = features_from_geojson(GEOJSON)?;
    let layer = SignLayer::new(SignProps {
        data,
        precision: PrecisionMode::Double,
        ..SignProps::default()
    })?;

    if let Some(atlas) = layer.atlas() {
        println!(
            "atlas: {}x{} px, {} frames",
            atlas.image.width(),
            atlas.image.height(),
            atlas.frames.len()
        );
        for frame in &atlas.frames {
            println!(
                "  {:20} at ({:6.1}, {:6.1}) size {:6.1}x{:5.1} row {}",
                frame.text, frame.origin.x, frame.origin.y, frame.size.width, frame.size.height, frame.row
            );
        }
    }

    let attributes = layer.attributes();
    for name in attributes.names().collect::<Vec<_>>() {
        if let Some(buffer) = attributes.buffer(name) {
            println!(
                "{name:15} {:3} elements x {:2} bytes{}",
                buffer.element_count(),
                buffer.element_size(),
                if buffer.is_constant() { " (constant)" } else { "" }
            );
        }
    }

    println!("params: {:?}", layer.params());
    Ok(())
}
