use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{Corner, GeoPoint};

/// The four independently georeferenced corners of a sign's footprint, in
/// [`Corner::ALL`] order.
#[derive(Debug, Copy, Clone, PartialEq, Default, From, Serialize, Deserialize)]
pub struct QuadFootprint(pub [GeoPoint; 4]);

impl QuadFootprint {
    pub fn corner(&self, corner: Corner) -> GeoPoint {
        self.0[corner.index()]
    }

    /// The arithmetic mean of the corners, used as the sign's anchor position.
    pub fn centroid(&self) -> GeoPoint {
        let sum = self
            .0
            .iter()
            .fold(GeoPoint::default(), |acc, &p| acc + p);
        sum / self.0.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> QuadFootprint {
        [
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
        ]
        .into()
    }

    #[test]
    fn corner_lookup_follows_attribute_order() {
        let quad = unit_square();
        assert_eq!(quad.corner(Corner::TopRight), GeoPoint::new(1.0, 1.0));
        assert_eq!(quad.corner(Corner::BottomLeft), GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn centroid_averages_all_corners() {
        assert_eq!(unit_square().centroid(), GeoPoint::new(0.5, 0.5));
    }
}
