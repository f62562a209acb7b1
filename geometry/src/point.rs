use std::ops::{Add, Div, Mul, Neg, Sub};

use serde_tuple::{Deserialize_tuple, Serialize_tuple};

/// A planar geographic coordinate in degrees, longitude first (GeoJSON order).
///
/// Both components are double precision. Map coordinates at planetary scale
/// exceed what a single f32 can carry without jitter, so these stay f64 all the
/// way to the precision split in the instance pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize_tuple, Deserialize_tuple)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl Neg for GeoPoint {
    type Output = GeoPoint;

    fn neg(self) -> Self::Output {
        Self::new(-self.lng, -self.lat)
    }
}

impl Add for GeoPoint {
    type Output = GeoPoint;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.lng + rhs.lng, self.lat + rhs.lat)
    }
}

impl Sub for GeoPoint {
    type Output = GeoPoint;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.lng - rhs.lng, self.lat - rhs.lat)
    }
}

impl Mul<f64> for GeoPoint {
    type Output = GeoPoint;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.lng * rhs, self.lat * rhs)
    }
}

impl Div<f64> for GeoPoint {
    type Output = GeoPoint;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.lng / rhs, self.lat / rhs)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self::new(lng, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_coordinate_pair() {
        let p = GeoPoint::new(13.4, 52.5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[13.4,52.5]");
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
