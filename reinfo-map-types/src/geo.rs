//! Geographic primitives.

use serde::{Deserialize, Serialize};

/// 2d point on the surface of the Earth, in WGS84 degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint2d {
    /// Creates a point from latitude and longitude values.
    pub fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point from longitude and latitude values, the order used by GeoJSON and
    /// by `[lng, lat]` arrays in style documents.
    pub fn lonlat(lon: f64, lat: f64) -> Self {
        Self::latlon(lat, lon)
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Returns true if both coordinates are finite and inside the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Builds a point from a `[lon, lat]` coordinate slice. Extra elements (altitude) are
    /// ignored.
    pub fn from_lonlat_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [lon, lat, ..] => Some(Self::lonlat(*lon, *lat)),
            _ => None,
        }
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use reinfo_map_types::latlon;
///
/// let point = latlon!(35.90596, 139.47507);
/// assert_eq!(point.lat(), 35.90596);
/// assert_eq!(point.lon(), 139.47507);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint2d::latlon($lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lonlat_slice_takes_first_two_values() {
        let point = GeoPoint2d::from_lonlat_slice(&[139.5, 35.9, 12.0]).expect("two coordinates");
        assert_eq!(point, latlon!(35.9, 139.5));
        assert!(GeoPoint2d::from_lonlat_slice(&[139.5]).is_none());
    }

    #[test]
    fn validates_ranges() {
        assert!(latlon!(35.9, 139.5).is_valid());
        assert!(!latlon!(91.0, 0.0).is_valid());
        assert!(!latlon!(0.0, -180.5).is_valid());
        assert!(!latlon!(f64::NAN, 0.0).is_valid());
    }
}
