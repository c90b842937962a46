//! Camera state of the map and its URL hash form.
//!
//! The hash has the form `#zoom/lat/lon[/bearing[/pitch]]`. Bearing and pitch are only
//! written when they are not zero, so the hash of an unrotated flat map has three parts.

use crate::error::ViewerError;
use reinfo_map_types::GeoPoint2d;
use serde::{Deserialize, Serialize};

/// Steepest pitch the renderer supports.
pub const MAX_PITCH_LIMIT: f64 = 85.0;

/// Initial camera and camera limits of a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Map center as `[lon, lat]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: f64,
    /// Lowest zoom level the camera may reach.
    pub min_zoom: f64,
    /// Highest zoom level the camera may reach.
    pub max_zoom: f64,
    /// Initial pitch in degrees.
    pub pitch: f64,
    /// Steepest pitch the camera may reach, at most [`MAX_PITCH_LIMIT`].
    pub max_pitch: f64,
    /// Initial bearing in degrees clockwise from north.
    pub bearing: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 0.0,
            min_zoom: 0.0,
            max_zoom: 22.0,
            pitch: 0.0,
            max_pitch: 60.0,
            bearing: 0.0,
        }
    }
}

impl CameraOptions {
    /// Initial map center.
    pub fn center(&self) -> GeoPoint2d {
        GeoPoint2d::lonlat(self.center[0], self.center[1])
    }

    /// Camera the viewer starts with.
    pub fn initial_state(&self) -> CameraState {
        CameraState {
            center: self.center(),
            zoom: self.zoom,
            bearing: self.bearing,
            pitch: self.pitch,
        }
        .clamp(self)
    }
}

/// Current camera of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Geographic position in the middle of the map.
    pub center: GeoPoint2d,
    /// Zoom level.
    pub zoom: f64,
    /// Degrees clockwise from north.
    pub bearing: f64,
    /// Tilt in degrees, `0` for a map seen from straight above.
    pub pitch: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl CameraState {
    /// Limits zoom and pitch to the ranges allowed by the options and wraps the bearing into
    /// `(-180, 180]`.
    pub fn clamp(&self, options: &CameraOptions) -> Self {
        let mut bearing = self.bearing % 360.0;
        if bearing > 180.0 {
            bearing -= 360.0;
        } else if bearing <= -180.0 {
            bearing += 360.0;
        }

        Self {
            center: self.center,
            zoom: self
                .zoom
                .clamp(options.min_zoom, options.max_zoom.max(options.min_zoom)),
            bearing,
            pitch: self
                .pitch
                .clamp(0.0, options.max_pitch.min(MAX_PITCH_LIMIT).max(0.0)),
        }
    }

    /// URL hash of the camera, including the leading `#`.
    pub fn to_hash(&self) -> String {
        let mut hash = format!(
            "#{}/{}/{}",
            round_to(self.zoom, 2),
            round_to(self.center.lat(), 5),
            round_to(self.center.lon(), 5)
        );

        if self.bearing != 0.0 || self.pitch != 0.0 {
            hash.push_str(&format!("/{}", round_to(self.bearing, 1)));
        }
        if self.pitch != 0.0 {
            hash.push_str(&format!("/{}", round_to(self.pitch, 0)));
        }

        hash
    }

    /// Parses a hash written by [`CameraState::to_hash`]. The leading `#` is optional.
    pub fn from_hash(hash: &str) -> Result<Self, ViewerError> {
        let invalid = || ViewerError::InvalidHash(hash.to_string());

        let parts = hash
            .trim_start_matches('#')
            .split('/')
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let (zoom, lat, lon, bearing, pitch) = match parts[..] {
            [zoom, lat, lon] => (zoom, lat, lon, 0.0, 0.0),
            [zoom, lat, lon, bearing] => (zoom, lat, lon, bearing, 0.0),
            [zoom, lat, lon, bearing, pitch] => (zoom, lat, lon, bearing, pitch),
            _ => return Err(invalid()),
        };

        let center = GeoPoint2d::latlon(lat, lon);
        let is_finite = [zoom, bearing, pitch].iter().all(|value| value.is_finite());
        if !center.is_valid() || !is_finite {
            return Err(invalid());
        }

        Ok(Self {
            center,
            zoom,
            bearing,
            pitch,
        })
    }
}
