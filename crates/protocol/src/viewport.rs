use serde::{Deserialize, Serialize};

/// Map camera state as reported by the mapping library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub bearing: f64,
}

/// Rectangular geographic query region in WGS84.
///
/// Serialized with camelCase keys to match the server's `bounds` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

impl ViewportState {
    pub fn new(longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch: 0.0,
            bearing: 0.0,
        }
    }

    /// Translate the camera into a square query region.
    ///
    /// `delta = 360 / 2^zoom` spans both axes. This is a square
    /// approximation, not a Mercator-correct box, which is good enough
    /// for simulation area queries. Non-positive zoom degenerates to
    /// the full-world span rather than dividing by zero.
    pub fn bounds(&self) -> GeoBounds {
        let delta = if self.zoom > 0.0 {
            360.0 / self.zoom.exp2()
        } else {
            360.0
        };
        let half = delta / 2.0;
        GeoBounds {
            min_lng: self.longitude - half,
            max_lng: self.longitude + half,
            min_lat: self.latitude - half,
            max_lat: self.latitude + half,
        }
    }
}
