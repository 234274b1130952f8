use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Creates a point without checking bounds; see [`Point::is_valid`].
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    #[must_use]
    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    #[must_use]
    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}
