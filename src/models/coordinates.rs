//! Geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A point on the Earth's surface in decimal degrees (WGS84).
///
/// # Examples
///
/// ```
/// use tour_ga::models::Coordinates;
///
/// let planegg = Coordinates::new(48.1067, 11.4247);
/// assert!(planegg.is_valid());
/// assert!(!Coordinates::new(91.0, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair. Range is checked by [`validate`](Self::validate).
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` if latitude is within ±90° and longitude within ±180°.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Fails with [`ValidationError::InvalidCoordinates`] naming `subject`.
    pub fn validate(&self, subject: impl Into<String>) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError::InvalidCoordinates {
                subject: subject.into(),
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}
