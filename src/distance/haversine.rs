//! Great-circle distance and travel-time estimation.

use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km between two points (haversine formula).
///
/// # Examples
///
/// ```
/// use tour_ga::models::Coordinates;
/// use tour_ga::distance::haversine_km;
///
/// let munich = Coordinates::new(48.1372, 11.5756);
/// let berlin = Coordinates::new(52.5200, 13.4050);
/// let d = haversine_km(munich, berlin);
/// assert!((d - 504.0).abs() < 2.0);
/// ```
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Converts distances into durations.
///
/// Duration of a tour is travel time at a constant average speed plus a fixed
/// service time per stop.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
///
/// let model = CostModel::new(50.0, 5.0);
/// assert!((model.travel_minutes(50.0) - 60.0).abs() < 1e-12);
/// assert!((model.tour_duration(25.0, 3) - 45.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    average_speed_kmh: f64,
    service_minutes_per_stop: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(50.0, 5.0)
    }
}

impl CostModel {
    pub fn new(average_speed_kmh: f64, service_minutes_per_stop: f64) -> Self {
        Self {
            average_speed_kmh,
            service_minutes_per_stop,
        }
    }

    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    pub fn service_minutes_per_stop(&self) -> f64 {
        self.service_minutes_per_stop
    }

    /// Minutes needed to drive `km`.
    pub fn travel_minutes(&self, km: f64) -> f64 {
        km / self.average_speed_kmh * 60.0
    }

    /// Travel time over `km` plus service time at `stops` stops, in minutes.
    pub fn tour_duration(&self, km: f64, stops: usize) -> f64 {
        self.travel_minutes(km) + self.service_minutes_per_stop * stops as f64
    }
}
