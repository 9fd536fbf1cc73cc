//! Vehicle and operations constraint profile.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Coordinates;
use crate::error::ValidationError;

/// Regional and operational restriction applied on top of the numeric limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestrictionRule {
    /// Every stop must lie inside this latitude/longitude box.
    ServiceArea {
        south_west: Coordinates,
        north_east: Coordinates,
    },
    /// Every stop must lie within `km` of the depot.
    MaxRadius { km: f64 },
    /// A single tour may not exceed `km` of travel.
    MaxTourDistance { km: f64 },
}

impl RestrictionRule {
    fn name(&self) -> &'static str {
        match self {
            RestrictionRule::ServiceArea { .. } => "service_area",
            RestrictionRule::MaxRadius { .. } => "max_radius",
            RestrictionRule::MaxTourDistance { .. } => "max_tour_distance",
        }
    }

    /// Returns `true` if `point` is allowed by an area rule. Non-area rules
    /// accept every point.
    pub fn admits(&self, point: Coordinates, depot_distance_km: f64) -> bool {
        match self {
            RestrictionRule::ServiceArea {
                south_west,
                north_east,
            } => {
                (south_west.lat..=north_east.lat).contains(&point.lat)
                    && (south_west.lon..=north_east.lon).contains(&point.lon)
            }
            RestrictionRule::MaxRadius { km } => depot_distance_km <= *km,
            RestrictionRule::MaxTourDistance { .. } => true,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidRestriction {
            rule: self.name(),
            reason,
        };
        match self {
            RestrictionRule::ServiceArea {
                south_west,
                north_east,
            } => {
                if !south_west.is_valid() || !north_east.is_valid() {
                    return Err(invalid("corner outside the geographic range".into()));
                }
                if south_west.lat > north_east.lat || south_west.lon > north_east.lon {
                    return Err(invalid("south-west corner must not exceed north-east".into()));
                }
                Ok(())
            }
            RestrictionRule::MaxRadius { km } | RestrictionRule::MaxTourDistance { km } => {
                if km.is_nan() || *km <= 0.0 {
                    return Err(invalid(format!("{km} km is not a positive distance")));
                }
                Ok(())
            }
        }
    }
}

/// `null` on the wire means no cap.
mod unbounded {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Limits a single tour must respect.
///
/// Every numeric limit must be positive. Use `u32::MAX` or `f64::INFINITY`
/// to lift a limit entirely.
///
/// # Examples
///
/// ```
/// use tour_ga::models::VehicleConstraints;
///
/// let c = VehicleConstraints::default().with_max_load(20).with_max_stops(4);
/// assert_eq!(c.max_load(), 20);
/// assert_eq!(c.max_stops(), 4);
/// assert!(c.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConstraints {
    max_load: u32,
    #[serde(with = "unbounded")]
    max_weight: f64,
    #[serde(with = "unbounded")]
    max_volume: f64,
    max_stops: u32,
    #[serde(with = "unbounded")]
    max_duration: f64,
    fuel_efficiency: f64,
    weight_per_unit: f64,
    volume_per_unit: f64,
    restrictions: Vec<RestrictionRule>,
}

impl Default for VehicleConstraints {
    /// 80 units per trip, an 8 hour shift, and no weight, volume, or stop cap.
    fn default() -> Self {
        Self {
            max_load: 80,
            max_weight: f64::INFINITY,
            max_volume: f64::INFINITY,
            max_stops: u32::MAX,
            max_duration: 480.0,
            fuel_efficiency: 10.0,
            weight_per_unit: 1.0,
            volume_per_unit: 1.0,
            restrictions: Vec::new(),
        }
    }
}

impl VehicleConstraints {
    /// A profile with every cap lifted.
    pub fn unlimited() -> Self {
        Self {
            max_load: u32::MAX,
            max_weight: f64::INFINITY,
            max_volume: f64::INFINITY,
            max_stops: u32::MAX,
            max_duration: f64::INFINITY,
            ..Self::default()
        }
    }

    pub fn with_max_load(mut self, max_load: u32) -> Self {
        self.max_load = max_load;
        self
    }

    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    pub fn with_max_volume(mut self, max_volume: f64) -> Self {
        self.max_volume = max_volume;
        self
    }

    pub fn with_max_stops(mut self, max_stops: u32) -> Self {
        self.max_stops = max_stops;
        self
    }

    /// Sets the per-tour duration cap in minutes.
    pub fn with_max_duration(mut self, minutes: f64) -> Self {
        self.max_duration = minutes;
        self
    }

    /// Sets fuel efficiency in km per litre.
    pub fn with_fuel_efficiency(mut self, km_per_litre: f64) -> Self {
        self.fuel_efficiency = km_per_litre;
        self
    }

    /// Sets the weight and volume of one load unit.
    pub fn with_unit_measures(mut self, weight_per_unit: f64, volume_per_unit: f64) -> Self {
        self.weight_per_unit = weight_per_unit;
        self.volume_per_unit = volume_per_unit;
        self
    }

    pub fn with_restriction(mut self, rule: RestrictionRule) -> Self {
        self.restrictions.push(rule);
        self
    }

    pub fn max_load(&self) -> u32 {
        self.max_load
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    pub fn max_stops(&self) -> u32 {
        self.max_stops
    }

    /// Per-tour duration cap in minutes.
    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// Fuel efficiency in km per litre.
    pub fn fuel_efficiency(&self) -> f64 {
        self.fuel_efficiency
    }

    pub fn weight_per_unit(&self) -> f64 {
        self.weight_per_unit
    }

    pub fn volume_per_unit(&self) -> f64 {
        self.volume_per_unit
    }

    pub fn restrictions(&self) -> &[RestrictionRule] {
        &self.restrictions
    }

    /// Tightest `MaxTourDistance` restriction, if any.
    pub fn max_tour_distance(&self) -> Option<f64> {
        self.restrictions
            .iter()
            .filter_map(|r| match r {
                RestrictionRule::MaxTourDistance { km } => Some(*km),
                _ => None,
            })
            .reduce(f64::min)
    }

    /// Rejects any non-positive (or NaN) limit and malformed restrictions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = |name: &'static str, value: f64| {
            if value.is_nan() || value <= 0.0 {
                Err(ValidationError::InvalidConstraint { name, value })
            } else {
                Ok(())
            }
        };
        positive("max_load", f64::from(self.max_load))?;
        positive("max_weight", self.max_weight)?;
        positive("max_volume", self.max_volume)?;
        positive("max_stops", f64::from(self.max_stops))?;
        positive("max_duration", self.max_duration)?;
        positive("fuel_efficiency", self.fuel_efficiency)?;
        positive("weight_per_unit", self.weight_per_unit)?;
        positive("volume_per_unit", self.volume_per_unit)?;
        self.restrictions.iter().try_for_each(RestrictionRule::validate)
    }
}
