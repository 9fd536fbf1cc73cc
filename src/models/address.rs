//! Delivery address and priority types.

use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::error::ValidationError;

/// Delivery urgency. An address without a priority is a standard delivery.
///
/// Priority is advisory: it seeds one initial ordering and breaks cost ties
/// between otherwise equal solutions, but never overrides capacity limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// Sort rank of an optional priority: high first, standard last.
    pub fn rank(priority: Option<Priority>) -> u8 {
        match priority {
            Some(Priority::High) => 0,
            Some(Priority::Medium) => 1,
            Some(Priority::Low) => 2,
            None => 3,
        }
    }

    /// Urgency weight used by the priority tie-breaker. Standard is zero.
    pub fn urgency(priority: Option<Priority>) -> f64 {
        f64::from(3 - Self::rank(priority))
    }
}

/// A delivery stop.
///
/// `load` is the number of units (bottles) delivered. Weight and volume
/// default to `load × per-unit` figures taken from the vehicle constraints
/// unless given explicitly.
///
/// # Examples
///
/// ```
/// use tour_ga::models::{Address, Coordinates, Priority};
///
/// let a = Address::new("A1", Coordinates::new(48.14, 11.58), 12)
///     .with_priority(Priority::High)
///     .with_label("Marienplatz 1, München");
/// assert_eq!(a.id(), "A1");
/// assert_eq!(a.load(), 12);
/// assert_eq!(a.priority(), Some(Priority::High));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    id: String,
    coordinates: Coordinates,
    load: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume: Option<f64>,
}

impl Address {
    /// Creates an address with no priority, label, or explicit measures.
    pub fn new(id: impl Into<String>, coordinates: Coordinates, load: u32) -> Self {
        Self {
            id: id.into(),
            coordinates,
            load,
            priority: None,
            delivery_id: None,
            label: None,
            weight: None,
            volume: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_delivery_id(mut self, delivery_id: impl Into<String>) -> Self {
        self.delivery_id = Some(delivery_id.into());
        self
    }

    /// Sets the human-readable street address.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets an explicit weight, overriding `load × weight_per_unit`.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets an explicit volume, overriding `load × volume_per_unit`.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Unique identifier within one optimization call.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Units delivered at this stop.
    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Effective weight given the vehicle's per-unit weight.
    pub fn weight(&self, weight_per_unit: f64) -> f64 {
        self.weight
            .unwrap_or_else(|| f64::from(self.load) * weight_per_unit)
    }

    /// Effective volume given the vehicle's per-unit volume.
    pub fn volume(&self, volume_per_unit: f64) -> f64 {
        self.volume
            .unwrap_or_else(|| f64::from(self.load) * volume_per_unit)
    }

    /// Checks id, coordinates, load, and any explicit measures.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyAddressId);
        }
        self.coordinates
            .validate(format!("address `{}`", self.id))?;
        if self.load == 0 {
            return Err(ValidationError::InvalidLoad {
                id: self.id.clone(),
            });
        }
        for (name, value) in [("weight", self.weight), ("volume", self.volume)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ValidationError::InvalidMeasure {
                        id: self.id.clone(),
                        name,
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}
