//! Error types.
//!
//! Only malformed input is an error. Constraint breaches found while routing
//! (an over-capacity stop, an overrun tour) are reported as
//! [`Violation`](crate::models::Violation)s on the affected tour, and a
//! cancelled run still returns a result.

/// Input rejected before any search begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid constraint `{name}`: {value} (must be a positive number)")]
    InvalidConstraint { name: &'static str, value: f64 },
    #[error("invalid restriction `{rule}`: {reason}")]
    InvalidRestriction { rule: &'static str, reason: String },
    #[error("invalid coordinates for {subject}: ({lat}, {lon})")]
    InvalidCoordinates { subject: String, lat: f64, lon: f64 },
    #[error("address `{id}` has a non-positive load")]
    InvalidLoad { id: String },
    #[error("address `{id}` has an invalid {name}: {value}")]
    InvalidMeasure {
        id: String,
        name: &'static str,
        value: f64,
    },
    #[error("address id must not be empty")]
    EmptyAddressId,
    #[error("duplicate address id `{0}`")]
    DuplicateAddressId(String),
    #[error("invalid engine configuration `{name}`: {reason}")]
    InvalidConfig { name: &'static str, reason: String },
}

/// Errors returned by the public entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
