//! JSON boundary for callers outside Rust.

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{Address, Coordinates, VehicleConstraints};
use crate::optimizer::optimize_with;

#[derive(Debug, Deserialize)]
struct Request {
    addresses: Vec<Address>,
    depot: Coordinates,
    #[serde(default)]
    constraints: VehicleConstraints,
    config: Option<EngineConfig>,
}

/// Runs one optimization from a JSON request and returns the result as JSON.
///
/// The request is `{ "addresses": [...], "depot": {...}, "constraints": {...},
/// "config": {...} }`; `constraints` and `config` are optional and default
/// to [`VehicleConstraints::default`] and [`EngineConfig::global`].
///
/// # Examples
///
/// ```
/// let request = r#"{
///     "addresses": [
///         { "id": "A1", "coordinates": { "lat": 48.1372, "lon": 11.5756 }, "load": 10 },
///         { "id": "A2", "coordinates": { "lat": 48.1500, "lon": 11.5800 }, "load": 15, "priority": "high" }
///     ],
///     "depot": { "lat": 48.1067, "lon": 11.4247 },
///     "constraints": { "max_load": 20 },
///     "config": { "population_size": 20, "max_generations": 10, "seed": 3 }
/// }"#;
/// let response: serde_json::Value = serde_json::from_str(&tour_ga::optimize_json(request).unwrap()).unwrap();
/// assert_eq!(response["statistics"]["total_tours"], 2);
/// assert_eq!(response["metadata"]["seed"], 3);
/// ```
pub fn optimize_json(request: &str) -> Result<String> {
    let request: Request = serde_json::from_str(request)?;
    let config = request
        .config
        .unwrap_or_else(|| EngineConfig::global().clone());
    let result = optimize_with(&request.addresses, request.depot, &request.constraints, &config)?;
    Ok(serde_json::to_string(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};

    #[test]
    fn test_malformed_json() {
        assert!(matches!(optimize_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_validation_passes_through() {
        let request = r#"{
            "addresses": [{ "id": "A", "coordinates": { "lat": 1.0, "lon": 1.0 }, "load": 0 }],
            "depot": { "lat": 0.0, "lon": 0.0 }
        }"#;
        assert!(matches!(
            optimize_json(request),
            Err(Error::Validation(ValidationError::InvalidLoad { .. }))
        ));
    }

    #[test]
    fn test_empty_request() {
        let response = optimize_json(r#"{ "addresses": [], "depot": { "lat": 0.0, "lon": 0.0 } }"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["tours"], serde_json::json!([]));
        assert_eq!(value["metadata"]["termination"], "trivial");
    }
}
