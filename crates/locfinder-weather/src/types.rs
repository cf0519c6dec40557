use serde::{Deserialize, Serialize};

use crate::classify::WeatherClassification;

/// Geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions at one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    /// WMO weather code
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub is_day: bool,
}

impl WeatherSnapshot {
    /// Display attributes derived from the weather code.
    pub fn classification(&self) -> WeatherClassification {
        WeatherClassification::from_code(self.weather_code, self.is_day)
    }
}

/// Geolocation collaborator errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location lookup failed: {0}")]
    Lookup(String),
}
