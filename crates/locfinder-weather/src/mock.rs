//! Canned collaborators for offline development and tests.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::Duration;

use locfinder_core::{ServiceError, WeatherScenario};

use crate::geocode::{GeocodeAddress, GeocodeResult, GeocodeSource};
use crate::location::GeolocationProvider;
use crate::provider::WeatherSource;
use crate::types::{Coordinates, LocationError, WeatherSnapshot};

/// Cambridge, Massachusetts
pub const MOCK_COORDINATES: Coordinates = Coordinates {
    latitude: 42.3736,
    longitude: -71.1097,
};

pub fn mock_geocode_result() -> GeocodeResult {
    GeocodeResult {
        display_name: "Cambridge, Middlesex County, Massachusetts, United States".to_string(),
        address: Some(GeocodeAddress {
            city: Some("Cambridge".to_string()),
            county: Some("Middlesex County".to_string()),
            state: Some("Massachusetts".to_string()),
            country: Some("United States".to_string()),
            country_code: Some("us".to_string()),
            ..Default::default()
        }),
    }
}

fn snapshot(
    temperature_c: f64,
    humidity_pct: f64,
    precipitation_mm: f64,
    weather_code: i32,
    wind_speed_kmh: f64,
    is_day: bool,
) -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_c,
        weather_code,
        wind_speed_kmh,
        humidity_pct,
        precipitation_mm,
        is_day,
    }
}

const NAMED_SCENARIOS: [WeatherScenario; 4] = [
    WeatherScenario::Sunny,
    WeatherScenario::Rainy,
    WeatherScenario::Snowy,
    WeatherScenario::Thunderstorm,
];

/// Canned weather for a scenario. `Random` picks one of the named ones.
pub fn mock_weather(scenario: WeatherScenario) -> WeatherSnapshot {
    match scenario {
        WeatherScenario::Default => snapshot(22.5, 65.0, 0.0, 2, 8.5, true),
        WeatherScenario::Sunny => snapshot(25.6, 45.0, 0.0, 0, 5.2, true),
        WeatherScenario::Rainy => snapshot(14.4, 85.0, 0.8, 61, 12.3, true),
        WeatherScenario::Snowy => snapshot(-2.2, 90.0, 0.5, 71, 15.8, true),
        WeatherScenario::Thunderstorm => snapshot(20.0, 88.0, 1.2, 95, 22.5, false),
        WeatherScenario::Random => {
            let picked = NAMED_SCENARIOS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(WeatherScenario::Default);
            mock_weather(picked)
        }
    }
}

/// Geolocation that answers immediately with a scripted outcome.
#[derive(Debug, Clone)]
pub struct MockGeolocator {
    outcome: Result<Coordinates, LocationError>,
    available: bool,
}

impl MockGeolocator {
    pub fn new() -> Self {
        Self {
            outcome: Ok(MOCK_COORDINATES),
            available: true,
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self {
            outcome: Err(error),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            outcome: Err(LocationError::ServiceUnavailable),
            available: false,
        }
    }
}

impl Default for MockGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationProvider for MockGeolocator {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.outcome.clone()
    }
}

/// Reverse geocoder that always resolves to Cambridge after a delay.
#[derive(Debug, Clone)]
pub struct MockGeocoder {
    delay: Duration,
}

impl MockGeocoder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GeocodeSource for MockGeocoder {
    async fn reverse(&self, coords: Coordinates) -> Option<GeocodeResult> {
        tracing::debug!("Mock reverse geocoding {}", coords);
        tokio::time::sleep(self.delay).await;
        Some(mock_geocode_result())
    }
}

/// Weather source serving a canned scenario after a delay.
#[derive(Debug, Clone)]
pub struct MockWeather {
    delay: Duration,
    scenario: WeatherScenario,
}

impl MockWeather {
    pub fn new(delay: Duration, scenario: WeatherScenario) -> Self {
        Self { delay, scenario }
    }
}

#[async_trait]
impl WeatherSource for MockWeather {
    async fn current(&self, coords: Coordinates) -> Result<WeatherSnapshot, ServiceError> {
        tracing::debug!(scenario = ?self.scenario, "Mock weather for {}", coords);
        tokio::time::sleep(self.delay).await;
        Ok(mock_weather(self.scenario))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{city_of, full_location_of};

    #[test]
    fn test_mock_geocode_reads_as_cambridge() {
        let r = mock_geocode_result();
        assert_eq!(city_of(Some(&r)), "Cambridge");
        assert_eq!(
            full_location_of(Some(&r)),
            "Cambridge, Massachusetts, United States"
        );
    }

    #[test]
    fn test_default_scenario_is_partly_cloudy_day() {
        let w = mock_weather(WeatherScenario::Default);
        assert_eq!(w.weather_code, 2);
        assert!(w.is_day);
    }

    #[test]
    fn test_named_scenarios() {
        assert_eq!(mock_weather(WeatherScenario::Sunny).weather_code, 0);
        assert!(mock_weather(WeatherScenario::Rainy).classification().is_raining);
        assert_eq!(mock_weather(WeatherScenario::Snowy).weather_code, 71);
        assert!(!mock_weather(WeatherScenario::Thunderstorm).is_day);
    }

    #[test]
    fn test_random_scenario_is_one_of_named() {
        let codes: Vec<i32> = NAMED_SCENARIOS
            .iter()
            .map(|s| mock_weather(*s).weather_code)
            .collect();
        for _ in 0..20 {
            assert!(codes.contains(&mock_weather(WeatherScenario::Random).weather_code));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_weather_honors_delay() {
        let source = MockWeather::new(Duration::from_millis(400), WeatherScenario::Sunny);
        let start = tokio::time::Instant::now();
        let w = source.current(MOCK_COORDINATES).await.unwrap();
        assert_eq!(w.weather_code, 0);
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_mock_geolocator_variants() {
        assert_eq!(
            MockGeolocator::new().current_position().await.unwrap(),
            MOCK_COORDINATES
        );
        assert!(!MockGeolocator::unavailable().is_available());
        let denied = MockGeolocator::failing(LocationError::PermissionDenied("no".into()));
        assert!(denied.current_position().await.is_err());
    }
}
