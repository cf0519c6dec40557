//! Current weather from Open-Meteo.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use locfinder_core::{EndpointsConfig, ReqwestErrorExt, ServiceError};

use crate::types::{Coordinates, WeatherSnapshot};

/// Variables requested in the `current` block.
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,weather_code,wind_speed_10m,is_day";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    is_day: u8,
}

impl From<CurrentBlock> for WeatherSnapshot {
    fn from(c: CurrentBlock) -> Self {
        Self {
            temperature_c: c.temperature_2m,
            weather_code: c.weather_code,
            wind_speed_kmh: c.wind_speed_10m,
            humidity_pct: c.relative_humidity_2m,
            precipitation_mm: c.precipitation,
            is_day: c.is_day == 1,
        }
    }
}

/// Anything that can report current weather at a position.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, coords: Coordinates) -> Result<WeatherSnapshot, ServiceError>;
}

/// Live Open-Meteo client.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoints.request_timeout_secs))
            .user_agent(endpoints.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: endpoints.open_meteo_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn current(&self, coords: Coordinates) -> Result<WeatherSnapshot, ServiceError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("temperature_unit", "celsius".to_string()),
                ("wind_speed_unit", "kmh".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Open-Meteo returned status {}", response.status());
            return Err(ServiceError::WeatherUnavailable);
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Network(e.into_network_error()))?;

        let snapshot = WeatherSnapshot::from(body.current);
        tracing::info!(
            code = snapshot.weather_code,
            temperature = snapshot.temperature_c,
            "Fetched current weather"
        );
        Ok(snapshot)
    }
}
