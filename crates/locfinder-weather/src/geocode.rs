//! Reverse geocoding: convert coordinates to human-readable place names.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.
//!
//! Failures here are not errors: every problem is logged and surfaces as
//! `None`, which the readers below turn into "Unknown".

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use locfinder_core::EndpointsConfig;

use crate::types::Coordinates;

/// Returned when no place name can be resolved.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Nominatim `reverse` response. Fields we never read are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub display_name: String,
    /// `None` when the response carried no address block
    #[serde(default)]
    pub address: Option<GeocodeAddress>,
}

/// Nominatim answers unresolvable points with 200 and an `error` field.
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    error: Option<String>,
    #[serde(flatten)]
    result: GeocodeResult,
}

/// Locality fields of a Nominatim address block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeocodeAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub postcode: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// City name with precedence city > town > village > municipality.
pub fn city_of(result: Option<&GeocodeResult>) -> String {
    let Some(addr) = result.and_then(|r| r.address.as_ref()) else {
        return UNKNOWN_CITY.to_string();
    };

    non_empty(&addr.city)
        .or_else(|| non_empty(&addr.town))
        .or_else(|| non_empty(&addr.village))
        .or_else(|| non_empty(&addr.municipality))
        .unwrap_or(UNKNOWN_CITY)
        .to_string()
}

/// "City, State, Country" from whatever parts are present, falling back to
/// the display name when none are. No address block at all reads as "Unknown".
pub fn full_location_of(result: Option<&GeocodeResult>) -> String {
    let Some(result) = result else {
        return UNKNOWN_CITY.to_string();
    };
    let Some(addr) = &result.address else {
        return UNKNOWN_CITY.to_string();
    };

    let city = city_of(Some(result));
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if city != UNKNOWN_CITY {
        parts.push(&city);
    }
    if let Some(state) = non_empty(&addr.state) {
        parts.push(state);
    }
    if let Some(country) = non_empty(&addr.country) {
        parts.push(country);
    }

    if parts.is_empty() {
        result.display_name.clone()
    } else {
        parts.join(", ")
    }
}

/// Anything that can turn coordinates into a geocode result.
#[async_trait]
pub trait GeocodeSource: Send + Sync {
    /// `None` means the place could not be resolved.
    async fn reverse(&self, coords: Coordinates) -> Option<GeocodeResult>;
}

/// Live Nominatim client.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self, reqwest::Error> {
        // Nominatim's usage policy rejects requests without a User-Agent
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoints.request_timeout_secs))
            .user_agent(endpoints.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: endpoints.nominatim_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, coords: Coordinates) -> Result<GeocodeResult, String> {
        let url = format!("{}/reverse", self.base_url);
        tracing::debug!("Reverse geocoding {}", coords);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP error! status: {}", response.status().as_u16()));
        }

        let body: NominatimResponse = response.json().await.map_err(|e| e.to_string())?;
        match body.error {
            Some(e) => Err(e),
            None => Ok(body.result),
        }
    }
}

#[async_trait]
impl GeocodeSource for ReverseGeocoder {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn reverse(&self, coords: Coordinates) -> Option<GeocodeResult> {
        match self.fetch(coords).await {
            Ok(result) => {
                tracing::info!("Reverse geocoded to: {}", result.display_name);
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Reverse geocoding error: {}", e);
                None
            }
        }
    }
}
