//! Geolocation collaborators: where is the user right now?
//!
//! Callers check [`GeolocationProvider::is_available`] before asking for a
//! position so a missing capability is reported without starting a lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use locfinder_core::{EndpointsConfig, LocationConfig, LocationProviderKind};

use crate::types::{Coordinates, LocationError};

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Whether this provider can produce a position at all.
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Build the provider selected in the `[location]` config section.
pub fn from_config(
    location: &LocationConfig,
    endpoints: &EndpointsConfig,
) -> Result<Box<dyn GeolocationProvider>, reqwest::Error> {
    Ok(match location.provider {
        LocationProviderKind::Ip => Box::new(IpGeolocator::new(endpoints)?),
        LocationProviderKind::Fixed => Box::new(FixedGeolocator(Coordinates::new(
            location.latitude,
            location.longitude,
        ))),
        LocationProviderKind::None => Box::new(UnsupportedGeolocator),
    })
}

/// ip-api.com style JSON response.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    client: Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoints.request_timeout_secs))
            .user_agent(endpoints.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            url: endpoints.ip_geolocation_url.clone(),
        })
    }
}

#[async_trait]
impl GeolocationProvider for IpGeolocator {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Lookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Lookup(format!(
                "HTTP error! status: {}",
                response.status().as_u16()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Lookup(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            tracing::warn!("IP geolocation refused: {}", reason);
            return Err(LocationError::PermissionDenied(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                tracing::info!(lat, lon, city = ?body.city, "IP geolocation resolved");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Lookup(
                "response did not include coordinates".to_string(),
            )),
        }
    }
}

/// Always reports the configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl GeolocationProvider for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No geolocation capability on this system.
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedGeolocator;

#[async_trait]
impl GeolocationProvider for UnsupportedGeolocator {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_returns_configured_position() {
        let geo = FixedGeolocator(Coordinates::new(42.3736, -71.1097));
        assert!(geo.is_available());
        assert_eq!(
            geo.current_position().await.unwrap(),
            Coordinates::new(42.3736, -71.1097)
        );
    }

    #[tokio::test]
    async fn test_unsupported_is_unavailable() {
        let geo = UnsupportedGeolocator;
        assert!(!geo.is_available());
        assert!(matches!(
            geo.current_position().await,
            Err(LocationError::ServiceUnavailable)
        ));
    }

    #[test]
    fn test_from_config_selects_provider() {
        let endpoints = EndpointsConfig::default();

        let none = LocationConfig {
            provider: LocationProviderKind::None,
            ..Default::default()
        };
        assert!(!from_config(&none, &endpoints).unwrap().is_available());

        let fixed = LocationConfig {
            provider: LocationProviderKind::Fixed,
            latitude: 1.0,
            longitude: 2.0,
        };
        assert!(from_config(&fixed, &endpoints).unwrap().is_available());
    }
}
