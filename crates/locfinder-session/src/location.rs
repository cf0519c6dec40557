//! Location acquisition: position, then reverse geocoding.

use serde::Serialize;
use std::sync::Arc;

use locfinder_core::{ResourceState, ServiceError, SharedResource};
use locfinder_weather::{
    city_of, full_location_of, Coordinates, GeocodeResult, GeocodeSource, GeolocationProvider,
};

/// Where the user is, as far as we could tell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    /// `None` when reverse geocoding failed
    pub city: Option<String>,
    /// `None` when reverse geocoding failed
    pub full_location: Option<String>,
}

impl ResolvedLocation {
    pub fn new(coordinates: Coordinates, geocode: Option<&GeocodeResult>) -> Self {
        Self {
            coordinates,
            city: geocode.map(|g| city_of(Some(g))),
            full_location: geocode.map(|g| full_location_of(Some(g))),
        }
    }
}

pub struct LocationFlow {
    geolocator: Arc<dyn GeolocationProvider>,
    geocoder: Arc<dyn GeocodeSource>,
    state: SharedResource<ResolvedLocation>,
}

impl LocationFlow {
    pub fn new(
        geolocator: Arc<dyn GeolocationProvider>,
        geocoder: Arc<dyn GeocodeSource>,
    ) -> Self {
        Self {
            geolocator,
            geocoder,
            state: SharedResource::new("location"),
        }
    }

    /// Observable state of the location resource.
    pub fn state(&self) -> &SharedResource<ResolvedLocation> {
        &self.state
    }

    /// Acquire the current position and resolve it to a place name.
    pub async fn locate(&self) -> ResourceState<ResolvedLocation> {
        if !self.geolocator.is_available() {
            self.state
                .fail_fast(ServiceError::GeolocationUnsupported.to_string());
            return self.state.snapshot();
        }

        let ticket = self.state.begin();
        let result = self.resolve().await;
        self.state.settle(ticket, result);
        self.state.snapshot()
    }

    async fn resolve(&self) -> Result<ResolvedLocation, ServiceError> {
        let coords = self
            .geolocator
            .current_position()
            .await
            .map_err(|e| ServiceError::Geolocation(e.to_string()))?;
        tracing::info!("Got location: {}", coords);

        // Geocoding failures leave the place name unresolved, not the whole lookup
        let geocode = self.geocoder.reverse(coords).await;
        Ok(ResolvedLocation::new(coords, geocode.as_ref()))
    }

    pub fn reset(&self) {
        self.state.reset();
    }
}
