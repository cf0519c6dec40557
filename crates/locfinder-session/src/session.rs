//! Wires the three flows to live or mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use locfinder_ai::MockTextGenerator;
use locfinder_core::{Config, ResourceState, ServiceError};
use locfinder_weather::mock::{MockGeocoder, MockGeolocator, MockWeather};
use locfinder_weather::{
    location, GeocodeSource, GeolocationProvider, ReverseGeocoder, WeatherProvider,
    WeatherSnapshot, WeatherSource,
};

use crate::ai::AiFlow;
use crate::location::{LocationFlow, ResolvedLocation};
use crate::weather::WeatherFlow;

pub struct Session {
    pub location: LocationFlow,
    pub weather: WeatherFlow,
    pub ai: AiFlow,
}

impl Session {
    /// Build a session from configuration.
    ///
    /// Mock mode is decided here, once. Live mode initializes the AI flow
    /// with the configured key; an invalid key leaves it `Failed` rather
    /// than failing construction.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        if config.mock.enabled {
            tracing::info!(
                scenario = ?config.mock.weather_scenario,
                "Using mock services"
            );
            let mock = &config.mock;
            return Ok(Self::from_parts(
                Arc::new(MockGeolocator::new()),
                Arc::new(MockGeocoder::new(Duration::from_millis(
                    mock.geocoding_delay_ms,
                ))),
                Arc::new(MockWeather::new(
                    Duration::from_millis(mock.weather_delay_ms),
                    mock.weather_scenario,
                )),
                AiFlow::with_generator(Arc::new(MockTextGenerator::new(
                    Duration::from_millis(mock.ai_delay_ms),
                    mock.randomize,
                ))),
            ));
        }

        let geolocator: Arc<dyn GeolocationProvider> =
            Arc::from(location::from_config(&config.location, &config.endpoints)?);
        let geocoder = ReverseGeocoder::new(&config.endpoints)?;
        let weather = WeatherProvider::new(&config.endpoints)?;

        let ai = AiFlow::gemini(&config.ai, &config.endpoints);
        if !ai.initialize(&config.ai.api_key) {
            tracing::warn!("AI service unavailable until a valid API key is configured");
        }

        Ok(Self::from_parts(
            geolocator,
            Arc::new(geocoder),
            Arc::new(weather),
            ai,
        ))
    }

    pub fn from_parts(
        geolocator: Arc<dyn GeolocationProvider>,
        geocoder: Arc<dyn GeocodeSource>,
        weather: Arc<dyn WeatherSource>,
        ai: AiFlow,
    ) -> Self {
        Self {
            location: LocationFlow::new(geolocator, geocoder),
            weather: WeatherFlow::new(weather),
            ai,
        }
    }

    /// Locate, then fetch weather for the resolved coordinates.
    ///
    /// Weather stays untouched when location fails.
    pub async fn locate_and_fetch(
        &self,
    ) -> (ResourceState<ResolvedLocation>, ResourceState<WeatherSnapshot>) {
        let location = self.location.locate().await;
        let weather = match location.value() {
            Some(resolved) => self.weather.fetch(resolved.coordinates).await,
            None => self.weather.state().snapshot(),
        };
        (location, weather)
    }

    /// Generate an insight for `location`, or for the resolved city when
    /// none is given (locating first if needed).
    pub async fn roast(
        &self,
        location: Option<&str>,
        prompt: Option<&str>,
    ) -> ResourceState<String> {
        let place = match location {
            Some(place) => place.to_string(),
            None => self.resolved_city().await.unwrap_or_default(),
        };
        self.ai.generate(&place, prompt).await
    }

    async fn resolved_city(&self) -> Option<String> {
        let resolved = match self.location.state().value() {
            Some(resolved) => resolved,
            None => self.location.locate().await.value()?.clone(),
        };
        resolved.city
    }

    /// Return every resource to Idle.
    pub fn reset(&self) {
        self.location.reset();
        self.weather.clear();
        self.ai.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locfinder_core::MockConfig;
    use locfinder_weather::LocationError;

    fn mock_session() -> Session {
        let config = Config {
            mock: MockConfig::instant(),
            ..Default::default()
        };
        Session::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_mock_session_locates_and_fetches() {
        let session = mock_session();
        let (location, weather) = session.locate_and_fetch().await;

        assert_eq!(
            location.value().unwrap().city.as_deref(),
            Some("Cambridge")
        );
        let weather = weather.value().unwrap();
        assert_eq!(weather.weather_code, 2);
        assert_eq!(weather.classification().description, "Partly cloudy");
    }

    #[tokio::test]
    async fn test_mock_session_roasts_resolved_city() {
        let session = mock_session();
        let state = session.roast(None, None).await;
        assert!(state
            .value()
            .unwrap()
            .starts_with("Oh, you're from Cambridge."));
        // Roasting located us on the way
        assert!(session.location.state().snapshot().is_ready());
    }

    #[tokio::test]
    async fn test_roast_explicit_location() {
        let session = mock_session();
        let state = session.roast(Some("Oxford"), None).await;
        assert!(state.value().unwrap().contains("Oxford"));
        assert!(session.location.state().snapshot().is_idle());
    }

    #[tokio::test]
    async fn test_weather_skipped_when_location_fails() {
        let session = Session::from_parts(
            Arc::new(MockGeolocator::failing(LocationError::ServiceUnavailable)),
            Arc::new(MockGeocoder::new(Duration::ZERO)),
            Arc::new(MockWeather::new(Duration::ZERO, Default::default())),
            AiFlow::with_generator(Arc::new(MockTextGenerator::new(Duration::ZERO, false))),
        );

        let (location, weather) = session.locate_and_fetch().await;
        assert!(location.is_failed());
        assert!(weather.is_idle());
    }

    #[tokio::test]
    async fn test_live_session_with_placeholder_key() {
        let config = Config::default();
        let session = Session::from_config(&config).unwrap();
        assert!(!session.ai.is_initialized());

        let state = session.roast(Some("Cambridge"), None).await;
        assert_eq!(
            state.error(),
            Some(ServiceError::InvalidApiKey.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_roast_after_reset_still_reports_invalid_key() {
        let session = Session::from_config(&Config::default()).unwrap();
        session.reset();
        assert!(session.ai.state().snapshot().is_idle());

        let state = session.roast(Some("Cambridge"), None).await;
        assert_eq!(
            state.error(),
            Some(ServiceError::InvalidApiKey.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_roast_empty_location_checked_before_key() {
        let session = Session::from_config(&Config::default()).unwrap();
        let state = session.roast(Some(""), None).await;
        assert_eq!(state.error(), Some("No location provided"));
    }

    #[tokio::test]
    async fn test_roast_uninitialized_ai() {
        let session = Session::from_parts(
            Arc::new(MockGeolocator::new()),
            Arc::new(MockGeocoder::new(Duration::ZERO)),
            Arc::new(MockWeather::new(Duration::ZERO, Default::default())),
            AiFlow::new(|_| Err(ServiceError::AiNotInitialized)),
        );
        let state = session.roast(None, None).await;
        assert_eq!(state.error(), Some("AI service not initialized"));
    }

    #[tokio::test]
    async fn test_reset_clears_all() {
        let session = mock_session();
        session.locate_and_fetch().await;
        session.roast(None, None).await;
        session.reset();

        assert!(session.location.state().snapshot().is_idle());
        assert!(session.weather.state().snapshot().is_idle());
        assert!(session.ai.state().snapshot().is_idle());
    }
}
