//! Current-weather acquisition for resolved coordinates.

use std::sync::Arc;

use locfinder_core::{ResourceState, SharedResource};
use locfinder_weather::{Coordinates, WeatherSnapshot, WeatherSource};

pub struct WeatherFlow {
    source: Arc<dyn WeatherSource>,
    state: SharedResource<WeatherSnapshot>,
}

impl WeatherFlow {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            source,
            state: SharedResource::new("weather"),
        }
    }

    pub fn state(&self) -> &SharedResource<WeatherSnapshot> {
        &self.state
    }

    /// Fetch current weather at `coords`.
    ///
    /// Overlapping calls are allowed; only the latest issued one settles.
    pub async fn fetch(&self, coords: Coordinates) -> ResourceState<WeatherSnapshot> {
        let ticket = self.state.begin();
        let result = self.source.current(coords).await;
        if let Err(e) = &result {
            tracing::warn!("Weather fetch failed: {}", e);
        }
        self.state.settle(ticket, result);
        self.state.snapshot()
    }

    pub fn clear(&self) {
        self.state.reset();
    }
}
