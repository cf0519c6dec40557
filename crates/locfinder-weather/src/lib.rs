//! Weather and place data for locfinder
//!
//! WMO code classification, Nominatim reverse geocoding, Open-Meteo current
//! weather and the geolocation collaborators, each with a canned mock.

pub mod classify;
pub mod geocode;
pub mod location;
pub mod mock;
pub mod provider;
pub mod types;

pub use classify::{IconCategory, WeatherClassification};
pub use geocode::{city_of, full_location_of, GeocodeResult, GeocodeSource, ReverseGeocoder};
pub use location::GeolocationProvider;
pub use provider::{WeatherProvider, WeatherSource};
pub use types::*;
