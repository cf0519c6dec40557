//! Centralized error types for locfinder.
//!
//! Every collaborator boundary (geolocation, geocoding, weather, text
//! generation) converts its native failure into one of these types. The
//! `Display` output is the human-readable message stored on a failed
//! resource; `user_message()` is a shorter, non-technical variant.

use thiserror::Error;

/// Fallback message when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors surfaced by the location, weather and AI flows.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Geolocation is not supported on this system")]
    GeolocationUnsupported,

    /// Position lookup failed or was refused.
    #[error("Error: {0}")]
    Geolocation(String),

    #[error("No location provided")]
    NoLocationProvided,

    #[error("AI service not initialized")]
    AiNotInitialized,

    #[error(
        "Please set GOOGLE_AI_KEY in your environment or config file. Get your API key from https://ai.google.dev/"
    )]
    InvalidApiKey,

    #[error("Failed to fetch weather data")]
    WeatherUnavailable,

    #[error("Error getting AI response: {0}")]
    Generation(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl ServiceError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ServiceError::GeolocationUnsupported => "Location lookup is not available here.",
            ServiceError::Geolocation(_) => "Could not determine your location.",
            ServiceError::NoLocationProvided => "Enter a location first.",
            ServiceError::AiNotInitialized | ServiceError::InvalidApiKey => {
                "The AI service is not configured. Check your API key."
            }
            ServiceError::WeatherUnavailable => {
                "Weather service unavailable. Please try again later."
            }
            ServiceError::Generation(_) => "The AI could not answer. Please try again.",
            ServiceError::Network(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::HttpStatus { status } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::HttpStatus { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory could not be determined")]
    NoConfigDir,

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = self.status() {
            NetworkError::HttpStatus {
                status: status.as_u16(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        e.into_network_error()
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::Network(e.into_network_error())
    }
}
